use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Mutable, interpreter-owned view of the process environment.
///
/// The environment contains:
/// - `vars`: variables visible to `get`/`env` and passed to spawned programs.
/// - `current_dir`: the directory relative paths are resolved against.
/// - `running`: cleared by `exit` to stop the interactive loop.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: BTreeMap<String, String>,
    pub current_dir: PathBuf,
    pub running: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment`.
    pub fn new() -> Self {
        let vars = stdenv::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self {
            vars,
            current_dir,
            running: true,
        }
    }

    /// An environment with no variables, rooted at `current_dir`.
    pub fn empty(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: BTreeMap::new(),
            current_dir: current_dir.into(),
            running: true,
        }
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: &str, val: &str) -> Result<()> {
        check_name(key)?;
        if val.contains('\0') {
            bail!("{key}: value contains NUL");
        }
        self.vars.insert(key.to_owned(), val.to_owned());
        Ok(())
    }

    /// Remove a variable. Removing an absent variable is not an error.
    pub fn unset_var(&mut self, key: &str) -> Result<()> {
        check_name(key)?;
        self.vars.remove(key);
        Ok(())
    }

    /// Resolve `path` against the current directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current_dir.join(path)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\0']) {
        bail!("{key:?}: invalid variable name");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::empty("/");

        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE").unwrap();

        assert_eq!(env.get_var("KEY"), Some("VALUE"));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(env.running);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut env = Environment::empty("/");
        assert!(env.set_var("", "x").is_err());
        assert!(env.set_var("A=B", "x").is_err());
        assert!(env.unset_var("A=B").is_err());
        assert!(env.vars.is_empty());
    }

    #[test]
    fn test_unset_absent_is_ok() {
        let mut env = Environment::empty("/");
        env.set_var("GONE", "1").unwrap();
        env.unset_var("GONE").unwrap();
        env.unset_var("GONE").unwrap();
        assert_eq!(env.get_var("GONE"), None);
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let env = Environment::empty("/srv");
        assert_eq!(env.resolve("data"), PathBuf::from("/srv/data"));
        assert_eq!(env.resolve("/etc"), PathBuf::from("/etc"));
    }
}
