//! Tab completion for the line editor.

use crate::builtin::BUILTINS;
use crate::lexer::is_separator;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::fs;
use std::path::{Path, PathBuf};

/// Candidates for the text before the cursor, relative to `cwd`.
///
/// Returns the byte offset where the replacement starts and the candidates.
/// - blank input: every builtin name
/// - input ending in whitespace: entries of `cwd`, as a new argument
/// - otherwise the last token is a path being typed; entries of its
///   directory that start with the typed prefix replace that token
///
/// Hidden entries are never offered. Directories end with `/`.
pub fn complete(line: &str, cwd: &Path) -> (usize, Vec<Pair>) {
    if line.chars().all(is_separator) {
        let names = BUILTINS
            .iter()
            .map(|b| Pair {
                display: b.name.to_owned(),
                replacement: b.name.to_owned(),
            })
            .collect();
        return (0, names);
    }
    if line.ends_with(is_separator) {
        return (line.len(), entries(cwd, "", ""));
    }

    let start = line.rfind(is_separator).map_or(0, |i| i + 1);
    let word = &line[start..];
    let (dir, prefix) = match word.rfind('/') {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    };
    (start, entries(&cwd.join(dir), dir, prefix))
}

/// Visible entries of `dir` starting with `prefix`, each prefixed by `shown_dir`.
fn entries(dir: &Path, shown_dir: &str, prefix: &str) -> Vec<Pair> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<Pair> = read
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if name.starts_with('.') || !name.starts_with(prefix) {
                return None;
            }
            let marker = if entry.path().is_dir() { "/" } else { "" };
            Some(Pair {
                display: format!("{name}{marker}"),
                replacement: format!("{shown_dir}{name}{marker}"),
            })
        })
        .collect();
    found.sort_by(|a, b| a.display.cmp(&b.display));
    found
}

/// Line editor helper that completes against the interpreter's working directory.
///
/// The owner keeps `cwd` in step with its environment before each read.
#[derive(Debug, Default)]
pub struct ShellHelper {
    pub cwd: PathBuf,
}

impl ShellHelper {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(complete(&line[..pos], &self.cwd))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(line: &str, cwd: &Path) -> (usize, Vec<String>) {
        let (start, pairs) = complete(line, cwd);
        (start, pairs.into_iter().map(|p| p.replacement).collect())
    }

    fn populated() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alpha.txt"), "").unwrap();
        fs::write(dir.path().join("beta.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/logo.png"), "").unwrap();
        fs::write(dir.path().join("assets/.keep"), "").unwrap();
        dir
    }

    #[test]
    fn test_blank_input_offers_builtins() {
        let (start, names) = replacements("", Path::new("/"));
        assert_eq!(start, 0);
        let expected: Vec<String> = BUILTINS.iter().map(|b| b.name.to_owned()).collect();
        assert_eq!(names, expected);

        assert_eq!(replacements("  \t", Path::new("/")).1, expected);
    }

    #[test]
    fn test_trailing_space_lists_cwd() {
        let dir = populated();
        let (start, names) = replacements("ls ", dir.path());
        assert_eq!(start, 3);
        assert_eq!(names, vec!["alpha.txt", "assets/", "beta.txt"]);
    }

    #[test]
    fn test_prefix_filters_and_replaces_last_token() {
        let dir = populated();
        let (start, names) = replacements("cat a", dir.path());
        assert_eq!(start, 4);
        assert_eq!(names, vec!["alpha.txt", "assets/"]);
    }

    #[test]
    fn test_trailing_separator_lists_that_directory() {
        let dir = populated();
        let (start, names) = replacements("cat assets/", dir.path());
        assert_eq!(start, 4);
        assert_eq!(names, vec!["assets/logo.png"]);
    }

    #[test]
    fn test_prefix_inside_directory() {
        let dir = populated();
        let (_, names) = replacements("cat assets/l", dir.path());
        assert_eq!(names, vec!["assets/logo.png"]);
        let (_, names) = replacements("cat assets/zzz", dir.path());
        assert!(names.is_empty());
    }

    #[test]
    fn test_hidden_entries_never_offered() {
        let dir = populated();
        let (_, names) = replacements("cat .", dir.path());
        assert!(names.is_empty());
    }

    #[test]
    fn test_absolute_paths() {
        let dir = populated();
        let typed = format!("ls {}/be", dir.path().display());
        let (start, names) = replacements(&typed, Path::new("/"));
        assert_eq!(start, 3);
        assert_eq!(names, vec![format!("{}/beta.txt", dir.path().display())]);
    }

    #[test]
    fn test_helper_uses_its_own_directory() {
        use rustyline::history::DefaultHistory;

        let dir = populated();
        let helper = ShellHelper::new(dir.path());
        let history = DefaultHistory::new();
        let (start, pairs) = Completer::complete(&helper, "cat b", 5, &Context::new(&history)).unwrap();
        assert_eq!(start, 4);
        let names: Vec<String> = pairs.into_iter().map(|p| p.replacement).collect();
        assert_eq!(names, vec!["beta.txt"]);
    }

    #[test]
    fn test_missing_directory_offers_nothing() {
        let dir = populated();
        assert!(replacements("cat nowhere/", dir.path()).1.is_empty());
    }
}
