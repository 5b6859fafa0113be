//! Running programs that are not builtins.

use crate::command::{Invocation, Status};
use crate::lexer::Line;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run `name` as an external program with the remaining tokens as arguments.
///
/// The child writes to the active output target and gets the interpreter's
/// variables and working directory. The parent blocks until it finishes.
pub fn spawn(name: &str, args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Status {
    let search_paths = inv.env.get_var("PATH").unwrap_or_default();
    let Some(program) = find_command_path(OsStr::new(search_paths), Path::new(name), &inv.env.current_dir)
    else {
        let _ = writeln!(inv.err, "{name}: command not found");
        return Status::SpawnFailed;
    };

    match run_child(name, &program, args, inv) {
        Ok(status) => {
            log::debug!("{} finished: {status:?}", program.display());
            status
        }
        Err(e) => {
            let _ = writeln!(inv.err, "{name}: {e}");
            Status::SpawnFailed
        }
    }
}

fn run_child(name: &str, program: &Path, args: &mut Line<'_>, inv: &mut Invocation<'_>) -> io::Result<Status> {
    inv.out.flush()?;
    let stdout = inv.out.stdio()?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .env_clear()
        .envs(&inv.env.vars)
        .current_dir(&inv.env.current_dir)
        .stdout(stdout.unwrap_or_else(Stdio::piped));
    set_arg0(&mut cmd, name);

    let mut child = cmd.spawn()?;
    log::debug!("spawned {} as pid {}", program.display(), child.id());
    // Only present when the output target has no OS handle of its own.
    let relayed = match child.stdout.take() {
        Some(mut pipe) => io::copy(&mut pipe, &mut *inv.out).map(drop),
        None => Ok(()),
    };
    // Reap the child even when relaying its output failed.
    let status = child.wait()?;
    if let Err(e) = relayed {
        log::warn!("lost output of {}: {e}", program.display());
        let _ = writeln!(inv.err, "{name}: {e}");
    }
    Ok(status.into())
}

#[cfg(unix)]
fn set_arg0(cmd: &mut Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut Command, _name: &str) {}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it names a file.
/// - Relative with multiple components (e.g., `bin/sh` or `./foo`): resolved
///   against `cwd`.
/// - Single path component (no separators): search each directory in
///   `search_paths` (PATH) and return the first match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path, cwd: &Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        (Some(std::path::Component::Normal(x)), None) => {
            find_in_path(search_paths, x, cwd).map(Cow::Owned)
        }
        // Multiple components or `.`/`..` prefix -> relative to cwd
        _ => find_by_path(&cwd.join(path)).map(|p| Cow::Owned(p.to_owned())),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr, cwd: &Path) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| cwd.join(dir).join(cmd))
        .find(|path| find_by_path(path).is_some())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}
