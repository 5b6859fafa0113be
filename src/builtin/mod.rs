//! Commands implemented inside the interpreter.
//!
//! Every builtin is one row of [`BUILTINS`]. Dispatch, `help` and completion
//! all walk that table, so adding a row is all it takes to add a command.
//! A handler receives the line cursor positioned after the command name and
//! pulls its own arguments from it.

mod fs;
mod system;
mod vars;

use crate::command::{ExitCode, Invocation, Status};
use crate::lexer::Line;
use anyhow::Result;
use std::io::Write;

/// Signature shared by all builtin handlers.
///
/// Return `Ok(0)` on success. Handlers that keep going after a failed
/// argument report it themselves and return a non-zero code at the end;
/// an `Err` is reported by the caller.
pub type Handler = fn(&mut Line<'_>, &mut Invocation<'_>) -> Result<ExitCode>;

/// One entry of the builtin table.
pub struct Builtin {
    pub name: &'static str,
    pub help: &'static str,
    handler: Handler,
}

impl Builtin {
    const fn new(name: &'static str, help: &'static str, handler: Handler) -> Self {
        Self {
            name,
            help,
            handler,
        }
    }

    /// Run the handler and fold its result into a [`Status`].
    pub fn invoke(&self, args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Status {
        match (self.handler)(args, inv) {
            Ok(0) => Status::Success,
            Ok(_) => Status::Failed,
            Err(e) => {
                let _ = writeln!(inv.err, "{e:#}");
                Status::Failed
            }
        }
    }
}

/// Built-in commands known to the shell, in `help` order.
pub static BUILTINS: &[Builtin] = &[
    Builtin::new("echo", "Print the arguments separated by spaces", echo),
    Builtin::new("ls", "List files in directories", fs::ls),
    Builtin::new("stat", "Show mode, owner and group of files", fs::stat),
    Builtin::new("pwd", "Print the current working directory", fs::pwd),
    Builtin::new("cat", "See the content of files", fs::cat),
    Builtin::new("zcat", "See the content of gzip or zlib compressed files", fs::zcat),
    Builtin::new("cd", "Change directory, to / when no argument is given", fs::cd),
    Builtin::new("env", "List environment variables", vars::env),
    Builtin::new("get", "Print the value of environment variables", vars::get),
    Builtin::new("set", "Set environment variables: set KEY VALUE [KEY VALUE...]", vars::set),
    Builtin::new("unset", "Remove environment variables", vars::unset),
    Builtin::new("rm", "Remove files", fs::rm),
    Builtin::new("rmdir", "Remove empty directories", fs::rmdir),
    Builtin::new("mkdir", "Create directories", fs::mkdir),
    Builtin::new("mount", "Mount a filesystem: mount SOURCE TARGET [TYPE [FLAGS [DATA]]]", system::mount),
    Builtin::new("umount", "Unmount filesystems", system::umount),
    Builtin::new("reboot", "Restart the system", system::reboot),
    Builtin::new("uname", "Print system information", system::uname),
    Builtin::new("help", "Show this help text", help),
    Builtin::new("exit", "Exit the shell", exit),
];

/// Find the builtin called `name`.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Apply `op` to every remaining argument.
///
/// A failing argument is reported on `err` and the rest are still processed.
/// Returns 1 if any argument failed.
fn for_each_arg(
    args: &mut Line<'_>,
    err: &mut dyn Write,
    mut op: impl FnMut(&str) -> Result<()>,
) -> Result<ExitCode> {
    let mut code = 0;
    for arg in args {
        if let Err(e) = op(arg) {
            writeln!(err, "{e:#}")?;
            code = 1;
        }
    }
    Ok(code)
}

fn echo(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let words: Vec<&str> = args.collect();
    writeln!(inv.out, "{}", words.join(" "))?;
    Ok(0)
}

fn help(_args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    for builtin in BUILTINS {
        writeln!(inv.out, "{}: {}", builtin.name, builtin.help)?;
    }
    Ok(0)
}

fn exit(_args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    inv.env.running = false;
    Ok(0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::command::{Invocation, Status};
    use crate::env::Environment;
    use crate::lexer::Line;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serializes tests that change the process working directory.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Captured result of running one builtin.
    pub struct Run {
        pub status: Status,
        pub out: String,
        pub err: String,
    }

    /// Run builtin `name` with `args` against `env`, capturing both streams.
    pub fn run(env: &mut Environment, name: &str, args: &str) -> Run {
        let builtin = super::lookup(name).expect("unknown builtin");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = builtin.invoke(
            &mut Line::new(args),
            &mut Invocation {
                out: &mut out,
                err: &mut err,
                env,
            },
        );
        Run {
            status,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::run;
    use super::*;
    use crate::env::Environment;

    #[test]
    fn test_echo_joins_with_single_spaces() {
        let mut env = Environment::empty("/");
        let r = run(&mut env, "echo", "hello \t  world");
        assert_eq!(r.status, Status::Success);
        assert_eq!(r.out, "hello world\n");
    }

    #[test]
    fn test_echo_without_args_prints_empty_line() {
        let mut env = Environment::empty("/");
        assert_eq!(run(&mut env, "echo", "").out, "\n");
    }

    #[test]
    fn test_help_lists_every_builtin() {
        let mut env = Environment::empty("/");
        let r = run(&mut env, "help", "");
        assert_eq!(r.out.lines().count(), BUILTINS.len());
        assert!(r.out.starts_with("echo: "));
        assert!(r.out.contains("\nexit: Exit the shell\n"));
    }

    #[test]
    fn test_exit_clears_running_flag() {
        let mut env = Environment::empty("/");
        assert!(env.running);
        assert_eq!(run(&mut env, "exit", "").status, Status::Success);
        assert!(!env.running);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("cat").map(|b| b.name), Some("cat"));
        assert!(lookup("ca").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        for (i, b) in BUILTINS.iter().enumerate() {
            assert!(BUILTINS[i + 1..].iter().all(|o| o.name != b.name));
        }
    }
}
