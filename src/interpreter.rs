use crate::builtin;
use crate::command::{ExitCode, Invocation, Status, Stdout};
use crate::completion::ShellHelper;
use crate::env::Environment;
use crate::external;
use crate::lexer::Line;
use crate::redirect::{self, RedirectError};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Settings for the interactive loop.
#[derive(Debug, Clone)]
pub struct ReplOptions {
    pub prompt: String,
    /// Number of recent lines kept in history.
    pub history_size: usize,
    /// Where history is loaded from at start and saved to on exit.
    pub history_file: Option<PathBuf>,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_owned(),
            history_size: 100,
            history_file: None,
        }
    }
}

/// A line-oriented command interpreter.
///
/// The interpreter owns its [`Environment`], its default output target and
/// its diagnostic stream. Each call to [`Interpreter::run`] handles one line:
/// optional redirection, then a builtin or an external program.
///
/// Example
/// ```
/// use xxsh::{Interpreter, MemWriter};
/// let out = MemWriter::new();
/// let mut sh = Interpreter::with_output(Box::new(out.clone()), Box::new(std::io::sink()));
/// assert_eq!(sh.run("echo hello   world"), 0);
/// assert_eq!(out.contents(), "hello world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    stdout: Box<dyn Stdout>,
    stderr: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(env: Environment, stdout: Box<dyn Stdout>, stderr: Box<dyn Write>) -> Self {
        Self {
            env,
            stdout,
            stderr,
        }
    }

    /// An interpreter over the process environment writing to the given streams.
    pub fn with_output(stdout: Box<dyn Stdout>, stderr: Box<dyn Write>) -> Self {
        Self::new(Environment::new(), stdout, stderr)
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// False once `exit` has run.
    pub fn is_running(&self) -> bool {
        self.env.running
    }

    /// Run one command line and return its signed [`ExitCode`].
    pub fn run(&mut self, line: &str) -> ExitCode {
        self.execute(line).code()
    }

    /// Run one command line.
    ///
    /// A redirected output file lives only for this call, so every return
    /// path leaves the default output target in place for the next line.
    pub fn execute(&mut self, line: &str) -> Status {
        let (command, target) = match redirect::split_redirect(line) {
            Ok(split) => split,
            Err(e) => return self.report(&e),
        };

        let mut redirected = match target {
            Some(path) => match File::create(self.env.resolve(&path)) {
                Ok(file) => {
                    log::debug!("output redirected to {}", path.display());
                    Some(file)
                }
                Err(source) => return self.report(&RedirectError::OpenFailed { path, source }),
            },
            None => None,
        };
        let out: &mut dyn Stdout = match redirected.as_mut() {
            Some(file) => file,
            None => self.stdout.as_mut(),
        };

        let mut inv = Invocation {
            out,
            err: self.stderr.as_mut(),
            env: &mut self.env,
        };
        let status = dispatch(&command, &mut inv);
        if let Err(e) = inv.out.flush() {
            log::warn!("failed to flush output: {e}");
        }
        status
    }

    fn report(&mut self, e: &RedirectError) -> Status {
        let _ = writeln!(self.stderr, "{e}");
        Status::Failed
    }

    /// Read lines from the terminal and run them until `exit` or end of input.
    pub fn repl(&mut self, options: &ReplOptions) -> rustyline::Result<()> {
        let config = Config::builder()
            .max_history_size(options.history_size)?
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(ShellHelper::new(&self.env.current_dir)));
        if let Some(path) = &options.history_file {
            if let Err(e) = rl.load_history(path) {
                log::debug!("no history loaded from {}: {e}", path.display());
            }
        }

        while self.is_running() {
            if let Some(helper) = rl.helper_mut() {
                helper.cwd.clone_from(&self.env.current_dir);
            }
            match rl.readline(&options.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let code = self.run(&line);
                    if code < 0 {
                        let _ = writeln!(self.stderr, ":( {code}");
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    log::error!("reading input failed: {err}");
                    return Err(err);
                }
            }
        }

        if let Some(path) = &options.history_file {
            if let Err(e) = rl.save_history(path) {
                log::warn!("failed to save history to {}: {e}", path.display());
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// The process environment, standard output and standard error.
    fn default() -> Self {
        Self::with_output(Box::new(io::stdout()), Box::new(io::stderr()))
    }
}

/// Look up the first token as a builtin, falling back to an external program.
fn dispatch(command: &str, inv: &mut Invocation<'_>) -> Status {
    let mut args = Line::new(command);
    let Some(name) = args.next_token() else {
        return Status::Success;
    };
    match builtin::lookup(name) {
        Some(builtin) => {
            log::debug!("builtin {name}");
            builtin.invoke(&mut args, inv)
        }
        None => {
            log::debug!("external {name}");
            external::spawn(name, &mut args, inv)
        }
    }
}
