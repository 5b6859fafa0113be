//! A minimal line-oriented shell for constrained environments.
//!
//! Each input line may carry one `> path` output redirection. The first
//! word names either a builtin from a fixed table (file inspection,
//! environment variables, mounts) or an external program to spawn. Results
//! are reported as signed integers: `0` for success, `-1` for a failed
//! builtin, `-code` for a child's exit code and `-128 - n` for a child
//! killed by signal `n`.
//!
//! The main entry point is [`Interpreter`]. Builtins are listed in
//! [`builtin::BUILTINS`]; the same table drives `help` and completion.

pub mod builtin;
pub mod command;
pub mod completion;
pub mod env;
pub mod external;
mod interpreter;
mod io_adapters;
pub mod lexer;
pub mod mount_flags;
pub mod redirect;
mod sys;

pub use command::{ExitCode, Status};
pub use interpreter::{Interpreter, ReplOptions};
pub use io_adapters::MemWriter;
