use argh::FromArgs;
use std::path::PathBuf;
use xxsh::{Interpreter, ReplOptions};

#[derive(FromArgs)]
/// A minimal interactive shell.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status
    command: Option<String>,

    #[argh(option, default = "String::from(\">> \")")]
    /// prompt shown before each line
    prompt: String,

    #[argh(option, default = "100")]
    /// number of lines kept in history
    history_size: usize,

    #[argh(option)]
    /// file to load history from and save it to
    history_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();
    let mut sh = Interpreter::default();

    if let Some(line) = args.command {
        let code = sh.run(&line);
        if code < 0 {
            eprintln!(":( {code}");
        }
        std::process::exit(code.saturating_neg().clamp(0, 255));
    }

    log::info!("starting interactive session");
    sh.repl(&ReplOptions {
        prompt: args.prompt,
        history_size: args.history_size,
        history_file: args.history_file,
    })?;
    Ok(())
}
