//! main.rs
//! Entry point for rls

use runa_ls::app::{ExitStatus, Lister};
use runa_ls::config::Config;
use runa_ls::utils::cli::Args;
use runa_ls::utils::terminal_width;

use anyhow::Context;
use clap::Parser;

use std::io::{self, BufWriter, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("RLS_LOG", "warn")).init();

    match run() {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            // A closed pipe (`rls | head`) is not worth a message.
            if let Some(io_err) = err.downcast_ref::<io::Error>()
                && io_err.kind() == io::ErrorKind::BrokenPipe
            {
                return ExitCode::from(ExitStatus::Success.code());
            }
            eprintln!("rls: {err:#}");
            ExitCode::from(ExitStatus::Serious.code())
        }
    }
}

fn run() -> anyhow::Result<ExitStatus> {
    let args = Args::parse();

    if args.init {
        let path = Config::default_path();
        Config::generate_default(&path)
            .with_context(|| format!("cannot write config to {}", path.display()))?;
        return Ok(ExitStatus::Success);
    }

    let config = Config::load();
    let tty = io::stdout().is_terminal();
    let opts = args.resolve(config.general(), tty, terminal_width());
    log::debug!("resolved options: {opts:?}");

    let stdout = io::stdout();
    let mut lister = Lister::new(opts, BufWriter::new(stdout.lock()));
    let status = lister.run(&args.paths)?;
    Ok(status)
}
