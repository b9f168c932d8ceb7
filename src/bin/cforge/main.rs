use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod display;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    let ctx = display::Context::detect().with_quiet(match &cli.command {
        cli::Command::Run(args) => args.quiet,
        cli::Command::Embed(args) => args.quiet,
        cli::Command::Descriptors(_) => true,
    });

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
