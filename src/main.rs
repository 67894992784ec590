use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use tagval::cli::{describe, Command, Options};
use tagval::value::Value;

fn main() -> miette::Result<()> {
    // Install the panic handler.
    bupropion::install(bupropion::BupropionHandlerOpts::new).into_diagnostic()?;

    // Parse the command line arguments.
    let options = Options::parse();

    let filter = EnvFilter::try_from_env("TAGVAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if options.debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &options.command {
        Some(Command::Decode { word }) => println!("{}", describe(Value::from_bits(*word))),
        Some(Command::Encode { immediate }) => println!("{}", describe(immediate.encode()?)),
        Some(Command::Repl) | None => tagval::repl::run(&options).into_diagnostic()?,
    }

    Ok(())
}
