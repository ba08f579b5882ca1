use anyhow::Result;
use as3ts_cli::args::CliArgs;
use as3ts_cli::{driver, tracing_config};
use clap::Parser;

fn main() -> Result<()> {
    // Installs a subscriber only when AS3TS_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    driver::run(&args)
}
