mod cli;

use crate::cli::{Command, LogFormatArg, CLI};
use clap::Parser;
use idmaker::{decode, first_id_for_unix_time, time_string_of, IdMaker};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::parse();

    init_tracing(config.log_format);

    info!(log_format = %config.log_format, "starting idmaker");

    let mut stdout = std::io::stdout().lock();
    run(config.command, &mut stdout)
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

fn run(
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Next { node_id, count } => {
            let maker = IdMaker::new(node_id)?;
            info!(node_id, count, "minting ids");
            for _ in 0..count {
                writeln!(out, "{}", maker.next_id()?)?;
            }
        }
        Command::Decode { ids, json } => {
            for id in ids {
                if json {
                    writeln!(out, "{}", serde_json::to_string(&decode(id))?)?;
                } else {
                    let decoded = decode(id);
                    writeln!(
                        out,
                        "{}\tnode_id={}\tsequence={}\ttime={}",
                        id,
                        decoded.node_id,
                        decoded.sequence,
                        time_string_of(id)
                    )?;
                }
            }
        }
        Command::FirstId { unix_seconds } => {
            writeln!(out, "{}", first_id_for_unix_time(unix_seconds))?;
        }
    }
    Ok(())
}
