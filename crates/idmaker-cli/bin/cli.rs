use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};

pub const NODE_ID_ENV: &str = "IDMAKER_NODE_ID";
pub const LOG_FORMAT_ENV: &str = "IDMAKER_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "idmaker", about = "Mint and decode time-ordered 64-bit IDs")]
pub struct CLI {
    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Mint new IDs, one per line.
    Next {
        /// Node id of this generator, 0..=2047. Must be unique per running generator.
        #[arg(long, env = NODE_ID_ENV, allow_negative_numbers = true)]
        node_id: i64,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },
    /// Print the node id, sequence and mint time of IDs.
    Decode {
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
        /// Print one JSON object per ID.
        #[arg(long)]
        json: bool,
    },
    /// Print the smallest ID that can be minted at or after a Unix time (seconds).
    FirstId {
        #[arg(allow_negative_numbers = true)]
        unix_seconds: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_defaults_to_one_id() {
        let cli = CLI::try_parse_from(["idmaker", "next", "--node-id", "3"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Next {
                node_id: 3,
                count: 1
            }
        );
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn next_requires_node_id() {
        // two hosts falling back to the same default node id would mint colliding ids
        if std::env::var_os(NODE_ID_ENV).is_none() {
            let err = CLI::try_parse_from(["idmaker", "next"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = CLI::try_parse_from([
            "idmaker",
            "next",
            "-n",
            "10",
            "--node-id",
            "12",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Next {
                node_id: 12,
                count: 10
            }
        );
        assert_eq!(cli.log_format, LogFormatArg::Json);
    }

    #[test]
    fn decode_takes_many_ids() {
        let cli = CLI::try_parse_from(["idmaker", "decode", "--json", "8388628480", "-1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Decode {
                ids: vec![8_388_628_480, -1],
                json: true
            }
        );
    }

    #[test]
    fn decode_requires_an_id() {
        assert!(CLI::try_parse_from(["idmaker", "decode"]).is_err());
    }

    #[test]
    fn first_id_accepts_negative_seconds() {
        let cli = CLI::try_parse_from(["idmaker", "first-id", "-5"]).unwrap();
        assert_eq!(cli.command, Command::FirstId { unix_seconds: -5 });
    }
}
