use std::path::PathBuf;

use clap::Parser;
use communityid::Encoding;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::runtime::conf::conf_serde::level;

/// Compute Community ID flow hashes.
///
/// With a five-tuple on the command line, prints its Community ID. Without one,
/// reads `<protocol> <src-addr> <src-port> <dst-addr> <dst-port>` lines from
/// stdin and prints one ID per line.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set the path to the configuration file (e.g., "config.yaml").
    #[arg(short, long, value_name = "FILE", env = "COMMUNITYID_CONFIG_PATH")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Seed mixed into every hash; only the low 16 bits are used.
    #[arg(short, long, value_name = "SEED", env = "COMMUNITYID_SEED")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,

    /// Output encoding of the digest ("base64" or "hex").
    #[arg(short, long, value_name = "ENCODING", env = "COMMUNITYID_ENCODING")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,

    /// Set the application's log level (e.g., "debug", "warn").
    #[arg(short, long, value_name = "LEVEL", env = "COMMUNITYID_LOG_LEVEL")]
    #[serde(
        with = "level::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub log_level: Option<Level>,

    /// Five-tuple to hash: PROTOCOL SRC_ADDR SRC_PORT DST_ADDR DST_PORT.
    #[arg(
        num_args = 5,
        allow_negative_numbers = true,
        value_names = ["PROTOCOL", "SRC_ADDR", "SRC_PORT", "DST_ADDR", "DST_PORT"]
    )]
    #[serde(skip)]
    pub flow: Vec<String>,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser as _;
    use communityid::Encoding;
    use figment::Jail;
    use tracing::Level;

    use super::Cli;

    #[test]
    fn parses_long_flags() {
        Jail::expect_with(|jail| {
            // ensures that CLI args override env vars
            jail.set_env("COMMUNITYID_CONFIG_PATH", "/tmp/communityid.yaml");
            jail.set_env("COMMUNITYID_SEED", "9");
            jail.set_env("COMMUNITYID_LOG_LEVEL", "debug");

            let args = [
                "communityid",
                "--config",
                "/path/to/conf.yaml",
                "--seed",
                "1",
                "--encoding",
                "hex",
                "--log-level",
                "warn",
            ];
            let cli = Cli::parse_from(args);
            assert_eq!(cli.config, Some(PathBuf::from("/path/to/conf.yaml")));
            assert_eq!(cli.seed, Some(1));
            assert_eq!(cli.encoding, Some(Encoding::Hex));
            assert_eq!(cli.log_level, Some(Level::WARN));
            assert!(cli.flow.is_empty());

            Ok(())
        });
    }

    #[test]
    fn parses_from_env_when_no_args() {
        Jail::expect_with(|jail| {
            jail.set_env("COMMUNITYID_CONFIG_PATH", "/tmp/communityid.yaml");
            jail.set_env("COMMUNITYID_SEED", "3");
            jail.set_env("COMMUNITYID_ENCODING", "base64");
            jail.set_env("COMMUNITYID_LOG_LEVEL", "debug");

            let cli = Cli::parse_from(["communityid"]);
            assert_eq!(cli.config, Some(PathBuf::from("/tmp/communityid.yaml")));
            assert_eq!(cli.seed, Some(3));
            assert_eq!(cli.encoding, Some(Encoding::Base64));
            assert_eq!(cli.log_level, Some(Level::DEBUG));

            Ok(())
        });
    }

    #[test]
    fn options_are_unset_by_default() {
        Jail::expect_with(|_| {
            let cli = Cli::parse_from(["communityid"]);
            assert_eq!(cli.seed, None);
            assert_eq!(cli.encoding, None);
            assert_eq!(cli.log_level, None);

            Ok(())
        });
    }

    #[test]
    fn parses_positional_flow() {
        Jail::expect_with(|_| {
            let cli = Cli::parse_from([
                "communityid",
                "tcp",
                "128.232.110.120",
                "34855",
                "66.35.250.204",
                "80",
            ]);
            assert_eq!(
                cli.flow,
                ["tcp", "128.232.110.120", "34855", "66.35.250.204", "80"]
            );

            Ok(())
        });
    }

    #[test]
    fn rejects_partial_flow() {
        Jail::expect_with(|_| {
            let result = Cli::try_parse_from(["communityid", "tcp", "10.0.0.1"]);
            assert!(result.is_err());

            Ok(())
        });
    }
}
