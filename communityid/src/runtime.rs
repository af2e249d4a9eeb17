use std::{error::Error, fmt};

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{Layer, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::runtime::{
    cli::Cli,
    conf::{Conf, ConfError},
};

pub mod cli;
pub mod conf;

pub struct Runtime {
    pub cli: Cli,
    pub conf: Conf,
}

impl Runtime {
    pub fn new() -> Result<Self, RuntimeError> {
        let cli = Cli::parse();
        let (conf, cli) = Conf::new(cli)?;

        Ok(Runtime { cli, conf })
    }

    /// Installs the global subscriber. Logs go to stderr so that stdout only
    /// carries Community IDs.
    pub fn init_logging(&self) {
        let log_level = self.conf.log_level;

        let mut fmt_layer = Layer::new()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(std::env::var("NO_COLOR").is_err());

        match log_level {
            Level::DEBUG => fmt_layer = fmt_layer.with_file(true).with_line_number(true),
            Level::TRACE => {
                fmt_layer = fmt_layer
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_file(true)
                    .with_line_number(true)
            }
            _ => {}
        }

        let filter = EnvFilter::new(format!("warn,communityid={log_level}"));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug)]
pub enum RuntimeError {
    Conf(ConfError),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Conf(e) => e.fmt(f),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Conf(e) => Some(e),
        }
    }
}

impl From<ConfError> for RuntimeError {
    fn from(e: ConfError) -> Self {
        RuntimeError::Conf(e)
    }
}
