use std::{
    error::Error,
    fmt,
    path::{Path, PathBuf},
};

use communityid::{CommunityIdGenerator, Encoding};
use figment::{
    Figment,
    providers::{Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::runtime::{cli::Cli, conf::conf_serde::level};

/// Settings that shape every Community ID the process emits.
///
/// Layered from lowest to highest priority: defaults, the YAML file given by
/// `--config`, then environment variables and command line flags.
#[derive(Debug, Deserialize, Serialize)]
pub struct Conf {
    /// Seed mixed into every hash so an organisation can produce IDs that do
    /// not collide with anyone else's. Only the low 16 bits are significant.
    /// - Default: 0
    #[serde(default)]
    pub seed: u32,

    /// Digest encoding after the `1:` prefix.
    /// - Default: `base64`
    #[serde(default)]
    pub encoding: Encoding,

    /// The logging level for the application.
    #[serde(with = "level")]
    pub log_level: Level,

    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            seed: 0,
            encoding: Encoding::Base64,
            log_level: Level::INFO,
            config_path: None,
        }
    }
}

impl From<&Conf> for CommunityIdGenerator {
    fn from(conf: &Conf) -> Self {
        CommunityIdGenerator::new(conf.seed, conf.encoding)
    }
}

impl Conf {
    /// Creates a new `Conf` from the parsed CLI, which already carries any
    /// environment overrides, and the optional configuration file.
    ///
    /// # Errors
    /// * `ConfError::NoConfigFile` - the given config path does not exist.
    /// * `ConfError::InvalidConfigPath` - the config path is a directory.
    /// * `ConfError::InvalidExtension` - the config file is not `yaml`/`yml`.
    /// * `ConfError::Extraction` - the layered configuration failed to deserialize.
    pub fn new(cli: Cli) -> Result<(Self, Cli), ConfError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Conf::default()));

        let config_path_to_store = if let Some(config_path) = &cli.config {
            validate_config_path(config_path)?;
            figment = figment.merge(Yaml::file(config_path));
            Some(config_path.clone())
        } else {
            None
        };

        figment = figment.merge(Serialized::defaults(&cli));

        let mut conf: Conf = figment.extract()?;
        conf.config_path = config_path_to_store;
        Ok((conf, cli))
    }
}

/// Validates that the given path points to an existing file with a supported extension.
fn validate_config_path(path: &Path) -> Result<(), ConfError> {
    if !path.is_file() {
        if path.exists() {
            return Err(ConfError::InvalidConfigPath(
                path.to_string_lossy().into_owned(),
            ));
        } else {
            return Err(ConfError::NoConfigFile);
        }
    }

    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(()),
        Some(ext) => Err(ConfError::InvalidExtension(ext.to_string())),
        None => Err(ConfError::InvalidExtension("none".to_string())),
    }
}

#[derive(Debug)]
pub enum ConfError {
    /// The specified configuration file does not exist.
    NoConfigFile,
    /// The path exists but is not a file.
    InvalidConfigPath(String),
    /// The file has an unsupported extension.
    InvalidExtension(String),
    /// Failed to extract configuration data.
    Extraction(Box<figment::Error>),
}

impl fmt::Display for ConfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfError::NoConfigFile => write!(f, "no config file provided"),
            ConfError::InvalidConfigPath(p) => write!(f, "path '{p}' is not a valid file"),
            ConfError::InvalidExtension(ext) => {
                write!(
                    f,
                    "invalid file extension '.{ext}', expected 'yaml' or 'yml'"
                )
            }
            ConfError::Extraction(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl Error for ConfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfError::Extraction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<figment::Error> for ConfError {
    fn from(e: figment::Error) -> Self {
        ConfError::Extraction(Box::from(e))
    }
}

pub mod conf_serde {
    pub mod level {
        use serde::{self, Deserialize, Deserializer, Serializer};
        use tracing::Level;

        pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(level.as_str())
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse::<Level>().map_err(serde::de::Error::custom)
        }

        pub mod option {
            use super::*;

            pub fn serialize<S>(level: &Option<Level>, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                match level {
                    Some(l) => serializer.serialize_str(l.as_str()),
                    None => serializer.serialize_none(),
                }
            }

            pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
            where
                D: Deserializer<'de>,
            {
                let opt = Option::<String>::deserialize(deserializer)?;
                match opt {
                    Some(s) => s
                        .parse::<Level>()
                        .map(Some)
                        .map_err(serde::de::Error::custom),
                    None => Ok(None),
                }
            }
        }
    }
}
