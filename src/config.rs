use std::io::ErrorKind;

use log::warn;
use serde::Deserialize;
use ytinfo::FetchConfig;

use crate::consts::CONFIG_FILE;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Debug, Default, Deserialize)]
#[non_exhaustive]
pub struct OutputConfig {
    /// How the streams are printed, unless overridden on the command line.
    #[serde(default)]
    pub format: OutputFormat,
    /// Whether to fetch the player JavaScript and decipher protected streams.
    #[serde(default)]
    pub decipher: bool,
}

#[derive(Debug, Default, Deserialize)]
#[non_exhaustive]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Reads `config.toml` from the config directory. A missing file means the defaults, a broken
    /// one is an error.
    pub fn new() -> Result<Self, String> {
        let Some(config_path) = CONFIG_FILE.as_ref() else {
            warn!("Failed to get config dir! Using the default config");
            return Ok(Self::default());
        };

        match std::fs::read_to_string(config_path) {
            Ok(config_string) => Self::parse(&config_string)
                .map_err(|e| format!("{}: {}", config_path.display(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(format!("Failed to read {}: {}", config_path.display(), e)),
        }
    }

    pub fn parse(config_string: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_the_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.decipher);
    }

    #[test]
    fn partial_sections() {
        let config = Config::parse(
            r#"
            [fetch]
            timeout_secs = 10
            user_agent = "ytresolve"

            [output]
            format = "table"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.connect_timeout_secs, 30);
        assert_eq!(config.fetch.user_agent, "ytresolve");
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn broken_config_is_reported() {
        assert!(Config::parse("[fetch]\ntimeout_secs = \"soon\"").is_err());
        assert!(Config::parse("[output]\nformat = \"xml\"").is_err());
    }
}
