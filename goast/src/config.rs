//! goast configuration
//!
//! ```text
//! Priority (high to low):
//! 1. Command line flags
//! 2. Environment ($GOFILE for the provider file)
//! 3. goast.toml (current directory, or --config)
//! 4. Default values
//! ```
//!
//! ```toml
//! [output]
//! prefix = "gen_"
//! suffix = ""
//! directory = "generated"
//!
//! [specialize]
//! marker = "_"
//! parallel = true
//! ```

use goast_specializer::SpecializeOptions;
use miette::Diagnostic;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "goast.toml";

/// Environment variable `go generate` sets to the file holding the directive
pub const GOFILE_ENV: &str = "GOFILE";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub specialize: SpecializeConfig,
}

/// Where and under which names specializations are written
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Defaults to the provider file's directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecializeConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_marker() -> String {
    "_".to_string()
}

fn default_parallel() -> bool {
    true
}

impl Default for SpecializeConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}", .path.display())]
    #[diagnostic(code(goast::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}", .path.display())]
    #[diagnostic(
        code(goast::config::invalid),
        help("Known sections are [output] (prefix, suffix, directory) and [specialize] (marker, parallel)")
    )]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load an explicit config file, or `goast.toml` from `dir` when it exists
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = dir.join(CONFIG_FILE);
            if path.is_file() {
                read_config(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, path)
}

pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Flags given on the command line; `None` means not given
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub marker: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub sequential: bool,
}

/// Fully resolved settings for one `write impl` run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub prefix: String,
    pub suffix: String,
    pub output_dir: Option<PathBuf>,
    pub options: SpecializeOptions,
}

impl Config {
    pub fn resolve(&self, overrides: &Overrides) -> Settings {
        Settings {
            prefix: overrides
                .prefix
                .clone()
                .unwrap_or_else(|| self.output.prefix.clone()),
            suffix: overrides
                .suffix
                .clone()
                .unwrap_or_else(|| self.output.suffix.clone()),
            output_dir: overrides
                .output_dir
                .clone()
                .or_else(|| self.output.directory.clone()),
            options: SpecializeOptions {
                marker: overrides
                    .marker
                    .clone()
                    .unwrap_or_else(|| self.specialize.marker.clone()),
                parallel: self.specialize.parallel && !overrides.sequential,
            },
        }
    }
}

/// The provider file: the command line argument, else `$GOFILE`
pub fn provider_path(argument: Option<PathBuf>, gofile: Option<String>) -> Option<PathBuf> {
    argument.or_else(|| {
        gofile
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.specialize.marker, "_");
        assert!(config.specialize.parallel);
    }

    #[test]
    fn test_config_file_in_directory_is_loaded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[output]\nprefix = \"gen_\"\ndirectory = \"out\"\n\n[specialize]\nparallel = false\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();

        assert_eq!(config.output.prefix, "gen_");
        assert_eq!(config.output.suffix, "");
        assert_eq!(config.output.directory, Some(PathBuf::from("out")));
        assert_eq!(config.specialize.marker, "_");
        assert!(!config.specialize.parallel);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let path = Path::new("goast.toml");

        assert!(matches!(
            parse_config("[output\nprefix = 1", path),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            parse_config("[specialize]\nmarkr = \"_\"\n", path),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_flags_override_config_values() {
        let config = parse_config(
            "[output]\nprefix = \"gen_\"\nsuffix = \"_impl\"\n\n[specialize]\nmarker = \"Gen\"\n",
            Path::new(CONFIG_FILE),
        )
        .unwrap();

        let from_file = config.resolve(&Overrides::default());
        assert_eq!(from_file.prefix, "gen_");
        assert_eq!(from_file.suffix, "_impl");
        assert_eq!(from_file.options.marker, "Gen");
        assert!(from_file.options.parallel);
        assert_eq!(from_file.output_dir, None);

        let overridden = config.resolve(&Overrides {
            prefix: Some(String::new()),
            marker: Some("_".to_string()),
            output_dir: Some(PathBuf::from("elsewhere")),
            sequential: true,
            ..Overrides::default()
        });
        assert_eq!(overridden.prefix, "");
        assert_eq!(overridden.suffix, "_impl");
        assert_eq!(overridden.options.marker, "_");
        assert!(!overridden.options.parallel);
        assert_eq!(overridden.output_dir, Some(PathBuf::from("elsewhere")));
    }

    #[test]
    fn test_provider_argument_wins_over_gofile() {
        assert_eq!(
            provider_path(Some(PathBuf::from("a.go")), Some("b.go".to_string())),
            Some(PathBuf::from("a.go"))
        );
        assert_eq!(
            provider_path(None, Some(" b.go ".to_string())),
            Some(PathBuf::from("b.go"))
        );
        assert_eq!(provider_path(None, Some("  ".to_string())), None);
        assert_eq!(provider_path(None, None), None);
    }
}
