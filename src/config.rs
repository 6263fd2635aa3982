//! Configuration management for the lint language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML configuration file, CLI taking precedence

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default arguments placed before the file path; the tool's flag for
/// machine-readable LSP output.
const DEFAULT_LINTER_ARGS: &[&str] = &["--format=lsp"];

const DEFAULT_LINTER_COMMAND: &str = "lint";

const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Command-line arguments for the lint language server
#[derive(Debug, Parser)]
#[command(name = "lint-language-server")]
#[command(about = "Language server bridging an external command-line linter")]
#[command(version)]
pub struct Args {
    /// Linter executable invoked for each validation
    #[arg(long, help = "Linter executable to run")]
    pub linter_command: Option<String>,

    /// Argument placed before the file path (repeat for more than one)
    #[arg(
        long = "linter-arg",
        allow_hyphen_values = true,
        help = "Argument passed before the file path"
    )]
    pub linter_args: Vec<String>,

    /// File name marking the project root the linter runs from (repeatable)
    #[arg(long = "root-marker", help = "Project root marker file name")]
    pub root_markers: Vec<String>,

    /// Delay before a changed document is validated, in milliseconds
    #[arg(long, help = "Debounce delay for change events (ms)")]
    pub debounce_ms: Option<u64>,

    /// Kill a linter run exceeding this many seconds
    #[arg(long, help = "Wall-clock limit for one linter run (seconds)")]
    pub timeout_secs: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long, help = "Configuration file (TOML)")]
    pub config_file: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// File-level configuration; every key optional, CLI wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    linter_command: Option<String>,
    linter_args: Option<Vec<String>>,
    root_markers: Option<Vec<String>>,
    debounce_ms: Option<u64>,
    timeout_secs: Option<u64>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Executable the validator runs
    pub linter_command: String,
    /// Arguments placed before the file path
    pub linter_args: Vec<String>,
    /// Marker file names for project-root working-directory resolution
    pub root_markers: Vec<String>,
    /// Delay applied to change-triggered validations
    pub debounce: Duration,
    /// Wall-clock limit for one linter run
    pub linter_timeout: Option<Duration>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments, discovering the
    /// user-level config file when none was given explicitly
    pub fn from_args_and_env() -> Result<Self> {
        let mut args = Args::parse();
        if args.config_file.is_none() {
            args.config_file = default_config_path().filter(|path| path.exists());
        }
        Self::from_args(args)
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match args.config_file.as_deref() {
            Some(path) => load_file(path)
                .with_context(|| format!("reading config file {}", path.display()))?,
            None => FileConfig::default(),
        };

        let linter_args = if args.linter_args.is_empty() {
            file.linter_args.unwrap_or_else(|| {
                DEFAULT_LINTER_ARGS.iter().map(|s| s.to_string()).collect()
            })
        } else {
            args.linter_args
        };

        let root_markers = if args.root_markers.is_empty() {
            file.root_markers.unwrap_or_default()
        } else {
            args.root_markers
        };

        Ok(Config {
            linter_command: args
                .linter_command
                .or(file.linter_command)
                .unwrap_or_else(|| DEFAULT_LINTER_COMMAND.to_string()),
            linter_args,
            root_markers,
            debounce: Duration::from_millis(
                args.debounce_ms
                    .or(file.debounce_ms)
                    .unwrap_or(DEFAULT_DEBOUNCE_MS),
            ),
            linter_timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs),
            log_level: args.log_level,
        })
    }

    /// Source tag attached to every published diagnostic.
    pub fn source_name(&self) -> &str {
        Path::new(&self.linter_command)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.linter_command)
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// `<config_dir>/lint-ls/config.toml` in the user configuration directory.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lint-ls").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn bare_args() -> Args {
        Args {
            linter_command: None,
            linter_args: Vec::new(),
            root_markers: Vec::new(),
            debounce_ms: None,
            timeout_secs: None,
            config_file: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(bare_args()).expect("config");
        assert_eq!(config.linter_command, "lint");
        assert_eq!(config.linter_args, ["--format=lsp"]);
        assert!(config.root_markers.is_empty());
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert!(config.linter_timeout.is_none());
    }

    #[test]
    fn test_cli_values_win() {
        let mut args = bare_args();
        args.linter_command = Some("/opt/tools/mylint".to_string());
        args.debounce_ms = Some(0);
        args.timeout_secs = Some(10);
        let config = Config::from_args(args).expect("config");
        assert_eq!(config.linter_command, "/opt/tools/mylint");
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.linter_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_source_name_is_command_basename() {
        let mut args = bare_args();
        args.linter_command = Some("/opt/tools/mylint".to_string());
        let config = Config::from_args(args).expect("config");
        assert_eq!(config.source_name(), "mylint");

        let config = Config::from_args(bare_args()).expect("config");
        assert_eq!(config.source_name(), "lint");
    }

    #[test]
    fn test_config_file_is_merged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
linter_command = "mylint"
linter_args = ["check", "--json"]
root_markers = ["mylint.toml", "pyproject.toml"]
debounce_ms = 50
"#,
        )
        .expect("write config");

        let mut args = bare_args();
        args.config_file = Some(path);
        let config = Config::from_args(args).expect("config");
        assert_eq!(config.linter_command, "mylint");
        assert_eq!(config.linter_args, ["check", "--json"]);
        assert_eq!(config.root_markers, ["mylint.toml", "pyproject.toml"]);
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "linter_command = \"from-file\"\ndebounce_ms = 50\n")
            .expect("write config");

        let mut args = bare_args();
        args.config_file = Some(path);
        args.linter_command = Some("from-cli".to_string());
        let config = Config::from_args(args).expect("config");
        assert_eq!(config.linter_command, "from-cli");
        // Keys the CLI left unset still come from the file.
        assert_eq!(config.debounce, Duration::from_millis(50));
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let mut args = bare_args();
        args.config_file = Some(PathBuf::from("/no/such/config.toml"));
        assert!(Config::from_args(args).is_err());
    }

    #[test]
    fn test_unknown_config_key_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "linter_comand = \"typo\"\n").expect("write config");

        let mut args = bare_args();
        args.config_file = Some(path);
        assert!(Config::from_args(args).is_err());
    }
}
