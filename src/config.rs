//! Startup configuration.
//!
//! Resolution order: command-line arguments, then process environment, then
//! `.env` (loaded without overriding variables that are already set).

use std::path::PathBuf;

use crate::invoke::RequestLog;

/// Environment variable naming the request log directory.
pub const LOG_DIR_ENV: &str = "AXON_LOG_DIR";

/// Tracing filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "axon=info,axon_lib=info,warn";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing spec path or URL (see --help)")]
    MissingSpec,
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unexpected argument '{0}': only one spec may be given")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxonConfig {
    /// Spec file path or `http(s)://` URL.
    pub spec: String,
    /// Print the compiled descriptors and exit instead of serving.
    pub list: bool,
    /// Request log directory; `None` means `logs/` beside the executable.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(AxonConfig),
    Help,
}

impl AxonConfig {
    /// Load `.env`, then resolve from the real process arguments and environment.
    pub fn from_env() -> Result<CliAction, ConfigError> {
        dotenvy::dotenv().ok();
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    pub fn parse<I, E>(args: I, env: E) -> Result<CliAction, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut spec = None;
        let mut list = false;
        let mut log_dir = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Ok(CliAction::Help);
            }
            if arg == "--list" {
                list = true;
                continue;
            }
            if let Some(value) = arg.strip_prefix("--log-dir=") {
                log_dir = Some(non_empty(value).ok_or(ConfigError::MissingValue("--log-dir"))?);
                continue;
            }
            if arg == "--log-dir" {
                let value = args
                    .next()
                    .and_then(|value| non_empty(&value))
                    .ok_or(ConfigError::MissingValue("--log-dir"))?;
                log_dir = Some(value);
                continue;
            }
            if arg.starts_with("--") {
                return Err(ConfigError::UnknownOption(arg));
            }
            if spec.is_some() {
                return Err(ConfigError::UnexpectedArgument(arg));
            }
            spec = Some(arg);
        }

        let spec = spec.ok_or(ConfigError::MissingSpec)?;
        let log_dir = log_dir
            .or_else(|| env(LOG_DIR_ENV).and_then(|value| non_empty(&value)))
            .map(PathBuf::from);

        Ok(CliAction::Run(Self {
            spec,
            list,
            log_dir,
        }))
    }

    pub fn request_log(&self) -> RequestLog {
        match &self.log_dir {
            Some(dir) => RequestLog::daily(dir),
            None => RequestLog::beside_executable(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Install the stderr tracing subscriber. Stdout is reserved for protocol
/// traffic.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .try_init();
}

pub const USAGE: &str = "\
Usage: axon <SPEC> [--list] [--log-dir <DIR>]

Expose every OpenAPI 3.x / Swagger 2.0 operation in SPEC as an MCP tool over stdio.

Arguments:
  <SPEC>             Spec file path or http(s) URL (JSON or YAML)

Options:
  --list             Print the compiled tool descriptors as JSON and exit
  --log-dir <DIR>    Request log directory (env: AXON_LOG_DIR, default: <exe dir>/logs)
  -h, --help         Show this help

Environment:
  RUST_LOG           Tracing filter for stderr diagnostics
";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(action: CliAction) -> AxonConfig {
        match action {
            CliAction::Run(config) => config,
            CliAction::Help => panic!("expected run action"),
        }
    }

    #[test]
    fn positional_spec_with_defaults() {
        let config = run(AxonConfig::parse(args(&["petstore.yaml"]), no_env).unwrap());
        assert_eq!(
            config,
            AxonConfig {
                spec: "petstore.yaml".to_string(),
                list: false,
                log_dir: None,
            }
        );
    }

    #[test]
    fn flags_in_any_position() {
        let config = run(
            AxonConfig::parse(
                args(&["--list", "https://x.test/openapi.json", "--log-dir", "/tmp/axon"]),
                no_env,
            )
            .unwrap(),
        );
        assert!(config.list);
        assert_eq!(config.spec, "https://x.test/openapi.json");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/axon")));

        let config = run(AxonConfig::parse(args(&["spec.json", "--log-dir=logs"]), no_env).unwrap());
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn log_dir_falls_back_to_environment() {
        let env = |key: &str| (key == LOG_DIR_ENV).then(|| "/var/log/axon".to_string());
        let config = run(AxonConfig::parse(args(&["spec.json"]), env).unwrap());
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/axon")));

        let config = run(AxonConfig::parse(args(&["spec.json", "--log-dir", "cli"]), env).unwrap());
        assert_eq!(config.log_dir, Some(PathBuf::from("cli")));
    }

    #[test]
    fn blank_environment_value_is_ignored() {
        let env = |_: &str| Some("  ".to_string());
        let config = run(AxonConfig::parse(args(&["spec.json"]), env).unwrap());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn argument_errors() {
        assert_eq!(
            AxonConfig::parse(args(&[]), no_env).unwrap_err(),
            ConfigError::MissingSpec
        );
        assert_eq!(
            AxonConfig::parse(args(&["spec.json", "--log-dir"]), no_env).unwrap_err(),
            ConfigError::MissingValue("--log-dir")
        );
        assert_eq!(
            AxonConfig::parse(args(&["spec.json", "--verbose"]), no_env).unwrap_err(),
            ConfigError::UnknownOption("--verbose".to_string())
        );
        assert_eq!(
            AxonConfig::parse(args(&["a.json", "b.json"]), no_env).unwrap_err(),
            ConfigError::UnexpectedArgument("b.json".to_string())
        );
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(
            AxonConfig::parse(args(&["--help"]), no_env).unwrap(),
            CliAction::Help
        );
    }

    #[test]
    fn explicit_log_dir_builds_daily_log() {
        let config = run(AxonConfig::parse(args(&["spec.json", "--log-dir", "/tmp/x"]), no_env).unwrap());
        assert_eq!(config.request_log().dir(), Some(std::path::Path::new("/tmp/x")));
    }
}
