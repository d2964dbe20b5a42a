use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Environment;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug)]
#[command(
    name = "roomba",
    about = "Post a digest of open pull requests awaiting review to Slack"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Configuration profile (development, staging or production)
    #[arg(
        short = 'e',
        long,
        env = "ENVIRONMENT",
        default_value = "development",
        value_name = "ENV"
    )]
    pub environment: String,

    /// Directory holding <environment>.yml and default.yml
    #[arg(short = 'c', long, default_value = "config", value_name = "DIR")]
    pub config_dir: PathBuf,

    /// Print the Slack message and report as JSON instead of posting them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Validated command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSpec {
    pub environment: Environment,
    pub config_dir: PathBuf,
    pub dry_run: bool,
}

/// Parses command-line arguments into a [`RunSpec`].
///
/// An unknown environment name is rejected here, before any configuration is
/// read.
pub fn parse_args<I, T>(args: I) -> Result<RunSpec>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    Ok(RunSpec {
        environment: cli.environment.parse()?,
        config_dir: cli.config_dir,
        dry_run: cli.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_parse_args_explicit() {
        let spec = parse_args([
            "roomba",
            "--environment",
            "production",
            "--config-dir",
            "/etc/roomba",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(
            spec,
            RunSpec {
                environment: Environment::Production,
                config_dir: PathBuf::from("/etc/roomba"),
                dry_run: true,
            }
        );
    }

    #[test]
    fn test_parse_args_short_flags() {
        let spec = parse_args(["roomba", "-e", "Staging", "-c", "cfg", "-n"]).unwrap();
        assert_eq!(spec.environment, Environment::Staging);
        assert_eq!(spec.config_dir, PathBuf::from("cfg"));
        assert!(spec.dry_run);
    }

    #[test]
    fn test_parse_args_unknown_environment() {
        let err = parse_args(["roomba", "--environment", "qa"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_parse_args_rejects_unknown_flags() {
        let err = parse_args(["roomba", "--repo", "x"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
