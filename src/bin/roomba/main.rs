use std::io::Write;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use roomba::{
    ConfigLoader, Environment, GitHub, Notifier, RunError, RunOutcome, SendError, SlackNotifier,
    get_github_token, parse_args, run_digest, types::ReportPayload,
};
use tracing::{error, info, warn};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing(environment: Environment) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if environment.is_development() {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    }
}

/// Prints what would have been posted.
struct DryRun {
    slack: SlackNotifier,
}

#[async_trait]
impl Notifier for DryRun {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SendError> {
        let serialize = |what, source| SendError::Serialize { what, source };
        let message = serde_json::to_string_pretty(&self.slack.message(payload, Utc::now()))
            .map_err(|e| serialize("Slack message", e))?;
        let report =
            serde_json::to_string_pretty(payload).map_err(|e| serialize("callback payload", e))?;

        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{message}\n{report}") {
            warn!(%err, "Failed to write dry-run output");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let spec = match parse_args(std::env::args()) {
        Ok(spec) => spec,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            }
            return Err(err);
        }
    };

    init_tracing(spec.environment);

    let config = ConfigLoader::load(&spec.config_dir, spec.environment).with_context(|| {
        format!(
            "Failed to load configuration for environment '{}'",
            spec.environment
        )
    })?;
    let github = GitHub::with_token(get_github_token()?)
        .context("Failed to create GitHub client")?;
    let slack = SlackNotifier::from_config(&config);

    let result = if spec.dry_run {
        run_digest(&config, &github, &DryRun { slack }, Utc::now()).await
    } else {
        run_digest(&config, &github, &slack, Utc::now()).await
    };

    match result {
        Ok(RunOutcome::NoResults) => {}
        Ok(RunOutcome::Reported(report)) => {
            info!(channel = %report.channel_id, prs = report.prs.len(), "Run complete");
        }
        Err(RunError::Transport(err)) => error!(%err, "Failed to reach GitHub"),
        Err(RunError::Send(err)) => error!(%err, "Failed to issue pull request report"),
    }

    Ok(())
}
