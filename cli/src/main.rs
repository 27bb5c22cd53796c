use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "brief", version, about = "Daily study brief: compose locally or query the webhook service")]
struct Cli {
    /// Webhook service base URL
    #[arg(long, env = "BRIEF_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Shared webhook secret (the service's AUTH_TOKEN)
    #[arg(long, env = "BRIEF_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Ask the running service for today's decision
    Webhook {
        /// Run date (YYYY-MM-DD). Defaults to today in --timezone.
        #[arg(long)]
        date: Option<String>,
        /// IANA timezone used when --date is omitted
        #[arg(long, default_value = "America/New_York")]
        timezone: String,
    },
    /// Compose the brief from a local JSON fixture with plan, objectives,
    /// resources, practice_tests and mistakes arrays
    Compose {
        /// Fixture file
        #[arg(long)]
        input: PathBuf,
        /// Run date (YYYY-MM-DD). Defaults to today in --timezone.
        #[arg(long)]
        date: Option<String>,
        /// IANA timezone used when --date is omitted
        #[arg(long, default_value = "America/New_York")]
        timezone: String,
        /// Subject prefix, e.g. "AZ-104"
        #[arg(long)]
        subject_prefix: Option<String>,
        /// Maximum mistakes listed (0 = all)
        #[arg(long, default_value_t = brief_core::brief::DEFAULT_MISTAKE_LIMIT)]
        mistake_limit: usize,
        /// Print subject and body as plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Health => commands::health::run(&cli.api_url).await,
        Commands::Webhook { date, timezone } => {
            commands::webhook::run(&cli.api_url, cli.token.as_deref(), date.as_deref(), &timezone)
                .await
        }
        Commands::Compose {
            input,
            date,
            timezone,
            subject_prefix,
            mistake_limit,
            text,
        } => commands::compose::run(commands::compose::ComposeArgs {
            input: &input,
            date: date.as_deref(),
            timezone: &timezone,
            subject_prefix: subject_prefix.as_deref(),
            mistake_limit,
            text,
        }),
    };

    std::process::exit(code);
}
