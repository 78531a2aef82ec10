mod aliases;
mod render;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pnp_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pnp-cli")]
#[command(about = "Portfolio P/L joined with per-ticker news sentiment")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price the portfolio, aggregate news and write the summary report
    Report {
        /// Portfolio CSV; a header-only template is created if missing
        #[arg(long, default_value = "portfolio.csv")]
        input: PathBuf,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        /// Primary scoring backend (overrides `PNP_NEWS_BACKEND`)
        #[arg(long)]
        news_backend: Option<String>,
        /// Lookback window in days (overrides `PNP_NEWS_DAYS`)
        #[arg(long)]
        news_days: Option<u32>,
        /// User alias JSON (overrides `PNP_ALIASES_PATH`)
        #[arg(long)]
        aliases: Option<PathBuf>,
        /// Skip the regional fallback search
        #[arg(long)]
        no_regional: bool,
        /// Extra aliases, e.g. "MSFT:Azure|Windows;AAPL:iPhone"
        #[arg(long)]
        extra_aliases: Option<String>,
    },
    /// Generate dynamic aliases and write them as JSON
    Aliases {
        /// Tickers to resolve (defaults to a built-in list)
        #[arg(long, num_args = 1..)]
        tickers: Vec<String>,
        /// Read tickers from a file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,
        /// Extra aliases, e.g. "MSFT:Azure|Windows;AAPL:iPhone"
        #[arg(long)]
        extra_aliases: Option<String>,
        #[arg(long, default_value = "aliases.json")]
        output: PathBuf,
    },
}

/// The command to run and its configuration. Configuration is only loaded
/// once a subcommand was given, so a bad `PNP_*` value cannot hide the usage hint.
fn prepare<F>(cli: Cli, load_config: F) -> anyhow::Result<Option<(Commands, AppConfig)>>
where
    F: FnOnce() -> anyhow::Result<AppConfig>,
{
    let Some(command) = cli.command else {
        return Ok(None);
    };
    Ok(Some((command, load_config()?)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some((command, config)) =
        prepare(cli, || Ok(pnp_core::load_app_config_from_env()?))?
    else {
        println!("usage: pnp-cli <report|aliases> [options]  (see --help)");
        return Ok(());
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Report {
            input,
            output,
            format,
            news_backend,
            news_days,
            aliases,
            no_regional,
            extra_aliases,
        } => {
            let mut config = config;
            if let Some(backend) = news_backend {
                config.news_backend = backend;
            }
            if let Some(days) = news_days {
                config.news_days = days;
            }
            if let Some(path) = aliases {
                config.aliases_path = path;
            }
            if no_regional {
                config.regional_fallback = false;
            }
            let options = report::ReportOptions {
                input,
                output,
                format,
                extra_aliases,
            };
            report::run_report(&config, &options).await?;
        }
        Commands::Aliases {
            tickers,
            from_file,
            extra_aliases,
            output,
        } => {
            aliases::run_aliases(
                &config,
                tickers,
                from_file.as_deref(),
                extra_aliases.as_deref(),
                &output,
            )
            .await?;
        }
    }

    Ok(())
}
