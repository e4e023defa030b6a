mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

// The binary and the library share the `scrapyard` target prefix
const DEFAULT_FILTER: &str = "scrapyard=warn,scrapyard::commands=info";
const VERBOSE_FILTER: &str = "scrapyard=debug";
const SERVE_FILTER: &str = "scrapyard=info,tower_http=debug";

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(match (&cli.command, cli.verbose) {
        (_, true) => VERBOSE_FILTER,
        (Commands::Serve { .. }, false) => SERVE_FILTER,
        _ => DEFAULT_FILTER,
    });

    let config = Config::load()?;

    match cli.command {
        Commands::Classify {
            data,
            format,
            output,
        } => {
            commands::classify::handle(
                &config.layout(&data),
                &config.heuristics(),
                format,
                output.as_deref(),
            )?;
        }

        Commands::Items {
            data,
            item_type,
            bucket,
            format,
        } => {
            let filter = commands::items::ItemFilter {
                item_type,
                bucket: bucket.map(Into::into),
            };
            commands::items::handle(&config.layout(&data), &config.heuristics(), &filter, format)?;
        }

        Commands::Show { query, data } => {
            commands::show::handle(&config.layout(&data), &config.heuristics(), &query)?;
        }

        Commands::Serve { data, port, bind } => {
            commands::serve::handle(
                config.layout(&data),
                config.heuristics(),
                config.public_dir(&data),
                &bind,
                port,
            )?;
        }

        Commands::Configure {
            data_dir,
            public_dir,
            image_url_prefix,
            show,
        } => {
            let settings = commands::configure::Settings {
                data_dir,
                public_dir,
                image_url_prefix,
            };
            commands::configure::handle(settings, show)?;
        }
    }

    Ok(())
}
