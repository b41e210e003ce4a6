use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use connector_manager::connector::api::{Container, ContainerConfig, Router};
use connector_manager::Commands;

#[derive(Parser)]
#[command(name = "connector-manager")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.connector-manager")]
    data_dir: String,

    /// Keep connectors, schedules and settings in memory only
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Prefix of content URLs for documents fed as CONTENTURL
    #[arg(long, global = true)]
    content_url_prefix: Option<String>,

    /// Default feed type: web, content or contenturl
    #[arg(long, global = true)]
    feed_type: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.memory_storage {
        std::fs::create_dir_all(&data_dir)?;
    }

    let container = Container::new(ContainerConfig {
        data_dir,
        memory_storage: cli.memory_storage,
        content_url_prefix: cli.content_url_prefix,
        feed_type: cli.feed_type,
    })
    .await?;

    let output = Router::new(&container).route(cli.command).await?;
    println!("{}", output.trim_end());

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn form_requires_type_or_connector() {
        assert!(Cli::try_parse_from(["connector-manager", "form"]).is_err());
        assert!(Cli::try_parse_from(["connector-manager", "form", "filesystem"]).is_ok());
        assert!(Cli::try_parse_from(["connector-manager", "form", "--connector", "c1"]).is_ok());
    }

    #[test]
    fn schedule_defaults_retry_delay() {
        let cli = Cli::try_parse_from(["connector-manager", "schedule", "c1", "--load", "5"]).unwrap();
        match cli.command {
            Commands::Schedule {
                retry_delay,
                intervals,
                ..
            } => {
                assert_eq!(retry_delay, 300_000);
                assert_eq!(intervals, "");
            }
            _ => panic!("expected schedule command"),
        }
    }

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/var/lib/cm"), "/var/lib/cm");
    }
}
