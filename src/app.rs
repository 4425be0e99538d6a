use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::table_renderer::render_table_page;
use crate::application::{generate_manifest, SiteBuilder, SortLinks, TableLoader};
use crate::domain::app_config::AppConfig;
use crate::domain::csv::SortEvent;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{ConfigOverrides, ConfigService};
use crate::infrastructure::fetchers::{fetcher_for_source, fetcher_from_config};
use crate::interfaces::http::{start_server, HttpState};
use crate::shared::html::PageChrome;

/// Render CSV files as sortable HTML tables
#[derive(Debug, Parser)]
#[command(name = "csvdeck", version, about)]
pub struct Cli {
    /// TOML config file (defaults to ./csvdeck.toml when present)
    #[arg(long, global = true, env = "CSVDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the CSV files and the manifest
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the static site: index, one page per CSV file, sorted variants
    Build {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the pages over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render a single CSV file (path or URL)
    Render {
        source: String,
        /// 0-based column to sort by
        #[arg(long)]
        sort: Option<usize>,
        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Write here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scan the source directory and write the manifest
    Manifest {
        /// Write `{"file.csv": "Title"}` instead of a plain list
        #[arg(long)]
        titles: bool,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            source_dir: self.source_dir.clone(),
            ..Default::default()
        };
        match &self.command {
            Command::Build { out } => overrides.output_dir = out.clone(),
            Command::Serve { host, port } => {
                overrides.host = host.clone();
                overrides.port = *port;
            }
            Command::Render { .. } | Command::Manifest { .. } => {}
        }
        overrides
    }
}

pub fn run() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "csvdeck failed");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = ConfigService::new(cli.config.as_deref()).load(&cli.overrides())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Command::Build { .. } => runtime.block_on(build(&config)),
        Command::Serve { .. } => runtime.block_on(serve(&config)),
        Command::Render {
            source,
            sort,
            desc,
            out,
        } => runtime.block_on(render(&config, &source, sort, desc, out.as_deref())),
        Command::Manifest { titles } => {
            generate_manifest(&config.source_dir, &config.manifest_file, titles).map(|_| ())
        }
    }
}

async fn build(config: &AppConfig) -> Result<()> {
    let fetcher = fetcher_from_config(config)?;
    let builder = SiteBuilder::new(
        fetcher,
        config.manifest_file.clone(),
        PageChrome::new(config.site_title.clone()),
    );

    let report = builder.build(&config.output_dir).await?;
    if report.failed.is_empty() {
        Ok(())
    } else {
        let names: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        Err(AppError::FetchError(format!(
            "{} file(s) could not be loaded: {}",
            names.len(),
            names.join(", ")
        )))
    }
}

async fn serve(config: &AppConfig) -> Result<()> {
    let fetcher = fetcher_from_config(config)?;
    let state = HttpState::new(fetcher, config);
    start_server(state, &config.host, config.port)?.await?;
    info!("Server stopped");
    Ok(())
}

async fn render(
    config: &AppConfig,
    source: &str,
    sort: Option<usize>,
    desc: bool,
    out: Option<&Path>,
) -> Result<()> {
    let (fetcher, file_name) = fetcher_for_source(source)?;
    let mut view = TableLoader::new(fetcher).load(&file_name).await?;

    if let Some(column_index) = sort {
        if !view.table.has_column(column_index) {
            return Err(AppError::ValidationError(format!(
                "Column {} does not exist; {} has {} column(s)",
                column_index,
                file_name,
                view.table.column_count()
            )));
        }
        view.apply(SortEvent::Click(column_index));
        if desc {
            view.apply(SortEvent::Click(column_index));
        }
    }

    let html = render_table_page(
        &view,
        &SortLinks::Query,
        &PageChrome::new(config.site_title.clone()),
    );

    match out {
        Some(path) => {
            fs::write(path, html).map_err(|e| {
                AppError::IoError(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!(output = %path.display(), "Rendered {}", file_name);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_overrides_follow_command() {
        let cli = Cli::try_parse_from(["csvdeck", "--source-dir", "data", "serve", "--port", "9000"])
            .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.source_dir, Some(PathBuf::from("data")));
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.host, None);
        assert_eq!(overrides.output_dir, None);

        let cli = Cli::try_parse_from(["csvdeck", "build", "--out", "public"]).unwrap();
        assert_eq!(cli.overrides().output_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["csvdeck", "render", "a.csv", "--desc"]).is_err());
        assert!(Cli::try_parse_from(["csvdeck", "render", "a.csv", "--sort", "1", "--desc"]).is_ok());
    }

    #[tokio::test]
    async fn test_render_sorted_to_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("bots.csv");
        fs::write(&source, "Bot,Points\nb,2\na,10\nc,1\n").unwrap();
        let out = dir.path().join("bots.html");

        render(
            &AppConfig::default(),
            source.to_str().unwrap(),
            Some(1),
            true,
            Some(out.as_path()),
        )
        .await
        .unwrap();

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("Points ▼"));
        let a = html.find("<td>a</td>").unwrap();
        let b = html.find("<td>b</td>").unwrap();
        let c = html.find("<td>c</td>").unwrap();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_render_rejects_unknown_column() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("bots.csv");
        fs::write(&source, "Bot\nb\n").unwrap();

        let err = render(&AppConfig::default(), source.to_str().unwrap(), Some(3), false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
