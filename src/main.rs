//! repo-finder: search GitHub repositories nine at a time from the terminal.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repo_finder_lib::commands::{format_error, SessionEvent, ViewFormat, ViewOptions};
use repo_finder_lib::core::env_loader::load_dotenv_if_present;
use repo_finder_lib::core::github_search::{GithubSearchClient, SearchBackend};
use repo_finder_lib::core::pagination::PagingMode;
use repo_finder_lib::{FinderConfig, FinderSession};

#[derive(Parser, Debug)]
#[command(name = "repo-finder", version, about = "Search GitHub repositories, nine at a time")]
struct Cli {
    /// GitHub API base URL (overrides REPO_FINDER_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// HTTP timeout in seconds (overrides REPO_FINDER_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// `server` asks the API for each page; `client` slices one fetched page
    #[arg(long, global = true, value_parser = parse_paging)]
    paging: Option<PagingMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read queries and :next/:prev/:find/:quit from stdin
    Interactive {
        #[arg(long, value_enum, default_value_t = ViewFormat::Text)]
        format: ViewFormat,

        /// Rewrite this file with the rendered page after every change
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Run one search and print the requested page
    Search {
        query: String,

        /// 1-based page of nine results
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, value_enum, default_value_t = ViewFormat::Text)]
        format: ViewFormat,
    },
}

fn parse_paging(raw: &str) -> Result<PagingMode, String> {
    PagingMode::parse(raw).ok_or_else(|| format!("unknown paging mode {raw:?} (server|client)"))
}

fn resolve_config(cli: &Cli) -> FinderConfig {
    let mut config = FinderConfig::from_env();
    if let Some(base) = &cli.api_base {
        config.api_base = base.trim_end_matches('/').to_string();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(paging) = cli.paging {
        config.paging = paging;
    }
    config
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);
    log::info!(
        "[main] api={} paging={:?} timeout={:?}",
        config.api_base,
        config.paging,
        config.timeout
    );
    let backend: Arc<dyn SearchBackend> = Arc::new(GithubSearchClient::new(&config)?);
    let mut session = FinderSession::new(&config, backend);
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Search {
            query,
            page,
            format,
        } => {
            session.search_to_page(&query, page)?;
            let options = ViewOptions {
                format,
                html_snapshot: None,
            };
            session.emit(&mut stdout, &options)?;
        }
        Command::Interactive { format, html } => {
            let tx = session.sender();
            std::thread::spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(SessionEvent::Line(line)).is_err() {
                        return;
                    }
                }
                let _ = tx.send(SessionEvent::InputClosed);
            });
            let options = ViewOptions {
                format,
                html_snapshot: html,
            };
            session
                .run_interactive(&mut stdout, &options)
                .context("interactive session")?;
        }
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    load_dotenv_if_present();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{}", format_error(err));
        std::process::exit(1);
    }
}
