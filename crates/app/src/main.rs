use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use vlib_client::ApiClient;
use vlib_core::{Book, Settings};
use vlib_ui::{SystemNavigator, Ui};

mod config;

use config::{CONFIG_FILE, Overrides};

const LOG_FILE: &str = "vlib.log";

/// Terminal client for a virtual library server.
#[derive(Debug, Parser)]
#[command(name = "vlib", version)]
struct Args {
    /// Base URL of the library server.
    #[arg(long, env = "VLIB_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", env = "VLIB_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every book in the catalog.
    List,
    /// Search books by title.
    Search { query: String },
    /// Import books from a folder on the server.
    Sync {
        /// Defaults to the server's configured books folder.
        folder: Option<String>,
    },
    /// Print the server's configured books folder.
    Folder,
    /// Print the effective settings.
    Config,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let project_dirs = ProjectDirs::from("dev", "vlib", "vlib").context("resolve project dirs")?;

    let config_path = project_dirs.config_dir().join(CONFIG_FILE);
    let settings = config::load_settings(&config_path)?;
    let settings = config::apply_overrides(settings, &args.overrides());

    match args.command {
        None => run_tui(&project_dirs, settings),
        Some(command) => {
            configure_stderr_logging();
            run_command(command, &settings, &config_path)
        }
    }
}

fn run_tui(project_dirs: &ProjectDirs, settings: Settings) -> anyhow::Result<()> {
    let _guard = configure_file_logging(project_dirs.data_dir())?;
    info!(base_url = %settings.base_url, "vlib starting");

    let runtime = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let client = ApiClient::new(&settings).context("build http client")?;
    let navigator = SystemNavigator::new(settings.open_command.clone());

    let mut ui = Ui::new(Arc::new(client), runtime.handle().clone(), Box::new(navigator));
    let result = ui.run();
    info!("vlib exiting");
    result
}

fn run_command(command: Command, settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    if let Command::Config = command {
        println!("# {}", config_path.display());
        print!("{}", config::render_settings(settings)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let client = ApiClient::new(settings).context("build http client")?;

    runtime.block_on(async {
        match command {
            Command::List => {
                let books = client.list_all().await?;
                println!("{} books", books.len());
                print_books(&books);
            }
            Command::Search { query } => {
                let query = search_query(&query)?;
                let results = client.search(query).await?;
                println!("{} matches for '{query}'", results.count);
                print_books(&results.books);
            }
            Command::Sync { folder } => {
                let folder = match folder {
                    Some(folder) => folder,
                    None => client
                        .books_folder()
                        .await
                        .context("resolve server books folder")?,
                };
                let summary = client
                    .sync_from_folder(&folder)
                    .await
                    .with_context(|| format!("sync {folder}"))?;
                println!(
                    "{} ({} added, {} found)",
                    summary.message, summary.books_added, summary.total_books_found
                );
            }
            Command::Folder => {
                println!("{}", client.books_folder().await?);
            }
            Command::Config => {}
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Blank queries never reach the server.
fn search_query(raw: &str) -> anyhow::Result<&str> {
    let query = raw.trim();
    if query.is_empty() {
        anyhow::bail!("search query is empty");
    }
    Ok(query)
}

fn print_books(books: &[Book]) {
    for book in books {
        println!("{}", book_line(book));
    }
}

fn book_line(book: &Book) -> String {
    format!(
        "{}\t{}{}\t{}",
        book.id,
        book.title,
        book.extension,
        book.read_label()
    )
}

/// The TUI owns the terminal, so logs go to a file under `data_dir`.
fn configure_file_logging(data_dir: &Path) -> anyhow::Result<WorkerGuard> {
    use tracing_subscriber::prelude::*;

    fs::create_dir_all(data_dir)
        .with_context(|| format!("create data dir {}", data_dir.display()))?;
    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(guard)
}

fn configure_stderr_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
