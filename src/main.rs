mod api;
mod config;
mod controller;
mod document;
mod editing;
mod examples_store;
mod files;
mod protocol;
mod view;

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use api::ApiClient;
use config::RcLoader;
use controller::Controller;
use document::Document;

#[derive(Parser)]
#[command(name = "pyeval", version, about = "Editor y evaluador de código Python")]
struct Args {
    /// Archivo a abrir al inicio (.py o .txt)
    file: Option<PathBuf>,

    /// URL del servidor de evaluación
    #[arg(long)]
    server: Option<String>,

    /// No comprobar la conexión al inicio
    #[arg(long)]
    no_connect_check: bool,

    /// Escribir un .pyevalrc de ejemplo y salir
    #[arg(long)]
    generate_rc: bool,
}

// The alternate screen owns stdout, so logs go to a file.
// Set RUST_LOG=debug for request-level detail.
fn init_logging() {
    if let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("pyeval.log")
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.generate_rc {
        std::fs::write(".pyevalrc", RcLoader::generate_sample_rc())?;
        println!(".pyevalrc escrito");
        return Ok(());
    }

    init_logging();

    let mut config = RcLoader::load_config();
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if args.no_connect_check {
        config.check_connection = false;
    }

    let mut document = Document::new();
    if let Some(path) = &args.file {
        match files::load_source_file(path) {
            Ok(text) => document.load(text, Some(path.clone())),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    }

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?,
    );
    let api = ApiClient::new(&config.server_url)?;

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = Controller::new(config, api, runtime, document);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
