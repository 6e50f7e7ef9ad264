use std::{fs, path::Path, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, HttpTransport, InputEvent};
use shared::domain::{BinaryPayload, Modality};
use tracing_subscriber::EnvFilter;

mod render;
mod session;

use render::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "sachai-verify", version, about = "Check claims, links, images and voice notes")]
struct Args {
    /// Detection service base URL; overrides verify.toml and the environment
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Do not show the step-by-step progress display
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a piece of free text
    Text {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Verify the article behind a link
    Url { url: String },
    /// Verify a screenshot or photo
    Image { path: std::path::PathBuf },
    /// Verify a recorded voice note
    Voice { path: std::path::PathBuf },
    /// Ask the detection service whether it is up
    Health,
    /// Submit one line at a time from stdin
    Interactive,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(url) = &args.server_url {
        settings = settings
            .with_base_url(url)
            .context("invalid --server-url")?;
    }
    tracing::debug!(api_base_url = %settings.api_base_url, "using detection service");

    let transport =
        HttpTransport::from_settings(&settings).context("failed to build HTTP client")?;
    let options = RenderOptions {
        json: args.json,
        progress: !args.quiet,
    };

    match args.command {
        Command::Health => session::health(&transport, &options),
        Command::Interactive => session::interactive(transport, &options),
        Command::Text { text } => session::one_shot(
            transport,
            vec![
                InputEvent::SelectModality(Modality::Text),
                InputEvent::TextChanged(text.join(" ")),
            ],
            &options,
        ),
        Command::Url { url } => session::one_shot(
            transport,
            vec![
                InputEvent::SelectModality(Modality::Url),
                InputEvent::TextChanged(url),
            ],
            &options,
        ),
        Command::Image { path } => session::one_shot(
            transport,
            vec![
                InputEvent::SelectModality(Modality::Image),
                InputEvent::FileSelected(read_upload(&path)?),
            ],
            &options,
        ),
        Command::Voice { path } => session::one_shot(
            transport,
            vec![
                InputEvent::SelectModality(Modality::Voice),
                InputEvent::FileSelected(read_upload(&path)?),
            ],
            &options,
        ),
    }
}

pub(crate) fn read_upload(path: &Path) -> Result<BinaryPayload> {
    let bytes = fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(BinaryPayload::new(filename, mime_type, bytes))
}
