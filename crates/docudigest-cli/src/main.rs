use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod client;
mod output;

use client::UploadClient;
use output::ColorMode;

const DEFAULT_SERVER: &str = "http://127.0.0.1:5001";

/// DocuDigest - summarize PDF, DOCX and TXT documents from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a document to a DocuDigest server and print its summary
    Summarize {
        /// Path to the PDF, DOCX or TXT file
        file_path: PathBuf,

        /// Base URL of the DocuDigest server (default: $DOCUDIGEST_SERVER or http://127.0.0.1:5001)
        #[arg(long)]
        server: Option<String>,

        /// Write the summary to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: extract text locally and show what would be summarized
    Extract {
        /// Path to the PDF, DOCX or TXT file
        file_path: PathBuf,

        /// Print the whole text instead of the part that would be sent
        #[arg(long)]
        full: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Summarize {
            file_path,
            server,
            output,
            no_color,
        } => summarize(file_path, server, output, no_color).await,
        Command::Extract {
            file_path,
            full,
            no_color,
        } => extract(file_path, full, no_color).await,
    }
}

async fn summarize(
    file_path: PathBuf,
    server: Option<String>,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > defaults
    let server = server
        .or_else(|| std::env::var("DOCUDIGEST_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let mut client = UploadClient::new(&server);
    if !client.select_file(&file_path) {
        let message = client.error.unwrap_or_default();
        output::print_error(&mut std::io::stderr(), &message, ColorMode(!no_color))?;
        std::process::exit(1);
    }

    let file_name = file_name(&file_path);
    let spinner = output::spinner("Summarizing...");
    client.submit().await;
    spinner.finish_and_clear();

    if let Some(message) = client.error {
        output::print_error(&mut std::io::stderr(), &message, ColorMode(!no_color))?;
        std::process::exit(1);
    }

    let summary = client.summary.unwrap_or_default();
    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };
    output::print_summary(&mut writer, &file_name, &summary, color)?;

    if let Some(ref output_path) = output {
        eprintln!("Summary written to {}", output_path.display());
    }
    Ok(())
}

async fn extract(file_path: PathBuf, full: bool, no_color: bool) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let name = file_name(&file_path);
    let path = file_path.clone();
    let (kind, text) =
        tokio::task::spawn_blocking(move || docudigest_ingest::extract_text_from_path(&path))
            .await??;

    if text.trim().is_empty() {
        anyhow::bail!("{}", docudigest_core::SummarizeError::EmptyText);
    }

    let (sent, _) = docudigest_core::truncate_chars(&text, docudigest_core::MAX_INPUT_CHARS);
    output::print_extraction(
        &mut std::io::stdout(),
        &name,
        kind,
        &text,
        sent,
        full,
        ColorMode(!no_color),
    )?;
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
