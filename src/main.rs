use anyhow::{Context, Result};
use chunk_relay::cli::{Cli, Command, ContentArgs, SendArgs};
use chunk_relay::config::SenderConfig;
use chunk_relay::content::{self, MarkupChunker};
use chunk_relay::io::stdout::StdoutTransport;
use chunk_relay::sender::Sender;
use chunk_relay::template::Templates;
use clap::Parser;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Split(args) => split(&args),
        Command::Send(args) => send(&args).await,
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

fn split(args: &ContentArgs) -> Result<ExitCode> {
    let config = SenderConfig::from_cli(args)?;
    let text = read_input(&args.input)?;
    let templates = Templates::new(config.templates.clone());
    let formatted = templates.format(&args.template, &text);
    let markup = MarkupChunker::new(config.container_tag().map(str::to_string));
    let chunks = content::build_chunks(&formatted, config.max_content_length, &markup);

    let total = chunks.len();
    for chunk in &chunks {
        let kind = match chunk.kind {
            content::ContentKind::Plain => "plain",
            content::ContentKind::Markup => "markup",
        };
        println!(
            "--- chunk {}/{} ({kind}, {} chars) ---",
            chunk.index,
            total,
            chunk.char_len()
        );
        println!("{}", chunk.text);
    }
    eprintln!("OK {total} chunks (max {} chars)", config.max_content_length);
    Ok(ExitCode::SUCCESS)
}

async fn send(args: &SendArgs) -> Result<ExitCode> {
    let mut config = SenderConfig::from_cli(&args.content)?;
    if let Some(retries) = args.retries {
        config.max_retry_attempts = retries;
    }
    if let Some(destination) = &args.destination {
        config.destination = Some(destination.clone());
    }
    // dry runs report errors next to regular output
    if config.error_destination.is_none() {
        config.error_destination = config.destination.clone();
    }
    let text = read_input(&args.content.input)?;

    let transport = Arc::new(StdoutTransport::new());
    let sender = Sender::new(Arc::clone(&transport), config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let report = sender
        .send_detailed(&text, None, &args.content.template, None, &cancel)
        .await?;
    if report.is_success() {
        eprintln!("OK {} chunks delivered", report.total_chunks);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "FAILED chunks {:?} of {}",
            report.failed_chunks, report.total_chunks
        );
        Ok(ExitCode::FAILURE)
    }
}
