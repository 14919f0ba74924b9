use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ph_cli::{
    DirectoryLoader, display_banner, print_answer, print_citations, print_help,
    print_ingest_report, print_stats, read_query,
};
use ph_core::{AskEvent, DocumentSource, EngineConfig};
use ph_rag::RagEngine;

#[derive(Parser)]
#[command(name = "ph")]
#[command(about = "Answer questions over policy and product documents", long_about = None)]
struct Cli {
    /// Directory holding the *.md / *.txt documents
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Chunk window in characters
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the data directory and report what was added
    Ingest,
    /// Index the data directory, then answer one question
    Ask {
        query: String,
        /// Number of passages to retrieve
        #[arg(short, long)]
        k: Option<usize>,
        /// Print the answer fragment by fragment
        #[arg(long)]
        stream: bool,
        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = EngineConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if cli.chunk_size.is_some() || cli.chunk_overlap.is_some() {
        let chunk_size = cli.chunk_size.unwrap_or(config.chunk_size);
        let chunk_overlap = cli.chunk_overlap.unwrap_or(config.chunk_overlap);
        config = config.with_chunking(chunk_size, chunk_overlap);
    }

    let engine = RagEngine::new(config)?;
    let loader = DirectoryLoader::new(engine.config().data_dir.clone());
    info!(data_dir = %loader.dir().display(), "Using document directory");

    match cli.command {
        Some(Commands::Ingest) => {
            let report = engine.ingest(&loader.load().await?)?;
            print_ingest_report(&report, engine.index_size()?);
        }
        Some(Commands::Ask { query, k, stream, json }) => {
            engine.ingest(&loader.load().await?)?;
            let k = k.unwrap_or(engine.config().top_k);

            if stream {
                stream_answer(&engine, &query, k, json)?;
            } else {
                let answer = engine.ask(&query, k)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&answer)?);
                } else {
                    print_answer(&answer);
                }
            }
        }
        None => interactive(&engine, &loader).await?,
    }

    Ok(())
}

fn stream_answer(engine: &RagEngine, query: &str, k: usize, json: bool) -> Result<()> {
    let mut stdout = io::stdout();

    for event in engine.ask_stream(query, k)? {
        if json {
            writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
            continue;
        }

        match event {
            AskEvent::Metadata(_) => {}
            AskEvent::Chunk(fragment) => {
                write!(stdout, "{}", fragment)?;
                stdout.flush()?;
            }
            AskEvent::Metrics(metrics) => {
                writeln!(stdout)?;
                writeln!(
                    stdout,
                    "{}",
                    format!(
                        "retrieval {:.3} ms avg | generation {:.3} ms avg",
                        metrics.retrieval_ms, metrics.generation_ms
                    )
                    .dimmed()
                )?;
            }
        }
    }

    Ok(())
}

async fn interactive(engine: &RagEngine, loader: &DirectoryLoader) -> Result<()> {
    display_banner();

    match loader.load().await {
        Ok(documents) => {
            let report = engine.ingest(&documents)?;
            print_ingest_report(&report, engine.index_size()?);
        }
        Err(e) => println!(
            "{} Ingestion failed: {}. Continuing with an empty index.",
            "⚠️".yellow(),
            e
        ),
    }

    let k = engine.config().top_k;

    while let Some(input) = read_query()? {
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" => print_help(),
            "stats" => print_stats(&engine.stats()),
            "reset" => {
                engine.reset()?;
                let report = engine.ingest(&loader.load().await?)?;
                print_ingest_report(&report, engine.index_size()?);
            }
            _ => {
                let mut citations = Vec::new();
                for event in engine.ask_stream(&input, k)? {
                    match event {
                        AskEvent::Metadata(metadata) => citations = metadata.citations,
                        AskEvent::Chunk(fragment) => {
                            print!("{}", fragment);
                            io::stdout().flush()?;
                        }
                        AskEvent::Metrics(_) => println!("\n"),
                    }
                }
                print_citations(&citations);
                println!();
            }
        }
    }

    Ok(())
}
