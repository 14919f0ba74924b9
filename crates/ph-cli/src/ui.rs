//! Terminal rendering for the CLI

use colored::*;
use crossterm::terminal::size;
use std::io::{self, BufRead, Write};

use ph_core::{Answer, Citation, IngestReport, MetricsSnapshot, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(40);
    let inner = banner_width - 2;

    let top_border = format!("┌{}┐", "─".repeat(inner));
    let bottom_border = format!("└{}┘", "─".repeat(inner));
    let empty_line = format!("│{}│", " ".repeat(inner));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let lines = [
        "Policy Helper".to_string(),
        String::new(),
        "Ask questions about your policy and product docs.".to_string(),
        "Answers cite the passages they were built from.".to_string(),
        String::new(),
        format!("v{}", VERSION),
    ];

    for line in &lines {
        let padding = inner.saturating_sub(line.chars().count() + 2);
        let content = format!("│  {}{}│", line, " ".repeat(padding));
        println!("{}", content.blue());
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "Tip: type a question, or 'help' for commands".dimmed()
    );
    println!();
}

pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask a question about the indexed documents", "<question>".green());
    println!("  {} - Show average retrieval and generation latency", "stats".green());
    println!("  {} - Clear the index and metrics, then re-ingest", "reset".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What is the refund window?");
    println!("  Does the warranty cover water damage?");
}

pub fn print_ingest_report(report: &IngestReport, index_size: usize) {
    println!(
        "{} Indexed {} new document(s), {} new chunk(s) ({} chunks total)",
        "✅".green(),
        report.indexed_docs,
        report.indexed_chunks,
        index_size
    );
}

pub fn print_citations(citations: &[Citation]) {
    if citations.is_empty() {
        return;
    }

    println!("{}", "Sources:".bold());
    for (i, citation) in citations.iter().enumerate() {
        if citation.section.is_empty() {
            println!("  {} {}", format!("[{}]", i + 1).cyan(), citation.title);
        } else {
            println!(
                "  {} {} {}",
                format!("[{}]", i + 1).cyan(),
                citation.title,
                format!("({})", citation.section).dimmed()
            );
        }
    }
}

pub fn print_answer(answer: &Answer) {
    println!("{}", answer.answer);
    println!();
    print_citations(&answer.citations);
    println!(
        "{}",
        format!(
            "retrieval {:.3} ms avg | generation {:.3} ms avg",
            answer.metrics.retrieval_ms, answer.metrics.generation_ms
        )
        .dimmed()
    );
}

pub fn print_stats(stats: &MetricsSnapshot) {
    println!("{}", "Latency:".bold());
    println!(
        "  retrieval  {:>10.3} ms avg over {} call(s)",
        stats.avg_retrieval_latency_ms, stats.retrieval_count
    );
    println!(
        "  generation {:>10.3} ms avg over {} call(s)",
        stats.avg_generation_latency_ms, stats.generation_count
    );
}

/// Prompt for one line of input; `None` once stdin is closed
pub fn read_query() -> Result<Option<String>> {
    print!("{} ", "?".cyan().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
