//! fragdump - Dump the normalized paragraphs, tokens, and fragments of one
//! document's line stream as JSON.
//!
//! A debug/introspection tool: it runs the Normalize and Tokenize & Window
//! stages in isolation and prints their output, without running a match
//! against a second document.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use duplex_core::fragment::generate_document_fragments;
use duplex_core::normalize::assemble_paragraphs;
use duplex_core::tokenize::tokenize;
use duplex_core::Line;
use serde_json::json;

/// A command line tool for dumping the normalized paragraph/token/fragment
/// structure of one document's line stream.
#[derive(Parser, Debug)]
#[command(name = "fragdump")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Path to a document's line-stream JSON file
    doc: PathBuf,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Token window length used when generating fragments
    #[arg(long = "window-n", default_value = "8")]
    window_n: usize,

    /// Fragment cap applied to the document
    #[arg(long = "max-fragments", default_value = "10000")]
    max_fragments: usize,

    /// Minimum clean-text paragraph length kept before tokenization
    #[arg(long = "min-paragraph-len", default_value = "3")]
    min_paragraph_len: usize,

    /// Dump tokens in addition to paragraphs and fragments
    #[arg(short = 't', long = "tokens", action = ArgAction::SetTrue)]
    tokens: bool,

    /// Dump fragments in addition to paragraphs
    #[arg(short = 'g', long = "fragments", action = ArgAction::SetTrue)]
    fragments: bool,

    /// Restrict output to these 1-indexed paragraph numbers
    #[arg(short = 'p', long = "paragraphs")]
    paragraphs: Option<String>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

fn parse_paragraph_filter(spec: &str) -> HashSet<usize> {
    spec.split(',')
        .filter_map(|s| s.trim().parse::<usize>().ok())
        .map(|n| n.saturating_sub(1))
        .collect()
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let content = std::fs::read_to_string(&args.doc)
        .map_err(|e| format!("failed to read {}: {e}", args.doc.display()))?;
    let lines: Vec<Line> = serde_json::from_str(&content)
        .map_err(|e| format!("invalid line-stream json in {}: {e}", args.doc.display()))?;

    let mut paragraphs = assemble_paragraphs(&lines, args.min_paragraph_len);
    for p in paragraphs.iter_mut() {
        p.tokens = tokenize(&p.clean_text);
    }

    let wanted = args.paragraphs.as_deref().map(parse_paragraph_filter);

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)?;
        Box::new(BufWriter::new(file))
    };

    let paragraph_dumps: Vec<serde_json::Value> = paragraphs
        .iter()
        .enumerate()
        .filter(|(i, _)| wanted.as_ref().is_none_or(|w| w.contains(i)))
        .map(|(i, p)| {
            let mut entry = json!({
                "index": i,
                "start_page": p.start_page,
                "start_line": p.start_line,
                "clean_len": p.clean_len(),
                "clean_text": p.clean_text,
            });
            if args.tokens {
                let tokens: Vec<serde_json::Value> = p
                    .tokens
                    .iter()
                    .map(|t| json!({"text": t.text.as_str(), "kind": format!("{:?}", t.kind), "clean_start": t.clean_start, "clean_end": t.clean_end}))
                    .collect();
                entry["tokens"] = json!(tokens);
            }
            entry
        })
        .collect();

    let mut report = json!({ "paragraphs": paragraph_dumps });

    if args.fragments {
        let fragments = generate_document_fragments(&paragraphs, args.window_n, args.max_fragments);
        let fragment_dumps: Vec<serde_json::Value> = fragments
            .iter()
            .filter(|f| wanted.as_ref().is_none_or(|w| w.contains(&f.paragraph_id.index())))
            .map(|f| {
                json!({
                    "paragraph_id": f.paragraph_id.index(),
                    "token_start": f.token_start,
                    "token_end": f.token_end(),
                    "match_key": f.match_key.as_str(),
                    "display_text": f.display_text.as_str(),
                    "sketch_keys": f.sketch_keys.as_slice(),
                    "start_page": f.start_page,
                    "start_line": f.start_line,
                })
            })
            .collect();
        report["fragment_count"] = json!(fragment_dumps.len());
        report["fragments"] = json!(fragment_dumps);
    }

    writeln!(output, "{}", serde_json::to_string_pretty(&report)?)?;
    output.flush()?;

    Ok(())
}
