//! duplex - Detect fragment-level text recurrence between two documents
//!
//! A command line tool that compares two already-extracted line streams
//! (JSON arrays of `{text, page, line_no}` objects — PDF/DOCX extraction is
//! someone else's job) and reports the surviving fragment matches as text,
//! JSON, or CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use duplex_core::{compare, CancelToken, DuplexError, Line, Params};
use serde::Deserialize;
use serde_json::json;

/// Report format for the comparison output.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// A command line tool for detecting fragment-level text recurrence
/// between two documents.
#[derive(Parser, Debug)]
#[command(name = "duplex")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// Path to document A's line-stream JSON file
    doc_a: PathBuf,

    /// Path to document B's line-stream JSON file
    doc_b: PathBuf,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Params settings JSON file path
    #[arg(long = "params-json")]
    params_json: Option<PathBuf>,

    /// Inline params settings JSON
    #[arg(long = "params")]
    params: Option<String>,

    /// Token window length (>= 2)
    #[arg(long = "window-n")]
    window_n: Option<usize>,

    /// Similarity acceptance threshold, in [0, 1]
    #[arg(long = "tau")]
    tau: Option<f64>,

    /// Fragment cap per document (>= 100)
    #[arg(long = "max-fragments")]
    max_fragments: Option<usize>,

    /// Context window, in valid codepoints, around each match
    #[arg(long = "context-chars")]
    context_chars: Option<usize>,

    /// Worker count for the parallel match stage (>= 1)
    #[arg(long = "workers")]
    workers: Option<usize>,

    /// Minimum clean-text paragraph length kept before tokenization
    #[arg(long = "min-paragraph-len")]
    min_paragraph_len: Option<usize>,

    /// Treat a zero-paragraph document as an error instead of an empty result
    #[arg(long = "fail-on-empty", action = ArgAction::SetTrue)]
    fail_on_empty: bool,

    /// Report format
    #[arg(short = 'f', long = "format", value_enum, default_value = "text")]
    format: ReportFormat,

    /// Path to file where the report is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Print a progress line to stderr after each match-stage batch
    #[arg(long = "progress", action = ArgAction::SetTrue)]
    progress: bool,
}

#[derive(Default, Deserialize)]
struct ParamsPatch {
    window_n: Option<usize>,
    similarity_threshold: Option<f64>,
    max_fragments_per_doc: Option<usize>,
    context_chars: Option<usize>,
    worker_count: Option<usize>,
    min_clean_paragraph_len: Option<usize>,
    fail_on_empty_document: Option<bool>,
}

fn apply_params_patch(params: &mut Params, patch: ParamsPatch) {
    if let Some(v) = patch.window_n {
        params.window_n = v;
    }
    if let Some(v) = patch.similarity_threshold {
        params.similarity_threshold = v;
    }
    if let Some(v) = patch.max_fragments_per_doc {
        params.max_fragments_per_doc = v;
    }
    if let Some(v) = patch.context_chars {
        params.context_chars = v;
    }
    if let Some(v) = patch.worker_count {
        params.worker_count = v;
    }
    if let Some(v) = patch.min_clean_paragraph_len {
        params.min_clean_paragraph_len = v;
    }
    if let Some(v) = patch.fail_on_empty_document {
        params.fail_on_empty_document = v;
    }
}

fn parse_params_patch_str(input: &str) -> Result<ParamsPatch, String> {
    serde_json::from_str(input).map_err(|e| format!("params json error: {e}"))
}

fn parse_params_patch_file(path: &PathBuf) -> Result<ParamsPatch, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("params read error: {e}"))?;
    parse_params_patch_str(&content)
}

fn build_params(args: &Args) -> Result<Params, String> {
    let mut params = Params::default();

    if let Some(ref path) = args.params_json {
        apply_params_patch(&mut params, parse_params_patch_file(path)?);
    }
    if let Some(ref inline) = args.params {
        apply_params_patch(&mut params, parse_params_patch_str(inline)?);
    }

    if let Some(v) = args.window_n {
        params.window_n = v;
    }
    if let Some(v) = args.tau {
        params.similarity_threshold = v;
    }
    if let Some(v) = args.max_fragments {
        params.max_fragments_per_doc = v;
    }
    if let Some(v) = args.context_chars {
        params.context_chars = v;
    }
    if let Some(v) = args.workers {
        params.worker_count = v;
    }
    if let Some(v) = args.min_paragraph_len {
        params.min_clean_paragraph_len = v;
    }
    if args.fail_on_empty {
        params.fail_on_empty_document = true;
    }

    Ok(params)
}

fn read_lines(path: &PathBuf) -> Result<Vec<Line>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid line-stream json in {}: {e}", path.display()))
}

fn render_text<W: Write>(out: &mut W, result: &duplex_core::CompareResult) -> io::Result<()> {
    writeln!(
        out,
        "fragments: a={} b={} candidate_pairs={}",
        result.total_fragments_a, result.total_fragments_b, result.candidate_pairs_considered
    )?;
    writeln!(
        out,
        "matches: {} (min={:.3} max={:.3} mean={:.3})",
        result.matches.len(),
        result.score_min,
        result.score_max,
        result.score_mean
    )?;
    for (band, count) in result.histogram.iter() {
        writeln!(out, "  {band}: {count}")?;
    }
    writeln!(out, "elapsed_ms: total={}", result.elapsed_ms.total_ms())?;
    writeln!(out)?;
    for m in &result.matches {
        writeln!(
            out,
            "[{:.3}] A p{} l{} <-> B p{} l{}",
            m.score, m.frag_a.start_page, m.frag_a.start_line, m.frag_b.start_page, m.frag_b.start_line
        )?;
        writeln!(out, "  A: ...{}[{}]{}...", m.context_before_a, m.frag_a.display_text, m.context_after_a)?;
        writeln!(out, "  B: ...{}[{}]{}...", m.context_before_b, m.frag_b.display_text, m.context_after_b)?;
        writeln!(out, "  ops: {}", m.ops.join("; "))?;
    }
    Ok(())
}

fn render_json<W: Write>(out: &mut W, result: &duplex_core::CompareResult) -> io::Result<()> {
    let matches: Vec<serde_json::Value> = result
        .matches
        .iter()
        .map(|m| {
            json!({
                "score": m.score,
                "ops": m.ops,
                "a": {
                    "page": m.frag_a.start_page,
                    "line": m.frag_a.start_line,
                    "display_text": m.frag_a.display_text.as_str(),
                    "context_before": m.context_before_a,
                    "context_after": m.context_after_a,
                },
                "b": {
                    "page": m.frag_b.start_page,
                    "line": m.frag_b.start_line,
                    "display_text": m.frag_b.display_text.as_str(),
                    "context_before": m.context_before_b,
                    "context_after": m.context_after_b,
                },
            })
        })
        .collect();

    let histogram: serde_json::Map<String, serde_json::Value> = result
        .histogram
        .iter()
        .map(|(band, count)| (band.to_string(), json!(count)))
        .collect();

    let report = json!({
        "total_fragments_a": result.total_fragments_a,
        "total_fragments_b": result.total_fragments_b,
        "candidate_pairs_considered": result.candidate_pairs_considered,
        "reduction_ratio": result.reduction_ratio(),
        "score_min": null_if_nan(result.score_min),
        "score_max": null_if_nan(result.score_max),
        "score_mean": null_if_nan(result.score_mean),
        "histogram": histogram,
        "elapsed_ms": result.elapsed_ms.total_ms(),
        "matches": matches,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&report).expect("json serialize"))
}

fn null_if_nan(v: f64) -> serde_json::Value {
    if v.is_nan() {
        serde_json::Value::Null
    } else {
        json!(v)
    }
}

/// Escape a string for RFC 4180 compliant CSV output.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn render_csv<W: Write>(out: &mut W, result: &duplex_core::CompareResult) -> io::Result<()> {
    writeln!(out, "score,a_page,a_line,b_page,b_line,a_text,b_text,ops")?;
    for m in &result.matches {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            m.score,
            m.frag_a.start_page,
            m.frag_a.start_line,
            m.frag_b.start_page,
            m.frag_b.start_line,
            csv_escape(&m.frag_a.display_text),
            csv_escape(&m.frag_b.display_text),
            csv_escape(&m.ops.join("; ")),
        )?;
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.debug { "duplex=debug,duplex_core=debug" } else { "duplex=info,duplex_core=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .try_init();

    let params = build_params(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    let lines_a = read_lines(&args.doc_a).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    let lines_b = read_lines(&args.doc_b).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    let cancel = CancelToken::new();
    let progress_printer = |fraction: f64, done: u64, total: u64| {
        eprintln!("progress: {done}/{total} batches ({:.1}%)", fraction * 100.0);
    };
    let progress: Option<&duplex_core::matcher::ProgressFn<'_>> =
        if args.progress { Some(&progress_printer) } else { None };

    let result = match compare(lines_a, lines_b, &params, progress, Some(&cancel)) {
        Ok(r) => r,
        Err(DuplexError::InvalidParam { which, detail }) => {
            eprintln!("invalid parameter {which}: {detail}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("comparison failed: {e}");
            std::process::exit(1);
        }
    };

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .map_err(|e| format!("failed to create output file {}: {e}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    match args.format {
        ReportFormat::Text => render_text(&mut output, &result)?,
        ReportFormat::Json => render_json(&mut output, &result)?,
        ReportFormat::Csv => render_csv(&mut output, &result)?,
    }
    output.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            doc_a: PathBuf::from("a.json"),
            doc_b: PathBuf::from("b.json"),
            version: (),
            debug: false,
            params_json: None,
            params: None,
            window_n: None,
            tau: None,
            max_fragments: None,
            context_chars: None,
            workers: None,
            min_paragraph_len: None,
            fail_on_empty: false,
            format: ReportFormat::Text,
            outfile: "-".to_string(),
            progress: false,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let mut args = base_args();
        args.window_n = Some(5);
        args.tau = Some(0.5);
        let params = build_params(&args).unwrap();
        assert_eq!(params.window_n, 5);
        assert!((params.similarity_threshold - 0.5).abs() < 1e-9);
    }

    #[test]
    fn inline_params_patch_applies() {
        let mut args = base_args();
        args.params = Some(r#"{"window_n": 4, "fail_on_empty_document": true}"#.to_string());
        let params = build_params(&args).unwrap();
        assert_eq!(params.window_n, 4);
        assert!(params.fail_on_empty_document);
    }

    #[test]
    fn explicit_flag_wins_over_inline_patch() {
        let mut args = base_args();
        args.params = Some(r#"{"window_n": 4}"#.to_string());
        args.window_n = Some(9);
        let params = build_params(&args).unwrap();
        assert_eq!(params.window_n, 9);
    }

    #[test]
    fn csv_escape_quotes_commas() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("plain"), "plain");
    }
}
