//! Annotate command: known and candidate people in a text

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, log_info, to_json, write_output};
use super::super::parser::{InputArgs, OutputFormat};
use super::super::utils::{get_input_text, load_config, load_roster};

use crate::offset::{SpanConverter, TextSpan};
use crate::{Detected, Span, SpanKind, TextAnnotator};

/// Find known and candidate people in a text
#[derive(Parser, Debug, Default)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON roster of known people
    #[arg(short, long, value_name = "PATH")]
    pub roster: Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// Skip capitalized words at the start of a sentence
    #[arg(long)]
    pub strict: bool,

    /// Include character and UTF-16 offsets in JSON output
    #[arg(long)]
    pub char_offsets: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Serialize)]
struct SpanReport<'a> {
    #[serde(flatten)]
    span: &'a Span,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    offsets: Option<TextSpan>,
}

#[derive(Serialize)]
struct AnnotateReport<'a> {
    spans: Vec<SpanReport<'a>>,
    detected: &'a Detected,
}

pub fn cmd_annotate(args: AnnotateArgs) -> Result<(), String> {
    let text = get_input_text(&args.input)?;
    let mut config = load_config(args.config.as_deref())?.annotator;
    if args.strict {
        config.suppress_sentence_initial = true;
    }
    let index = load_roster(args.roster.as_deref())?;
    if index.ignored() > 0 {
        log_info(
            &format!("Ignored {} roster entries with names under two characters", index.ignored()),
            args.quiet,
        );
    }

    let annotation = TextAnnotator::with_config(config).annotate(&text, &index);

    let output = match args.format {
        OutputFormat::Json => {
            let conv = args.char_offsets.then(|| SpanConverter::new(&text));
            let spans = annotation
                .spans
                .iter()
                .map(|span| SpanReport {
                    span,
                    text: span.text(&text),
                    offsets: conv.as_ref().map(|c| c.span(span)),
                })
                .collect();
            to_json(&AnnotateReport {
                spans,
                detected: &annotation.detected,
            })?
        }
        OutputFormat::Human => {
            if annotation.detected.is_empty() {
                "No people found.\n".to_string()
            } else {
                let mut out = String::new();
                for span in annotation.entity_spans() {
                    let (tag, code) = match &span.kind {
                        SpanKind::Known(id) => (format!("known #{}", id), "1;36"),
                        _ => ("candidate".to_string(), "1;33"),
                    };
                    out.push_str(&format!(
                        "  {} {} ({}-{})\n",
                        color(code, &format!("{:<12}", tag)),
                        span.text(&text),
                        span.start,
                        span.end
                    ));
                }
                if !args.quiet {
                    let known = annotation.detected.known().count();
                    let candidates = annotation.detected.candidate_names();
                    out.push_str(&format!("\n{} known, {} new", known, candidates.len()));
                    if !candidates.is_empty() {
                        out.push_str(&format!(": {}", candidates.join(", ")));
                    }
                    out.push('\n');
                }
                out
            }
        }
    };

    write_output(&output, None)
}
