//! Score command: sentiment valence of a text

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, log_info, score_color, to_json, write_output};
use super::super::parser::{InputArgs, OutputFormat};
use super::super::utils::{get_input_text, load_config, load_lexicon};

use crate::sentiment::{
    EntryScorer, SentimentLabel, SentimentResult, SentimentScorer, TermMatch,
};

/// Score the sentiment of a text
#[derive(Parser, Debug, Default)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<String>,

    /// JSON lexicon replacing the built-in one
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<String>,

    /// List each matched term and its contribution
    #[arg(short, long)]
    pub explain: bool,

    /// Use the saved-entry scorer instead of the live editor scorer
    #[arg(long, conflicts_with_all = ["explain", "lexicon"])]
    pub entry: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    #[serde(flatten)]
    result: SentimentResult,
    label: SentimentLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Vec<TermMatch<'a>>>,
}

pub fn cmd_score(args: ScoreArgs) -> Result<(), String> {
    let text = get_input_text(&args.input)?;
    let config = load_config(args.config.as_deref())?;
    let scorer = match load_lexicon(args.lexicon.as_deref())? {
        Some(lexicon) => {
            log_info(
                &format!(
                    "Using custom lexicon ({} positive, {} negative terms)",
                    lexicon.positive().len(),
                    lexicon.negative().len()
                ),
                args.quiet,
            );
            SentimentScorer::with_lexicon(lexicon)
        }
        None => SentimentScorer::new(),
    }
    .with_config(config.scoring);

    let (result, matches) = if args.entry {
        (EntryScorer::new().score(&text), Vec::new())
    } else {
        let explanation = scorer.explain(&text);
        (explanation.result, explanation.matches)
    };
    let output = match args.format {
        OutputFormat::Json => to_json(&ScoreReport {
            result,
            label: result.label(),
            matches: args.explain.then_some(matches),
        })?,
        OutputFormat::Human => {
            let mut out = format!(
                "{} {}\n",
                color(score_color(result.score), &format!("{:+.2}", result.score)),
                result.label()
            );
            if !args.quiet {
                out.push_str(&format!("  terms: {}\n", result.term_count));
                if result.has_complex_emotion {
                    out.push_str("  complex emotion: yes (dampened)\n");
                }
            }
            if args.explain {
                for m in &matches {
                    let place = match m.sentence {
                        Some(i) => format!("sentence {}", i + 1),
                        None => "whole text".to_string(),
                    };
                    out.push_str(&format!(
                        "  {:+.3}  {:?} (weight {:+.2}, {}{})\n",
                        m.contribution,
                        m.term,
                        m.weight,
                        place,
                        if m.negated { ", negated" } else { "" }
                    ));
                }
            }
            out
        }
    };

    write_output(&output, None)
}
