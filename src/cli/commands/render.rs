//! Render command: highlighted HTML markup

use clap::Parser;

use super::super::output::{log_info, write_output};
use super::super::parser::InputArgs;
use super::super::utils::{get_input_text, load_config, load_roster};

use crate::{MarkupRenderer, TextAnnotator};

/// Render a text as highlighted markup
#[derive(Parser, Debug, Default)]
pub struct RenderArgs {
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

    /// Write markup to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn cmd_render(args: RenderArgs) -> Result<(), String> {
    let text = get_input_text(&args.input)?;
    let config = load_config(args.config.as_deref())?;
    let index = load_roster(args.roster.as_deref())?;

    let mut annotator_config = config.annotator;
    if args.strict {
        annotator_config.suppress_sentence_initial = true;
    }
    let annotation = TextAnnotator::with_config(annotator_config).annotate(&text, &index);
    let rendered = MarkupRenderer::with_config(config.render)
        .with_index(&index)
        .try_render(&annotation.spans, &text)
        .map_err(|e| e.to_string())?;

    let mut markup = rendered.into_string();
    if args.output.is_none() && !markup.ends_with('\n') {
        markup.push('\n');
    }
    write_output(&markup, args.output.as_deref())?;

    if let Some(path) = &args.output {
        log_info(
            &format!(
                "Wrote {} ({} highlighted)",
                path,
                annotation.entity_spans().count()
            ),
            args.quiet,
        );
    }
    Ok(())
}
