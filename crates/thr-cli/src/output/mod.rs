use serde::Serialize;
use thr_core::entities::Destination;
use thr_gate::{GateOutcome, Notice};

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct OutcomeResponse<'a> {
    #[serde(flatten)]
    destination: &'a Destination,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'a Notice>,
}

/// Render a gate outcome. Raw output is the router path alone.
pub fn render_outcome(outcome: &GateOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Raw => Ok(outcome.destination.path()),
        OutputFormat::Json => render(
            &OutcomeResponse {
                destination: &outcome.destination,
                path: outcome.destination.path(),
                notice: outcome.notice.as_ref(),
            },
            format,
        ),
    }
}

/// Print a gate outcome; in raw mode the notice goes to stderr.
pub fn output_outcome(outcome: &GateOutcome, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render_outcome(outcome, format)?;
    println!("{rendered}");
    if format == OutputFormat::Raw
        && let Some(notice) = &outcome.notice
    {
        eprintln!("{}", notice.message);
    }
    Ok(())
}
