//! Terminal rendering for pipeline events.

use crate::pipeline::events::PipelineEvent;
use crate::pipeline::types::CommitAction;
use owo_colors::OwoColorize;

/// Render one pipeline event to stderr.
///
/// Frames are never rendered (30 per second would drown everything else).
/// Predictions show up from `-v`; commits and errors always show unless
/// quiet.
pub fn render_event(event: &PipelineEvent, quiet: bool, verbosity: u8) {
    match event {
        PipelineEvent::Frame(_) => {}
        PipelineEvent::Prediction(prediction) => {
            if quiet || verbosity == 0 {
                return;
            }
            let line = format!("{} ({:.2})", prediction.label, prediction.confidence);
            if prediction.confidence >= 0.8 {
                eprintln!("  {}", line.green());
            } else if prediction.confidence >= 0.5 {
                eprintln!("  {}", line);
            } else {
                eprintln!("  {}", line.dimmed());
            }
        }
        PipelineEvent::Commit(action) => {
            if quiet {
                return;
            }
            match action {
                CommitAction::AppendChar(c) => eprintln!("{} {}", "+".green(), c),
                CommitAction::InsertSpace => eprintln!("{} space", "+".green()),
                CommitAction::DeleteLast => eprintln!("{} delete", "-".yellow()),
                CommitAction::Ignore => {}
            }
        }
        PipelineEvent::Error(message) => {
            if !quiet {
                eprintln!("{} {}", "error:".red(), message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classifier::Prediction;
    use std::time::Instant;

    #[test]
    fn test_render_does_not_panic() {
        let events = [
            PipelineEvent::Prediction(Prediction::new("A", 0.9, Instant::now())),
            PipelineEvent::Prediction(Prediction::new("B", 0.3, Instant::now())),
            PipelineEvent::Commit(CommitAction::AppendChar('A')),
            PipelineEvent::Commit(CommitAction::InsertSpace),
            PipelineEvent::Commit(CommitAction::DeleteLast),
            PipelineEvent::Error("boom".to_string()),
        ];
        for event in &events {
            render_event(event, false, 2);
            render_event(event, true, 0);
        }
    }
}
