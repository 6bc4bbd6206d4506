//! Commit sinks: where committed tokens land.
//!
//! The output buffer belongs to the consumer. The pipeline only requests
//! actions against it through a sink the consumer supplies, keeping the
//! pipeline agnostic to how text is stored or rendered.

use crate::buffer::TextBuffer;
use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::CommitAction;
use std::io::Write;

/// Pluggable destination for commit actions.
/// Pairs with FrameSource for input - this handles the committed-text output.
pub trait CommitSink: Send + 'static {
    /// Applies one committed action.
    fn apply(&mut self, action: CommitAction) -> crate::error::Result<()>;

    /// Called on pipeline shutdown. Return accumulated text if applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Sink that accumulates committed text in memory.
///
/// `finish()` returns the collected text, so `PipelineHandle::stop()` can
/// hand the session's output back to the caller.
#[derive(Debug, Default)]
pub struct CollectorSink {
    buffer: TextBuffer,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text collected so far.
    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }
}

impl CommitSink for CollectorSink {
    fn apply(&mut self, action: CommitAction) -> crate::error::Result<()> {
        match action {
            CommitAction::AppendChar(c) => self.buffer.push_char(c),
            CommitAction::InsertSpace => self.buffer.push_space(),
            CommitAction::DeleteLast => self.buffer.delete_last(),
            CommitAction::Ignore => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer).into_string())
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Sink that types committed text straight to stdout.
///
/// DeleteLast is rendered with backspace-overwrite so a terminal shows the
/// character disappearing.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl CommitSink for StdoutSink {
    fn apply(&mut self, action: CommitAction) -> crate::error::Result<()> {
        let mut stdout = std::io::stdout().lock();
        match action {
            CommitAction::AppendChar(c) => write!(stdout, "{c}")?,
            CommitAction::InsertSpace => write!(stdout, " ")?,
            CommitAction::DeleteLast => write!(stdout, "\u{8} \u{8}")?,
            CommitAction::Ignore => return Ok(()),
        }
        stdout.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Station wrapper for any CommitSink implementation.
/// Terminal station: applies actions and ships `finish()` to the handle.
pub(crate) struct SinkStation {
    sink: Box<dyn CommitSink>,
    result_tx: Option<crossbeam_channel::Sender<Option<String>>>,
}

impl SinkStation {
    pub(crate) fn new(
        sink: Box<dyn CommitSink>,
        result_tx: crossbeam_channel::Sender<Option<String>>,
    ) -> Self {
        Self {
            sink,
            result_tx: Some(result_tx),
        }
    }
}

impl Station for SinkStation {
    type Input = CommitAction;
    type Output = ();

    fn name(&self) -> &'static str {
        self.sink.name()
    }

    fn process(&mut self, action: CommitAction) -> Result<Option<()>, StationError> {
        if action == CommitAction::Ignore {
            return Ok(None);
        }
        self.sink
            .apply(action)
            .map_err(|e| StationError::Recoverable(format!("Sink failed: {e}")))?;
        Ok(Some(()))
    }

    fn shutdown(&mut self) {
        let result = self.sink.finish();
        if let Some(tx) = self.result_tx.take()
            && tx.send(result).is_err()
        {
            eprintln!("signtype: sink shutdown — result receiver already dropped");
        }
    }
}
