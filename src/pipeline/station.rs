//! Station abstraction: one processing stage per thread.
//!
//! Stations receive items over a bounded channel, process them, and send
//! results downstream. Recoverable failures are reported and skipped; a
//! fatal failure or a closed channel shuts the station down.

use crate::pipeline::error::{ErrorReporter, StationError};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A processing stage in the pipeline.
pub trait Station: Send + 'static {
    /// The input type this station receives.
    type Input: Send + 'static;
    /// The output type this station produces.
    type Output: Send + 'static;

    /// Processes a single input item.
    ///
    /// Returns:
    /// - `Ok(Some(output))` - produced an output for downstream
    /// - `Ok(None)` - consumed the item without output (throttled, filtered)
    /// - `Err(StationError)` - processing failed
    fn process(&mut self, input: Self::Input) -> Result<Option<Self::Output>, StationError>;

    /// Station name for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Called once when the station shuts down.
    fn shutdown(&mut self) {}
}

/// Handle to a station running on its own thread.
pub struct StationRunner {
    handle: Option<JoinHandle<()>>,
    station_name: &'static str,
}

impl StationRunner {
    /// Spawns a station on a dedicated thread.
    pub fn spawn<S: Station>(
        mut station: S,
        input_rx: Receiver<S::Input>,
        output_tx: Sender<S::Output>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let station_name = station.name();

        let handle = thread::spawn(move || {
            let name = station.name();

            while let Ok(input) = input_rx.recv() {
                match station.process(input) {
                    Ok(Some(output)) => {
                        if output_tx.send(output).is_err() {
                            // Downstream closed, shut down.
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(error @ StationError::Recoverable(_)) => {
                        error_reporter.report(name, &error);
                    }
                    Err(error @ StationError::Fatal(_)) => {
                        error_reporter.report(name, &error);
                        break;
                    }
                }
            }

            station.shutdown();
        });

        Self {
            handle: Some(handle),
            station_name,
        }
    }

    /// Waits for the station thread to finish.
    pub fn join(mut self) -> Result<(), String> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| format!("Station '{}' thread panicked", self.station_name)),
            None => Ok(()),
        }
    }

    /// Returns the station name.
    pub fn name(&self) -> &'static str {
        self.station_name
    }
}
