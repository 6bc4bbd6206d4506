//! Pipeline controller: owns the lifecycle from camera to committed text.
//!
//! One dedicated thread paces frame acquisition; each downstream stage runs
//! as a station on its own thread behind a bounded channel. Consumers only
//! ever see events and the final collected text, never pipeline internals.

use crate::classify::classifier::Classifier;
use crate::clock::{Clock, SystemClock};
use crate::defaults;
use crate::error::{Result, SigntypeError};
use crate::pipeline::classifier_station::ClassifierStation;
use crate::pipeline::committer::{CommitterConfig, TokenCommitter};
use crate::pipeline::committer_station::CommitterStation;
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::events::{EventSender, PipelineEvent};
use crate::pipeline::gate::InferenceGate;
use crate::pipeline::sink::{CommitSink, SinkStation};
use crate::pipeline::smoother::{SmootherConfig, TemporalSmoother};
use crate::pipeline::smoother_station::SmootherStation;
use crate::pipeline::station::StationRunner;
use crate::video::frame::Frame;
use crate::video::roi::{RegionOfInterest, SharedRoi, crop};
use crate::video::source::FrameSource;
use crossbeam_channel::{Receiver, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Frame acquisition rate the loop paces itself to.
    pub target_frame_hz: u32,
    /// Classifier invocation rate, independent of the frame rate.
    pub target_inference_hz: u32,
    /// Temporal smoothing parameters.
    pub smoother: SmootherConfig,
    /// Commit gating parameters.
    pub committer: CommitterConfig,
    /// Initial region of interest.
    pub roi: RegionOfInterest,
    /// Channel buffer sizes
    pub classify_buffer: usize,
    pub stage_buffer: usize,
    pub event_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_frame_hz: defaults::TARGET_FRAME_HZ,
            target_inference_hz: defaults::TARGET_INFERENCE_HZ,
            smoother: SmootherConfig::default(),
            committer: CommitterConfig::default(),
            roi: RegionOfInterest::default(),
            classify_buffer: defaults::CLASSIFY_BUFFER,
            stage_buffer: defaults::STAGE_BUFFER,
            event_buffer: defaults::EVENT_BUFFER,
        }
    }
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    /// Flag to signal shutdown
    running: Arc<AtomicBool>,
    /// Join handles for spawned threads
    threads: Vec<JoinHandle<()>>,
    /// Receiver for the sink's finish() result
    result_rx: Option<Receiver<Option<String>>>,
    /// Consumer-facing event stream (taken once)
    events: Option<Receiver<PipelineEvent>>,
    /// ROI cell read by the acquisition loop
    shared_roi: SharedRoi,
}

impl PipelineHandle {
    /// Returns true while the pipeline is running.
    ///
    /// Flips to false on `stop()`, on a fatal acquisition error, or when a
    /// finite source is exhausted.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Takes the event receiver. Returns `None` after the first call.
    pub fn take_events(&mut self) -> Option<Receiver<PipelineEvent>> {
        self.events.take()
    }

    /// Replaces the region of interest.
    ///
    /// Visible to the very next acquisition iteration. Invalid rectangles
    /// cannot be constructed, so there is nothing to reject here.
    pub fn set_roi(&self, roi: RegionOfInterest) {
        self.shared_roi.set(roi);
    }

    /// Returns the region of interest currently in effect.
    pub fn roi(&self) -> RegionOfInterest {
        self.shared_roi.get()
    }

    /// Stops the pipeline gracefully and returns the sink's collected text.
    ///
    /// Signals shutdown, waits up to 2s for the sink result, then up to 1s
    /// for threads to finish. Past the deadline remaining threads are
    /// detached — they die with the process. The frame source is released by
    /// the acquisition thread on its way out.
    pub fn stop(mut self) -> Option<String> {
        self.running.store(false, Ordering::SeqCst);

        // The result may arrive before every thread has finished; take it
        // first so an in-flight classifier call can still complete.
        let result = self
            .result_rx
            .as_ref()
            .and_then(|rx| rx.recv_timeout(Duration::from_secs(2)).ok().flatten());

        let deadline = Instant::now() + Duration::from_secs(1);
        let poll_interval = Duration::from_millis(50);

        loop {
            // Join finished threads to surface panics.
            let mut remaining = Vec::new();
            for handle in self.threads.drain(..) {
                if handle.is_finished() {
                    if let Err(panic_info) = handle.join() {
                        let msg = panic_info
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                            .unwrap_or("unknown panic");
                        eprintln!("signtype: pipeline thread panicked: {msg}");
                    }
                } else {
                    remaining.push(handle);
                }
            }
            self.threads = remaining;

            if self.threads.is_empty() {
                break;
            }

            if Instant::now() >= deadline {
                eprintln!(
                    "signtype: shutdown timeout — {} thread(s) still running, detaching",
                    self.threads.len()
                );
                break;
            }

            thread::sleep(poll_interval);
        }

        result
    }
}

/// Recognition pipeline: FrameSource → ROI crop → classifier → smoother →
/// committer → CommitSink.
pub struct PipelineController {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
}

impl PipelineController {
    /// Creates a controller with the default error reporter and clock.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Sets a custom clock (for deterministic testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts the pipeline.
    ///
    /// Consumes the controller, so a second `start` on the same instance is
    /// unrepresentable. Returns an error when the frame source fails to
    /// start; otherwise the device stays owned by the acquisition thread
    /// until the pipeline stops.
    pub fn start(
        self,
        mut frame_source: Box<dyn FrameSource>,
        classifier: Arc<dyn Classifier>,
        sink: Box<dyn CommitSink>,
    ) -> Result<PipelineHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let shared_roi = SharedRoi::new(self.config.roi);

        let (event_tx, event_rx) = EventSender::bounded(self.config.event_buffer);

        // Channels between stations
        let (classify_tx, classify_rx) = bounded::<Frame>(self.config.classify_buffer);
        let (prediction_tx, prediction_rx) = bounded(self.config.stage_buffer);
        let (decision_tx, decision_rx) = bounded(self.config.stage_buffer);
        let (action_tx, action_rx) = bounded(self.config.stage_buffer);
        let (result_tx, result_rx) = bounded(1);

        // Create stations
        let classifier_station = ClassifierStation::new(
            InferenceGate::new(self.config.target_inference_hz),
            classifier,
            self.clock.clone(),
        )
        .with_event_sender(event_tx.clone());

        let smoother_station =
            SmootherStation::new(TemporalSmoother::new(self.config.smoother));

        let committer_station = CommitterStation::new(
            TokenCommitter::new(self.config.committer),
            self.clock.clone(),
        )
        .with_event_sender(event_tx.clone());

        let sink_station = SinkStation::new(sink, result_tx);

        // Spawn station runners
        let classifier_runner = StationRunner::spawn(
            classifier_station,
            classify_rx,
            prediction_tx,
            self.error_reporter.clone(),
        );
        let smoother_runner = StationRunner::spawn(
            smoother_station,
            prediction_rx,
            decision_tx,
            self.error_reporter.clone(),
        );
        let committer_runner = StationRunner::spawn(
            committer_station,
            decision_rx,
            action_tx,
            self.error_reporter.clone(),
        );

        // Terminal station gets a dummy output channel; a drain thread keeps
        // it from backing up.
        let (sink_out_tx, sink_out_rx) = bounded::<()>(self.config.stage_buffer);
        let sink_runner = StationRunner::spawn(
            sink_station,
            action_rx,
            sink_out_tx,
            self.error_reporter.clone(),
        );

        // Exits when the sink station drops its sender.
        let drain_handle = thread::spawn(move || while sink_out_rx.recv().is_ok() {});

        // Open the device before spawning the loop so failures surface here.
        frame_source.start()?;

        let source_is_finite = frame_source.is_finite();
        let frame_interval =
            Duration::from_secs_f64(1.0 / f64::from(self.config.target_frame_hz.max(1)));

        // Spawn the acquisition loop
        let acq_running = running.clone();
        let acq_roi = shared_roi.clone();
        let acq_events = event_tx.clone();
        let acq_handle = thread::spawn(move || {
            let mut consecutive_errors: u32 = 0;

            while acq_running.load(Ordering::SeqCst) {
                let tick_start = Instant::now();

                match frame_source.read_frame() {
                    Ok(Some(frame)) => {
                        consecutive_errors = 0;

                        acq_events.send(PipelineEvent::Frame(frame.clone()));

                        let roi_frame = crop(&frame, acq_roi.get());
                        // Full channel means inference is behind; drop the
                        // frame rather than queue stale work.
                        if classify_tx.try_send(roi_frame).is_err()
                            && !acq_running.load(Ordering::SeqCst)
                        {
                            break;
                        }
                    }
                    Ok(None) => {
                        if source_is_finite {
                            // Prerecorded source exhausted; stop the pipeline.
                            break;
                        }
                        // Live source warming up or a dropped frame: skip
                        // this tick with no compensating action.
                    }
                    Err(error) => {
                        let fatal = matches!(error, SigntypeError::CameraGone { .. });
                        consecutive_errors += 1;
                        if fatal || consecutive_errors >= defaults::MAX_CONSECUTIVE_READ_ERRORS {
                            eprintln!("signtype: frame acquisition failed: {error}");
                            acq_events.send(PipelineEvent::Error(error.to_string()));
                            break;
                        }
                    }
                }

                if let Some(remaining) = frame_interval.checked_sub(tick_start.elapsed()) {
                    thread::sleep(remaining);
                }
            }

            // Release the device before reporting the pipeline stopped.
            if let Err(error) = frame_source.stop() {
                eprintln!("signtype: failed to release frame source: {error}");
            }
            acq_running.store(false, Ordering::SeqCst);
            // classify_tx drops here, shutting the stations down in order.
        });

        // Collect all thread handles
        let mut threads = vec![acq_handle, drain_handle];
        for runner in [
            classifier_runner,
            smoother_runner,
            committer_runner,
            sink_runner,
        ] {
            threads.push(thread::spawn(move || {
                if let Err(msg) = runner.join() {
                    eprintln!("signtype: {msg}");
                }
            }));
        }

        Ok(PipelineHandle {
            running,
            threads,
            result_rx: Some(result_rx),
            events: Some(event_rx),
            shared_roi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classifier::{MockClassifier, NoOpClassifier};
    use crate::classify::scripted::{ScriptStep, ScriptedClassifier};
    use crate::pipeline::sink::CollectorSink;
    use crate::pipeline::types::CommitAction;
    use crate::video::source::{FramePhase, MockFrameSource};

    /// Config tuned so a plumbing test completes in well under a second:
    /// no inference throttling, single-decision commits, no cooldown.
    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            target_frame_hz: 120,
            target_inference_hz: 0,
            smoother: SmootherConfig {
                window_size: 4,
                min_count: 3,
                conf_threshold: 0.5,
            },
            committer: CommitterConfig {
                min_consistency: 1,
                cooldown: Duration::ZERO,
            },
            ..Default::default()
        }
    }

    fn phased_source(phases: Vec<FramePhase>) -> Box<MockFrameSource> {
        Box::new(MockFrameSource::new().with_frame_sequence(phases))
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_frame_hz, 30);
        assert_eq!(config.target_inference_hz, 5);
        assert_eq!(config.classify_buffer, 8);
        assert_eq!(config.stage_buffer, 16);
        assert_eq!(config.event_buffer, 32);
    }

    #[test]
    fn test_controller_creation() {
        let controller = PipelineController::new(PipelineConfig::default())
            .with_error_reporter(Arc::new(LogReporter))
            .with_clock(Arc::new(SystemClock));
        drop(controller);
    }

    #[test]
    fn test_start_fails_when_source_fails_to_open() {
        let controller = PipelineController::new(PipelineConfig::default());
        let source = Box::new(
            MockFrameSource::new()
                .with_start_failure()
                .with_error_message("camera busy"),
        );

        let result = controller.start(source, Arc::new(NoOpClassifier), Box::new(CollectorSink::new()));
        match result {
            Err(SigntypeError::CameraOpen { message }) => assert_eq!(message, "camera busy"),
            _ => panic!("Expected CameraOpen error"),
        }
    }

    #[test]
    fn test_handle_is_running_and_stop() {
        let controller = PipelineController::new(fast_config());
        let source = Box::new(MockFrameSource::new());

        let handle = controller
            .start(source, Arc::new(NoOpClassifier), Box::new(CollectorSink::new()))
            .unwrap();
        assert!(handle.is_running());

        let result = handle.stop();
        assert!(result.is_none(), "noop classifier should commit nothing");
    }

    #[test]
    fn test_full_cycle_commits_letters() {
        let controller = PipelineController::new(fast_config());

        // 30 frames, ~0.25s at 120 Hz.
        let source = phased_source(vec![FramePhase {
            bgr: [128, 128, 128],
            count: 30,
        }]);

        let classifier = Arc::new(
            ScriptedClassifier::from_steps(
                "spell-h",
                vec![
                    ScriptStep {
                        label: "H".to_string(),
                        confidence: 0.9,
                        repeat: 10,
                    },
                    ScriptStep {
                        label: "nothing".to_string(),
                        confidence: 0.2,
                        repeat: 30,
                    },
                ],
            )
            .unwrap(),
        );

        let handle = controller
            .start(source, classifier, Box::new(CollectorSink::new()))
            .unwrap();

        // Finite source: wait for the pipeline to drain on its own.
        for _ in 0..100 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }

        let result = handle.stop().expect("expected committed text");
        assert!(!result.is_empty());
        assert!(result.chars().all(|c| c == 'H'), "got {result:?}");
    }

    #[test]
    fn test_finite_source_stops_pipeline() {
        let controller = PipelineController::new(fast_config());
        let source = phased_source(vec![FramePhase {
            bgr: [0, 0, 0],
            count: 3,
        }]);

        let handle = controller
            .start(source, Arc::new(NoOpClassifier), Box::new(CollectorSink::new()))
            .unwrap();

        for _ in 0..100 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!handle.is_running(), "exhausted source should stop the pipeline");
        let _ = handle.stop();
    }

    #[test]
    fn test_persistent_read_errors_stop_pipeline() {
        let controller = PipelineController::new(fast_config());
        let source = Box::new(MockFrameSource::new().with_read_failure());

        let mut handle = controller
            .start(source, Arc::new(NoOpClassifier), Box::new(CollectorSink::new()))
            .unwrap();
        let events = handle.take_events().unwrap();

        for _ in 0..200 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!handle.is_running());

        let saw_error = events
            .try_iter()
            .any(|event| matches!(event, PipelineEvent::Error(_)));
        assert!(saw_error, "fatal acquisition failure should emit an Error event");

        let result = handle.stop();
        assert!(result.is_none());
    }

    #[test]
    fn test_classifier_failure_does_not_stop_pipeline() {
        let controller = PipelineController::new(fast_config());
        let source = phased_source(vec![FramePhase {
            bgr: [10, 10, 10],
            count: 10,
        }]);
        let classifier = Arc::new(MockClassifier::new("broken").with_failure());

        let handle = controller
            .start(source, classifier, Box::new(CollectorSink::new()))
            .unwrap();

        // The pipeline must drain the finite source without crashing.
        for _ in 0..100 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let result = handle.stop();
        assert!(result.is_none(), "substituted predictions never commit");
    }

    #[test]
    fn test_frame_events_are_delivered_in_order() {
        let controller = PipelineController::new(fast_config());
        let source = phased_source(vec![FramePhase {
            bgr: [1, 2, 3],
            count: 5,
        }]);

        let mut handle = controller
            .start(source, Arc::new(NoOpClassifier), Box::new(CollectorSink::new()))
            .unwrap();
        let events = handle.take_events().unwrap();
        assert!(handle.take_events().is_none());

        for _ in 0..100 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let _ = handle.stop();

        let sequences: Vec<u64> = events
            .try_iter()
            .filter_map(|event| match event {
                PipelineEvent::Frame(frame) => Some(frame.sequence),
                _ => None,
            })
            .collect();
        assert!(!sequences.is_empty());
        assert!(sequences.windows(2).all(|w| w[0] < w[1]), "{sequences:?}");
    }

    #[test]
    fn test_set_roi_visible_to_next_iteration() {
        let controller = PipelineController::new(fast_config());
        let handle = controller
            .start(
                Box::new(MockFrameSource::new().with_dimensions(100, 100)),
                Arc::new(NoOpClassifier),
                Box::new(CollectorSink::new()),
            )
            .unwrap();

        let roi = RegionOfInterest::new(0.0, 0.0, 0.5, 0.5).unwrap();
        handle.set_roi(roi);
        assert_eq!(handle.roi(), roi);

        let _ = handle.stop();
    }

    #[test]
    fn test_stop_with_stuck_thread_respects_deadline() {
        let running = Arc::new(AtomicBool::new(true));
        let stuck_running = running.clone();
        let stuck_handle = thread::spawn(move || {
            while stuck_running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(10));
            }
            thread::park();
        });

        let handle = PipelineHandle {
            running: running.clone(),
            threads: vec![stuck_handle],
            result_rx: None,
            events: None,
            shared_roi: SharedRoi::default(),
        };

        let start = Instant::now();
        let result = handle.stop();
        assert!(result.is_none());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stop_returns_result_from_channel() {
        let (result_tx, result_rx) = bounded(1);
        result_tx.send(Some("HI".to_string())).unwrap();
        drop(result_tx);

        let handle = PipelineHandle {
            running: Arc::new(AtomicBool::new(true)),
            threads: vec![],
            result_rx: Some(result_rx),
            events: None,
            shared_roi: SharedRoi::default(),
        };

        assert_eq!(handle.stop(), Some("HI".to_string()));
    }

    #[test]
    fn test_panicking_thread_is_reported_not_propagated() {
        let panicking_handle = thread::spawn(|| {
            panic!("intentional test panic");
        });

        let handle = PipelineHandle {
            running: Arc::new(AtomicBool::new(true)),
            threads: vec![panicking_handle],
            result_rx: None,
            events: None,
            shared_roi: SharedRoi::default(),
        };

        assert!(handle.stop().is_none());
    }

    #[test]
    fn test_commit_events_match_collected_text() {
        let controller = PipelineController::new(fast_config());
        let source = phased_source(vec![FramePhase {
            bgr: [50, 50, 50],
            count: 20,
        }]);
        let classifier = Arc::new(
            ScriptedClassifier::from_steps(
                "spell",
                vec![ScriptStep {
                    label: "K".to_string(),
                    confidence: 0.95,
                    repeat: 40,
                }],
            )
            .unwrap(),
        );

        let mut handle = controller
            .start(source, classifier, Box::new(CollectorSink::new()))
            .unwrap();
        let events = handle.take_events().unwrap();

        for _ in 0..100 {
            if !handle.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let result = handle.stop().unwrap_or_default();

        let committed: String = events
            .try_iter()
            .filter_map(|event| match event {
                PipelineEvent::Commit(CommitAction::AppendChar(c)) => Some(c),
                _ => None,
            })
            .collect();

        // Event channel is bounded drop-oldest, so it can only undercount.
        assert!(committed.len() <= result.len());
        assert!(committed.chars().all(|c| c == 'K'));
        assert!(result.chars().all(|c| c == 'K'));
    }
}
