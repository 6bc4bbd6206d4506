//! Composition root: builds the source, classifier, and sink from CLI
//! options and drives a pipeline session to completion.

use crate::classify::registry::{KNOWN_CLASSIFIERS, build_classifier};
use crate::config::Config;
use crate::output::render_event;
use crate::pipeline::controller::PipelineController;
use crate::pipeline::sink::CollectorSink;
use crate::video::source::{FrameSource, SyntheticFrameSource};
use anyhow::{Context, bail};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where frames come from for this session.
pub enum SourceKind {
    /// Play image files from a directory.
    Frames { dir: PathBuf, looped: bool },
    /// Built-in synthetic frames.
    Synthetic,
}

/// Options for one pipeline session.
pub struct RunOptions {
    pub source: SourceKind,
    pub classifier_override: Option<String>,
    pub duration: Option<Duration>,
    pub quiet: bool,
    pub verbose: u8,
}

fn build_source(kind: &SourceKind, config: &Config) -> anyhow::Result<Box<dyn FrameSource>> {
    match kind {
        SourceKind::Frames { dir, looped } => {
            #[cfg(feature = "image-files")]
            {
                let source = crate::video::files::ImageDirSource::open(dir)
                    .with_context(|| format!("opening frame directory {}", dir.display()))?;
                let source = if *looped { source.looped() } else { source };
                Ok(Box::new(source))
            }
            #[cfg(not(feature = "image-files"))]
            {
                let _ = (dir, looped);
                bail!("this build has no image file support (feature `image-files` disabled)");
            }
        }
        SourceKind::Synthetic => Ok(Box::new(SyntheticFrameSource::new(
            config.camera.width,
            config.camera.height,
        ))),
    }
}

/// Runs one pipeline session and prints the committed text to stdout.
pub fn run_session(config: Config, options: RunOptions) -> anyhow::Result<()> {
    let pipeline_config = config.pipeline_config().context("invalid configuration")?;

    let classifier_name = options
        .classifier_override
        .as_deref()
        .unwrap_or(&config.inference.classifier);
    let classifier = build_classifier(classifier_name).with_context(|| {
        format!(
            "building classifier '{classifier_name}' (known: {})",
            KNOWN_CLASSIFIERS.join(", ")
        )
    })?;
    if !classifier.is_ready() {
        bail!("classifier '{classifier_name}' is not ready");
    }

    let source = build_source(&options.source, &config)?;

    let controller = PipelineController::new(pipeline_config);
    let mut handle = controller
        .start(source, classifier, Box::new(CollectorSink::new()))
        .context("starting pipeline")?;

    let events = handle.take_events();
    let deadline = options.duration.map(|d| Instant::now() + d);

    while handle.is_running() {
        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            break;
        }

        match events {
            Some(ref rx) => match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => render_event(&event, options.quiet, options.verbose),
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            },
            None => std::thread::sleep(Duration::from_millis(100)),
        }
    }

    match handle.stop() {
        Some(text) => println!("{text}"),
        None => {
            if !options.quiet {
                eprintln!("signtype: no text committed");
            }
        }
    }
    Ok(())
}

/// Runs the built-in demo: synthetic frames through the scripted classifier.
pub fn run_demo(duration: Option<Duration>, quiet: bool, verbose: u8) -> anyhow::Result<()> {
    run_session(
        Config::default(),
        RunOptions {
            source: SourceKind::Synthetic,
            classifier_override: Some("demo".to_string()),
            duration: Some(duration.unwrap_or(Duration::from_secs(10))),
            quiet,
            verbose,
        },
    )
}
