use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use signtype::app::{RunOptions, SourceKind, run_demo, run_session};
use signtype::cli::{Cli, Commands};
use signtype::config::Config;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            let source = if let Some(dir) = cli.frames {
                SourceKind::Frames {
                    dir,
                    looped: cli.loop_frames,
                }
            } else if cli.synthetic {
                SourceKind::Synthetic
            } else {
                anyhow::bail!(
                    "no frame source selected: pass --frames <DIR> or --synthetic, \
                     or try `signtype demo`"
                );
            };

            run_session(
                config,
                RunOptions {
                    source,
                    classifier_override: cli.classifier,
                    duration: cli.duration,
                    quiet: cli.quiet,
                    verbose: cli.verbose,
                },
            )
        }
        Some(Commands::Demo { duration }) => run_demo(duration, cli.quiet, cli.verbose),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "signtype", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load configuration: an explicit path must exist; the default path may be
/// missing. Environment overrides apply on top either way.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}
