//! `pfsight watch`: poll an interface and stream throughput samples.

use owo_colors::OwoColorize;
use tracing::debug;

use pfsight_config::Settings;
use pfsight_core::{PollSession, TickOutcome};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &WatchArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = settings.session();
    if let Some(ref interface) = args.interface {
        config.interface.clone_from(interface);
    }
    if let Some(ms) = args.interval_ms {
        if ms == 0 {
            return Err(CliError::Validation {
                field: "interval-ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        config.poll_interval = std::time::Duration::from_millis(ms);
    }
    if args.count == Some(0) {
        return Err(CliError::Validation {
            field: "count".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let client = super::build_client(settings, global)?;
    let color = output::should_color(global.color);

    if !global.quiet {
        eprintln!(
            "Watching {} every {:?} (Ctrl-C to stop)",
            config.interface, config.poll_interval
        );
    }

    let session = PollSession::start(client, config);
    let mut rx = session.subscribe();
    let mut seen_polls = 0_u64;
    let mut printed = 0_usize;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if snapshot.completed_polls == seen_polls {
                    continue;
                }
                seen_polls = snapshot.completed_polls;

                match snapshot.last_outcome {
                    Some(TickOutcome::Rate(ref sample)) => {
                        output::print_output(
                            &output::render_rate(global.output, sample, color),
                            global.quiet,
                        );
                        printed += 1;
                        if args.count.is_some_and(|n| printed >= n) {
                            break;
                        }
                    }
                    Some(TickOutcome::Failed(ref message)) => {
                        let line = format!("poll failed: {message}");
                        if color {
                            eprintln!("{}", line.red());
                        } else {
                            eprintln!("{line}");
                        }
                    }
                    Some(TickOutcome::Baseline) if !global.quiet => {
                        eprintln!("baseline sample captured");
                    }
                    _ => {}
                }
            }
        }
    }

    session.stop().await;
    Ok(())
}
