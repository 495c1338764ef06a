//! Run a shell command over and over until the count is reached or Ctrl-C.

use crate::core::error::PxError;
use crate::core::executor::bashx;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_COUNT: u64 = 360_000;

#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub command: String,
    pub interval: Duration,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub runs: u64,
    pub interrupted: bool,
    pub last_exit_code: Option<i32>,
}

pub async fn run_loop(options: &LoopOptions) -> Result<LoopSummary, PxError> {
    let mut summary = LoopSummary {
        runs: 0,
        interrupted: false,
        last_exit_code: None,
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while summary.runs < options.count {
        let cmd = options.command.clone();
        let run = tokio::task::spawn_blocking(move || bashx(&cmd));

        tokio::select! {
            joined = run => {
                let code = joined.map_err(|e| PxError::Execution(e.to_string()))??;
                summary.runs += 1;
                summary.last_exit_code = Some(code);
                debug!(run = summary.runs, exit_code = code, "loop iteration finished");
            }
            _ = &mut ctrl_c => {
                summary.interrupted = true;
                break;
            }
        }

        if summary.runs >= options.count {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(options.interval) => {}
            _ = &mut ctrl_c => {
                summary.interrupted = true;
                break;
            }
        }
    }

    info!(runs = summary.runs, interrupted = summary.interrupted, "loop stopped");
    Ok(summary)
}

/// Seconds as given on the command line; negative or non-finite values are rejected.
pub fn interval_from_secs(secs: f64) -> Result<Duration, PxError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| PxError::Input(format!("invalid interval: {}", secs)))
}
