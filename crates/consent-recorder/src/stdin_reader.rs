use crate::AppCommand;

use std::io::BufRead;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// Forward operator commands from stdin on a blocking task.
///
/// Blank lines are skipped and unknown input is logged. End of input sends
/// [`AppCommand::Quit`]. The task exits once the receiver is dropped.
pub(crate) fn spawn_stdin_reader(command_tx: mpsc::Sender<AppCommand>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = ?e, "Failed to read stdin");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<AppCommand>() {
                Ok(cmd) => {
                    if command_tx.blocking_send(cmd).is_err() {
                        return;
                    }
                }
                Err(e) => warn!(error = %e, "Ignoring input"),
            }
        }

        debug!("Stdin closed");
        let _ = command_tx.blocking_send(AppCommand::Quit);
    })
}
