//! Cooperative shutdown for the long-running loops.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

/// Why a loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The time budget ran out.
    BudgetExhausted,
    /// Shutdown was requested from outside.
    ShutdownRequested,
}

/// Receiving side of the shutdown channel.
///
/// Checked at the top of every cycle and raced against every wait, so a
/// request takes effect without waiting out the current sleep.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Creates a signal and the sender that triggers it (`send(true)`).
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// A signal that never fires; loops stop on their budget only.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn from_receiver(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    pub fn is_requested(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleeps for `duration` unless shutdown is requested first.
    ///
    /// Returns `true` when the sleep was cut short by a shutdown request.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_requested() {
            return true;
        }

        let sleep = time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = self.rx.changed() => match changed {
                    Ok(()) => {
                        if *self.rx.borrow() {
                            return true;
                        }
                    }
                    // Sender gone: nobody can request shutdown any more.
                    Err(_) => {
                        (&mut sleep).await;
                        return false;
                    }
                },
            }
        }
    }
}
