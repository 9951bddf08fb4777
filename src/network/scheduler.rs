//! Delayed operations.

use std::time::Duration;

use eppo_proto::Operation;
use tokio::sync::mpsc;
use tracing::debug;

/// Queues operations onto the output after a delay.
///
/// Each scheduled operation gets its own timer task. Once scheduled it fires;
/// there is no cancellation.
#[derive(Clone)]
pub struct Scheduler {
    out: mpsc::Sender<Operation>,
}

impl Scheduler {
    pub fn new(out: mpsc::Sender<Operation>) -> Self {
        Self { out }
    }

    pub fn schedule(&self, delay: Duration, op: Operation) {
        let out = self.out.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let kind = op.kind().to_string();
            if out.send(op).await.is_err() {
                debug!(kind = %kind, "Output closed before delayed operation fired");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let scheduler = Scheduler::new(tx);

        scheduler.schedule(Duration::from_secs(20), Operation::raw("MODE", "#eppo +o bob"));
        scheduler.schedule(Duration::from_secs(10), Operation::raw("MODE", "#eppo -o alice"));
        assert!(rx.try_recv().is_err());

        let first = rx.recv().await.unwrap();
        assert_eq!(first, Operation::raw("MODE", "#eppo -o alice"));
        let second = rx.recv().await.unwrap();
        assert_eq!(second, Operation::raw("MODE", "#eppo +o bob"));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_output_is_not_an_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        Scheduler::new(tx).schedule(Duration::from_secs(1), Operation::raw("QUIT", ""));
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}
