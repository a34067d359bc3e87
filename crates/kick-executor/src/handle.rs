use kick_core::MatchEvent;
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    Start,
    /// Stop the clock and cancel the pending tick
    Stop,
    SetPause(bool),
    Restart,
    /// Leave the run loop
    Shutdown,
}

#[derive(Debug)]
pub struct ExecutorHandle {
    pub control_tx: mpsc::UnboundedSender<ControlMsg>,
    pub update_rx: broadcast::Receiver<MatchEvent>,
}

impl ExecutorHandle {
    /// Wait for the next match notification. Returns `None` once the executor is
    /// gone.
    ///
    /// Notifications missed because this receiver fell behind are skipped.
    pub async fn recv(&mut self) -> Option<MatchEvent> {
        loop {
            match self.update_rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Match notification receiver lagged, {} skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    // messages are handled in Executor::run
    pub fn send(&self, msg: ControlMsg) {
        self.control_tx
            .send(msg)
            .map_err(|err| {
                log::error!("Error sending control message: {:?}", err);
            })
            .ok();
    }
}

impl Clone for ExecutorHandle {
    fn clone(&self) -> Self {
        Self {
            control_tx: self.control_tx.clone(),
            update_rx: self.update_rx.resubscribe(),
        }
    }
}
