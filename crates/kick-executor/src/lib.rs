//! Real-time driver for a [`Match`]: ticks it on a tokio timer at the pace it asks
//! for, applies control messages, and broadcasts its notifications.

use anyhow::Result;
use kick_core::MatchEvent;
use kick_simulator::{Match, MatchObserver};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{broadcast, mpsc},
    time::Instant,
};

mod handle;

pub use handle::{ControlMsg, ExecutorHandle};

const UPDATE_CHANNEL_CAPACITY: usize = 4096;

/// Final state of a match when the executor returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub yellow: u32,
    pub blue: u32,
    /// Simulated duration in seconds
    pub duration: f64,
    /// Whether the game-over condition was reached
    pub finished: bool,
}

impl MatchSummary {
    fn of(game: &Match) -> Self {
        let board = game.scoreboard();
        Self {
            yellow: board.yellow(),
            blue: board.blue(),
            duration: game.duration(),
            finished: game.is_finished(),
        }
    }
}

/// Forwards match notifications to a broadcast channel.
struct BroadcastObserver {
    update_tx: broadcast::Sender<MatchEvent>,
}

impl MatchObserver for BroadcastObserver {
    fn on_event(&mut self, event: &MatchEvent) {
        // Sending fails only when nobody is listening
        let _ = self.update_tx.send(event.clone());
    }
}

pub struct Executor {
    game: Match,
    command_tx: mpsc::UnboundedSender<ControlMsg>,
    command_rx: mpsc::UnboundedReceiver<ControlMsg>,
    update_tx: broadcast::Sender<MatchEvent>,
    next_tick: Option<Instant>,
}

impl Executor {
    pub fn new(mut game: Match) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        game.add_observer(Box::new(BroadcastObserver {
            update_tx: update_tx.clone(),
        }));

        Self {
            game,
            command_tx,
            command_rx,
            update_tx,
            next_tick: None,
        }
    }

    pub fn handle(&self) -> ExecutorHandle {
        ExecutorHandle {
            control_tx: self.command_tx.clone(),
            update_rx: self.update_tx.subscribe(),
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    /// Run until a [`ControlMsg::Shutdown`] arrives or every [`ExecutorHandle`] is
    /// dropped. The match only ticks after a [`ControlMsg::Start`] or
    /// [`ControlMsg::Restart`].
    pub async fn run(mut self) -> Result<MatchSummary> {
        log::info!("Executor running");
        self.run_loop(false).await;
        log::info!("Executor shut down");
        Ok(MatchSummary::of(&self.game))
    }

    /// Start the match and run until it is decided or a shutdown is requested.
    /// Dropping every handle does not end the match.
    pub async fn run_until_game_over(mut self) -> Result<MatchSummary> {
        self.handle_control_msg(ControlMsg::Start);
        self.run_loop(true).await;
        Ok(MatchSummary::of(&self.game))
    }

    async fn run_loop(&mut self, stop_on_game_over: bool) {
        // Swap out our own sender so only the handles keep the channel open
        self.command_tx = mpsc::unbounded_channel().0;
        let mut commands_open = true;

        loop {
            if stop_on_game_over && self.game.is_finished() {
                break;
            }
            if !commands_open && self.next_tick.is_none() {
                log::warn!("Match stopped with no handles left to start it");
                break;
            }

            let next_tick = self.next_tick;
            let tick = async move {
                match next_tick {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                // Control messages win over a due tick, so a stop always cancels it
                biased;
                msg = self.command_rx.recv(), if commands_open => {
                    match msg {
                        Some(ControlMsg::Shutdown) => break,
                        Some(msg) => self.handle_control_msg(msg),
                        None if stop_on_game_over => {
                            log::debug!("All handles dropped, playing on until game over");
                            commands_open = false;
                        }
                        None => {
                            log::info!("All handles dropped");
                            break;
                        }
                    }
                }
                _ = tick => {
                    let now = Instant::now();
                    self.next_tick = self.game.tick(now.into_std()).map(|delay| now + delay);
                }
            }
        }
    }

    fn handle_control_msg(&mut self, msg: ControlMsg) {
        log::debug!("Control message: {:?}", msg);
        match msg {
            ControlMsg::Start => {
                self.game.start();
                if self.game.is_running() && self.next_tick.is_none() {
                    self.next_tick = Some(Instant::now());
                }
            }
            ControlMsg::Stop => {
                self.game.stop();
                self.next_tick = None;
            }
            ControlMsg::SetPause(true) => self.game.pause(),
            ControlMsg::SetPause(false) => self.game.resume(),
            ControlMsg::Restart => {
                self.game.restart();
                self.next_tick = Some(Instant::now());
            }
            ControlMsg::Shutdown => {}
        }
    }
}
