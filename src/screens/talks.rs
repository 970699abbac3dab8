use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    models::Talk,
    schedule::{board_at, resolve_talks, Board, EventCalendar, ResolvedTalk},
};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Out-of-cycle notifications from the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSignal {
    Visible,
    Hidden,
    FocusGained,
}

impl ScreenSignal {
    fn forces_refresh(self) -> bool {
        matches!(self, ScreenSignal::Visible | ScreenSignal::FocusGained)
    }
}

// Talks are bound to the calendar once per mount; ticks only re-rate them.
struct BoardSource {
    talks: Vec<ResolvedTalk>,
    clock: Arc<dyn Clock>,
}

impl BoardSource {
    fn compute(&self) -> Board {
        board_at(&self.talks, self.clock.now())
    }
}

/// The talks view's live board.
///
/// Mounting computes a board straight away and then keeps it fresh: on every
/// refresh tick, and whenever the surface becomes visible or regains focus.
/// Dropping the screen stops the ticker and closes the signal channel.
pub struct TalksScreen {
    source: Arc<BoardSource>,
    board_tx: Arc<watch::Sender<Board>>,
    signal_tx: mpsc::UnboundedSender<ScreenSignal>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TalksScreen {
    pub fn mount(
        talks: Arc<Vec<Talk>>,
        calendar: EventCalendar,
        clock: Arc<dyn Clock>,
        refresh_interval: Duration,
    ) -> Self {
        let source = Arc::new(BoardSource {
            talks: resolve_talks(&talks, &calendar),
            clock,
        });
        let (board_tx, _) = watch::channel(source.compute());
        let board_tx = Arc::new(board_tx);
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(refresh_loop(
            Arc::clone(&source),
            Arc::clone(&board_tx),
            signal_rx,
            cancel_token.clone(),
            refresh_interval,
        ));

        Self {
            source,
            board_tx,
            signal_tx,
            cancel_token,
            handle: Some(handle),
        }
    }

    /// Latest published board.
    pub fn board(&self) -> Board {
        self.board_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.board_tx.subscribe()
    }

    pub fn notify(&self, signal: ScreenSignal) {
        let _ = self.signal_tx.send(signal);
    }

    /// Recompute and publish immediately, returning the new board.
    pub fn refresh_now(&self) -> Board {
        let board = self.source.compute();
        self.board_tx.send_replace(board.clone());
        board
    }
}

impl Drop for TalksScreen {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn refresh_loop(
    source: Arc<BoardSource>,
    board_tx: Arc<watch::Sender<Board>>,
    mut signal_rx: mpsc::UnboundedReceiver<ScreenSignal>,
    cancel_token: CancellationToken,
    refresh_interval: Duration,
) {
    // The mount already published a board, so the first tick is one period out.
    let mut ticker = time::interval_at(Instant::now() + refresh_interval, refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            signal = signal_rx.recv() => match signal {
                Some(signal) if signal.forces_refresh() => {
                    log_debug!("talks board refresh on {signal:?}");
                    board_tx.send_replace(source.compute());
                }
                Some(_) => {}
                None => break,
            },
            _ = ticker.tick() => {
                board_tx.send_replace(source.compute());
            }
        }
    }
}
