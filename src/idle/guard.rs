use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use tokio::{sync::mpsc, task::JoinHandle, time::{self, Duration}};
use tokio_util::sync::CancellationToken;

use crate::navigation::NavigationSink;

use super::Interaction;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Reference deployment: three quiet minutes sends the kiosk home.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Watchdog owned by one mounted screen.
///
/// Arming spawns the countdown; every [`IdleGuard::touch`] restarts it. When a
/// full timeout passes with no interaction the sink's `go_home` runs once and
/// the guard is spent. Dropping the guard cancels the countdown, and a
/// cancelled guard never reaches the sink.
pub struct IdleGuard {
    activity_tx: mpsc::UnboundedSender<Interaction>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl IdleGuard {
    /// Must be called from within a tokio runtime.
    pub fn arm(timeout: Duration, sink: Arc<dyn NavigationSink>) -> Self {
        let (activity_tx, activity_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(idle_watch(
            timeout,
            activity_rx,
            cancel_token.clone(),
            sink,
            Arc::clone(&fired),
        ));

        Self {
            activity_tx,
            cancel_token,
            handle: Some(handle),
            fired,
        }
    }

    /// Record an interaction and restart the countdown.
    pub fn touch(&self, kind: Interaction) {
        // Closed channel means the guard already fired; nothing to reset.
        let _ = self.activity_tx.send(kind);
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Cancel and wait for the countdown task to finish.
    pub async fn disarm(mut self) -> Result<()> {
        self.cancel_token.cancel();

        if let Some(handle) = self.handle.take() {
            handle.await.context("idle guard task failed to join")
        } else {
            Ok(())
        }
    }
}

impl Drop for IdleGuard {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn idle_watch(
    timeout: Duration,
    mut activity_rx: mpsc::UnboundedReceiver<Interaction>,
    cancel_token: CancellationToken,
    sink: Arc<dyn NavigationSink>,
    fired: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_debug!("idle guard cancelled");
                return;
            }
            signal = activity_rx.recv() => match signal {
                Some(kind) => {
                    log_debug!("idle countdown reset by {kind}");
                }
                None => return,
            },
            _ = time::sleep(timeout) => {
                if cancel_token.is_cancelled() {
                    return;
                }
                log_info!("no interaction for {}s, returning home", timeout.as_secs());
                fired.store(true, Ordering::SeqCst);
                sink.go_home();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingSink {
        calls: AtomicUsize,
    }

    impl NavigationSink for CountingSink {
        fn go_home(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn armed() -> (IdleGuard, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        let guard = IdleGuard::arm(DEFAULT_IDLE_TIMEOUT, sink.clone());
        (guard, sink)
    }

    fn calls(sink: &CountingSink) -> usize {
        sink.calls.load(Ordering::SeqCst)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_a_quiet_timeout() {
        let (guard, sink) = armed();

        time::sleep(DEFAULT_IDLE_TIMEOUT - Duration::from_secs(1)).await;
        assert_eq!(calls(&sink), 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls(&sink), 1);
        assert!(guard.has_fired());

        time::sleep(DEFAULT_IDLE_TIMEOUT * 3).await;
        assert_eq!(calls(&sink), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn steady_interaction_never_fires() {
        let (guard, sink) = armed();

        for kind in Interaction::ALL.iter().cycle().take(20) {
            time::sleep(Duration::from_secs(170)).await;
            guard.touch(*kind);
        }

        assert_eq!(calls(&sink), 0);
        assert!(!guard.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn touch_restarts_the_full_countdown() {
        let (guard, sink) = armed();

        time::sleep(Duration::from_secs(179)).await;
        guard.touch(Interaction::TouchStart);

        time::sleep(Duration::from_secs(179)).await;
        assert_eq!(calls(&sink), 0);

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls(&sink), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_prevents_firing() {
        let (guard, sink) = armed();

        time::sleep(Duration::from_secs(100)).await;
        drop(guard);

        time::sleep(DEFAULT_IDLE_TIMEOUT * 2).await;
        assert_eq!(calls(&sink), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_joins_and_prevents_firing() {
        let (guard, sink) = armed();

        guard.disarm().await.unwrap();

        time::sleep(DEFAULT_IDLE_TIMEOUT * 2).await;
        assert_eq!(calls(&sink), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_guards_keep_separate_clocks() {
        let (first, first_sink) = armed();
        time::sleep(Duration::from_secs(120)).await;
        let (_second, second_sink) = armed();

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(calls(&first_sink), 1);
        assert_eq!(calls(&second_sink), 0);
        drop(first);

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls(&second_sink), 1);
    }
}
