use std::sync::Arc;

use serde::Serialize;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::models::VideoItem;

pub const DEFAULT_CAROUSEL_INTERVAL: Duration = Duration::from_secs(5);

/// Index and playback state of the promo carousel.
#[derive(Debug, Clone)]
pub struct Carousel {
    videos: Arc<Vec<VideoItem>>,
    index: usize,
    playing: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSnapshot {
    pub index: usize,
    pub len: usize,
    pub current: Option<VideoItem>,
    pub playing: Option<u32>,
}

impl Carousel {
    pub fn new(videos: Arc<Vec<VideoItem>>) -> Self {
        Self {
            videos,
            index: 0,
            playing: None,
        }
    }

    pub fn current(&self) -> Option<&VideoItem> {
        self.videos.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn playing(&self) -> Option<u32> {
        self.playing
    }

    /// Step forward, wrapping to the first clip. Stops playback.
    pub fn next(&mut self) {
        if self.videos.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.videos.len();
        self.playing = None;
    }

    /// Step back, wrapping to the last clip. Stops playback.
    pub fn prev(&mut self) {
        if self.videos.is_empty() {
            return;
        }
        let len = self.videos.len();
        self.index = (self.index + len - 1) % len;
        self.playing = None;
    }

    /// Start playing `video_id`, moving the carousel onto it. Returns false
    /// for an id not in the catalogue.
    pub fn play(&mut self, video_id: u32) -> bool {
        match self.videos.iter().position(|v| v.id == video_id) {
            Some(position) => {
                self.index = position;
                self.playing = Some(video_id);
                true
            }
            None => false,
        }
    }

    /// Clear playback. Returns whether a video was playing.
    pub fn stop(&mut self) -> bool {
        self.playing.take().is_some()
    }

    /// Auto-advance only while nothing is playing.
    pub fn auto_advance(&mut self) -> bool {
        if self.playing.is_some() {
            return false;
        }
        self.next();
        !self.videos.is_empty()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            index: self.index,
            len: self.videos.len(),
            current: self.current().cloned(),
            playing: self.playing,
        }
    }
}

/// The video gallery screen: a carousel plus its auto-advance ticker.
///
/// Ending playback by hand restarts the auto-advance countdown.
pub struct GalleryScreen {
    carousel: Arc<Mutex<Carousel>>,
    restart_tx: mpsc::UnboundedSender<()>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl GalleryScreen {
    pub fn mount(videos: Arc<Vec<VideoItem>>, advance_every: Duration) -> Self {
        let carousel = Arc::new(Mutex::new(Carousel::new(videos)));
        let (restart_tx, restart_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(advance_loop(
            Arc::clone(&carousel),
            restart_rx,
            cancel_token.clone(),
            advance_every,
        ));

        Self {
            carousel,
            restart_tx,
            cancel_token,
            handle: Some(handle),
        }
    }

    pub async fn next(&self) -> CarouselSnapshot {
        let mut guard = self.carousel.lock().await;
        let was_playing = guard.playing().is_some();
        guard.next();
        self.playback_ended(was_playing);
        guard.snapshot()
    }

    pub async fn prev(&self) -> CarouselSnapshot {
        let mut guard = self.carousel.lock().await;
        let was_playing = guard.playing().is_some();
        guard.prev();
        self.playback_ended(was_playing);
        guard.snapshot()
    }

    pub async fn play(&self, video_id: u32) -> Option<CarouselSnapshot> {
        let mut guard = self.carousel.lock().await;
        guard.play(video_id).then(|| guard.snapshot())
    }

    pub async fn stop(&self) -> CarouselSnapshot {
        let mut guard = self.carousel.lock().await;
        let was_playing = guard.stop();
        self.playback_ended(was_playing);
        guard.snapshot()
    }

    fn playback_ended(&self, was_playing: bool) {
        if was_playing {
            let _ = self.restart_tx.send(());
        }
    }

    pub async fn snapshot(&self) -> CarouselSnapshot {
        self.carousel.lock().await.snapshot()
    }
}

impl Drop for GalleryScreen {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn advance_loop(
    carousel: Arc<Mutex<Carousel>>,
    mut restart_rx: mpsc::UnboundedReceiver<()>,
    cancel_token: CancellationToken,
    advance_every: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + advance_every, advance_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            restart = restart_rx.recv() => match restart {
                Some(()) => ticker.reset(),
                None => break,
            },
            _ = ticker.tick() => {
                carousel.lock().await.auto_advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn videos(n: u32) -> Arc<Vec<VideoItem>> {
        Arc::new(
            (1..=n)
                .map(|id| VideoItem {
                    id,
                    title: format!("Clip {id}"),
                    tiktok_url: format!("https://www.tiktok.com/@sheffielduni/video/{id}000"),
                    embed_url: None,
                    thumbnail: None,
                    video_url: format!("/videos/{id}.mp4"),
                })
                .collect(),
        )
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut carousel = Carousel::new(videos(3));
        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);
        carousel.next();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn stepping_stops_playback() {
        let mut carousel = Carousel::new(videos(3));
        assert!(carousel.play(2));
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.playing(), Some(2));

        carousel.next();
        assert_eq!(carousel.playing(), None);
    }

    #[test]
    fn playing_unknown_video_is_refused() {
        let mut carousel = Carousel::new(videos(3));
        assert!(!carousel.play(42));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn empty_catalogue_is_inert() {
        let mut carousel = Carousel::new(videos(0));
        carousel.next();
        carousel.prev();
        assert!(!carousel.auto_advance());
        assert!(carousel.current().is_none());
        assert_eq!(carousel.snapshot().len, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advances_while_idle() {
        let screen = GalleryScreen::mount(videos(4), DEFAULT_CAROUSEL_INTERVAL);

        time::sleep(DEFAULT_CAROUSEL_INTERVAL * 2 + Duration::from_millis(100)).await;
        assert_eq!(screen.snapshot().await.index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn holds_position_while_a_video_plays() {
        let screen = GalleryScreen::mount(videos(4), DEFAULT_CAROUSEL_INTERVAL);
        screen.play(3).await.unwrap();

        time::sleep(DEFAULT_CAROUSEL_INTERVAL * 3).await;
        let snapshot = screen.snapshot().await;
        assert_eq!(snapshot.index, 2);
        assert_eq!(snapshot.playing, Some(3));

        screen.stop().await;
        time::sleep(DEFAULT_CAROUSEL_INTERVAL + Duration::from_millis(100)).await;
        assert_eq!(screen.snapshot().await.index, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_playback_restarts_the_countdown() {
        let screen = GalleryScreen::mount(videos(4), DEFAULT_CAROUSEL_INTERVAL);
        screen.play(2).await.unwrap();

        time::sleep(Duration::from_secs(4)).await;
        screen.stop().await;

        // The old grid would have advanced at 5s.
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(screen.snapshot().await.index, 1);

        time::sleep(Duration::from_secs(3) + Duration::from_millis(100)).await;
        assert_eq!(screen.snapshot().await.index, 2);
    }

    #[test]
    fn stop_reports_whether_anything_was_playing() {
        let mut carousel = Carousel::new(videos(2));
        assert!(!carousel.stop());
        carousel.play(1);
        assert!(carousel.stop());
        assert_eq!(carousel.playing(), None);
    }
}
