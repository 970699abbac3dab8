use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::{mpsc, watch};

use crate::{
    clock::{Clock, ManualClock, SystemClock},
    idle::{IdleGuard, Interaction},
    models::{Talk, VideoItem},
    navigation::{NavigationSink, Navigator, Route},
    schedule::{Board, EventCalendar},
    screens::{GalleryScreen, ScreenSignal, TalksScreen},
    settings::KioskSettings,
};

use super::{
    commands::KioskCommand,
    render::{render_board, render_gallery, render_home},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// A request raised from inside a mounted screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    IdleExpired { mount_id: u64 },
}

/// Sink handed to each idle guard; stamps requests with the mount they
/// belong to so the shell can drop any that outlive their screen.
struct MountSink {
    mount_id: u64,
    nav_tx: mpsc::UnboundedSender<NavRequest>,
}

impl NavigationSink for MountSink {
    fn go_home(&self) {
        let _ = self.nav_tx.send(NavRequest::IdleExpired {
            mount_id: self.mount_id,
        });
    }
}

enum Screen {
    Home,
    Talks(TalksScreen),
    Gallery(GalleryScreen),
}

struct Mounted {
    id: u64,
    route: Route,
    screen: Screen,
    guard: Option<IdleGuard>,
}

impl Mounted {
    fn placeholder() -> Self {
        Self {
            id: 0,
            route: Route::Home,
            screen: Screen::Home,
            guard: None,
        }
    }

    /// The guard is joined before the screen (and its ticker) is dropped.
    async fn unmount(self) {
        let Mounted {
            id, screen, guard, ..
        } = self;

        if let Some(guard) = guard {
            if let Err(err) = guard.disarm().await {
                log_warn!("screen #{id}: {err:#}");
            }
        }
        drop(screen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum NavMode {
    Push,
    Replace,
    Back,
    Home,
}

pub struct Kiosk {
    settings: KioskSettings,
    calendar: EventCalendar,
    talks: Arc<Vec<Talk>>,
    videos: Arc<Vec<VideoItem>>,
    clock: Arc<dyn Clock>,
    navigator: Navigator,
    mounted: Mounted,
    next_mount_id: u64,
    nav_tx: mpsc::UnboundedSender<NavRequest>,
}

impl Kiosk {
    /// Starts on the home screen. The receiver carries idle-expiry requests
    /// and must be fed back through [`Kiosk::handle_request`].
    pub fn new(
        settings: KioskSettings,
        calendar: EventCalendar,
        talks: Vec<Talk>,
        videos: Vec<VideoItem>,
        clock: Arc<dyn Clock>,
    ) -> (Self, mpsc::UnboundedReceiver<NavRequest>) {
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();

        let kiosk = Self {
            settings,
            calendar,
            talks: Arc::new(talks),
            videos: Arc::new(videos),
            clock,
            navigator: Navigator::new(),
            mounted: Mounted::placeholder(),
            next_mount_id: 1,
            nav_tx,
        };

        (kiosk, nav_rx)
    }

    pub fn route(&self) -> Route {
        self.mounted.route
    }

    pub fn mount_id(&self) -> u64 {
        self.mounted.id
    }

    pub fn history_depth(&self) -> usize {
        self.navigator.depth()
    }

    /// Live board feed while the talks screen is mounted.
    pub fn board_updates(&self) -> Option<watch::Receiver<Board>> {
        match &self.mounted.screen {
            Screen::Talks(screen) => Some(screen.subscribe()),
            _ => None,
        }
    }

    pub fn board(&self) -> Option<Board> {
        match &self.mounted.screen {
            Screen::Talks(screen) => Some(screen.board()),
            _ => None,
        }
    }

    pub async fn handle(&mut self, command: KioskCommand) -> Result<Flow> {
        if let Some(kind) = command.as_interaction() {
            self.touch(kind);
        }

        match command {
            KioskCommand::Go(route) => self.navigate(route, NavMode::Push).await,
            KioskCommand::Back => self.navigate(Route::Home, NavMode::Back).await,
            KioskCommand::Home => self.navigate(Route::Home, NavMode::Home).await,
            KioskCommand::Interact(_) => {}
            KioskCommand::Signal(signal) => self.signal(signal),
            KioskCommand::Next => {
                if let Screen::Gallery(gallery) = &self.mounted.screen {
                    gallery.next().await;
                }
            }
            KioskCommand::Prev => {
                if let Screen::Gallery(gallery) = &self.mounted.screen {
                    gallery.prev().await;
                }
            }
            KioskCommand::Play(video_id) => {
                if let Screen::Gallery(gallery) = &self.mounted.screen {
                    if gallery.play(video_id).await.is_none() {
                        log_warn!("no video with id {video_id}");
                    }
                }
            }
            KioskCommand::Stop => {
                if let Screen::Gallery(gallery) = &self.mounted.screen {
                    gallery.stop().await;
                }
            }
            KioskCommand::At(time) => self.rehearse_at(&time).await?,
            KioskCommand::Live => {
                self.set_clock(Arc::new(SystemClock)).await;
            }
            KioskCommand::Show => {}
            KioskCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Apply a request from a guard. Requests from a screen that is no longer
    /// mounted are ignored.
    pub async fn handle_request(&mut self, request: NavRequest) {
        match request {
            NavRequest::IdleExpired { mount_id } if mount_id == self.mounted.id => {
                log_info!("{} idle, returning home", self.mounted.route);
                self.navigate(Route::Home, NavMode::Home).await;
            }
            NavRequest::IdleExpired { mount_id } => {
                log_debug!("ignoring idle expiry from unmounted screen {mount_id}");
            }
        }
    }

    fn touch(&self, kind: Interaction) {
        if let Some(guard) = &self.mounted.guard {
            guard.touch(kind);
        }
    }

    fn signal(&self, signal: ScreenSignal) {
        if let Screen::Talks(screen) = &self.mounted.screen {
            screen.notify(signal);
        }
    }

    async fn rehearse_at(&mut self, time: &str) -> Result<()> {
        let instant = match self.calendar.resolve(time) {
            Ok(instant) => instant,
            Err(err) => bail!("cannot rehearse at {time}: {err}"),
        };
        log_info!("clock pinned to {time} on {}", self.calendar.date);
        self.set_clock(Arc::new(ManualClock::new(instant))).await;
        Ok(())
    }

    async fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
        if self.mounted.route == Route::UniversityTalks {
            // Remount so the ticker reads the new clock.
            self.navigate(Route::UniversityTalks, NavMode::Replace).await;
        }
    }

    async fn navigate(&mut self, route: Route, mode: NavMode) {
        let target = match mode {
            NavMode::Push => self.navigator.push(route),
            NavMode::Replace => self.navigator.replace(route),
            NavMode::Back => self.navigator.back_or_home(),
            NavMode::Home => self.navigator.go_home(),
        };

        // Old screen, guard and ticker go first.
        std::mem::replace(&mut self.mounted, Mounted::placeholder())
            .unmount()
            .await;
        self.mounted = self.mount(target);
        log_debug!("mounted {} as #{}", target, self.mounted.id);
    }

    fn mount(&mut self, route: Route) -> Mounted {
        let id = self.next_mount_id;
        self.next_mount_id += 1;

        let screen = match route {
            Route::Home => Screen::Home,
            Route::UniversityTalks => Screen::Talks(TalksScreen::mount(
                Arc::clone(&self.talks),
                self.calendar,
                Arc::clone(&self.clock),
                self.settings.refresh_interval(),
            )),
            Route::VideoGallery => Screen::Gallery(GalleryScreen::mount(
                Arc::clone(&self.videos),
                self.settings.carousel_interval(),
            )),
        };

        let guard = route.is_guarded().then(|| {
            IdleGuard::arm(
                self.settings.idle_timeout(),
                Arc::new(MountSink {
                    mount_id: id,
                    nav_tx: self.nav_tx.clone(),
                }),
            )
        });

        Mounted {
            id,
            route,
            screen,
            guard,
        }
    }

    pub async fn render(&self) -> String {
        match &self.mounted.screen {
            Screen::Home => render_home(),
            Screen::Talks(screen) => render_board(&screen.board(), self.calendar.timezone),
            Screen::Gallery(gallery) => render_gallery(&gallery.snapshot().await),
        }
    }
}
