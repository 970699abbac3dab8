pub mod navigator;
pub mod route;

pub use navigator::Navigator;
pub use route::Route;

/// Where an expired idle guard sends the kiosk.
///
/// Implementations replace the current screen with home so the expired
/// screen is not reachable through "back".
pub trait NavigationSink: Send + Sync + 'static {
    fn go_home(&self);
}
