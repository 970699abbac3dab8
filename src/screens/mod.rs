pub mod gallery;
pub mod talks;

pub use gallery::{Carousel, CarouselSnapshot, GalleryScreen, DEFAULT_CAROUSEL_INTERVAL};
pub use talks::{ScreenSignal, TalksScreen, DEFAULT_REFRESH_INTERVAL};
