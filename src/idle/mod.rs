pub mod guard;
pub mod interaction;

pub use guard::{IdleGuard, DEFAULT_IDLE_TIMEOUT};
pub use interaction::{Interaction, UnknownInteraction};
