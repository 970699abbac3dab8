use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Raw input kinds that count as "someone is still using the kiosk".
/// Every kind is an equally valid signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interaction {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
    KeyDown,
}

impl Interaction {
    pub const ALL: [Interaction; 7] = [
        Interaction::PointerDown,
        Interaction::PointerMove,
        Interaction::KeyPress,
        Interaction::Scroll,
        Interaction::TouchStart,
        Interaction::Click,
        Interaction::KeyDown,
    ];

    /// DOM event name the kiosk front end listens for.
    pub fn event_name(&self) -> &'static str {
        match self {
            Interaction::PointerDown => "mousedown",
            Interaction::PointerMove => "mousemove",
            Interaction::KeyPress => "keypress",
            Interaction::Scroll => "scroll",
            Interaction::TouchStart => "touchstart",
            Interaction::Click => "click",
            Interaction::KeyDown => "keydown",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an interaction event")]
pub struct UnknownInteraction(pub String);

impl FromStr for Interaction {
    type Err = UnknownInteraction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "mousedown" | "pointerdown" => Ok(Interaction::PointerDown),
            "mousemove" | "pointermove" => Ok(Interaction::PointerMove),
            "keypress" => Ok(Interaction::KeyPress),
            "scroll" => Ok(Interaction::Scroll),
            "touchstart" | "touch" => Ok(Interaction::TouchStart),
            "click" | "tap" => Ok(Interaction::Click),
            "keydown" => Ok(Interaction::KeyDown),
            _ => Err(UnknownInteraction(s.to_string())),
        }
    }
}
