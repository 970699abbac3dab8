use std::str::FromStr;

use thiserror::Error;

use crate::{idle::Interaction, navigation::Route, screens::ScreenSignal};

/// One line of operator or input-device traffic for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCommand {
    Go(Route),
    Back,
    Home,
    Interact(Interaction),
    Signal(ScreenSignal),
    Next,
    Prev,
    Play(u32),
    Stop,
    /// Pin the clock to a wall time on the event day for a rehearsal.
    At(String),
    /// Return to the system clock.
    Live,
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a video id")]
    BadVideoId(String),
    #[error("unknown command '{0}'")]
    Unknown(String),
}

impl FromStr for KioskCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let rest = parts.collect::<Vec<_>>().join(" ");
        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.clone())
            }
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "go" => KioskCommand::Go(Route::from_path(&argument("go")?)),
            "back" => KioskCommand::Back,
            "home" => KioskCommand::Home,
            "visible" => KioskCommand::Signal(ScreenSignal::Visible),
            "hidden" => KioskCommand::Signal(ScreenSignal::Hidden),
            "focus" => KioskCommand::Signal(ScreenSignal::FocusGained),
            "next" => KioskCommand::Next,
            "prev" => KioskCommand::Prev,
            "play" => {
                let raw = argument("play")?;
                let id = raw.parse().map_err(|_| CommandError::BadVideoId(raw))?;
                KioskCommand::Play(id)
            }
            "stop" => KioskCommand::Stop,
            "at" => KioskCommand::At(argument("at")?),
            "live" => KioskCommand::Live,
            "show" => KioskCommand::Show,
            "quit" | "exit" => KioskCommand::Quit,
            other => match other.parse::<Interaction>() {
                Ok(kind) => KioskCommand::Interact(kind),
                Err(_) => return Err(CommandError::Unknown(head.to_string())),
            },
        };

        Ok(command)
    }
}

impl KioskCommand {
    /// Commands that come from a person at the screen and so count as
    /// activity for the idle guard, besides the raw interaction events.
    pub fn as_interaction(&self) -> Option<Interaction> {
        match self {
            KioskCommand::Interact(kind) => Some(*kind),
            KioskCommand::Next | KioskCommand::Prev | KioskCommand::Play(_) | KioskCommand::Stop => {
                Some(Interaction::Click)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<KioskCommand, CommandError> {
        line.parse()
    }

    #[test]
    fn navigation_commands() {
        assert_eq!(parse("go /university-talks"), Ok(KioskCommand::Go(Route::UniversityTalks)));
        assert_eq!(parse("go /nowhere"), Ok(KioskCommand::Go(Route::Home)));
        assert_eq!(parse("  BACK "), Ok(KioskCommand::Back));
        assert_eq!(parse("go"), Err(CommandError::MissingArgument("go")));
    }

    #[test]
    fn dom_event_names_are_interactions() {
        assert_eq!(parse("touchstart"), Ok(KioskCommand::Interact(Interaction::TouchStart)));
        assert_eq!(parse("keydown"), Ok(KioskCommand::Interact(Interaction::KeyDown)));
    }

    #[test]
    fn surface_signals() {
        assert_eq!(parse("visible"), Ok(KioskCommand::Signal(ScreenSignal::Visible)));
        assert_eq!(parse("focus"), Ok(KioskCommand::Signal(ScreenSignal::FocusGained)));
    }

    #[test]
    fn carousel_commands() {
        assert_eq!(parse("play 4"), Ok(KioskCommand::Play(4)));
        assert_eq!(parse("play four"), Err(CommandError::BadVideoId("four".into())));
        assert_eq!(parse("play 4").unwrap().as_interaction(), Some(Interaction::Click));
    }

    #[test]
    fn rehearsal_time_keeps_spacing() {
        assert_eq!(parse("at 10:10 am"), Ok(KioskCommand::At("10:10 am".into())));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    }
}
