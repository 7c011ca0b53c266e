use std::fmt;
use crate::core::haunt_config::SoundCue;
use crate::core::spawn_point::{AmbientChannelId, SpawnPointId};

/// A collaborator the haunt expects to be wired up before play starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    SpawnPoint(SpawnPointId),
    Channel(AmbientChannelId),
    Player,
    Flashlight,
    Sound(SoundCue),
}

#[derive(Debug, Clone, PartialEq)]
pub enum HauntError {
    MissingBinding(Binding),
    InvalidConfig(String),
    ImportFailed(String),
    Other(String),
}

impl From<&str> for HauntError {
    fn from(error: &str) -> Self {
        HauntError::Other(error.to_string())
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::SpawnPoint(id) => write!(f, "spawn point '{}'", id.name()),
            Binding::Channel(id) => write!(f, "ambient channel '{}'", id.name()),
            Binding::Player => write!(f, "player anchor"),
            Binding::Flashlight => write!(f, "flashlight beam"),
            Binding::Sound(cue) => write!(f, "sound cue {:?}", cue),
        }
    }
}

impl fmt::Display for HauntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HauntError::MissingBinding(binding) => write!(f, "missing binding: {}", binding),
            HauntError::InvalidConfig(msg) => write!(f, "invalid haunt config: {}", msg),
            HauntError::ImportFailed(msg) => write!(f, "{}", msg),
            HauntError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for HauntError {}
