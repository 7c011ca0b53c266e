use bevy::prelude::*;
use crate::core::haunt_config::SoundCue;
use crate::core::spawn_point::SpawnPointId;
use crate::monster::agent::{AgentId, MonsterPose};
use crate::monster::scheduler::HauntSignal;
use crate::player::bed_camera::ViewCommand;

#[derive(Debug, Clone, Event)]
pub struct HauntEvent(pub HauntSignal);

#[derive(Debug, Clone, Event)]
pub struct MonsterPoseEvent {
    pub agent: AgentId,
    pub pose: MonsterPose,
}

#[derive(Debug, Clone, Event)]
pub struct SoundCueEvent(pub SoundCue);

#[derive(Debug, Clone, Event)]
pub struct ViewCommandEvent(pub ViewCommand);

#[derive(Debug, Clone, Event)]
pub struct FlashlightToggleEvent;

/// Forces an appearance now, at `point` or a drawn one. Dropped while a monster is active.
#[derive(Debug, Clone, Event)]
pub struct AppearanceRequestEvent {
    pub point: Option<SpawnPointId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Event)]
pub enum SceneTransitionEvent {
    Win,
    Lose,
}
