use bevy::prelude::*;
use crate::core::spawn_point::SpawnPointId;
use crate::monster::agent::{AgentId, MonsterPose};

/// Whose position the monsters hunt.
#[derive(Component)]
pub struct PlayerAnchor;

/// Origin and facing of the flashlight beam.
#[derive(Component)]
pub struct FlashlightBeam;

/// Camera driven by the bed view rig; `rest` is its translation with no lean applied.
#[derive(Component, Debug, Clone, Copy)]
pub struct BedCamera {
    pub rest: Vec3,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct MonsterEntity {
    pub agent: AgentId,
    pub spawn_point: SpawnPointId,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterPoseTag(pub MonsterPose);
