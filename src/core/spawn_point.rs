use bevy::math::{Quat, Vec3};
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::core::haunt_config::HauntConfig;
use crate::core::haunt_error::{Binding, HauntError};

/// The four places in the bedroom a monster can show up.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpawnPointId {
    Window,
    Door,
    Clock,
    UnderBed,
}

impl SpawnPointId {
    pub const COUNT: usize = 4;
    pub const ALL: [SpawnPointId; Self::COUNT] = [
        SpawnPointId::Window,
        SpawnPointId::Door,
        SpawnPointId::Clock,
        SpawnPointId::UnderBed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SpawnPointId::Window => "window",
            SpawnPointId::Door => "door",
            SpawnPointId::Clock => "clock",
            SpawnPointId::UnderBed => "under-bed",
        }
    }

    // Under the bed has no sound of its own, so every channel goes quiet.
    pub fn channel_target(self) -> ChannelTarget {
        match self {
            SpawnPointId::Window => ChannelTarget::Single(AmbientChannelId::Window),
            SpawnPointId::Door => ChannelTarget::Single(AmbientChannelId::Door),
            SpawnPointId::Clock => ChannelTarget::Single(AmbientChannelId::Clock),
            SpawnPointId::UnderBed => ChannelTarget::All,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AmbientChannelId {
    Window,
    Door,
    Clock,
}

impl AmbientChannelId {
    pub const COUNT: usize = 3;
    pub const ALL: [AmbientChannelId; Self::COUNT] = [
        AmbientChannelId::Window,
        AmbientChannelId::Door,
        AmbientChannelId::Clock,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            AmbientChannelId::Window => "window",
            AmbientChannelId::Door => "door",
            AmbientChannelId::Clock => "clock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelTarget {
    Single(AmbientChannelId),
    All,
}

impl ChannelTarget {
    pub fn includes(self, channel: AmbientChannelId) -> bool {
        match self {
            ChannelTarget::Single(id) => id == channel,
            ChannelTarget::All => true,
        }
    }

    pub fn channels(self) -> impl Iterator<Item = AmbientChannelId> {
        AmbientChannelId::ALL.into_iter().filter(move |channel| self.includes(*channel))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpawnPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl SpawnPose {
    pub fn at(translation: Vec3) -> Self {
        SpawnPose { translation, rotation: Quat::IDENTITY }
    }
}

impl Default for SpawnPose {
    fn default() -> Self {
        SpawnPose::at(Vec3::ZERO)
    }
}

/// Fixed table of spawn poses, resolved once when the session starts.
#[derive(Debug, Clone)]
pub struct SpawnRegistry {
    poses: [Option<SpawnPose>; SpawnPointId::COUNT],
    enabled: Vec<SpawnPointId>,
    weights: Option<WeightedIndex<f32>>,
}

impl SpawnRegistry {
    /// Every given point is bound, enabled and equally likely.
    pub fn new(points: impl IntoIterator<Item = (SpawnPointId, SpawnPose)>) -> Self {
        let mut poses = [None; SpawnPointId::COUNT];
        for (id, pose) in points {
            poses[id.index()] = Some(pose);
        }
        let enabled = SpawnPointId::ALL
            .into_iter()
            .filter(|id| poses[id.index()].is_some())
            .collect();

        SpawnRegistry { poses, enabled, weights: None }
    }

    /// Builds the registry and reports every point that could not be bound.
    /// Unbound points are left out of the draw instead of failing the session.
    pub fn from_config(config: &HauntConfig) -> (Self, Vec<HauntError>) {
        let mut poses = [None; SpawnPointId::COUNT];
        let mut enabled = Vec::new();
        let mut raw_weights = Vec::new();
        let mut diagnostics = Vec::new();

        for id in SpawnPointId::ALL {
            let entry = config.spawn_points.iter().find(|entry| entry.id == id);
            match entry.and_then(|entry| entry.pose.map(|pose| (entry, pose))) {
                Some((entry, pose)) => {
                    poses[id.index()] = Some(pose);
                    if entry.enabled {
                        enabled.push(id);
                        raw_weights.push(entry.weight);
                    }
                }
                None => diagnostics.push(HauntError::MissingBinding(Binding::SpawnPoint(id))),
            }
        }

        let weights = if raw_weights.iter().any(Option::is_some) {
            match WeightedIndex::new(raw_weights.iter().map(|w| w.unwrap_or(1.0))) {
                Ok(dist) => Some(dist),
                Err(e) => {
                    diagnostics.push(HauntError::InvalidConfig(
                        format!("spawn weights rejected ({}), drawing uniformly", e),
                    ));
                    None
                }
            }
        } else {
            None
        };

        (SpawnRegistry { poses, enabled, weights }, diagnostics)
    }

    pub fn pose(&self, id: SpawnPointId) -> Option<SpawnPose> {
        self.poses[id.index()]
    }

    pub fn channel_target(&self, id: SpawnPointId) -> ChannelTarget {
        id.channel_target()
    }

    pub fn enabled(&self) -> &[SpawnPointId] {
        &self.enabled
    }

    pub fn is_enabled(&self, id: SpawnPointId) -> bool {
        self.enabled.contains(&id)
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SpawnPointId> {
        if self.enabled.is_empty() {
            return None;
        }
        match &self.weights {
            Some(dist) => Some(self.enabled[dist.sample(rng)]),
            None => self.enabled.choose(rng).copied(),
        }
    }
}
