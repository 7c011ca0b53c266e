use bevy::log::info;
use bevy::math::{Quat, Vec3};
use serde::{Serialize, Deserialize};
use crate::core::spawn_point::{SpawnPointId, SpawnPose};
use crate::monster::light_cone::FlashlightState;
use crate::spawning::helpers::move_towards;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    pub dormant_duration: f32,
    pub exposure_threshold: f32,
    pub max_light_distance: f32,
    pub pursuit_speed: f32,
    pub contact_distance: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings {
            dormant_duration: 2.0,
            exposure_threshold: 2.0,
            max_light_distance: 10.0,
            pursuit_speed: 3.0,
            contact_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Waiting,
    Hunting,
    DespawnedByLight,
    DespawnedByContact,
}

impl AgentState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentState::DespawnedByLight | AgentState::DespawnedByContact)
    }
}

/// Animation request for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterPose {
    IdleUnderBed,
    IdleGeneric,
    HuntingWalk,
    Jumpscare,
}

impl MonsterPose {
    pub fn name(self) -> &'static str {
        match self {
            MonsterPose::IdleUnderBed => "idle-under-bed",
            MonsterPose::IdleGeneric => "idle-generic",
            MonsterPose::HuntingWalk => "hunting-walk",
            MonsterPose::Jumpscare => "jumpscare",
        }
    }

    pub fn idle_for(point: SpawnPointId) -> Self {
        match point {
            SpawnPointId::UnderBed => MonsterPose::IdleUnderBed,
            _ => MonsterPose::IdleGeneric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentEvent {
    PoseRequested(MonsterPose),
    StartedHunting,
    Vanished,
    CaughtPlayer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterAgent {
    id: AgentId,
    point: SpawnPointId,
    state: AgentState,
    position: Vec3,
    rotation: Quat,
    dormant_elapsed: f32,
    exposure: f32,
    settings: AgentSettings,
}

impl MonsterAgent {
    pub fn spawn(id: AgentId, point: SpawnPointId, pose: SpawnPose, settings: AgentSettings) -> (Self, MonsterPose) {
        let agent = MonsterAgent {
            id,
            point,
            state: AgentState::Waiting,
            position: pose.translation,
            rotation: pose.rotation,
            dormant_elapsed: 0.0,
            exposure: 0.0,
            settings,
        };
        (agent, MonsterPose::idle_for(point))
    }

    /// Advances one frame. Light exposure is judged first, then the dormant
    /// wait, then pursuit. A terminal agent ignores further ticks.
    pub fn tick(&mut self, dt: f32, player: Option<Vec3>, flashlight: Option<&FlashlightState>) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        if self.state.is_terminal() {
            return events;
        }

        match flashlight {
            Some(beam) if beam.illuminates(self.position, self.settings.max_light_distance) => {
                self.exposure += dt;
                if self.exposure >= self.settings.exposure_threshold {
                    info!("[Monster {}] {:?} -> DespawnedByLight", self.id.0, self.state);
                    self.state = AgentState::DespawnedByLight;
                    events.push(AgentEvent::Vanished);
                    return events;
                }
            }
            _ => self.exposure = 0.0,
        }

        if self.state == AgentState::Waiting {
            self.dormant_elapsed += dt;
            if self.dormant_elapsed >= self.settings.dormant_duration {
                info!("[Monster {}] Waiting -> Hunting", self.id.0);
                self.state = AgentState::Hunting;
                events.push(AgentEvent::StartedHunting);
                events.push(AgentEvent::PoseRequested(MonsterPose::HuntingWalk));
            }
        }

        if self.state == AgentState::Hunting {
            if let Some(target) = player {
                self.position = move_towards(self.position, target, self.settings.pursuit_speed * dt);
                if self.position.distance(target) < self.settings.contact_distance {
                    info!("[Monster {}] Hunting -> DespawnedByContact", self.id.0);
                    self.state = AgentState::DespawnedByContact;
                    events.push(AgentEvent::PoseRequested(MonsterPose::Jumpscare));
                    events.push(AgentEvent::CaughtPlayer);
                }
            }
        }

        events
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn point(&self) -> SpawnPointId {
        self.point
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn dormant_elapsed(&self) -> f32 {
        self.dormant_elapsed
    }
}
