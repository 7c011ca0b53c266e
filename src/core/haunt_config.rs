use bevy::math::{Quat, Vec3};
use serde::{Serialize, Deserialize};
use crate::core::haunt_error::HauntError;
use crate::core::seeded_or_not::SeededOrNot;
use crate::core::spawn_point::{AmbientChannelId, SpawnPointId, SpawnPose};
use crate::monster::agent::AgentSettings;
use crate::monster::scheduler::CadenceSettings;
use crate::player::bed_camera::CameraSettings;
use crate::player::flashlight::FlashlightSettings;
use crate::player::survival::SurvivalSettings;

/// Whole-session tuning, loadable from a `.ron` file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HauntConfig {
    pub seed: SeededOrNot,
    pub cadence: CadenceSettings,
    pub agent: AgentSettings,
    pub spawn_points: Vec<SpawnPointConfig>,
    pub channels: Vec<ChannelConfig>,
    pub flashlight: FlashlightSettings,
    pub camera: CameraSettings,
    pub survival: SurvivalSettings,
    pub sounds: SoundPaths,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpawnPointConfig {
    pub id: SpawnPointId,
    #[serde(default)]
    pub pose: Option<SpawnPose>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub weight: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    pub id: AmbientChannelId,
    #[serde(default = "full_volume")]
    pub nominal_volume: f32,
    #[serde(default)]
    pub sound: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Click,
    LowBattery,
    BatteryDead,
    Jumpscare,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SoundPaths {
    pub click: Option<String>,
    pub low_battery: Option<String>,
    pub battery_dead: Option<String>,
    pub jumpscare: Option<String>,
}

impl SoundPaths {
    pub fn path(&self, cue: SoundCue) -> Option<&str> {
        match cue {
            SoundCue::Click => self.click.as_deref(),
            SoundCue::LowBattery => self.low_battery.as_deref(),
            SoundCue::BatteryDead => self.battery_dead.as_deref(),
            SoundCue::Jumpscare => self.jumpscare.as_deref(),
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

fn full_volume() -> f32 {
    1.0
}

fn default_pose(id: SpawnPointId) -> SpawnPose {
    match id {
        SpawnPointId::Window => SpawnPose {
            translation: Vec3::new(-3.2, 0.0, -1.5),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        },
        SpawnPointId::Door => SpawnPose {
            translation: Vec3::new(3.0, 0.0, -4.0),
            rotation: Quat::from_rotation_y(-std::f32::consts::FRAC_PI_4),
        },
        SpawnPointId::Clock => SpawnPose {
            translation: Vec3::new(2.8, 0.0, 1.0),
            rotation: Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        },
        SpawnPointId::UnderBed => SpawnPose {
            translation: Vec3::new(0.0, 0.0, -0.6),
            rotation: Quat::IDENTITY,
        },
    }
}

impl Default for HauntConfig {
    fn default() -> Self {
        HauntConfig {
            seed: SeededOrNot::default(),
            cadence: CadenceSettings::default(),
            agent: AgentSettings::default(),
            spawn_points: SpawnPointId::ALL
                .iter()
                .map(|&id| SpawnPointConfig {
                    id,
                    pose: Some(default_pose(id)),
                    enabled: true,
                    weight: None,
                })
                .collect(),
            channels: AmbientChannelId::ALL
                .iter()
                .map(|&id| ChannelConfig {
                    id,
                    nominal_volume: 1.0,
                    sound: Some(format!("audio/ambience/{}.ogg", id.name())),
                })
                .collect(),
            flashlight: FlashlightSettings::default(),
            camera: CameraSettings::default(),
            survival: SurvivalSettings::default(),
            sounds: SoundPaths {
                click: Some("audio/sfx/flashlight_click.ogg".to_string()),
                low_battery: Some("audio/sfx/low_battery.ogg".to_string()),
                battery_dead: Some("audio/sfx/battery_dead.ogg".to_string()),
                jumpscare: Some("audio/sfx/jumpscare.ogg".to_string()),
            },
        }
    }
}

impl HauntConfig {
    pub fn channel(&self, id: AmbientChannelId) -> Option<&ChannelConfig> {
        self.channels.iter().find(|channel| channel.id == id)
    }

    /// Rejects tuning the session cannot run with. Unbound points and channels
    /// are not errors here; they degrade at runtime.
    pub fn validate(&self) -> Result<(), HauntError> {
        // NaN slips through every ordered comparison below.
        if let Some((name, value)) = self.tuning().into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(&format!("{} must be a finite number, got {}", name, value)));
        }
        for point in &self.spawn_points {
            if let Some(weight) = point.weight {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(invalid(&format!(
                        "weight {} for spawn point '{}' must be finite and not negative",
                        weight,
                        point.id.name()
                    )));
                }
            }
        }

        let cadence = &self.cadence;
        if cadence.min_wait < 0.0 || cadence.fade_duration < 0.0 {
            return Err(invalid("cadence durations must not be negative"));
        }
        if cadence.min_wait > cadence.max_wait {
            return Err(invalid(&format!(
                "min_wait {} is greater than max_wait {}",
                cadence.min_wait, cadence.max_wait
            )));
        }

        let agent = &self.agent;
        if agent.dormant_duration < 0.0 || agent.exposure_threshold < 0.0 {
            return Err(invalid("agent durations must not be negative"));
        }
        if agent.pursuit_speed <= 0.0 || agent.contact_distance <= 0.0 || agent.max_light_distance <= 0.0 {
            return Err(invalid("agent speed and distances must be positive"));
        }

        for channel in &self.channels {
            if !(0.0..=1.0).contains(&channel.nominal_volume) {
                return Err(invalid(&format!(
                    "nominal volume {} for channel '{}' is outside [0, 1]",
                    channel.nominal_volume,
                    channel.id.name()
                )));
            }
        }

        if !self.spawn_points.iter().any(|point| point.enabled && point.pose.is_some()) {
            return Err(invalid("no enabled spawn point has a pose"));
        }

        if self.flashlight.battery_max <= 0.0 || self.flashlight.drain_rate < 0.0 {
            return Err(invalid("flashlight battery must be positive and drain must not be negative"));
        }
        if self.survival.survive_seconds <= 0.0 || self.survival.scare_delay < 0.0 {
            return Err(invalid("survival duration must be positive"));
        }

        Ok(())
    }

    fn tuning(&self) -> Vec<(&'static str, f32)> {
        let (c, a, f, cam, s) = (&self.cadence, &self.agent, &self.flashlight, &self.camera, &self.survival);
        vec![
            ("cadence.min_wait", c.min_wait),
            ("cadence.max_wait", c.max_wait),
            ("cadence.fade_duration", c.fade_duration),
            ("agent.dormant_duration", a.dormant_duration),
            ("agent.exposure_threshold", a.exposure_threshold),
            ("agent.max_light_distance", a.max_light_distance),
            ("agent.pursuit_speed", a.pursuit_speed),
            ("agent.contact_distance", a.contact_distance),
            ("flashlight.max_intensity", f.max_intensity),
            ("flashlight.intensity_fade_speed", f.intensity_fade_speed),
            ("flashlight.range", f.range),
            ("flashlight.normal_spot_angle", f.normal_spot_angle),
            ("flashlight.down_spot_angle", f.down_spot_angle),
            ("flashlight.flicker_amount", f.flicker_amount),
            ("flashlight.flicker_speed", f.flicker_speed),
            ("flashlight.battery_max", f.battery_max),
            ("flashlight.drain_rate", f.drain_rate),
            ("flashlight.low_battery_threshold", f.low_battery_threshold),
            ("camera.center_yaw", cam.center_yaw),
            ("camera.left_yaw", cam.left_yaw),
            ("camera.right_yaw", cam.right_yaw),
            ("camera.down_pitch", cam.down_pitch),
            ("camera.left_tilt_pitch", cam.left_tilt_pitch),
            ("camera.left_tilt_yaw", cam.left_tilt_yaw),
            ("camera.rotation_speed", cam.rotation_speed),
            ("camera.forward_move", cam.forward_move),
            ("camera.down_move", cam.down_move),
            ("camera.move_speed", cam.move_speed),
            ("camera.sequence_delay", cam.sequence_delay),
            ("survival.survive_seconds", s.survive_seconds),
            ("survival.scare_delay", s.scare_delay),
        ]
    }
}

fn invalid(msg: &str) -> HauntError {
    HauntError::InvalidConfig(msg.to_string())
}
