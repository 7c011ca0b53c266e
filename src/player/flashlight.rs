use bevy::log::info;
use bevy::math::Vec3;
use serde::{Serialize, Deserialize};
use crate::core::haunt_config::SoundCue;
use crate::monster::light_cone::FlashlightState;
use crate::spawning::helpers::lerp;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FlashlightSettings {
    pub max_intensity: f32,
    pub intensity_fade_speed: f32,
    pub range: f32,
    /// Full spot angles in degrees.
    pub normal_spot_angle: f32,
    pub down_spot_angle: f32,
    pub flicker: bool,
    pub flicker_amount: f32,
    pub flicker_speed: f32,
    pub battery_max: f32,
    pub drain_rate: f32,
    pub low_battery_threshold: f32,
}

impl Default for FlashlightSettings {
    fn default() -> Self {
        FlashlightSettings {
            max_intensity: 1.5,
            intensity_fade_speed: 8.0,
            range: 10.0,
            normal_spot_angle: 45.0,
            down_spot_angle: 90.0,
            flicker: true,
            flicker_amount: 0.1,
            flicker_speed: 15.0,
            battery_max: 100.0,
            drain_rate: 10.0,
            low_battery_threshold: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashlightCue {
    Click,
    LowBattery,
    BatteryDead,
}

impl FlashlightCue {
    pub fn sound(self) -> SoundCue {
        match self {
            FlashlightCue::Click => SoundCue::Click,
            FlashlightCue::LowBattery => SoundCue::LowBattery,
            FlashlightCue::BatteryDead => SoundCue::BatteryDead,
        }
    }
}

/// The player's hand light. Once the battery runs dry it stays off for the session.
#[derive(Debug, Clone)]
pub struct Flashlight {
    settings: FlashlightSettings,
    on: bool,
    enabled: bool,
    battery: f32,
    eased_intensity: f32,
    intensity: f32,
    spot_angle: f32,
    warned_low: bool,
    warned_dead: bool,
}

impl Flashlight {
    pub fn new(settings: FlashlightSettings) -> Self {
        Flashlight {
            settings,
            on: false,
            enabled: true,
            battery: settings.battery_max,
            eased_intensity: 0.0,
            intensity: 0.0,
            spot_angle: settings.normal_spot_angle,
            warned_low: false,
            warned_dead: false,
        }
    }

    pub fn toggle(&mut self) -> Option<FlashlightCue> {
        if !self.enabled {
            return None;
        }
        self.on = !self.on;
        Some(FlashlightCue::Click)
    }

    /// `elapsed` is total session time and only drives the flicker phase.
    pub fn tick(&mut self, dt: f32, elapsed: f32, looking_down: bool) -> Vec<FlashlightCue> {
        let mut cues = Vec::new();
        let s = self.settings;

        if self.enabled && self.on {
            self.battery -= s.drain_rate * dt;
            if self.battery <= 0.0 {
                info!("[Flashlight] battery depleted");
                self.enabled = false;
                self.on = false;
                self.battery = 0.0;
                if !self.warned_dead {
                    self.warned_dead = true;
                    cues.push(FlashlightCue::BatteryDead);
                }
            } else if self.battery <= s.low_battery_threshold && !self.warned_low {
                self.warned_low = true;
                cues.push(FlashlightCue::LowBattery);
            }
        }
        self.battery = self.battery.max(0.0);

        self.spot_angle = if looking_down { s.down_spot_angle } else { s.normal_spot_angle };

        let target = if self.on && self.enabled { s.max_intensity } else { 0.0 };
        self.eased_intensity = lerp(self.eased_intensity, target, s.intensity_fade_speed * dt);

        let mut intensity = self.eased_intensity;
        if s.flicker && self.on && self.eased_intensity > 0.0 {
            let boost = if self.battery < s.low_battery_threshold { 2.0 } else { 1.0 };
            intensity += (elapsed * s.flicker_speed).sin() * s.flicker_amount * boost;
        }
        intensity *= self.battery / s.battery_max;
        self.intensity = intensity.clamp(0.0, s.max_intensity);

        cues
    }

    pub fn beam(&self, origin: Vec3, forward: Vec3) -> FlashlightState {
        FlashlightState {
            on: self.on,
            origin,
            forward,
            half_angle: (self.spot_angle * 0.5).to_radians(),
            range: self.settings.range,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn battery_percentage(&self) -> f32 {
        self.battery / self.settings.battery_max * 100.0
    }

    pub fn is_low_battery(&self) -> bool {
        self.battery <= self.settings.low_battery_threshold
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn spot_angle(&self) -> f32 {
        self.spot_angle
    }

    pub fn settings(&self) -> &FlashlightSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    #[test]
    fn toggle_clicks_and_flips() {
        let mut light = Flashlight::new(FlashlightSettings::default());
        assert_eq!(light.toggle(), Some(FlashlightCue::Click));
        assert!(light.is_on());
        assert_eq!(light.toggle(), Some(FlashlightCue::Click));
        assert!(!light.is_on());
    }

    #[test]
    fn battery_warns_once_then_dies() {
        let mut light = Flashlight::new(FlashlightSettings::default());
        light.toggle();

        let mut cues = Vec::new();
        let mut elapsed = 0.0;
        for _ in 0..120 {
            elapsed += DT;
            cues.extend(light.tick(DT, elapsed, false));
        }

        assert_eq!(cues, vec![FlashlightCue::LowBattery, FlashlightCue::BatteryDead]);
        assert!(!light.is_on());
        assert!(!light.is_enabled());
        assert_eq!(light.battery_percentage(), 0.0);
        assert_eq!(light.toggle(), None);
    }

    #[test]
    fn battery_only_drains_while_on() {
        let mut light = Flashlight::new(FlashlightSettings::default());
        for _ in 0..50 {
            light.tick(DT, 0.0, false);
        }
        assert_eq!(light.battery_percentage(), 100.0);

        light.toggle();
        light.tick(1.0, 1.0, false);
        assert!((light.battery_percentage() - 90.0).abs() < 0.001);
        assert!(!light.is_low_battery());
    }

    #[test]
    fn intensity_eases_in_and_stays_clamped() {
        let mut light = Flashlight::new(FlashlightSettings { flicker: false, ..FlashlightSettings::default() });
        light.toggle();
        light.tick(0.01, 0.01, false);
        let early = light.intensity();
        assert!(early > 0.0 && early < 1.5);

        for _ in 0..10 {
            light.tick(0.05, 0.5, false);
        }
        assert!(light.intensity() <= 1.5);
        assert!(light.intensity() > early);
    }

    #[test]
    fn looking_down_widens_the_beam() {
        let mut light = Flashlight::new(FlashlightSettings::default());
        light.toggle();
        light.tick(DT, DT, true);
        assert_eq!(light.spot_angle(), 90.0);

        let beam = light.beam(Vec3::ZERO, Vec3::NEG_Z);
        assert!(beam.on);
        assert!((beam.half_angle - 45f32.to_radians()).abs() < 0.001);
        assert_eq!(beam.range, 10.0);

        light.tick(DT, 2.0 * DT, false);
        assert!((light.beam(Vec3::ZERO, Vec3::NEG_Z).half_angle - 22.5f32.to_radians()).abs() < 0.001);
    }
}
