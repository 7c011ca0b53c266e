use bevy::prelude::*;
use serde::{Serialize, Deserialize};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    JumpScare,
    Won,
    Lost,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SurvivalSettings {
    pub survive_seconds: f32,
    /// Seconds the jump-scare plays before the lose screen.
    pub scare_delay: f32,
}

impl Default for SurvivalSettings {
    fn default() -> Self {
        SurvivalSettings { survive_seconds: 360.0, scare_delay: 2.3 }
    }
}

#[derive(Debug, Clone)]
pub struct SurvivalTimer {
    duration: f32,
    elapsed: f32,
    won: bool,
}

impl SurvivalTimer {
    pub fn new(duration: f32) -> Self {
        SurvivalTimer { duration, elapsed: 0.0, won: false }
    }

    /// True on the one tick the player survives the full duration.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.won {
            return false;
        }
        self.elapsed += dt;
        if self.duration - self.elapsed <= 0.0 {
            self.won = true;
            return true;
        }
        false
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn display(&self) -> String {
        let whole = self.elapsed.max(0.0) as u32;
        format!("{:02}:{:02}", whole / 60, whole % 60)
    }
}

#[derive(Debug, Clone)]
pub struct ScareDelay {
    remaining: f32,
    fired: bool,
}

impl ScareDelay {
    pub fn new(delay: f32) -> Self {
        ScareDelay { remaining: delay, fired: false }
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn victory_fires_once_at_duration() {
        let mut timer = SurvivalTimer::new(3.0);
        assert!(!timer.tick(1.0));
        assert!(!timer.tick(1.0));
        assert!(timer.tick(1.0));
        assert!(!timer.tick(1.0));
        assert!(timer.has_won());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn display_is_minutes_and_seconds() {
        let mut timer = SurvivalTimer::new(360.0);
        timer.tick(125.7);
        assert_eq!(timer.display(), "02:05");
        assert_eq!(SurvivalTimer::new(360.0).display(), "00:00");
    }

    #[test]
    fn scare_delay_fires_once() {
        let mut delay = ScareDelay::new(2.3);
        assert!(!delay.tick(1.0));
        assert!(!delay.tick(1.0));
        assert!(delay.tick(0.5));
        assert!(!delay.tick(0.5));
    }
}
