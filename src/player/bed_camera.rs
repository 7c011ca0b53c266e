use bevy::log::debug;
use bevy::math::{EulerRot, Quat, Vec3};
use serde::{Serialize, Deserialize};
use crate::spawning::helpers::{delta_angle_degrees, lerp_angle_degrees, lerp_vec3};

/// Angles are in degrees. Positive pitch looks down, positive yaw turns right.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub center_yaw: f32,
    pub left_yaw: f32,
    pub right_yaw: f32,
    pub down_pitch: f32,
    pub left_tilt_pitch: f32,
    pub left_tilt_yaw: f32,
    pub rotation_speed: f32,
    pub forward_move: f32,
    pub down_move: f32,
    pub move_speed: f32,
    pub sequence_delay: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            center_yaw: -30.0,
            left_yaw: -90.0,
            right_yaw: 90.0,
            down_pitch: 180.0,
            left_tilt_pitch: 15.0,
            left_tilt_yaw: -5.0,
            rotation_speed: 8.0,
            forward_move: 1.0,
            down_move: 0.5,
            move_speed: 3.0,
            sequence_delay: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Center,
    Left,
    Right,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewCommand {
    Left,
    Right,
    Center,
    Down,
    Up,
}

/// Steps of leaning over the bed edge and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownStage {
    NotDown,
    MovingForward,
    MovingDown,
    Rotating,
    Complete,
    Unrotating,
    LiftingUp,
    ReturningBack,
}

const ROTATION_EPSILON: f32 = 0.1;
const LEVEL_PITCH: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct BedCameraRig {
    settings: CameraSettings,
    view: ViewState,
    stage: DownStage,
    stage_timer: f32,
    pitch: f32,
    target_pitch: f32,
    yaw: f32,
    target_yaw: f32,
    offset: Vec3,
    target_offset: Vec3,
}

impl BedCameraRig {
    pub fn new(settings: CameraSettings) -> Self {
        BedCameraRig {
            settings,
            view: ViewState::Center,
            stage: DownStage::NotDown,
            stage_timer: 0.0,
            pitch: 0.0,
            target_pitch: 0.0,
            yaw: settings.center_yaw,
            target_yaw: settings.center_yaw,
            offset: Vec3::ZERO,
            target_offset: Vec3::ZERO,
        }
    }

    /// Returns whether the command changed anything.
    pub fn command(&mut self, command: ViewCommand) -> bool {
        if !matches!(self.stage, DownStage::NotDown | DownStage::Complete) {
            return false;
        }

        match (self.view, command) {
            (ViewState::Down, ViewCommand::Up | ViewCommand::Center) => self.set_view(ViewState::Center),
            (ViewState::Down, _) => false,
            (ViewState::Center, ViewCommand::Down) => self.set_view(ViewState::Down),
            (_, ViewCommand::Down | ViewCommand::Up) => false,
            (_, horizontal) => {
                if self.is_rotating() {
                    return false;
                }
                let view = match horizontal {
                    ViewCommand::Left => ViewState::Left,
                    ViewCommand::Right => ViewState::Right,
                    _ => ViewState::Center,
                };
                self.set_view(view)
            }
        }
    }

    /// Frozen while the flashlight is on.
    pub fn tick(&mut self, dt: f32, flashlight_on: bool) {
        if flashlight_on {
            return;
        }
        self.advance_down_sequence(dt);

        let s = &self.settings;
        self.offset = lerp_vec3(self.offset, self.target_offset, s.move_speed * dt);
        self.pitch = lerp_angle_degrees(self.pitch, self.target_pitch, s.rotation_speed * dt);
        self.yaw = lerp_angle_degrees(self.yaw, self.target_yaw, s.rotation_speed * dt);
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn stage(&self) -> DownStage {
        self.stage
    }

    pub fn is_looking_down(&self) -> bool {
        self.view == ViewState::Down
    }

    pub fn is_rotating(&self) -> bool {
        delta_angle_degrees(self.pitch, self.target_pitch).abs() > ROTATION_EPSILON
            || delta_angle_degrees(self.yaw, self.target_yaw).abs() > ROTATION_EPSILON
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn rotation(&self) -> Quat {
        rotation_from(self.yaw, self.pitch)
    }

    /// Offset from the rest position of the camera.
    pub fn local_offset(&self) -> Vec3 {
        self.offset
    }

    fn set_view(&mut self, view: ViewState) -> bool {
        if self.view == view {
            return false;
        }
        let valid = match self.view {
            ViewState::Center => true,
            ViewState::Down => {
                self.stage = DownStage::Unrotating;
                self.stage_timer = 0.0;
                debug!("[BedCamera] Down -> returning");
                return true;
            }
            _ => view == ViewState::Center,
        };
        if !valid {
            return false;
        }

        debug!("[BedCamera] {:?} -> {:?}", self.view, view);
        self.view = view;
        if view == ViewState::Down {
            self.start_down_sequence();
        } else {
            self.clear_down_sequence();
            self.aim_at(view);
        }
        true
    }

    fn start_down_sequence(&mut self) {
        self.stage = DownStage::MovingForward;
        self.stage_timer = 0.0;
        self.yaw = 0.0;
        self.target_yaw = 0.0;
        self.target_offset = self.forward() * self.settings.forward_move;
    }

    fn clear_down_sequence(&mut self) {
        if !matches!(self.stage, DownStage::Unrotating | DownStage::LiftingUp | DownStage::ReturningBack) {
            self.stage = DownStage::NotDown;
            self.stage_timer = 0.0;
            self.target_offset = Vec3::ZERO;
        }
    }

    fn advance_down_sequence(&mut self, dt: f32) {
        if self.view != ViewState::Down && self.stage == DownStage::NotDown {
            return;
        }
        self.stage_timer += dt;
        let ready = self.stage_timer >= self.settings.sequence_delay;

        match self.stage {
            DownStage::MovingForward if ready => {
                self.next_stage(DownStage::MovingDown);
                self.target_offset += Vec3::NEG_Y * self.settings.down_move;
            }
            DownStage::MovingDown if ready => {
                self.next_stage(DownStage::Rotating);
                self.target_pitch = self.settings.down_pitch;
            }
            DownStage::Rotating if ready => {
                self.stage = DownStage::Complete;
            }
            DownStage::Unrotating if ready => {
                self.next_stage(DownStage::LiftingUp);
                self.target_pitch = 0.0;
            }
            DownStage::LiftingUp if ready && delta_angle_degrees(0.0, self.pitch).abs() < LEVEL_PITCH => {
                self.next_stage(DownStage::ReturningBack);
                self.target_offset = self.forward() * self.settings.forward_move;
            }
            DownStage::ReturningBack if ready => {
                debug!("[BedCamera] Down -> Center");
                self.view = ViewState::Center;
                self.stage = DownStage::NotDown;
                self.target_offset = Vec3::ZERO;
                self.aim_at(ViewState::Center);
            }
            _ => {}
        }
    }

    fn next_stage(&mut self, stage: DownStage) {
        self.stage = stage;
        self.stage_timer = 0.0;
    }

    fn aim_at(&mut self, view: ViewState) {
        let s = &self.settings;
        let (yaw, pitch) = match view {
            ViewState::Center => (s.center_yaw, 0.0),
            ViewState::Left => (s.left_yaw + s.left_tilt_yaw, s.left_tilt_pitch),
            ViewState::Right => (s.right_yaw, 0.0),
            ViewState::Down => return,
        };
        self.target_yaw = yaw;
        self.target_pitch = pitch;
    }

    fn forward(&self) -> Vec3 {
        rotation_from(self.yaw, self.pitch) * Vec3::NEG_Z
    }
}

fn rotation_from(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, -yaw.to_radians(), -pitch.to_radians(), 0.0)
}
