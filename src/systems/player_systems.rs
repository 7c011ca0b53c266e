use bevy::prelude::*;
use crate::core::components::BedCamera;
use crate::core::resources::{BedCameraRes, FlashlightRes, ScareDelayRes, SurvivalRes};
use crate::event_system::haunt_events::*;
use crate::player::survival::GamePhase;

pub fn handle_flashlight_toggle(
    mut toggle_reader: EventReader<FlashlightToggleEvent>,
    mut flashlight: ResMut<FlashlightRes>,
    mut cue_writer: EventWriter<SoundCueEvent>,
) {
    for _ in toggle_reader.read() {
        if let Some(cue) = flashlight.0.toggle() {
            cue_writer.send(SoundCueEvent(cue.sound()));
        }
    }
}

pub fn advance_flashlight(
    time: Res<Time>,
    mut flashlight: ResMut<FlashlightRes>,
    camera: Res<BedCameraRes>,
    mut cue_writer: EventWriter<SoundCueEvent>,
) {
    let looking_down = camera.0.is_looking_down();
    for cue in flashlight.0.tick(time.delta_secs(), time.elapsed_secs(), looking_down) {
        cue_writer.send(SoundCueEvent(cue.sound()));
    }
}

pub fn handle_view_commands(
    mut command_reader: EventReader<ViewCommandEvent>,
    mut camera: ResMut<BedCameraRes>,
) {
    for ViewCommandEvent(command) in command_reader.read() {
        if !camera.0.command(*command) {
            debug!("[BedCamera] ignored {:?} in {:?}", command, camera.0.view());
        }
    }
}

pub fn advance_bed_camera(
    time: Res<Time>,
    mut camera: ResMut<BedCameraRes>,
    flashlight: Res<FlashlightRes>,
    mut camera_query: Query<(&BedCamera, &mut Transform)>,
) {
    camera.0.tick(time.delta_secs(), flashlight.0.is_on());
    for (bed_camera, mut transform) in camera_query.iter_mut() {
        transform.translation = bed_camera.rest + camera.0.local_offset();
        transform.rotation = camera.0.rotation();
    }
}

pub fn advance_survival(
    time: Res<Time>,
    mut survival: ResMut<SurvivalRes>,
    mut transition_writer: EventWriter<SceneTransitionEvent>,
) {
    if survival.0.tick(time.delta_secs()) {
        info!("[Survival] survived {}", survival.0.display());
        transition_writer.send(SceneTransitionEvent::Win);
    }
}

pub fn advance_scare_delay(
    time: Res<Time>,
    mut scare: ResMut<ScareDelayRes>,
    mut transition_writer: EventWriter<SceneTransitionEvent>,
) {
    if scare.0.tick(time.delta_secs()) {
        transition_writer.send(SceneTransitionEvent::Lose);
    }
}

pub fn apply_scene_transitions(
    state: Res<State<GamePhase>>,
    mut transition_reader: EventReader<SceneTransitionEvent>,
    mut next: ResMut<NextState<GamePhase>>,
) {
    // A transition queued this frame (a catch) counts as the current phase.
    let mut current = match *next {
        NextState::Pending(phase) => phase,
        NextState::Unchanged => *state.get(),
    };
    for transition in transition_reader.read() {
        let target = match (*transition, current) {
            (SceneTransitionEvent::Win, GamePhase::Playing) => GamePhase::Won,
            (SceneTransitionEvent::Lose, GamePhase::Playing | GamePhase::JumpScare) => GamePhase::Lost,
            _ => {
                debug!("[GamePhase] {:?} ignored in {:?}", transition, current);
                continue;
            }
        };
        info!("[GamePhase] {:?} -> {:?}", current, target);
        next.set(target);
        current = target;
    }
}
