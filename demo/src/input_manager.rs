use bevy::app::Plugin;
use bevy::input::ButtonState;
use bevy::input::mouse::MouseButtonInput;
use bevy::prelude::*;
use bedside_haunt::core::spawn_point::SpawnPointId;
use bedside_haunt::event_system::haunt_events::{AppearanceRequestEvent, FlashlightToggleEvent, ViewCommandEvent};
use bedside_haunt::player::bed_camera::ViewCommand;

pub(crate) struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (view_input_system, flashlight_input_system, debug_appearance_system));
    }
}

fn view_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut command_writer: EventWriter<ViewCommandEvent>,
) {
    let bindings = [
        (KeyCode::KeyA, ViewCommand::Left),
        (KeyCode::KeyD, ViewCommand::Right),
        (KeyCode::KeyS, ViewCommand::Down),
        (KeyCode::KeyW, ViewCommand::Up),
        (KeyCode::Space, ViewCommand::Center),
    ];
    for (key, command) in bindings {
        if keys.just_pressed(key) {
            command_writer.send(ViewCommandEvent(command));
        }
    }
}

fn flashlight_input_system(
    mut mouse_button_input_events: EventReader<MouseButtonInput>,
    mut toggle_writer: EventWriter<FlashlightToggleEvent>,
) {
    for event in mouse_button_input_events.read() {
        if event.button == MouseButton::Left && event.state == ButtonState::Pressed {
            toggle_writer.send(FlashlightToggleEvent);
        }
    }
}

// Number keys force an appearance at a spawn point, 0 picks one at random
fn debug_appearance_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut request_writer: EventWriter<AppearanceRequestEvent>,
) {
    let bindings = [
        (KeyCode::Digit0, None),
        (KeyCode::Digit1, Some(SpawnPointId::Window)),
        (KeyCode::Digit2, Some(SpawnPointId::Door)),
        (KeyCode::Digit3, Some(SpawnPointId::Clock)),
        (KeyCode::Digit4, Some(SpawnPointId::UnderBed)),
    ];
    for (key, point) in bindings {
        if keys.just_pressed(key) {
            request_writer.send(AppearanceRequestEvent { point });
        }
    }
}
