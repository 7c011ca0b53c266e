use bevy::app::{App, Plugin};
use bevy::prelude::*;
use bedside_haunt::core::components::{BedCamera, FlashlightBeam};
use bedside_haunt::core::resources::{BedCameraRes, FlashlightRes};

// Flashlight intensity is authored on a 0..1.5 scale.
const LUMENS_PER_UNIT: f32 = 600_000.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, initialize_bed_camera)
            .add_systems(Update, flashlight_light_system);
    }
}

pub(crate) fn initialize_bed_camera(
    mut commands: Commands,
    rig: Res<BedCameraRes>,
    flashlight: Res<FlashlightRes>,
) {
    let rest = Vec3::new(0.0, 1.2, 0.9);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(rest).with_rotation(rig.0.rotation()),
        BedCamera { rest },
        Name::new("BedCamera"),
    ))
        .with_children(|camera| {
            // Held slightly below and right of the eyes, pointing where the camera looks
            camera.spawn((
                SpotLight {
                    intensity: 0.0,
                    range: flashlight.0.settings().range,
                    color: Color::srgb(1.0, 0.95, 0.8),
                    shadows_enabled: true,
                    outer_angle: (flashlight.0.spot_angle() * 0.5).to_radians(),
                    inner_angle: (flashlight.0.spot_angle() * 0.4).to_radians(),
                    ..default()
                },
                Transform::from_xyz(0.15, -0.15, 0.0),
                FlashlightBeam,
                Name::new("Flashlight"),
            ));
        });
}

fn flashlight_light_system(
    flashlight: Res<FlashlightRes>,
    mut lights: Query<&mut SpotLight, With<FlashlightBeam>>,
) {
    for mut light in lights.iter_mut() {
        light.intensity = flashlight.0.intensity() * LUMENS_PER_UNIT;
        light.outer_angle = (flashlight.0.spot_angle() * 0.5).to_radians();
        light.inner_angle = (flashlight.0.spot_angle() * 0.4).to_radians();
    }
}
