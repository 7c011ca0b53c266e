use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bedside_haunt::core::components::{MonsterEntity, MonsterPoseTag, PlayerAnchor};
use bedside_haunt::core::haunt_plugin::HauntPlugin;
use bedside_haunt::core::resources::{FlashlightRes, HauntConfigRes, SurvivalRes};
use bedside_haunt::management::audio_management::AmbiencePlugin;
use bedside_haunt::monster::agent::MonsterPose;
use bedside_haunt::player::survival::GamePhase;
use bedside_haunt::spawning::helpers::pose_transform;

mod input_manager;
mod camera;

fn main() {
    let mut app = App::new();

    // Setup default plugins
    app.add_plugins(
        DefaultPlugins
            .set(bevy::log::LogPlugin {
                filter: "warn,bedside_haunt=info".to_string(),
                level: bevy::log::Level::INFO,
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Bedside Haunt".into(),
                    resolution: (1024.0, 768.0).into(),
                    resizable: false,
                    ..default()
                }),
                ..default()
            })
            .build(),
    );

    app.insert_resource(AmbientLight {
        color: Color::srgb(0.35, 0.38, 0.6),
        brightness: 40.0,
    });

    // Setup audio before the ambience channels are added
    app.add_plugins(AudioPlugin);

    // Setup haunt session and ambience
    app.add_plugins(HauntPlugin::from_file("assets/haunt.ron"))
        .add_plugins(AmbiencePlugin);

    // Setup input system
    app.add_plugins(crate::input_manager::InputPlugin);

    // Setup camera and flashlight
    app.add_plugins(crate::camera::CameraPlugin);

    app.add_systems(Startup, (setup_room, setup_hud))
        .add_systems(Update, (dress_monsters, tint_monsters, update_hud))
        .add_systems(OnEnter(GamePhase::Won), |commands: Commands| show_banner(commands, "You made it to morning."))
        .add_systems(OnEnter(GamePhase::Lost), |commands: Commands| show_banner(commands, "It got you."));

    app.run();
}

#[derive(Resource)]
struct MonsterLook {
    mesh: Handle<Mesh>,
    idle: Handle<StandardMaterial>,
    hunting: Handle<StandardMaterial>,
    jumpscare: Handle<StandardMaterial>,
}

impl MonsterLook {
    fn material(&self, pose: MonsterPose) -> Handle<StandardMaterial> {
        match pose {
            MonsterPose::IdleUnderBed | MonsterPose::IdleGeneric => self.idle.clone(),
            MonsterPose::HuntingWalk => self.hunting.clone(),
            MonsterPose::Jumpscare => self.jumpscare.clone(),
        }
    }
}

#[derive(Component)]
struct SurvivalClock;

fn setup_room(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<HauntConfigRes>,
) {
    let floor = materials.add(StandardMaterial {
        base_color: Color::srgb(0.22, 0.18, 0.15),
        perceptual_roughness: 0.9,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 10.0))),
        MeshMaterial3d(floor),
        Name::new("Floor"),
    ));

    let bed = materials.add(Color::srgb(0.3, 0.32, 0.45));
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.6, 0.5, 2.2))),
        MeshMaterial3d(bed),
        Transform::from_xyz(0.0, 0.25, 0.3),
        Name::new("Bed"),
    ));

    // Sleeper sits on the mattress; monsters close in on this point
    commands.spawn((
        Transform::from_xyz(0.0, 0.5, 0.5),
        PlayerAnchor,
        Name::new("Sleeper"),
    ));

    // Markers for each configured spawn point
    let marker_mesh = meshes.add(Cuboid::new(0.3, 0.05, 0.3));
    let marker = materials.add(Color::srgb(0.1, 0.1, 0.1));
    for point in config.0.spawn_points.iter().filter(|point| point.enabled) {
        let Some(pose) = point.pose else { continue };
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(marker.clone()),
            pose_transform(pose),
            Name::new(format!("SpawnMarker ({})", point.id.name())),
        ));
    }

    commands.insert_resource(MonsterLook {
        mesh: meshes.add(Capsule3d::new(0.3, 1.2)),
        idle: materials.add(Color::srgb(0.05, 0.05, 0.05)),
        hunting: materials.add(Color::srgb(0.25, 0.02, 0.02)),
        jumpscare: materials.add(StandardMaterial {
            base_color: Color::srgb(0.6, 0.0, 0.0),
            emissive: LinearRgba::rgb(4.0, 0.0, 0.0),
            ..default()
        }),
    });
}

fn dress_monsters(
    mut commands: Commands,
    look: Res<MonsterLook>,
    monsters: Query<(Entity, &MonsterPoseTag), Added<MonsterEntity>>,
) {
    for (entity, pose) in monsters.iter() {
        commands.entity(entity).insert((
            Mesh3d(look.mesh.clone()),
            MeshMaterial3d(look.material(pose.0)),
        ));
    }
}

fn tint_monsters(
    look: Res<MonsterLook>,
    mut monsters: Query<(&MonsterPoseTag, &mut MeshMaterial3d<StandardMaterial>), Changed<MonsterPoseTag>>,
) {
    for (pose, mut material) in monsters.iter_mut() {
        material.0 = look.material(pose.0);
    }
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("06:00"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(16.0),
            ..default()
        },
        SurvivalClock,
    ));
}

fn update_hud(
    survival: Res<SurvivalRes>,
    flashlight: Res<FlashlightRes>,
    mut clock: Query<&mut Text, With<SurvivalClock>>,
) {
    for mut text in clock.iter_mut() {
        text.0 = format!("{}  battery {:.0}%", survival.0.display(), flashlight.0.battery_percentage());
    }
}

fn show_banner(mut commands: Commands, message: &str) {
    commands.spawn((
        Text::new(message),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(45.0),
            left: Val::Percent(30.0),
            ..default()
        },
    ));
}
