use bevy::prelude::*;
use crate::core::components::{FlashlightBeam, MonsterEntity, MonsterPoseTag, PlayerAnchor};
use crate::core::haunt_config::SoundCue;
use crate::core::haunt_error::{Binding, HauntError};
use crate::core::resources::{BindingReport, FlashlightRes, HauntSessionRes};
use crate::event_system::haunt_events::*;
use crate::monster::scheduler::{AppearanceRequest, DespawnCause, HauntSignal};
use crate::player::survival::GamePhase;

/// Feeds the frame delta, player position and flashlight beam into the session
/// and fans its signals out as events.
pub fn advance_haunt(
    time: Res<Time>,
    mut session: ResMut<HauntSessionRes>,
    flashlight: Res<FlashlightRes>,
    mut report: ResMut<BindingReport>,
    player_query: Query<&GlobalTransform, With<PlayerAnchor>>,
    beam_query: Query<&GlobalTransform, With<FlashlightBeam>>,
    mut request_reader: EventReader<AppearanceRequestEvent>,
    mut haunt_writer: EventWriter<HauntEvent>,
    mut pose_writer: EventWriter<MonsterPoseEvent>,
    mut cue_writer: EventWriter<SoundCueEvent>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    let player = player_query.get_single().ok().map(|transform| transform.translation());
    note_binding(&mut report, Binding::Player, player.is_some());

    let beam = beam_query
        .get_single()
        .ok()
        .map(|transform| flashlight.0.beam(transform.translation(), transform.forward().as_vec3()));
    note_binding(&mut report, Binding::Flashlight, beam.is_some());

    for request in request_reader.read() {
        match session.0.request_appearance(request.point) {
            AppearanceRequest::Started(point) => info!("[Haunt] forced appearance at {}", point.name()),
            AppearanceRequest::Dropped => debug!("[Haunt] forced appearance dropped"),
            AppearanceRequest::Unavailable => warn!("[Haunt] no spawn point available for forced appearance"),
        }
    }

    for signal in session.0.tick(time.delta_secs(), player, beam) {
        match signal {
            HauntSignal::MonsterSpawned { agent, pose, .. } | HauntSignal::PoseRequested { agent, pose } => {
                pose_writer.send(MonsterPoseEvent { agent, pose });
            }
            HauntSignal::PlayerCaught { agent } => {
                info!("[Haunt] monster {} caught the player", agent.0);
                cue_writer.send(SoundCueEvent(SoundCue::Jumpscare));
                next_phase.set(GamePhase::JumpScare);
            }
            HauntSignal::AppearanceStarted { .. } | HauntSignal::AppearanceEnded { .. } => {}
        }
        haunt_writer.send(HauntEvent(signal));
    }
}

fn note_binding(report: &mut BindingReport, binding: Binding, present: bool) {
    if present {
        report.clear(binding);
    } else if report.note(binding) {
        warn!("[Haunt] {}", HauntError::MissingBinding(binding));
    }
}

/// Keeps one entity per live monster in step with the session.
pub fn sync_monster_entities(
    mut commands: Commands,
    session: Res<HauntSessionRes>,
    mut haunt_reader: EventReader<HauntEvent>,
    mut monsters: Query<(Entity, &MonsterEntity, &mut Transform, &mut MonsterPoseTag)>,
) {
    for HauntEvent(signal) in haunt_reader.read() {
        match *signal {
            HauntSignal::MonsterSpawned { agent, point, pose } => {
                let Some(live) = session.0.live_agent() else { continue };
                commands.spawn((
                    MonsterEntity { agent, spawn_point: point },
                    MonsterPoseTag(pose),
                    Transform::from_translation(live.position()).with_rotation(live.rotation()),
                    Name::new(format!("Monster {} ({})", agent.0, point.name())),
                ));
            }
            HauntSignal::PoseRequested { agent, pose } => {
                for (_, monster, _, mut tag) in monsters.iter_mut() {
                    if monster.agent == agent {
                        tag.0 = pose;
                    }
                }
            }
            // A monster that caught the player stays up for the jump-scare.
            HauntSignal::AppearanceEnded { agent, cause: DespawnCause::Light, .. } => {
                for (entity, monster, _, _) in monsters.iter() {
                    if monster.agent == agent {
                        commands.entity(entity).despawn_recursive();
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(live) = session.0.live_agent() {
        for (_, monster, mut transform, _) in monsters.iter_mut() {
            if monster.agent == live.id() {
                transform.translation = live.position();
            }
        }
    }
}

/// Session end: abandon any appearance in flight and clear leftover monsters.
pub fn end_haunt_session(
    mut commands: Commands,
    mut session: ResMut<HauntSessionRes>,
    monsters: Query<Entity, With<MonsterEntity>>,
) {
    session.0.reset();
    for entity in monsters.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
