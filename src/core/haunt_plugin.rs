use bevy::app::{App, Plugin};
use bevy::prelude::*;

use crate::core::haunt_config::HauntConfig;
use crate::core::resources::*;
use crate::event_system::event_system_plugin::EventSystemPlugin;
use crate::management::config_management::load_config;
use crate::monster::session::HauntSession;
use crate::player::bed_camera::BedCameraRig;
use crate::player::flashlight::Flashlight;
use crate::player::survival::{GamePhase, ScareDelay, SurvivalTimer};
use crate::spawning::helpers::seeded_rng;
use crate::systems::haunt_systems::*;
use crate::systems::player_systems::*;

#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    File(String),
    Inline(HauntConfig),
}

/// Session resources, events, the `GamePhase` state and the per-frame systems.
/// Needs `StatesPlugin` (part of `DefaultPlugins`).
#[derive(Default)]
pub struct HauntPlugin {
    pub config: ConfigSource,
}

impl HauntPlugin {
    pub fn from_file(path: impl Into<String>) -> Self {
        HauntPlugin { config: ConfigSource::File(path.into()) }
    }

    pub fn with_config(config: HauntConfig) -> Self {
        HauntPlugin { config: ConfigSource::Inline(config) }
    }
}

fn resolve_config(source: &ConfigSource) -> HauntConfig {
    let loaded = match source {
        ConfigSource::Default => return HauntConfig::default(),
        ConfigSource::File(path) => load_config(path),
        ConfigSource::Inline(config) => config.validate().map(|_| config.clone()),
    };
    match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("[Haunt] {}, falling back to default tuning", e);
            HauntConfig::default()
        }
    }
}

impl Plugin for HauntPlugin {
    fn build(&self, app: &mut App) {
        let config = resolve_config(&self.config);
        let (session, diagnostics) = HauntSession::from_config(&config, seeded_rng(&config.seed));
        for diagnostic in &diagnostics {
            warn!("[Haunt] {}", diagnostic);
        }

        app
            .insert_resource(HauntSessionRes(session))
            .insert_resource(FlashlightRes(Flashlight::new(config.flashlight)))
            .insert_resource(BedCameraRes(BedCameraRig::new(config.camera)))
            .insert_resource(SurvivalRes(SurvivalTimer::new(config.survival.survive_seconds)))
            .insert_resource(ScareDelayRes(ScareDelay::new(config.survival.scare_delay)))
            .insert_resource(HauntConfigRes(config))
            .init_resource::<BindingReport>()
            .add_plugins(EventSystemPlugin)
            .init_state::<GamePhase>();

        app.add_systems(Update, (
            handle_view_commands,
            handle_flashlight_toggle,
            advance_flashlight,
            advance_bed_camera,
            advance_haunt,
            sync_monster_entities,
            advance_survival,
        ).chain().run_if(in_state(GamePhase::Playing)));

        app.add_systems(Update, advance_scare_delay.run_if(in_state(GamePhase::JumpScare)));
        app.add_systems(Update, apply_scene_transitions);

        app.add_systems(OnEnter(GamePhase::Won), end_haunt_session);
        app.add_systems(OnEnter(GamePhase::Lost), end_haunt_session);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use super::*;
    use crate::core::components::{MonsterEntity, MonsterPoseTag, PlayerAnchor};
    use crate::core::haunt_config::SpawnPointConfig;
    use crate::core::seeded_or_not::SeededOrNot;
    use crate::core::spawn_point::{SpawnPointId, SpawnPose};
    use crate::event_system::haunt_events::SceneTransitionEvent;
    use crate::monster::agent::MonsterPose;

    fn quick_config() -> HauntConfig {
        let mut config = HauntConfig::default();
        config.seed = SeededOrNot::Seeded(132);
        config.cadence.min_wait = 0.5;
        config.cadence.max_wait = 0.5;
        config.cadence.fade_duration = 0.2;
        config.agent.dormant_duration = 0.2;
        config.survival.scare_delay = 0.5;
        config.spawn_points = vec![SpawnPointConfig {
            id: SpawnPointId::Door,
            pose: Some(SpawnPose::at(Vec3::new(0.0, 0.0, -3.0))),
            enabled: true,
            weight: None,
        }];
        config
    }

    fn app_with(config: HauntConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin, bevy::transform::TransformPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
            .add_plugins(HauntPlugin::with_config(config));
        app
    }

    fn phase(app: &App) -> GamePhase {
        *app.world().resource::<State<GamePhase>>().get()
    }

    #[test]
    fn caught_player_goes_through_jump_scare_to_lost() {
        let mut app = app_with(quick_config());
        app.world_mut().spawn((PlayerAnchor, Transform::default()));

        let mut saw_monster = false;
        let mut saw_jumpscare = false;
        for _ in 0..400 {
            app.update();
            let mut monsters = app.world_mut().query::<(&MonsterEntity, &MonsterPoseTag)>();
            for (monster, pose) in monsters.iter(app.world()) {
                assert_eq!(monster.spawn_point, SpawnPointId::Door);
                saw_monster = true;
                saw_jumpscare |= pose.0 == MonsterPose::Jumpscare;
            }
            if phase(&app) == GamePhase::Lost {
                break;
            }
        }

        assert!(saw_monster);
        assert!(saw_jumpscare);
        assert_eq!(phase(&app), GamePhase::Lost);

        app.update();
        let mut monsters = app.world_mut().query::<&MonsterEntity>();
        assert_eq!(monsters.iter(app.world()).count(), 0);
    }

    #[test]
    fn surviving_the_timer_wins() {
        let mut config = quick_config();
        config.survival.survive_seconds = 1.0;
        config.cadence.min_wait = 30.0;
        config.cadence.max_wait = 30.0;
        let mut app = app_with(config);

        for _ in 0..100 {
            app.update();
            if phase(&app) == GamePhase::Won {
                break;
            }
        }
        assert_eq!(phase(&app), GamePhase::Won);
        assert!(!app.world().resource::<HauntSessionRes>().0.is_monster_active());
    }

    fn catch_as_the_clock_runs_out(
        mut next: ResMut<NextState<GamePhase>>,
        mut transition_writer: EventWriter<SceneTransitionEvent>,
    ) {
        next.set(GamePhase::JumpScare);
        transition_writer.send(SceneTransitionEvent::Win);
    }

    #[test]
    fn catch_on_the_winning_frame_still_loses() {
        let mut config = quick_config();
        config.cadence.min_wait = 30.0;
        config.cadence.max_wait = 30.0;
        let mut app = app_with(config);
        app.add_systems(
            Update,
            catch_as_the_clock_runs_out
                .before(apply_scene_transitions)
                .run_if(in_state(GamePhase::Playing)),
        );

        let mut phases = Vec::new();
        for _ in 0..40 {
            app.update();
            phases.push(phase(&app));
        }
        assert!(!phases.contains(&GamePhase::Won), "{:?}", phases);
        assert!(phases.contains(&GamePhase::JumpScare));
        assert_eq!(phase(&app), GamePhase::Lost);
    }

    #[test]
    fn non_finite_inline_config_falls_back_instead_of_panicking() {
        let mut config = quick_config();
        config.cadence.max_wait = f32::INFINITY;
        let app = app_with(config);
        let applied = &app.world().resource::<HauntConfigRes>().0;
        assert_eq!(applied.cadence.max_wait, 10.0);
        assert!(app.world().resource::<HauntSessionRes>().0.scheduler().countdown().is_some());
    }

    #[test]
    fn invalid_inline_config_falls_back_to_defaults() {
        let mut config = quick_config();
        config.cadence.min_wait = 50.0;
        let app = app_with(config);
        let applied = &app.world().resource::<HauntConfigRes>().0;
        assert_eq!(applied.cadence.min_wait, 5.0);
        assert_eq!(applied.spawn_points.len(), SpawnPointId::COUNT);
    }
}
