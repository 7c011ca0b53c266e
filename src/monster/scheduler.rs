use bevy::log::{debug, error, info, warn};
use bevy::math::Vec3;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::audio::ambient_bank::{AmbientAudioBank, FadeHandle};
use crate::core::spawn_point::{SpawnPointId, SpawnRegistry};
use crate::monster::agent::{AgentEvent, AgentId, AgentSettings, MonsterAgent, MonsterPose};
use crate::monster::light_cone::FlashlightState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CadenceSettings {
    pub min_wait: f32,
    pub max_wait: f32,
    pub fade_duration: f32,
}

impl Default for CadenceSettings {
    fn default() -> Self {
        CadenceSettings { min_wait: 5.0, max_wait: 10.0, fade_duration: 2.0 }
    }
}

/// Uniform draw over the closed interval `[min, max]`.
pub fn draw_wait<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnCause {
    Light,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HauntSignal {
    AppearanceStarted { point: SpawnPointId },
    MonsterSpawned { agent: AgentId, point: SpawnPointId, pose: MonsterPose },
    PoseRequested { agent: AgentId, pose: MonsterPose },
    AppearanceEnded { agent: AgentId, point: SpawnPointId, cause: DespawnCause },
    PlayerCaught { agent: AgentId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceRequest {
    Started(SpawnPointId),
    /// An appearance is already in flight; nothing was queued.
    Dropped,
    Unavailable,
}

/// Everything the scheduler reads or drives during one tick.
pub struct HauntContext<'a, R: Rng + ?Sized> {
    pub bank: &'a mut AmbientAudioBank,
    pub registry: &'a SpawnRegistry,
    pub rng: &'a mut R,
    pub player: Option<Vec3>,
    pub flashlight: Option<FlashlightState>,
    pub signals: &'a mut Vec<HauntSignal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerPhase {
    Idle { countdown: f32 },
    FadingOut { point: SpawnPointId, fade: FadeHandle },
    Haunting { point: SpawnPointId, agent: MonsterAgent },
}

impl SchedulerPhase {
    fn name(&self) -> &'static str {
        match self {
            SchedulerPhase::Idle { .. } => "Idle",
            SchedulerPhase::FadingOut { .. } => "FadingOut",
            SchedulerPhase::Haunting { .. } => "Haunting",
        }
    }
}

/// Drives the appearance cadence. The live agent is owned by the phase itself,
/// so there can never be more than one.
#[derive(Debug, Clone)]
pub struct MonsterAppearanceScheduler {
    phase: SchedulerPhase,
    cadence: CadenceSettings,
    agent_settings: AgentSettings,
    next_agent: u64,
}

impl MonsterAppearanceScheduler {
    pub fn new<R: Rng + ?Sized>(cadence: CadenceSettings, agent_settings: AgentSettings, rng: &mut R) -> Self {
        let countdown = draw_wait(rng, cadence.min_wait, cadence.max_wait);
        MonsterAppearanceScheduler {
            phase: SchedulerPhase::Idle { countdown },
            cadence,
            agent_settings,
            next_agent: 0,
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, ctx: &mut HauntContext<'_, R>) {
        match &mut self.phase {
            SchedulerPhase::Idle { countdown } => {
                *countdown -= dt;
                if *countdown <= 0.0 {
                    match ctx.registry.choose(&mut *ctx.rng) {
                        Some(point) => self.begin(point, ctx),
                        None => {
                            warn!("[Haunt] no enabled spawn point, waiting for the next cycle");
                            self.rearm(&mut *ctx.rng);
                        }
                    }
                }
            }
            SchedulerPhase::FadingOut { point, fade } => {
                let (point, fade) = (*point, *fade);
                if ctx.bank.is_fade_complete(fade) {
                    self.spawn_agent(point, ctx);
                }
            }
            SchedulerPhase::Haunting { point, agent } => {
                let point = *point;
                let events = agent.tick(dt, ctx.player, ctx.flashlight.as_ref());
                let id = agent.id();

                let mut cause = None;
                for event in events {
                    match event {
                        AgentEvent::PoseRequested(pose) => {
                            ctx.signals.push(HauntSignal::PoseRequested { agent: id, pose });
                        }
                        AgentEvent::StartedHunting => debug!("[Haunt] monster {} is hunting", id.0),
                        AgentEvent::Vanished => cause = Some(DespawnCause::Light),
                        AgentEvent::CaughtPlayer => {
                            ctx.signals.push(HauntSignal::PlayerCaught { agent: id });
                            cause = Some(DespawnCause::Contact);
                        }
                    }
                }

                if let Some(cause) = cause {
                    self.finish(point, id, cause, ctx);
                }
            }
        }
    }

    /// Out-of-band cadence fire. Ignored while an appearance is in flight.
    pub fn request_appearance<R: Rng + ?Sized>(
        &mut self,
        point: Option<SpawnPointId>,
        ctx: &mut HauntContext<'_, R>,
    ) -> AppearanceRequest {
        if self.is_monster_active() {
            debug!("[Haunt] appearance request dropped, {} in progress", self.phase.name());
            return AppearanceRequest::Dropped;
        }

        let Some(point) = point.or_else(|| ctx.registry.choose(&mut *ctx.rng)) else {
            return AppearanceRequest::Unavailable;
        };
        if ctx.registry.pose(point).is_none() {
            warn!("[Haunt] spawn point '{}' has no pose, request ignored", point.name());
            return AppearanceRequest::Unavailable;
        }

        self.begin(point, ctx);
        AppearanceRequest::Started(point)
    }

    /// Abandons any appearance in flight, brings its sound back and re-arms the countdown.
    pub fn reset<R: Rng + ?Sized>(&mut self, bank: &mut AmbientAudioBank, rng: &mut R) {
        if let Some(point) = self.active_point() {
            info!("[Haunt] {} -> Idle (reset)", self.phase.name());
            bank.restore(point.channel_target());
        }
        self.rearm(rng);
    }

    pub fn phase(&self) -> &SchedulerPhase {
        &self.phase
    }

    pub fn is_monster_active(&self) -> bool {
        !matches!(self.phase, SchedulerPhase::Idle { .. })
    }

    pub fn countdown(&self) -> Option<f32> {
        match self.phase {
            SchedulerPhase::Idle { countdown } => Some(countdown),
            _ => None,
        }
    }

    pub fn active_point(&self) -> Option<SpawnPointId> {
        match &self.phase {
            SchedulerPhase::Idle { .. } => None,
            SchedulerPhase::FadingOut { point, .. } | SchedulerPhase::Haunting { point, .. } => Some(*point),
        }
    }

    pub fn live_agent(&self) -> Option<&MonsterAgent> {
        match &self.phase {
            SchedulerPhase::Haunting { agent, .. } => Some(agent),
            _ => None,
        }
    }

    pub fn cadence(&self) -> CadenceSettings {
        self.cadence
    }

    fn begin<R: Rng + ?Sized>(&mut self, point: SpawnPointId, ctx: &mut HauntContext<'_, R>) {
        let fade = ctx.bank.fade_out(point.channel_target(), self.cadence.fade_duration);
        info!("[Haunt] Idle -> FadingOut ({})", point.name());
        self.phase = SchedulerPhase::FadingOut { point, fade };
        ctx.signals.push(HauntSignal::AppearanceStarted { point });
    }

    fn spawn_agent<R: Rng + ?Sized>(&mut self, point: SpawnPointId, ctx: &mut HauntContext<'_, R>) {
        let Some(pose) = ctx.registry.pose(point) else {
            error!("[Haunt] spawn point '{}' lost its pose mid-sequence", point.name());
            ctx.bank.restore(point.channel_target());
            self.rearm(&mut *ctx.rng);
            return;
        };

        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        let (agent, pose_request) = MonsterAgent::spawn(id, point, pose, self.agent_settings);
        info!("[Haunt] FadingOut -> Haunting (monster {} at {})", id.0, point.name());
        self.phase = SchedulerPhase::Haunting { point, agent };
        ctx.signals.push(HauntSignal::MonsterSpawned { agent: id, point, pose: pose_request });
    }

    fn finish<R: Rng + ?Sized>(
        &mut self,
        point: SpawnPointId,
        agent: AgentId,
        cause: DespawnCause,
        ctx: &mut HauntContext<'_, R>,
    ) {
        ctx.bank.restore(point.channel_target());
        info!("[Haunt] Haunting -> Idle (monster {} ended by {:?})", agent.0, cause);
        ctx.signals.push(HauntSignal::AppearanceEnded { agent, point, cause });
        self.rearm(&mut *ctx.rng);
    }

    fn rearm<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let countdown = draw_wait(rng, self.cadence.min_wait, self.cadence.max_wait);
        debug!("[Haunt] next appearance in {:.2}s", countdown);
        self.phase = SchedulerPhase::Idle { countdown };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_prng::WyRand;
    use rand_core::SeedableRng;
    use crate::core::spawn_point::{AmbientChannelId, SpawnPose};

    fn registry() -> SpawnRegistry {
        SpawnRegistry::new(SpawnPointId::ALL.map(|id| (id, SpawnPose::at(Vec3::new(0.0, 0.0, -6.0)))))
    }

    fn bank() -> AmbientAudioBank {
        AmbientAudioBank::new(AmbientChannelId::ALL.map(|id| (id, 1.0)))
    }

    #[test]
    fn drawn_waits_stay_within_bounds() {
        let mut rng = WyRand::seed_from_u64(132);
        for (min, max) in [(5.0, 10.0), (0.0, 0.5), (3.0, 3.0), (0.1, 60.0)] {
            for _ in 0..1000 {
                let wait = draw_wait(&mut rng, min, max);
                assert!(wait >= min && wait <= max, "{} outside [{}, {}]", wait, min, max);
            }
        }
    }

    #[test]
    fn new_scheduler_starts_idle_with_a_drawn_countdown() {
        let mut rng = WyRand::seed_from_u64(5);
        let scheduler = MonsterAppearanceScheduler::new(CadenceSettings::default(), AgentSettings::default(), &mut rng);
        let countdown = scheduler.countdown().unwrap();
        assert!((5.0..=10.0).contains(&countdown));
        assert!(!scheduler.is_monster_active());
    }

    #[test]
    fn request_while_active_is_dropped_without_side_effects() {
        let mut rng = WyRand::seed_from_u64(11);
        let registry = registry();
        let mut bank = bank();
        let mut signals = Vec::new();
        let mut scheduler = MonsterAppearanceScheduler::new(CadenceSettings::default(), AgentSettings::default(), &mut rng);

        let mut ctx = HauntContext {
            bank: &mut bank,
            registry: &registry,
            rng: &mut rng,
            player: None,
            flashlight: None,
            signals: &mut signals,
        };
        assert_eq!(
            scheduler.request_appearance(Some(SpawnPointId::Door), &mut ctx),
            AppearanceRequest::Started(SpawnPointId::Door)
        );
        let before = scheduler.phase().clone();

        assert_eq!(
            scheduler.request_appearance(Some(SpawnPointId::Window), &mut ctx),
            AppearanceRequest::Dropped
        );
        assert_eq!(scheduler.phase(), &before);
        assert_eq!(signals, vec![HauntSignal::AppearanceStarted { point: SpawnPointId::Door }]);
        assert!(bank.is_fading(AmbientChannelId::Door));
        assert!(!bank.is_fading(AmbientChannelId::Window));
    }

    #[test]
    fn request_on_unbound_point_is_unavailable() {
        let mut rng = WyRand::seed_from_u64(2);
        let registry = SpawnRegistry::new([(SpawnPointId::Window, SpawnPose::default())]);
        let mut bank = bank();
        let mut signals = Vec::new();
        let mut scheduler = MonsterAppearanceScheduler::new(CadenceSettings::default(), AgentSettings::default(), &mut rng);
        let mut ctx = HauntContext {
            bank: &mut bank,
            registry: &registry,
            rng: &mut rng,
            player: None,
            flashlight: None,
            signals: &mut signals,
        };

        assert_eq!(
            scheduler.request_appearance(Some(SpawnPointId::Clock), &mut ctx),
            AppearanceRequest::Unavailable
        );
        assert!(!scheduler.is_monster_active());
        assert!(signals.is_empty());
    }

    #[test]
    fn empty_registry_rearms_instead_of_stalling() {
        let mut rng = WyRand::seed_from_u64(8);
        let registry = SpawnRegistry::new(std::iter::empty());
        let mut bank = bank();
        let mut signals = Vec::new();
        let mut scheduler = MonsterAppearanceScheduler::new(CadenceSettings::default(), AgentSettings::default(), &mut rng);
        let mut ctx = HauntContext {
            bank: &mut bank,
            registry: &registry,
            rng: &mut rng,
            player: None,
            flashlight: None,
            signals: &mut signals,
        };

        scheduler.tick(11.0, &mut ctx);
        assert!(!scheduler.is_monster_active());
        assert!(scheduler.countdown().unwrap() >= 5.0);
        assert!(signals.is_empty());
    }

    #[test]
    fn reset_restores_the_faded_channel() {
        let mut rng = WyRand::seed_from_u64(21);
        let registry = registry();
        let mut bank = bank();
        let mut signals = Vec::new();
        let mut scheduler = MonsterAppearanceScheduler::new(CadenceSettings::default(), AgentSettings::default(), &mut rng);
        {
            let mut ctx = HauntContext {
                bank: &mut bank,
                registry: &registry,
                rng: &mut rng,
                player: None,
                flashlight: None,
                signals: &mut signals,
            };
            scheduler.request_appearance(Some(SpawnPointId::UnderBed), &mut ctx);
        }
        bank.tick(1.0);

        scheduler.reset(&mut bank, &mut rng);
        assert!(!scheduler.is_monster_active());
        for (_, channel) in bank.channels() {
            assert!(channel.playing);
            assert_eq!(channel.volume, 1.0);
        }
    }
}
