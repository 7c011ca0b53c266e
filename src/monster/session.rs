use bevy::math::Vec3;
use rand::Rng;
use crate::audio::ambient_bank::AmbientAudioBank;
use crate::core::haunt_config::HauntConfig;
use crate::core::haunt_error::HauntError;
use crate::core::spawn_point::{SpawnPointId, SpawnRegistry};
use crate::monster::agent::{AgentSettings, MonsterAgent};
use crate::monster::light_cone::FlashlightState;
use crate::monster::scheduler::{AppearanceRequest, CadenceSettings, HauntContext, HauntSignal, MonsterAppearanceScheduler};

/// Registry, ambient bank, scheduler and RNG for one game session.
#[derive(Debug, Clone)]
pub struct HauntSession<R: Rng> {
    registry: SpawnRegistry,
    bank: AmbientAudioBank,
    scheduler: MonsterAppearanceScheduler,
    rng: R,
    signals: Vec<HauntSignal>,
}

impl<R: Rng> HauntSession<R> {
    pub fn new(
        registry: SpawnRegistry,
        bank: AmbientAudioBank,
        cadence: CadenceSettings,
        agent_settings: AgentSettings,
        mut rng: R,
    ) -> Self {
        let scheduler = MonsterAppearanceScheduler::new(cadence, agent_settings, &mut rng);
        HauntSession { registry, bank, scheduler, rng, signals: Vec::new() }
    }

    /// Builds the session and returns the missing-binding diagnostics found on the way.
    pub fn from_config(config: &HauntConfig, rng: R) -> (Self, Vec<HauntError>) {
        let (registry, mut diagnostics) = SpawnRegistry::from_config(config);
        let (bank, channel_diagnostics) = AmbientAudioBank::from_config(config);
        diagnostics.extend(channel_diagnostics);
        (HauntSession::new(registry, bank, config.cadence, config.agent, rng), diagnostics)
    }

    /// Advances fades first, then the scheduler, and hands back every signal
    /// raised since the previous tick.
    pub fn tick(&mut self, dt: f32, player: Option<Vec3>, flashlight: Option<FlashlightState>) -> Vec<HauntSignal> {
        self.bank.tick(dt);
        let mut ctx = HauntContext {
            bank: &mut self.bank,
            registry: &self.registry,
            rng: &mut self.rng,
            player,
            flashlight,
            signals: &mut self.signals,
        };
        self.scheduler.tick(dt, &mut ctx);
        std::mem::take(&mut self.signals)
    }

    pub fn request_appearance(&mut self, point: Option<SpawnPointId>) -> AppearanceRequest {
        let mut ctx = HauntContext {
            bank: &mut self.bank,
            registry: &self.registry,
            rng: &mut self.rng,
            player: None,
            flashlight: None,
            signals: &mut self.signals,
        };
        self.scheduler.request_appearance(point, &mut ctx)
    }

    pub fn reset(&mut self) {
        self.signals.clear();
        self.scheduler.reset(&mut self.bank, &mut self.rng);
    }

    pub fn registry(&self) -> &SpawnRegistry {
        &self.registry
    }

    pub fn bank(&self) -> &AmbientAudioBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut AmbientAudioBank {
        &mut self.bank
    }

    pub fn scheduler(&self) -> &MonsterAppearanceScheduler {
        &self.scheduler
    }

    pub fn live_agent(&self) -> Option<&MonsterAgent> {
        self.scheduler.live_agent()
    }

    pub fn is_monster_active(&self) -> bool {
        self.scheduler.is_monster_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_prng::WyRand;
    use rand_core::SeedableRng;
    use crate::core::spawn_point::{AmbientChannelId, SpawnPose};
    use crate::monster::agent::{AgentState, MonsterPose};
    use crate::monster::scheduler::DespawnCause;

    const DT: f32 = 1.0 / 60.0;

    fn spawn_position(id: SpawnPointId) -> Vec3 {
        match id {
            SpawnPointId::Window => Vec3::new(-6.0, 0.0, 0.0),
            SpawnPointId::Door => Vec3::new(0.0, 0.0, -6.0),
            SpawnPointId::Clock => Vec3::new(6.0, 0.0, 0.0),
            SpawnPointId::UnderBed => Vec3::new(0.0, 0.0, 5.0),
        }
    }

    fn session(seed: u64) -> HauntSession<WyRand> {
        let registry = SpawnRegistry::new(SpawnPointId::ALL.map(|id| (id, SpawnPose::at(spawn_position(id)))));
        let bank = AmbientAudioBank::new(AmbientChannelId::ALL.map(|id| (id, 0.9)));
        HauntSession::new(
            registry,
            bank,
            CadenceSettings::default(),
            AgentSettings::default(),
            WyRand::seed_from_u64(seed),
        )
    }

    fn beam_at(point: SpawnPointId) -> FlashlightState {
        FlashlightState {
            on: true,
            origin: Vec3::ZERO,
            forward: spawn_position(point).normalize(),
            half_angle: 22.5f32.to_radians(),
            range: 10.0,
        }
    }

    #[test]
    fn first_appearance_starts_once_after_the_drawn_wait() {
        let mut session = session(132);
        let countdown = session.scheduler().countdown().unwrap();

        let mut elapsed = 0.0;
        let mut started = Vec::new();
        while started.is_empty() {
            started = session
                .tick(DT, None, None)
                .into_iter()
                .filter(|signal| matches!(signal, HauntSignal::AppearanceStarted { .. }))
                .collect();
            elapsed += DT;
            assert!(elapsed <= 10.0 + DT, "no appearance within the cadence bound");
        }

        assert_eq!(started.len(), 1);
        assert!(elapsed >= 5.0 - 0.001);
        assert!((elapsed - countdown).abs() <= DT + 0.001);
        assert!(session.is_monster_active());
        assert!(session.live_agent().is_none());
    }

    #[test]
    fn fade_completes_before_the_monster_spawns() {
        let mut session = session(7);
        session.request_appearance(Some(SpawnPointId::Door));

        let mut elapsed = 0.0;
        loop {
            let signals = session.tick(DT, None, None);
            elapsed += DT;
            let door = session.bank().channel(AmbientChannelId::Door).unwrap();
            if let Some(HauntSignal::MonsterSpawned { point, pose, .. }) = signals.first() {
                assert_eq!(*point, SpawnPointId::Door);
                assert_eq!(*pose, MonsterPose::IdleGeneric);
                assert_eq!(door.audible_volume(), 0.0);
                break;
            }
            assert!(session.live_agent().is_none());
            assert!(door.audible_volume() > 0.0 || elapsed >= 2.0 - 0.001);
        }

        assert!((elapsed - 2.0).abs() <= 2.0 * DT);
        assert!(session.bank().channel(AmbientChannelId::Window).unwrap().playing);
    }

    #[test]
    fn held_beam_ends_the_appearance_and_restores_sound() {
        let mut session = session(3);
        session.request_appearance(Some(SpawnPointId::Window));
        let beam = beam_at(SpawnPointId::Window);

        let mut all = Vec::new();
        for _ in 0..(6 * 60) {
            all.extend(session.tick(DT, Some(Vec3::ZERO), Some(beam)));
            if !session.is_monster_active() {
                break;
            }
        }

        assert!(matches!(
            all.last(),
            Some(HauntSignal::AppearanceEnded { point: SpawnPointId::Window, cause: DespawnCause::Light, .. })
        ));
        assert!(!all.iter().any(|signal| matches!(signal, HauntSignal::PlayerCaught { .. })));

        let window = session.bank().channel(AmbientChannelId::Window).unwrap();
        assert!(window.playing);
        assert!((window.volume - 0.9).abs() < 0.001);
        assert!(session.scheduler().countdown().is_some());
    }

    #[test]
    fn contact_catches_player_with_jumpscare() {
        let mut session = session(4);
        session.request_appearance(Some(SpawnPointId::UnderBed));

        let mut all = Vec::new();
        for _ in 0..(10 * 60) {
            all.extend(session.tick(DT, Some(Vec3::ZERO), None));
            if !session.is_monster_active() {
                break;
            }
        }

        let caught = all.iter().position(|s| matches!(s, HauntSignal::PlayerCaught { .. }));
        let ended = all.iter().position(|s| matches!(s, HauntSignal::AppearanceEnded { cause: DespawnCause::Contact, .. }));
        assert!(caught.is_some() && ended.is_some());
        assert!(caught < ended);
        assert!(all.iter().any(|s| matches!(s, HauntSignal::PoseRequested { pose: MonsterPose::Jumpscare, .. })));
        assert!(all.iter().any(|s| matches!(s, HauntSignal::MonsterSpawned { pose: MonsterPose::IdleUnderBed, .. })));

        for (_, channel) in session.bank().channels() {
            assert!(channel.playing);
            assert!((channel.volume - 0.9).abs() < 0.001);
        }
    }

    #[test]
    fn request_during_haunt_is_dropped() {
        let mut session = session(9);
        session.request_appearance(Some(SpawnPointId::Clock));
        for _ in 0..(3 * 60) {
            session.tick(DT, None, None);
        }
        let agent = session.live_agent().map(|agent| agent.id());
        assert!(agent.is_some());

        assert_eq!(session.request_appearance(Some(SpawnPointId::Door)), AppearanceRequest::Dropped);
        assert_eq!(session.live_agent().map(|agent| agent.id()), agent);
        assert!(session.bank().channel(AmbientChannelId::Door).unwrap().playing);
        assert!(session.tick(DT, None, None).iter().all(|s| !matches!(s, HauntSignal::AppearanceStarted { .. })));
    }

    #[test]
    fn at_most_one_monster_over_a_long_session() {
        let mut session = session(2024);
        let mut driver = WyRand::seed_from_u64(77);
        let mut live = 0i32;

        for tick in 0..(120 * 60) {
            if tick % 37 == 0 {
                session.request_appearance(None);
            }
            let flashlight = if driver.gen_bool(0.3) {
                Some(beam_at(SpawnPointId::ALL[driver.gen_range(0..SpawnPointId::COUNT)]))
            } else {
                None
            };
            let player = if driver.gen_bool(0.5) { Some(Vec3::ZERO) } else { None };

            for signal in session.tick(DT, player, flashlight) {
                match signal {
                    HauntSignal::MonsterSpawned { .. } => live += 1,
                    HauntSignal::AppearanceEnded { .. } => live -= 1,
                    _ => {}
                }
                assert!((0..=1).contains(&live), "live monsters: {}", live);
            }
            assert_eq!(live == 1, session.live_agent().is_some());
        }
    }

    #[test]
    fn reset_abandons_the_haunt() {
        let mut session = session(12);
        session.request_appearance(Some(SpawnPointId::Door));
        // 2 s fade then 2 s dormant
        for _ in 0..(4 * 60 + 5) {
            session.tick(DT, None, None);
            if session.live_agent().map(|agent| agent.state()) == Some(AgentState::Hunting) {
                break;
            }
        }
        assert_eq!(session.live_agent().map(|agent| agent.state()), Some(AgentState::Hunting));

        session.reset();
        assert!(!session.is_monster_active());
        assert!(session.live_agent().is_none());
        assert!(session.scheduler().countdown().is_some());
        let door = session.bank().channel(AmbientChannelId::Door).unwrap();
        assert!(door.playing);
        assert!((door.volume - 0.9).abs() < 0.001);
    }

    #[test]
    fn stopped_channel_lets_the_monster_spawn_on_the_next_tick() {
        let mut session = session(21);
        session.bank_mut().stop(AmbientChannelId::Clock);
        assert_eq!(session.request_appearance(Some(SpawnPointId::Clock)), AppearanceRequest::Started(SpawnPointId::Clock));

        let signals = session.tick(DT, None, None);
        assert!(matches!(signals.first(), Some(HauntSignal::AppearanceStarted { point: SpawnPointId::Clock })));
        assert!(signals.iter().any(|s| matches!(s, HauntSignal::MonsterSpawned { point: SpawnPointId::Clock, .. })));
        assert!(session.live_agent().is_some());
    }
}
