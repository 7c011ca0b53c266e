use bevy::log::debug;
use crate::core::haunt_config::HauntConfig;
use crate::core::haunt_error::{Binding, HauntError};
use crate::core::spawn_point::{AmbientChannelId, ChannelTarget};

/// One looping ambient source in the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientChannel {
    pub volume: f32,
    pub nominal: f32,
    pub playing: bool,
}

impl AmbientChannel {
    pub fn new(nominal: f32) -> Self {
        let nominal = nominal.clamp(0.0, 1.0);
        AmbientChannel { volume: nominal, nominal, playing: true }
    }

    pub fn audible_volume(&self) -> f32 {
        if self.playing { self.volume } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FadeHandle(u64);

#[derive(Debug, Clone)]
struct FadeParticipant {
    channel: AmbientChannelId,
    start: f32,
    restore_to: f32,
}

#[derive(Debug, Clone)]
struct Fade {
    handle: FadeHandle,
    duration: f32,
    elapsed: f32,
    participants: Vec<FadeParticipant>,
}

impl Fade {
    fn ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }
}

/// Owns the ambient channels and every fade in flight.
///
/// All participants of one fade share a single elapsed accumulator, so an
/// aggregate fade silences every channel on the same tick.
#[derive(Debug, Clone, Default)]
pub struct AmbientAudioBank {
    channels: [Option<AmbientChannel>; AmbientChannelId::COUNT],
    fades: Vec<Fade>,
    next_handle: u64,
}

impl AmbientAudioBank {
    pub fn new(channels: impl IntoIterator<Item = (AmbientChannelId, f32)>) -> Self {
        let mut bank = AmbientAudioBank::default();
        for (id, nominal) in channels {
            bank.channels[id.index()] = Some(AmbientChannel::new(nominal));
        }
        bank
    }

    pub fn from_config(config: &HauntConfig) -> (Self, Vec<HauntError>) {
        let bank = AmbientAudioBank::new(
            config.channels.iter().map(|channel| (channel.id, channel.nominal_volume)),
        );
        let diagnostics = AmbientChannelId::ALL
            .into_iter()
            .filter(|id| bank.channel(*id).is_none())
            .map(|id| HauntError::MissingBinding(Binding::Channel(id)))
            .collect();
        (bank, diagnostics)
    }

    pub fn channel(&self, id: AmbientChannelId) -> Option<&AmbientChannel> {
        self.channels[id.index()].as_ref()
    }

    pub fn channels(&self) -> impl Iterator<Item = (AmbientChannelId, &AmbientChannel)> {
        AmbientChannelId::ALL
            .into_iter()
            .filter_map(move |id| self.channel(id).map(|channel| (id, channel)))
    }

    pub fn is_fading(&self, id: AmbientChannelId) -> bool {
        self.fades.iter().any(|fade| fade.participants.iter().any(|p| p.channel == id))
    }

    /// Starts ramping every playing channel of `target` to silence over `duration` seconds.
    /// Returns immediately; poll `is_fade_complete` with the handle.
    pub fn fade_out(&mut self, target: ChannelTarget, duration: f32) -> FadeHandle {
        let handle = FadeHandle(self.next_handle);
        self.next_handle += 1;

        let mut participants = Vec::new();
        for id in target.channels() {
            let Some(channel) = self.channels[id.index()] else {
                debug!("[Ambience] fade skipped unbound channel '{}'", id.name());
                continue;
            };
            if !channel.playing {
                continue;
            }
            // A channel already fading keeps the volume it will eventually come back to.
            let restore_to = self.take_participant(id).map_or(channel.volume, |p| p.restore_to);
            participants.push(FadeParticipant { channel: id, start: channel.volume, restore_to });
        }

        let fade = Fade { handle, duration, elapsed: 0.0, participants };
        let silent = fade.participants.iter().all(|p| p.start <= 0.0);
        if silent || fade.duration <= 0.0 {
            debug!("[Ambience] fade {:?} on {:?} completed immediately", handle, target);
            self.finish(&fade);
        } else {
            debug!("[Ambience] fade {:?} on {:?} over {}s", handle, target, duration);
            self.fades.push(fade);
        }
        handle
    }

    pub fn tick(&mut self, dt: f32) {
        let mut finished = Vec::new();
        for fade in &mut self.fades {
            fade.elapsed += dt;
            let ratio = fade.ratio();
            for participant in &fade.participants {
                if let Some(channel) = self.channels[participant.channel.index()].as_mut() {
                    channel.volume = lerp(participant.start, 0.0, ratio);
                }
            }
            if ratio >= 1.0 {
                finished.push(fade.handle);
            }
        }

        for handle in finished {
            if let Some(index) = self.fades.iter().position(|fade| fade.handle == handle) {
                let fade = self.fades.remove(index);
                debug!("[Ambience] fade {:?} reached silence", fade.handle);
                self.finish(&fade);
            }
        }
    }

    pub fn is_fade_complete(&self, handle: FadeHandle) -> bool {
        handle.0 < self.next_handle && !self.fades.iter().any(|fade| fade.handle == handle)
    }

    pub fn fade_progress(&self, handle: FadeHandle) -> Option<f32> {
        if handle.0 >= self.next_handle {
            return None;
        }
        Some(
            self.fades
                .iter()
                .find(|fade| fade.handle == handle)
                .map_or(1.0, Fade::ratio),
        )
    }

    /// Back to nominal volume and playing. Safe to call repeatedly.
    pub fn restore(&mut self, target: ChannelTarget) {
        for id in target.channels() {
            self.take_participant(id);
            match self.channels[id.index()].as_mut() {
                Some(channel) => {
                    channel.volume = channel.nominal;
                    channel.playing = true;
                }
                None => debug!("[Ambience] restore skipped unbound channel '{}'", id.name()),
            }
        }
    }

    pub fn stop(&mut self, id: AmbientChannelId) {
        let participant = self.take_participant(id);
        if let Some(channel) = self.channels[id.index()].as_mut() {
            if let Some(participant) = participant {
                channel.volume = participant.restore_to;
            }
            channel.playing = false;
        }
    }

    fn finish(&mut self, fade: &Fade) {
        for participant in &fade.participants {
            if let Some(channel) = self.channels[participant.channel.index()].as_mut() {
                channel.playing = false;
                channel.volume = participant.restore_to;
            }
        }
    }

    // Pulls the channel out of whatever fade holds it; an emptied fade counts as complete.
    fn take_participant(&mut self, id: AmbientChannelId) -> Option<FadeParticipant> {
        let mut taken = None;
        for fade in &mut self.fades {
            if let Some(index) = fade.participants.iter().position(|p| p.channel == id) {
                taken = Some(fade.participants.remove(index));
            }
        }
        self.fades.retain(|fade| !fade.participants.is_empty());
        taken
    }
}

fn lerp(from: f32, to: f32, ratio: f32) -> f32 {
    from + (to - from) * ratio
}
