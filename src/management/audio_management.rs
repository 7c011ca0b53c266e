use bevy::prelude::*;
use bevy_kira_audio::prelude::AudioSource;
use bevy_kira_audio::{AudioApp, AudioChannel, AudioControl};
use crate::audio::ambient_bank::AmbientChannel;
use crate::core::haunt_error::{Binding, HauntError};
use crate::core::resources::{BindingReport, HauntConfigRes, HauntSessionRes};
use crate::core::spawn_point::AmbientChannelId;
use crate::event_system::haunt_events::SoundCueEvent;

#[derive(Resource)]
pub struct WindowAmbience;

#[derive(Resource)]
pub struct DoorAmbience;

#[derive(Resource)]
pub struct ClockAmbience;

#[derive(Resource)]
pub struct SoundEffects;

/// Plays the ambient loops through kira and keeps them in step with the ambient bank.
/// Needs `bevy_kira_audio::AudioPlugin` and `HauntPlugin` in the app.
pub struct AmbiencePlugin;

impl Plugin for AmbiencePlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_channel::<WindowAmbience>()
            .add_audio_channel::<DoorAmbience>()
            .add_audio_channel::<ClockAmbience>()
            .add_audio_channel::<SoundEffects>()
            .init_resource::<MirroredChannels>()
            .add_systems(Startup, start_ambient_loops)
            .add_systems(Update, (mirror_ambient_bank, play_sound_cues));
    }
}

/// Last channel state pushed to kira.
#[derive(Resource, Default)]
pub struct MirroredChannels([Option<AmbientChannel>; AmbientChannelId::COUNT]);

pub fn start_ambient_loops(
    config: Res<HauntConfigRes>,
    asset_server: Res<AssetServer>,
    window: Res<AudioChannel<WindowAmbience>>,
    door: Res<AudioChannel<DoorAmbience>>,
    clock: Res<AudioChannel<ClockAmbience>>,
) {
    for channel in &config.0.channels {
        let Some(path) = channel.sound.as_deref() else {
            warn!("[Ambience] channel '{}' has no loop sound", channel.id.name());
            continue;
        };
        let handle: Handle<AudioSource> = asset_server.load(path.to_string());
        let volume = channel.nominal_volume as f64;
        match channel.id {
            AmbientChannelId::Window => { window.play(handle).looped().with_volume(volume); }
            AmbientChannelId::Door => { door.play(handle).looped().with_volume(volume); }
            AmbientChannelId::Clock => { clock.play(handle).looped().with_volume(volume); }
        }
    }
}

pub fn mirror_ambient_bank(
    session: Res<HauntSessionRes>,
    mut mirrored: ResMut<MirroredChannels>,
    window: Res<AudioChannel<WindowAmbience>>,
    door: Res<AudioChannel<DoorAmbience>>,
    clock: Res<AudioChannel<ClockAmbience>>,
) {
    for (id, channel) in session.0.bank().channels() {
        let last = &mut mirrored.0[id.index()];
        match id {
            AmbientChannelId::Window => mirror_channel(&window, channel, last),
            AmbientChannelId::Door => mirror_channel(&door, channel, last),
            AmbientChannelId::Clock => mirror_channel(&clock, channel, last),
        }
    }
}

fn mirror_channel<T: Resource>(audio: &AudioChannel<T>, channel: &AmbientChannel, last: &mut Option<AmbientChannel>) {
    if last.as_ref() == Some(channel) {
        return;
    }
    let was_playing = last.map_or(true, |previous| previous.playing);
    if channel.playing && !was_playing {
        audio.resume();
    } else if !channel.playing && was_playing {
        audio.pause();
    }
    audio.set_volume(channel.volume as f64);
    *last = Some(*channel);
}

pub fn play_sound_cues(
    mut cue_reader: EventReader<SoundCueEvent>,
    config: Res<HauntConfigRes>,
    asset_server: Res<AssetServer>,
    sfx: Res<AudioChannel<SoundEffects>>,
    mut report: ResMut<BindingReport>,
) {
    for SoundCueEvent(cue) in cue_reader.read() {
        match config.0.sounds.path(*cue) {
            Some(path) => {
                let handle: Handle<AudioSource> = asset_server.load(path.to_string());
                sfx.play(handle);
            }
            None => {
                if report.note(Binding::Sound(*cue)) {
                    warn!("[Ambience] {}", HauntError::MissingBinding(Binding::Sound(*cue)));
                }
            }
        }
    }
}
