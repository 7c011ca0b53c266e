use bevy::prelude::*;
use crate::event_system::haunt_events::*;

pub struct EventSystemPlugin;

impl Plugin for EventSystemPlugin {
    fn build(&self, app: &mut App) {
        // Outbound: what the haunt tells the presentation layer
        app.add_event::<HauntEvent>()
            .add_event::<MonsterPoseEvent>()
            .add_event::<SoundCueEvent>()
            .add_event::<SceneTransitionEvent>();
        // Inbound: commands from the app's input layer
        app.add_event::<ViewCommandEvent>()
            .add_event::<FlashlightToggleEvent>()
            .add_event::<AppearanceRequestEvent>();
    }
}
