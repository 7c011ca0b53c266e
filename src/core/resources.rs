use std::collections::HashSet;
use bevy::prelude::*;
use bevy_prng::WyRand;
use crate::core::haunt_config::HauntConfig;
use crate::core::haunt_error::Binding;
use crate::monster::session::HauntSession;
use crate::player::bed_camera::BedCameraRig;
use crate::player::flashlight::Flashlight;
use crate::player::survival::{ScareDelay, SurvivalTimer};

#[derive(Resource, Debug, Clone)]
pub struct HauntConfigRes(pub HauntConfig);

#[derive(Resource)]
pub struct HauntSessionRes(pub HauntSession<WyRand>);

#[derive(Resource)]
pub struct FlashlightRes(pub Flashlight);

#[derive(Resource)]
pub struct BedCameraRes(pub BedCameraRig);

#[derive(Resource)]
pub struct SurvivalRes(pub SurvivalTimer);

#[derive(Resource)]
pub struct ScareDelayRes(pub ScareDelay);

// Missing bindings are reported once per session, not every frame.
#[derive(Resource, Default)]
pub struct BindingReport {
    reported: HashSet<Binding>,
}

impl BindingReport {
    /// True the first time `binding` is noted.
    pub fn note(&mut self, binding: Binding) -> bool {
        self.reported.insert(binding)
    }

    pub fn clear(&mut self, binding: Binding) {
        self.reported.remove(&binding);
    }
}
