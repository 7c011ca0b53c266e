use bevy::prelude::*;
use bevy_prng::WyRand;
use rand_core::SeedableRng;
use crate::core::seeded_or_not::SeededOrNot;
use crate::core::spawn_point::SpawnPose;

pub fn seeded_rng(seed: &SeededOrNot) -> WyRand {
    WyRand::seed_from_u64(seed.resolve())
}

/// Straight-line step toward `target` that never overshoots it.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        target
    } else {
        current + offset / distance * max_delta
    }
}

// Interpolation factors are clamped to [0, 1], so large frame deltas snap to the target.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

pub fn lerp_vec3(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

/// Signed shortest difference between two angles in degrees, in `(-180, 180]`.
pub fn delta_angle_degrees(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Interpolates between two angles in degrees along the shortest arc.
pub fn lerp_angle_degrees(from: f32, to: f32, t: f32) -> f32 {
    from + delta_angle_degrees(from, to) * t.clamp(0.0, 1.0)
}

pub fn pose_transform(pose: SpawnPose) -> Transform {
    Transform::from_translation(pose.translation).with_rotation(pose.rotation)
}
