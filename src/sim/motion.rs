//! Target motion toward the player

use super::registry::TargetRegistry;

/// Move every live target toward the viewer.
///
/// `speed` is in world units per reference frame; `delta_factor` is the
/// elapsed time expressed in reference frames. Only `pos.z` changes.
pub fn integrate(registry: &mut TargetRegistry, speed: f32, delta_factor: f32) {
    let step = speed * delta_factor;
    for target in registry.all_mut() {
        target.pos.z += step;
    }
}
