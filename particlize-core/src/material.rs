//! Shared particle material and scene fog
//!
//! One [`ParticleMaterial`] instance exists per loaded model; every
//! particle node from that load is drawn with it. Settings setters write
//! straight into the owned value, so a single write restyles all particles
//! without per-node iteration.

use crate::sprite::SpritePreset;

/// The mutable material shared by all particle nodes of one model
#[derive(Debug, Clone)]
pub struct ParticleMaterial {
    /// Particle size in world units
    pub size: f32,
    /// Sprite glyph stamped on every particle
    pub sprite: SpritePreset,
    /// Fragments below this alpha are discarded
    pub alpha_test: f32,
    pub transparent: bool,
    /// Scale particle size with camera distance
    pub size_attenuation: bool,
}

impl ParticleMaterial {
    /// Create a material with the conventional particle defaults
    pub fn new(sprite: SpritePreset, size: f32) -> Self {
        Self {
            size,
            sprite,
            alpha_test: 0.5,
            transparent: true,
            size_attenuation: true,
        }
    }
}

/// Exponential-squared fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    pub color: [f32; 3],
    pub density: f32,
}

impl FogExp2 {
    /// White fog at the given density
    pub fn new(density: f32) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::SpriteLibrary;

    #[test]
    fn material_defaults() {
        let library = SpriteLibrary::builtin();
        let material = ParticleMaterial::new(library.default_preset().clone(), 0.5);
        assert_eq!(material.size, 0.5);
        assert_eq!(material.alpha_test, 0.5);
        assert!(material.transparent);
        assert!(material.size_attenuation);
    }

    #[test]
    fn fog_is_white() {
        let fog = FogExp2::new(0.02);
        assert_eq!(fog.color, [1.0, 1.0, 1.0]);
        assert_eq!(fog.density, 0.02);
    }
}
