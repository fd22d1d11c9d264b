//! Scene graph and the particle field builder
//!
//! The scene holds at most one model's worth of particle nodes plus the
//! shared material they are drawn with. Installing a new model evicts the
//! previous set atomically; nodes and material are fully built before the
//! scene is touched, so a failure beforehand leaves it unchanged.

use particlize_core::{FogExp2, ParticleGeometry, ParticleMaterial, Settings, SpriteLibrary};

/// One renderable particle object: a geometry drawn with the scene's
/// shared material
#[derive(Debug, Clone)]
pub struct ParticleNode {
    pub geometry: ParticleGeometry,
}

/// The root scene graph
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: Vec<ParticleNode>,
    /// Shared material of the current model; `None` until a load lands
    pub material: Option<ParticleMaterial>,
    pub fog: Option<FogExp2>,
    /// World-axes debug overlay
    pub axes_visible: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict the current model's nodes and material
    pub fn clear_model(&mut self) {
        self.nodes.clear();
        self.material = None;
    }

    /// Replace the current model: evicts the previous node set as part of
    /// attaching the new one
    pub fn install_model(&mut self, nodes: Vec<ParticleNode>, material: ParticleMaterial) {
        self.clear_model();
        self.nodes = nodes;
        self.material = Some(material);
    }

    /// Total number of particles across all nodes
    pub fn particle_count(&self) -> usize {
        self.nodes.iter().map(|n| n.geometry.len()).sum()
    }
}

/// Build one shared material and one particle node per geometry.
///
/// An unknown sprite label cannot fail a load: it warn-logs and falls
/// back to the library's default preset. (The runtime sprite setter is
/// stricter and rejects unknown labels instead.)
pub fn build_particle_field(
    geometries: Vec<ParticleGeometry>,
    settings: &Settings,
    sprites: &SpriteLibrary,
) -> (Vec<ParticleNode>, ParticleMaterial) {
    let preset = match sprites.get(&settings.sprite_label) {
        Some(preset) => preset.clone(),
        None => {
            log::warn!(
                "unknown sprite preset '{}', falling back to '{}'",
                settings.sprite_label,
                sprites.default_preset().label
            );
            sprites.default_preset().clone()
        }
    };

    let material = ParticleMaterial::new(preset, settings.particle_size);
    let nodes = geometries
        .into_iter()
        .map(|geometry| ParticleNode { geometry })
        .collect();
    (nodes, material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use particlize_core::Point3f;

    fn one_point() -> Vec<ParticleGeometry> {
        vec![ParticleGeometry::from_positions(vec![Point3f::new(
            0.0, 0.0, 0.0,
        )])]
    }

    #[test]
    fn builder_shares_settings_values() {
        let sprites = SpriteLibrary::builtin();
        let settings = Settings {
            particle_size: 0.25,
            sprite_label: "ring".to_string(),
            ..Settings::default()
        };

        let (nodes, material) = build_particle_field(one_point(), &settings, &sprites);
        assert_eq!(nodes.len(), 1);
        assert_eq!(material.size, 0.25);
        assert_eq!(material.sprite.label, "ring");
    }

    #[test]
    fn unknown_sprite_falls_back_to_default_preset() {
        let sprites = SpriteLibrary::builtin();
        let settings = Settings {
            sprite_label: "no-such-glyph".to_string(),
            ..Settings::default()
        };

        let (_, material) = build_particle_field(one_point(), &settings, &sprites);
        assert_eq!(material.sprite.label, sprites.default_preset().label);
    }

    #[test]
    fn install_model_evicts_previous_nodes() {
        let sprites = SpriteLibrary::builtin();
        let settings = Settings::default();
        let mut scene = Scene::new();

        let (nodes, material) = build_particle_field(one_point(), &settings, &sprites);
        scene.install_model(nodes, material);
        assert_eq!(scene.particle_count(), 1);

        let many = vec![ParticleGeometry::from_positions(vec![
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ])];
        let (nodes, material) = build_particle_field(many, &settings, &sprites);
        scene.install_model(nodes, material);

        assert_eq!(scene.nodes.len(), 1);
        assert_eq!(scene.particle_count(), 2);
    }

    #[test]
    fn zero_geometries_still_install_a_material() {
        let sprites = SpriteLibrary::builtin();
        let settings = Settings::default();
        let mut scene = Scene::new();

        let (nodes, material) = build_particle_field(Vec::new(), &settings, &sprites);
        scene.install_model(nodes, material);

        assert_eq!(scene.particle_count(), 0);
        assert!(scene.material.is_some());
    }
}
