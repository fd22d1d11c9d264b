//! Geometry finalization shared by all format adapters
//!
//! Parsed geometries pass through one common pipeline: empty buffers are
//! dropped, vertex normals are (re)computed, and the format's default unit
//! scale is applied. An empty result is valid — a file with no renderable
//! mesh simply attaches zero particle nodes downstream.

use particlize_core::ParticleGeometry;

use crate::SourceFormat;

/// Finalize parsed geometries for scene attachment
pub fn finalize(
    mut geometries: Vec<ParticleGeometry>,
    format: SourceFormat,
) -> Vec<ParticleGeometry> {
    geometries.retain(|g| !g.is_empty());

    let scale = format.default_scale();
    for geometry in &mut geometries {
        geometry.compute_normals();
        geometry.scale(scale, scale, scale);
    }
    geometries
}

#[cfg(test)]
mod tests {
    use super::*;
    use particlize_core::Point3f;

    #[test]
    fn drops_empty_geometries() {
        let geometries = vec![
            ParticleGeometry::new(),
            ParticleGeometry::from_positions(vec![Point3f::new(1.0, 0.0, 0.0)]),
        ];
        let finalized = finalize(geometries, SourceFormat::MeshGltf);
        assert_eq!(finalized.len(), 1);
    }

    #[test]
    fn applies_format_unit_scale() {
        let geometries = vec![ParticleGeometry::from_positions(vec![Point3f::new(
            1.0, 2.0, 3.0,
        )])];
        let finalized = finalize(geometries, SourceFormat::MeshObj);
        assert!((finalized[0].positions[0].x - 10.0).abs() < 1e-6);
        assert!((finalized[0].positions[0].z - 30.0).abs() < 1e-6);
    }

    #[test]
    fn computes_normals_for_meshes() {
        let geometries = vec![ParticleGeometry::from_positions_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )];
        let finalized = finalize(geometries, SourceFormat::MeshGltf);
        assert!(finalized[0].normals.is_some());
    }

    #[test]
    fn empty_input_is_valid() {
        assert!(finalize(Vec::new(), SourceFormat::PointCloud).is_empty());
    }
}
