//! Wavefront OBJ format support
//!
//! Every OBJ sub-model becomes its own particle geometry; materials are
//! ignored since particles carry their own shared material.

use particlize_core::{Error, ParticleGeometry, Point3f, Result, Vector3f};

/// Parse an OBJ byte stream into one geometry per sub-model
pub fn parse_obj(bytes: &[u8]) -> Result<Vec<ParticleGeometry>> {
    let load_opts = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj_buf(&mut &bytes[..], &load_opts, |_| {
        // Material libraries are irrelevant here
        Ok((Vec::new(), Default::default()))
    })
    .map_err(|e| Error::Parse(format!("OBJ: {e}")))?;

    let mut geometries = Vec::with_capacity(models.len());
    for model in models {
        let mesh = model.mesh;
        let vertex_count = mesh.positions.len() / 3;

        let positions: Vec<Point3f> = (0..vertex_count)
            .map(|i| {
                Point3f::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                )
            })
            .collect();

        let faces: Vec<[usize; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
            .collect();

        let mut geometry = ParticleGeometry::from_positions_and_faces(positions, faces);
        if mesh.normals.len() == vertex_count * 3 {
            let normals = (0..vertex_count)
                .map(|i| {
                    Vector3f::new(
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        mesh.normals[3 * i + 2],
                    )
                })
                .collect();
            geometry.set_normals(normals);
        }
        geometries.push(geometry);
    }

    Ok(geometries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
o first
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
o second
v 0.0 0.0 1.0
v 1.0 0.0 1.0
v 1.0 1.0 1.0
v 0.0 1.0 1.0
f 4 5 6 7
";

    #[test]
    fn each_sub_model_becomes_a_geometry() {
        let geometries = parse_obj(TWO_OBJECTS.as_bytes()).unwrap();
        assert_eq!(geometries.len(), 2);
        assert_eq!(geometries[0].len(), 3);
        assert_eq!(geometries[0].faces.len(), 1);
    }

    #[test]
    fn quads_are_triangulated() {
        let geometries = parse_obj(TWO_OBJECTS.as_bytes()).unwrap();
        assert_eq!(geometries[1].faces.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_geometries() {
        let geometries = parse_obj(b"# just a comment\n").unwrap();
        assert!(geometries.is_empty());
    }
}
