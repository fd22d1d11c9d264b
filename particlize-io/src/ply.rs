//! PLY format support
//!
//! A PLY source yields one geometry directly usable as particles:
//! positions, optional per-vertex normals, and faces when the file carries
//! a mesh rather than a bare point cloud.

use particlize_core::{Error, ParticleGeometry, Point3f, Result, Vector3f};
use ply_rs::{
    parser::Parser,
    ply::{DefaultElement, Property},
};

/// Parse a PLY byte stream into a single particle geometry
pub fn parse_ply(bytes: &[u8]) -> Result<ParticleGeometry> {
    let mut reader = std::io::Cursor::new(bytes);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| Error::Parse(format!("PLY: {e}")))?;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut has_normals = true;

    if let Some(vertex_element) = ply.payload.get("vertex") {
        positions.reserve(vertex_element.len());
        for vertex in vertex_element {
            let x = extract_property_value(vertex, "x")?;
            let y = extract_property_value(vertex, "y")?;
            let z = extract_property_value(vertex, "z")?;
            positions.push(Point3f::new(x, y, z));

            if has_normals {
                if let (Ok(nx), Ok(ny), Ok(nz)) = (
                    extract_property_value(vertex, "nx"),
                    extract_property_value(vertex, "ny"),
                    extract_property_value(vertex, "nz"),
                ) {
                    normals.push(Vector3f::new(nx, ny, nz));
                } else {
                    has_normals = false;
                    normals.clear();
                }
            }
        }
    }

    let mut faces = Vec::new();
    if let Some(face_element) = ply.payload.get("face") {
        for face in face_element {
            let indices = extract_face_indices(face)?;
            // Fan-triangulate polygons with more than three corners
            for i in 1..indices.len().saturating_sub(1) {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    let mut geometry = ParticleGeometry::from_positions_and_faces(positions, faces);
    if has_normals && !normals.is_empty() {
        geometry.set_normals(normals);
    }

    Ok(geometry)
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        _ => Err(Error::Parse(format!(
            "PLY: property '{name}' not found or invalid type"
        ))),
    }
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    match element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))
    {
        Some(Property::ListInt(indices)) => Ok(indices.iter().map(|&idx| idx as usize).collect()),
        Some(Property::ListUInt(indices)) => Ok(indices.iter().map(|&idx| idx as usize).collect()),
        _ => Err(Error::Parse("PLY: face indices not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_CLOUD: &str = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n0.0 0.0 0.0\n1.0 0.0 0.0\n0.0 1.0 0.0\n";

    const MESH_WITH_NORMALS: &str = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nproperty float nx\nproperty float ny\nproperty float nz\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0.0 0.0 0.0 0.0 0.0 1.0\n1.0 0.0 0.0 0.0 0.0 1.0\n0.0 1.0 0.0 0.0 0.0 1.0\n3 0 1 2\n";

    #[test]
    fn parses_bare_point_cloud() {
        let geometry = parse_ply(POINT_CLOUD.as_bytes()).unwrap();
        assert_eq!(geometry.len(), 3);
        assert!(geometry.normals.is_none());
        assert!(geometry.faces.is_empty());
        assert_eq!(geometry.positions[1], Point3f::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn parses_mesh_with_normals_and_faces() {
        let geometry = parse_ply(MESH_WITH_NORMALS.as_bytes()).unwrap();
        assert_eq!(geometry.len(), 3);
        assert_eq!(geometry.faces, vec![[0, 1, 2]]);
        let normals = geometry.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 3);
        assert!((normals[0].z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_ply(b"definitely not ply"),
            Err(Error::Parse(_))
        ));
    }
}
