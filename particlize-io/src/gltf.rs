//! glTF 2.0 / GLB format support
//!
//! The document's scene graph is walked recursively; only nodes carrying a
//! mesh contribute geometry, so cameras, lights and empty grouping nodes
//! are skipped rather than rejected. Node transforms are flattened into
//! the emitted positions.

use ::gltf::buffer::Data as BufferData;
use ::gltf::mesh::Mode;
use ::gltf::{Node, Primitive};
use nalgebra::Matrix4;
use particlize_core::{Error, ParticleGeometry, Point3f, Result, Vector3f};

/// Parse a glTF or GLB byte stream into one geometry per mesh primitive
pub fn parse_gltf(bytes: &[u8]) -> Result<Vec<ParticleGeometry>> {
    let (document, buffers, _images) =
        ::gltf::import_slice(bytes).map_err(|e| Error::Parse(format!("glTF: {e}")))?;

    let mut geometries = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            visit_node(&node, &buffers, Matrix4::identity(), &mut geometries);
        }
    }
    Ok(geometries)
}

fn visit_node(
    node: &Node,
    buffers: &[BufferData],
    parent: Matrix4<f32>,
    out: &mut Vec<ParticleGeometry>,
) {
    let local: Matrix4<f32> = Matrix4::from(node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(geometry) = read_primitive(&primitive, buffers, &world) {
                out.push(geometry);
            }
        }
    }

    for child in node.children() {
        visit_node(&child, buffers, world, out);
    }
}

fn read_primitive(
    primitive: &Primitive,
    buffers: &[BufferData],
    world: &Matrix4<f32>,
) -> Option<ParticleGeometry> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let positions: Vec<Point3f> = reader
        .read_positions()?
        .map(|p| world.transform_point(&Point3f::new(p[0], p[1], p[2])))
        .collect();

    let faces: Vec<[usize; 3]> = match reader.read_indices() {
        Some(indices) => {
            let indices: Vec<u32> = indices.into_u32().collect();
            indices
                .chunks_exact(3)
                .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
                .collect()
        }
        // Non-indexed triangle primitives draw consecutive triples
        None if primitive.mode() == Mode::Triangles => (0..positions.len() / 3)
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect(),
        None => Vec::new(),
    };

    let mut geometry = ParticleGeometry::from_positions_and_faces(positions, faces);
    if let Some(normals) = reader.read_normals() {
        let rotation = world.fixed_view::<3, 3>(0, 0).into_owned();
        let normals: Vec<Vector3f> = normals
            .map(|n| {
                let transformed = rotation * Vector3f::new(n[0], n[1], n[2]);
                let norm = transformed.norm();
                if norm > f32::EPSILON {
                    transformed / norm
                } else {
                    Vector3f::new(0.0, 0.0, 1.0)
                }
            })
            .collect();
        geometry.set_normals(normals);
    }

    Some(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One indexed triangle under a translated root node, plus a camera
    // node that must be skipped. Buffer layout: 3x u16 indices, 2 bytes of
    // padding, then 3x vec3<f32> positions.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0, 2] } ],
        "nodes": [
            { "children": [1], "translation": [0.0, 0.0, 2.0] },
            { "mesh": 0 },
            { "camera": 0 }
        ],
        "cameras": [
            { "type": "perspective", "perspective": { "yfov": 1.0, "znear": 0.1 } }
        ],
        "meshes": [
            { "primitives": [ { "attributes": { "POSITION": 1 }, "indices": 0 } ] }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 6 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 36 }
        ],
        "buffers": [
            { "byteLength": 44,
              "uri": "data:application/octet-stream;base64,AAABAAIAAAAAAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAAAAAACAPwAAAAA=" }
        ]
    }"#;

    #[test]
    fn parses_triangle_and_skips_camera_node() {
        let geometries = parse_gltf(TRIANGLE_GLTF.as_bytes()).unwrap();
        assert_eq!(geometries.len(), 1);
        assert_eq!(geometries[0].len(), 3);
        assert_eq!(geometries[0].faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn node_transforms_are_flattened() {
        let geometries = parse_gltf(TRIANGLE_GLTF.as_bytes()).unwrap();
        for p in &geometries[0].positions {
            assert!((p.z - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_gltf(b"{ not gltf }"),
            Err(Error::Parse(_))
        ));
    }
}
