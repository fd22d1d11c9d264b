//! Model loading and source-format dispatch for particlize
//!
//! This crate maps a requested source format (or a file-extension sniff)
//! to the matching parser adapter and the format's default unit scale,
//! then runs the shared extraction pipeline that turns parsed geometry
//! into renderable [`ParticleGeometry`] buffers.

pub mod extract;
pub mod fbx;
pub mod gltf;
pub mod obj;
pub mod ply;

use std::path::Path;

use particlize_core::{Error, ParticleGeometry, Result};

/// Closed enumeration of loadable source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// PLY point clouds (one geometry, directly usable as particles)
    PointCloud,
    /// Wavefront OBJ meshes
    MeshObj,
    /// glTF 2.0 / GLB meshes
    MeshGltf,
    /// Autodesk FBX meshes
    MeshFbx,
}

impl SourceFormat {
    /// All recognized formats, in dispatch-table order
    pub const ALL: [SourceFormat; 4] = [
        SourceFormat::PointCloud,
        SourceFormat::MeshObj,
        SourceFormat::MeshGltf,
        SourceFormat::MeshFbx,
    ];

    /// Map a bare file extension to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ply" => Some(SourceFormat::PointCloud),
            "obj" => Some(SourceFormat::MeshObj),
            "gltf" | "glb" => Some(SourceFormat::MeshGltf),
            "fbx" => Some(SourceFormat::MeshFbx),
            _ => None,
        }
    }

    /// Sniff the format from a path's extension.
    ///
    /// An unrecognized or missing extension fails with
    /// [`Error::UnsupportedFormat`]; callers must not touch scene state in
    /// that case.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                Error::UnsupportedFormat(format!("unrecognized model file: {}", path.display()))
            })
    }

    /// Default unit scale applied to every geometry of this format.
    ///
    /// Point clouds come in at 10x the internal unit and are downscaled;
    /// OBJ sources conventionally need a 10x upscale; the vector formats
    /// are used as-is.
    pub fn default_scale(&self) -> f32 {
        match self {
            SourceFormat::PointCloud => 0.1,
            SourceFormat::MeshObj => 10.0,
            SourceFormat::MeshGltf | SourceFormat::MeshFbx => 1.0,
        }
    }

    /// Human-readable format name
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::PointCloud => "ply",
            SourceFormat::MeshObj => "obj",
            SourceFormat::MeshGltf => "gltf",
            SourceFormat::MeshFbx => "fbx",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a model byte stream into finalized particle geometries.
///
/// This is the full synchronous pipeline: format-selected parser, then
/// normal computation and the format's default unit scale. An empty result
/// is valid (a file with no renderable mesh) and is not an error.
pub fn parse_model(bytes: &[u8], format: SourceFormat) -> Result<Vec<ParticleGeometry>> {
    let geometries = match format {
        SourceFormat::PointCloud => vec![ply::parse_ply(bytes)?],
        SourceFormat::MeshObj => obj::parse_obj(bytes)?,
        SourceFormat::MeshGltf => gltf::parse_gltf(bytes)?,
        SourceFormat::MeshFbx => fbx::parse_fbx(bytes)?,
    };
    Ok(extract::finalize(geometries, format))
}

/// Read a model file, sniffing the format from its extension
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<Vec<ParticleGeometry>> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    log::debug!("parsing {} as {}", path.display(), format);
    parse_model(&bytes, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_sniffing_maps_all_supported_formats() {
        assert_eq!(
            SourceFormat::from_path("scan.ply").unwrap(),
            SourceFormat::PointCloud
        );
        assert_eq!(
            SourceFormat::from_path("model.OBJ").unwrap(),
            SourceFormat::MeshObj
        );
        assert_eq!(
            SourceFormat::from_path("scene.gltf").unwrap(),
            SourceFormat::MeshGltf
        );
        assert_eq!(
            SourceFormat::from_path("scene.glb").unwrap(),
            SourceFormat::MeshGltf
        );
        assert_eq!(
            SourceFormat::from_path("rig.fbx").unwrap(),
            SourceFormat::MeshFbx
        );
    }

    #[test]
    fn unrecognized_extension_is_rejected() {
        assert!(matches!(
            SourceFormat::from_path("model.xyz"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceFormat::from_path("no_extension"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn default_scales_per_format() {
        assert_eq!(SourceFormat::PointCloud.default_scale(), 0.1);
        assert_eq!(SourceFormat::MeshObj.default_scale(), 10.0);
        assert_eq!(SourceFormat::MeshGltf.default_scale(), 1.0);
        assert_eq!(SourceFormat::MeshFbx.default_scale(), 1.0);
    }

    #[test]
    fn read_model_applies_point_cloud_downscale() {
        let temp_file = "test_read_model.ply";
        let ply_content = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nproperty float z\nend_header\n10.0 0.0 0.0\n0.0 10.0 0.0\n";
        fs::write(temp_file, ply_content).unwrap();

        let geometries = read_model(temp_file).unwrap();
        assert_eq!(geometries.len(), 1);
        assert_eq!(geometries[0].len(), 2);
        assert!((geometries[0].positions[0].x - 1.0).abs() < 1e-6);

        let _ = fs::remove_file(temp_file);
    }

    #[test]
    fn read_model_propagates_parse_failure() {
        let temp_file = "test_read_model_bad.ply";
        fs::write(temp_file, b"not a ply file at all").unwrap();

        let result = read_model(temp_file);
        assert!(matches!(result, Err(Error::Parse(_))));

        let _ = fs::remove_file(temp_file);
    }
}
