//! FBX import (feature placeholder)
//!
//! The dispatcher recognizes `.fbx` sources, but the actual parser is
//! planned behind a future `fbx` cargo feature using `fbxcel-dom`. Until
//! then this adapter returns an informative error so callers surface a
//! normal parse notification instead of crashing.

use particlize_core::{Error, ParticleGeometry, Result};

/// Parse an FBX byte stream into particle geometries
pub fn parse_fbx(_bytes: &[u8]) -> Result<Vec<ParticleGeometry>> {
    Err(Error::Parse(
        "FBX import requires building particlize-io with the `fbx` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_reports_a_friendly_parse_error() {
        let result = parse_fbx(b"Kaydara FBX Binary  ");
        match result {
            Err(Error::Parse(msg)) => assert!(msg.contains("fbx")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
