//! Particle geometry buffers
//!
//! A [`ParticleGeometry`] is the uniform renderable representation every
//! source format is converted into: one particle per position, with
//! optional per-vertex normals and optional triangle faces kept around for
//! normal computation. Geometries are mutated in place by the scale/flip
//! operations and never replaced while a model is loaded.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A renderable vertex buffer: one particle per position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleGeometry {
    pub positions: Vec<Point3f>,
    pub normals: Option<Vec<Vector3f>>,
    pub faces: Vec<[usize; 3]>,
}

impl ParticleGeometry {
    /// Create a new empty geometry
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: None,
            faces: Vec::new(),
        }
    }

    /// Create a geometry from bare positions (a point set)
    pub fn from_positions(positions: Vec<Point3f>) -> Self {
        Self {
            positions,
            normals: None,
            faces: Vec::new(),
        }
    }

    /// Create a geometry from positions and triangle faces
    pub fn from_positions_and_faces(positions: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            normals: None,
            faces,
        }
    }

    /// Get the number of particles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the geometry is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Set per-vertex normals; ignored if the count does not match
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.positions.len() {
            self.normals = Some(normals);
        }
    }

    /// Compute area-weighted vertex normals from the triangle faces.
    ///
    /// Idempotent: recomputation replaces any existing normals and yields
    /// the same result for the same positions and faces. A geometry with
    /// no faces (a bare point set) is left untouched.
    pub fn compute_normals(&mut self) {
        if self.faces.is_empty() {
            return;
        }

        let mut accumulated = vec![Vector3f::zeros(); self.positions.len()];
        for face in &self.faces {
            let [a, b, c] = *face;
            if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len()
            {
                continue;
            }
            let edge1 = self.positions[b] - self.positions[a];
            let edge2 = self.positions[c] - self.positions[a];
            // Un-normalized cross product weights by twice the face area
            let face_normal = edge1.cross(&edge2);
            accumulated[a] += face_normal;
            accumulated[b] += face_normal;
            accumulated[c] += face_normal;
        }

        let normals = accumulated
            .into_iter()
            .map(|n| {
                let norm = n.norm();
                if norm > f32::EPSILON {
                    n / norm
                } else {
                    Vector3f::new(0.0, 0.0, 1.0)
                }
            })
            .collect();
        self.normals = Some(normals);
    }

    /// Apply a multiplicative per-axis scale to every position in place.
    ///
    /// Normals are re-derived for non-uniform or mirroring scales by the
    /// inverse-scale transform and renormalized.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        for p in &mut self.positions {
            p.x *= sx;
            p.y *= sy;
            p.z *= sz;
        }

        if let Some(normals) = &mut self.normals {
            if sx != 0.0 && sy != 0.0 && sz != 0.0 {
                for n in normals.iter_mut() {
                    let rescaled = Vector3f::new(n.x / sx, n.y / sy, n.z / sz);
                    let norm = rescaled.norm();
                    if norm > f32::EPSILON {
                        *n = rescaled / norm;
                    }
                }
            }
        }
    }

    /// Mirror the geometry along the X axis
    pub fn flip_x(&mut self) {
        self.scale(-1.0, 1.0, 1.0);
    }

    /// Mirror the geometry along the Y axis
    pub fn flip_y(&mut self) {
        self.scale(1.0, -1.0, 1.0);
    }

    /// Axis-aligned bounding box, `None` for an empty geometry
    pub fn bounding_box(&self) -> Option<(Point3f, Point3f)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Some((min, max))
    }

    /// Center of the bounding box, origin for an empty geometry
    pub fn center(&self) -> Point3f {
        match self.bounding_box() {
            Some((min, max)) => Point3f::new(
                (min.x + max.x) / 2.0,
                (min.y + max.y) / 2.0,
                (min.z + max.z) / 2.0,
            ),
            None => Point3f::origin(),
        }
    }
}

impl Default for ParticleGeometry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> ParticleGeometry {
        ParticleGeometry::from_positions_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn compute_normals_of_planar_triangle() {
        let mut geometry = triangle();
        geometry.compute_normals();

        let normals = geometry.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 3);
        for n in normals {
            assert_relative_eq!(n.z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn compute_normals_is_idempotent() {
        let mut geometry = triangle();
        geometry.compute_normals();
        let first = geometry.normals.clone().unwrap();

        geometry.compute_normals();
        let second = geometry.normals.clone().unwrap();

        for (a, b) in first.iter().zip(second.iter()) {
            assert_relative_eq!((a - b).norm(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn compute_normals_skips_point_sets() {
        let mut geometry =
            ParticleGeometry::from_positions(vec![Point3f::new(1.0, 2.0, 3.0)]);
        geometry.compute_normals();
        assert!(geometry.normals.is_none());
    }

    #[test]
    fn scale_round_trip_restores_bounds() {
        let mut geometry = triangle();
        let before = geometry.bounding_box().unwrap();

        geometry.scale(2.0, 2.0, 2.0);
        geometry.scale(0.5, 0.5, 0.5);

        let after = geometry.bounding_box().unwrap();
        assert_relative_eq!((before.0 - after.0).norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!((before.1 - after.1).norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn flip_x_mirrors_positions() {
        let mut geometry = triangle();
        geometry.flip_x();
        assert_relative_eq!(geometry.positions[1].x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(geometry.positions[2].y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn bounding_box_of_empty_geometry() {
        let geometry = ParticleGeometry::new();
        assert!(geometry.bounding_box().is_none());
        assert_eq!(geometry.center(), Point3f::origin());
    }
}
