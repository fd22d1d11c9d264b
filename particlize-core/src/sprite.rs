//! Sprite presets
//!
//! A sprite preset is a named glyph texture used as the particle's visual
//! stamp. The library is built once at session start and is immutable
//! afterwards; renderers cache their GPU-side copies by the preset's
//! stable id.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

/// Side length of the rasterized preset glyphs
const SPRITE_SIZE: u32 = 64;

/// A named glyph texture shared read-only by the particle material
#[derive(Debug, Clone)]
pub struct SpritePreset {
    pub label: String,
    /// Stable identity for renderer-side texture caching
    pub id: u32,
    pub image: Arc<RgbaImage>,
}

/// The fixed, label-keyed table of sprite presets
#[derive(Debug, Clone)]
pub struct SpriteLibrary {
    presets: Vec<SpritePreset>,
}

impl SpriteLibrary {
    /// Build the built-in preset table.
    ///
    /// The first entry is the default preset used as the fallback when a
    /// requested label is unknown.
    pub fn builtin() -> Self {
        let glyphs: &[(&str, fn(f32, f32) -> f32)] = &[
            ("point", glyph_point),
            ("ring", glyph_ring),
            ("cross", glyph_cross),
            ("stripes", glyph_stripes),
            ("arrow", glyph_arrow),
        ];

        let presets = glyphs
            .iter()
            .enumerate()
            .map(|(id, (label, glyph))| SpritePreset {
                label: (*label).to_string(),
                id: id as u32,
                image: Arc::new(rasterize(*glyph)),
            })
            .collect();

        Self { presets }
    }

    /// Look up a preset by label
    pub fn get(&self, label: &str) -> Option<&SpritePreset> {
        self.presets.iter().find(|p| p.label == label)
    }

    /// The fallback preset
    pub fn default_preset(&self) -> &SpritePreset {
        &self.presets[0]
    }

    /// Labels in table order, for control-panel enumeration
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.label.as_str())
    }

    /// Number of presets in the table
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the table is empty (never true for the built-in table)
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for SpriteLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Rasterize a glyph into a white-on-transparent RGBA tile.
///
/// The glyph function maps coordinates in [-1, 1]² to coverage in [0, 1].
fn rasterize(glyph: fn(f32, f32) -> f32) -> RgbaImage {
    let mut image = RgbaImage::new(SPRITE_SIZE, SPRITE_SIZE);
    let half = SPRITE_SIZE as f32 / 2.0;

    for (px, py, pixel) in image.enumerate_pixels_mut() {
        let x = (px as f32 + 0.5 - half) / half;
        let y = (py as f32 + 0.5 - half) / half;
        let coverage = glyph(x, y).clamp(0.0, 1.0);
        let alpha = (coverage * 255.0).round() as u8;
        *pixel = Rgba([255, 255, 255, alpha]);
    }

    image
}

fn glyph_point(x: f32, y: f32) -> f32 {
    let r = (x * x + y * y).sqrt();
    // Soft-edged disc
    1.0 - smoothstep(0.7, 0.9, r)
}

fn glyph_ring(x: f32, y: f32) -> f32 {
    let r = (x * x + y * y).sqrt();
    let band = (r - 0.65).abs();
    1.0 - smoothstep(0.12, 0.2, band)
}

fn glyph_cross(x: f32, y: f32) -> f32 {
    let in_bar = |v: f32| v.abs() <= 0.18;
    if (in_bar(x) || in_bar(y)) && x.abs() <= 0.85 && y.abs() <= 0.85 {
        1.0
    } else {
        0.0
    }
}

fn glyph_stripes(x: f32, y: f32) -> f32 {
    if x.abs() > 0.85 || y.abs() > 0.85 {
        return 0.0;
    }
    let band = (y * 3.0).rem_euclid(1.0);
    if band < 0.5 {
        1.0
    } else {
        0.0
    }
}

fn glyph_arrow(x: f32, y: f32) -> f32 {
    // Upward-pointing wedge over a stem
    let head = y <= 0.1 && y >= -0.7 && x.abs() <= (y + 0.7) * 0.8;
    let stem = y > 0.1 && y <= 0.8 && x.abs() <= 0.15;
    if head || stem {
        1.0
    } else {
        0.0
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_point_as_default() {
        let library = SpriteLibrary::builtin();
        assert!(!library.is_empty());
        assert_eq!(library.default_preset().label, "point");
    }

    #[test]
    fn lookup_by_label() {
        let library = SpriteLibrary::builtin();
        assert!(library.get("ring").is_some());
        assert!(library.get("no-such-sprite").is_none());
    }

    #[test]
    fn preset_ids_are_unique_and_stable() {
        let library = SpriteLibrary::builtin();
        let ids: Vec<u32> = library.labels().enumerate().map(|(i, _)| i as u32).collect();
        for (i, label) in library.labels().enumerate() {
            assert_eq!(library.get(label).unwrap().id, ids[i]);
        }
    }

    #[test]
    fn point_glyph_is_opaque_at_center_and_clear_at_corner() {
        let library = SpriteLibrary::builtin();
        let image = &library.get("point").unwrap().image;
        let center = image.get_pixel(SPRITE_SIZE / 2, SPRITE_SIZE / 2);
        let corner = image.get_pixel(0, 0);
        assert_eq!(center.0[3], 255);
        assert_eq!(corner.0[3], 0);
    }
}
