//! Typeface JSON fonts.
//!
//! The format stores, per glyph, an advance (`ha`) and an outline string of
//! space separated drawing commands in font units:
//!
//! - `m x y` move to
//! - `l x y` line to
//! - `q x y cx cy` quadratic curve to `(x, y)` with control `(cx, cy)`
//! - `b x y c1x c1y c2x c2y` cubic curve to `(x, y)`
//!
//! Font units are scaled by `size / resolution`.

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use crate::geometry::{Shape, ShapePath};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Glyph {
    pub ha: f32,
    #[serde(default)]
    pub x_min: Option<f32>,
    #[serde(default)]
    pub x_max: Option<f32>,
    #[serde(default)]
    pub o: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Typeface {
    pub glyphs: HashMap<String, Glyph>,
    pub resolution: f32,
    #[serde(default)]
    pub family_name: String,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
}

/// A blocky face built into the binary, covering the demo's text.
const BLOCK_SANS: &str = include_str!("fonts/block_sans.typeface.json");

impl Typeface {
    /// The face used when no typeface file can be loaded.
    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BLOCK_SANS)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let typeface: Typeface =
            serde_json::from_str(json).context("Malformed typeface JSON")?;
        if typeface.resolution <= 0.0 {
            anyhow::bail!(
                "Typeface {} has a non-positive resolution {}",
                typeface.family_name,
                typeface.resolution
            );
        }
        Ok(typeface)
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs
            .get(c.encode_utf8(&mut buf) as &str)
            .or_else(|| self.glyphs.get("?"))
    }

    pub fn line_height(&self, size: f32) -> f32 {
        let scale = size / self.resolution;
        (self.bounding_box.y_max - self.bounding_box.y_min + self.underline_thickness) * scale
    }

    /// One path per character, advanced along x. `\n` starts a new line below.
    pub fn create_paths(&self, text: &str, size: f32) -> Vec<ShapePath> {
        let scale = size / self.resolution;
        let line_height = self.line_height(size);
        let mut offset_x = 0.0;
        let mut offset_y = 0.0;
        let mut paths = Vec::new();
        for c in text.chars() {
            if c == '\n' {
                offset_x = 0.0;
                offset_y -= line_height;
                continue;
            }
            let Some(glyph) = self.glyph(c) else {
                log::error!(
                    "Character '{}' does not exist in font family {}",
                    c,
                    self.family_name
                );
                continue;
            };
            match glyph_path(glyph, scale, offset_x, offset_y) {
                Ok(path) => paths.push(path),
                Err(e) => log::warn!("Skipping glyph '{}': {:#}", c, e),
            }
            offset_x += glyph.ha * scale;
        }
        paths
    }

    pub fn generate_shapes(&self, text: &str, size: f32, divisions: u32) -> Vec<Shape> {
        self.create_paths(text, size)
            .iter()
            .flat_map(|path| path.to_shapes(divisions))
            .collect()
    }
}

struct Outline<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Outline<'_> {
    fn coordinate(&mut self) -> anyhow::Result<f32> {
        let token = self
            .tokens
            .next()
            .context("Outline ended in the middle of a command")?;
        token
            .parse::<f32>()
            .with_context(|| format!("Bad outline coordinate '{}'", token))
    }

    fn point(&mut self) -> anyhow::Result<(f32, f32)> {
        let x = self.coordinate()? * self.scale + self.offset_x;
        let y = self.coordinate()? * self.scale + self.offset_y;
        Ok((x, y))
    }
}

fn glyph_path(glyph: &Glyph, scale: f32, offset_x: f32, offset_y: f32) -> anyhow::Result<ShapePath> {
    let mut path = ShapePath::new();
    let Some(o) = glyph.o.as_deref() else {
        return Ok(path);
    };
    let mut outline = Outline {
        tokens: o.split_whitespace(),
        scale,
        offset_x,
        offset_y,
    };
    while let Some(action) = outline.tokens.next() {
        match action {
            "m" => {
                let (x, y) = outline.point()?;
                path.move_to(x, y);
            }
            "l" => {
                let (x, y) = outline.point()?;
                path.line_to(x, y);
            }
            "q" => {
                let (x, y) = outline.point()?;
                let (cx, cy) = outline.point()?;
                path.quadratic_curve_to(cx, cy, x, y);
            }
            "b" => {
                let (x, y) = outline.point()?;
                let (c1x, c1y) = outline.point()?;
                let (c2x, c2y) = outline.point()?;
                path.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
            }
            // some exporters close sub-paths explicitly
            "z" => (),
            other => anyhow::bail!("Unknown outline command '{}'", other),
        }
    }
    Ok(path)
}
