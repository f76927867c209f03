use std::io::Cursor;

use anyhow::Context;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Color,
        error::{TesseraError, TesseraResult},
    },
    scene::{
        bbox::BoundingRect,
        node::{GradientStop, NodeId, Paint},
        tree::Scene,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PainterKind {
    Canvas,
    Svg,
}

/// One rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored (premultiplied when `premultiplied`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[0..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> TesseraResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| TesseraError::render("frame buffer does not match its dimensions"))?;
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode frame as png")?;
        Ok(buf)
    }
}

/// Per-zlevel settings for the canvas painter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Painted over the whole surface before the first element of the zlevel.
    pub clear_color: Option<Color>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgPainterOpts {
    pub width: u32,
    pub height: u32,
    pub background: Option<Color>,
}

impl Default for SvgPainterOpts {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            background: None,
        }
    }
}

impl SvgPainterOpts {
    pub fn from_json_str(s: &str) -> TesseraResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasPainterOpts {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio; the surface is `width * dpr` by `height * dpr` pixels.
    pub dpr: f64,
    pub background: Option<Color>,
}

impl Default for CanvasPainterOpts {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            dpr: 1.0,
            background: None,
        }
    }
}

impl CanvasPainterOpts {
    pub fn from_json_str(s: &str) -> TesseraResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        if !(opts.dpr.is_finite() && opts.dpr > 0.0) {
            return Err(TesseraError::validation(format!(
                "dpr must be positive, got {}",
                opts.dpr
            )));
        }
        Ok(opts)
    }
}

/// A backend consuming a [`Scene`]'s display list.
///
/// Interactive operations that a backend cannot support log an error and return `None`.
pub trait Painter {
    fn kind(&self) -> PainterKind;

    /// Repaint if the scene requested it.
    fn refresh(&mut self, scene: &mut Scene);

    /// Repaint hovered displayables on top of the current frame.
    fn refresh_hover(&mut self, scene: &mut Scene);

    fn resize(&mut self, width: u32, height: u32);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Render a single node into a frame sized to its world bounds.
    fn path_to_image(&mut self, scene: &mut Scene, id: NodeId) -> Option<FrameRGBA>;

    fn config_layer(&mut self, zlevel: i32, config: LayerConfig);

    /// The most recent frame.
    fn viewport_root(&self) -> Option<&FrameRGBA>;

    /// Release every resource; the painter must not be used afterwards.
    fn dispose(&mut self);
}

/// Gradient geometry resolved against an element's local bounds.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ResolvedGradient<'a> {
    Linear {
        from: Point,
        to: Point,
        stops: &'a [GradientStop],
    },
    Radial {
        center: Point,
        r: f64,
        stops: &'a [GradientStop],
    },
}

impl<'a> ResolvedGradient<'a> {
    /// Non-global coordinates are fractions of `bbox`; a radial radius scales with its shorter
    /// side. Solid paints resolve to `None`.
    pub(crate) fn resolve(paint: &'a Paint, bbox: &BoundingRect) -> Option<Self> {
        let at = |global: bool, x: f64, y: f64| {
            if global {
                Point::new(x, y)
            } else {
                Point::new(bbox.x + x * bbox.width, bbox.y + y * bbox.height)
            }
        };
        match paint {
            Paint::Solid(_) => None,
            Paint::Linear(g) => Some(Self::Linear {
                from: at(g.global, g.x, g.y),
                to: at(g.global, g.x2, g.y2),
                stops: &g.stops,
            }),
            Paint::Radial(g) => Some(Self::Radial {
                center: at(g.global, g.x, g.y),
                r: if g.global {
                    g.r
                } else {
                    g.r * bbox.width.min(bbox.height)
                },
                stops: &g.stops,
            }),
        }
    }

    pub(crate) fn stops(&self) -> &'a [GradientStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        }
    }

    /// Gradient parameter at `p`, unclamped.
    pub(crate) fn offset_at(&self, p: Point) -> f64 {
        match self {
            Self::Linear { from, to, .. } => {
                let d = *to - *from;
                let len2 = d.hypot2();
                if len2 <= f64::EPSILON {
                    return 0.0;
                }
                (p - *from).dot(d) / len2
            }
            Self::Radial { center, r, .. } => {
                if *r <= f64::EPSILON {
                    return 1.0;
                }
                p.distance(*center) / r
            }
        }
    }
}

/// Color of sorted `stops` at offset `t`, padding past either end.
pub(crate) fn sample_stops(stops: &[GradientStop], t: f64) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for w in stops.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, k);
        }
    }
    last.color
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
