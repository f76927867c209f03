//! Single-shot SVG serialization of a scene.

use std::collections::HashMap;
use std::fmt::Write;

use kurbo::Affine;

use crate::{
    path::{proxy::PathProxy, svg::fmt_num},
    render::backend::{
        FrameRGBA, LayerConfig, Painter, PainterKind, ResolvedGradient, SvgPainterOpts,
    },
    scene::{
        bbox::BoundingRect,
        node::{Content, LineCap, LineJoin, Node, NodeId, Paint, Style, TextBaseline},
        tree::Scene,
    },
};

const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Renders a scene to SVG markup. Interactive painter operations are unsupported.
#[derive(Clone, Debug, Default)]
pub struct SvgPainter {
    opts: SvgPainterOpts,
}

impl SvgPainter {
    pub fn new(opts: SvgPainterOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &SvgPainterOpts {
        &self.opts
    }

    /// Serialize the current display list as a standalone `<svg>` document.
    ///
    /// Consecutive displayables sharing a clip prefix share the same `<g clip-path>` wrappers;
    /// gradients and clip paths are collected into a trailing `<defs>`.
    #[tracing::instrument(skip(self, scene))]
    pub fn render_to_string(&self, scene: &mut Scene) -> String {
        let entries = scene.display_list(true).to_vec();
        let (w, h) = (self.opts.width, self.opts.height);

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" baseProfile="full">"#
        );
        if let Some(bg) = self.opts.background.filter(|c| !c.is_transparent()) {
            let _ = write!(
                out,
                r#"<rect width="{w}" height="{h}" x="0" y="0" fill="{}""#,
                bg.to_svg_rgb()
            );
            if bg.a < 1.0 {
                let _ = write!(out, r#" fill-opacity="{}""#, fmt_num(bg.a));
            }
            out.push_str("/>");
        }

        let mut defs = Defs::default();
        let mut open: Vec<NodeId> = Vec::new();
        let mut emitted = 0usize;
        for entry in &entries {
            if scene.node(entry.id).is_none_or(|n| n.invisible) {
                continue;
            }

            let chain = &entry.clip_chain;
            let common = open
                .iter()
                .zip(chain.iter())
                .take_while(|(a, b)| a == b)
                .count();
            for _ in common..open.len() {
                out.push_str("</g>");
            }
            open.truncate(common);
            for owner in &chain[common..] {
                match defs.clip(scene, *owner) {
                    Some(id) => {
                        let _ = write!(out, r#"<g clip-path="url(#{id})">"#);
                    }
                    // Clip removed since the list was built: open a plain group to keep
                    // the stack aligned with the chain.
                    None => out.push_str("<g>"),
                }
                open.push(*owner);
            }

            if write_displayable(&mut out, &mut defs, scene, entry.id) {
                emitted += 1;
            }
        }
        for _ in 0..open.len() {
            out.push_str("</g>");
        }

        if !defs.out.is_empty() {
            out.push_str("<defs>");
            out.push_str(&defs.out);
            out.push_str("</defs>");
        }
        out.push_str("</svg>");
        tracing::debug!(emitted, bytes = out.len(), "svg rendered");
        out
    }
}

impl Painter for SvgPainter {
    fn kind(&self) -> PainterKind {
        PainterKind::Svg
    }

    fn refresh(&mut self, _scene: &mut Scene) {
        tracing::error!("refresh is not supported by the SVG painter");
    }

    fn refresh_hover(&mut self, _scene: &mut Scene) {
        tracing::error!("refresh_hover is not supported by the SVG painter");
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.opts.width = width;
        self.opts.height = height;
    }

    fn width(&self) -> u32 {
        self.opts.width
    }

    fn height(&self) -> u32 {
        self.opts.height
    }

    fn path_to_image(&mut self, _scene: &mut Scene, _id: NodeId) -> Option<FrameRGBA> {
        tracing::error!("path_to_image is not supported by the SVG painter");
        None
    }

    fn config_layer(&mut self, _zlevel: i32, _config: LayerConfig) {
        tracing::error!("config_layer is not supported by the SVG painter");
    }

    fn viewport_root(&self) -> Option<&FrameRGBA> {
        tracing::error!("viewport_root is not supported by the SVG painter");
        None
    }

    fn dispose(&mut self) {}
}

#[derive(Default)]
struct Defs {
    out: String,
    clips: HashMap<NodeId, String>,
    next: u32,
}

impl Defs {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next);
        self.next += 1;
        id
    }

    /// `clipPath` for `owner`'s clip shape, created on first use.
    fn clip(&mut self, scene: &Scene, owner: NodeId) -> Option<String> {
        if let Some(id) = self.clips.get(&owner) {
            return Some(id.clone());
        }
        let node = scene.node(owner)?;
        let shape = node.clip.as_ref()?;
        let d = shape.to_path_proxy().to_svg_path_data();
        let id = self.next_id("clip");
        let _ = write!(
            self.out,
            r#"<clipPath id="{id}"><path d="{d}"{}/></clipPath>"#,
            transform_attr(node.transform.transform())
        );
        self.clips.insert(owner, id.clone());
        Some(id)
    }

    fn gradient(&mut self, g: &ResolvedGradient<'_>) -> String {
        let id = self.next_id("gradient");
        let tag = match g {
            ResolvedGradient::Linear { from, to, .. } => {
                let _ = write!(
                    self.out,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                    fmt_num(from.x),
                    fmt_num(from.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                );
                "linearGradient"
            }
            ResolvedGradient::Radial { center, r, .. } => {
                let _ = write!(
                    self.out,
                    r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*r)
                );
                "radialGradient"
            }
        };
        for stop in g.stops() {
            let _ = write!(
                self.out,
                r#"<stop offset="{}" stop-color="{}""#,
                fmt_num(stop.offset),
                stop.color.to_svg_rgb()
            );
            if stop.color.a < 1.0 {
                let _ = write!(self.out, r#" stop-opacity="{}""#, fmt_num(stop.color.a));
            }
            self.out.push_str("/>");
        }
        let _ = write!(self.out, "</{tag}>");
        id
    }
}

fn transform_attr(m: Option<Affine>) -> String {
    match m {
        Some(m) if m != Affine::IDENTITY => {
            let [a, b, c, d, e, f] = m.as_coeffs().map(fmt_num);
            format!(r#" transform="matrix({a},{b},{c},{d},{e},{f})""#)
        }
        _ => String::new(),
    }
}

/// Escape text for element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn paint_attrs(
    out: &mut String,
    defs: &mut Defs,
    name: &str,
    paint: &Paint,
    opacity: f64,
    bbox: &BoundingRect,
) {
    let alpha = match paint {
        Paint::Solid(c) => {
            let _ = write!(out, r#" {name}="{}""#, c.to_svg_rgb());
            c.a * opacity
        }
        _ => {
            if let Some(g) = ResolvedGradient::resolve(paint, bbox) {
                let id = defs.gradient(&g);
                let _ = write!(out, r#" {name}="url(#{id})""#);
            }
            opacity
        }
    };
    if alpha < 1.0 {
        let _ = write!(out, r#" {name}-opacity="{}""#, fmt_num(alpha.max(0.0)));
    }
}

fn style_attrs(out: &mut String, defs: &mut Defs, style: &Style, bbox: &BoundingRect) {
    match style.fill.as_ref().filter(|_| style.has_fill()) {
        Some(fill) => paint_attrs(out, defs, "fill", fill, style.fill_opacity, bbox),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = style.stroke.as_ref().filter(|_| style.has_stroke()) {
        paint_attrs(out, defs, "stroke", stroke, style.stroke_opacity, bbox);
        let _ = write!(out, r#" stroke-width="{}""#, fmt_num(style.line_width));
        if style.line_cap != LineCap::Butt {
            let _ = write!(out, r#" stroke-linecap="{}""#, style.line_cap.as_str());
        }
        if style.line_join != LineJoin::Miter {
            let _ = write!(out, r#" stroke-linejoin="{}""#, style.line_join.as_str());
        } else if style.miter_limit != DEFAULT_MITER_LIMIT {
            let _ = write!(out, r#" stroke-miterlimit="{}""#, fmt_num(style.miter_limit));
        }
        if !style.line_dash.is_empty() {
            let dash: Vec<String> = style.line_dash.iter().map(|v| fmt_num(*v)).collect();
            let _ = write!(out, r#" stroke-dasharray="{}""#, dash.join(","));
            if style.line_dash_offset != 0.0 {
                let _ = write!(
                    out,
                    r#" stroke-dashoffset="{}""#,
                    fmt_num(style.line_dash_offset)
                );
            }
        }
    }
    if style.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, fmt_num(style.opacity.max(0.0)));
    }
}

/// Write one displayable; returns `false` when nothing was emitted.
fn write_displayable(out: &mut String, defs: &mut Defs, scene: &mut Scene, id: NodeId) -> bool {
    let is_path = scene
        .node(id)
        .and_then(Node::as_displayable)
        .is_some_and(|d| matches!(d.content, Content::Path(_)));
    let path = if is_path {
        scene
            .build_path(id, None)
            .map(|p: &PathProxy| (p.to_svg_path_data(), p.bounding_rect()))
    } else {
        None
    };
    let bbox = scene.bounding_rect(id);

    let Some(node) = scene.node(id) else {
        return false;
    };
    let Some(d) = node.as_displayable() else {
        return false;
    };
    let transform = transform_attr(node.transform.transform());
    let style = &d.style;

    match &d.content {
        Content::Path(_) => {
            let Some((data, path_bbox)) = path.filter(|(data, _)| !data.is_empty()) else {
                return false;
            };
            let _ = write!(out, r#"<path d="{data}"{transform}"#);
            style_attrs(out, defs, style, &path_bbox);
            out.push_str("/>");
        }
        Content::Text(t) => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}""#,
                fmt_num(t.x),
                fmt_num(t.y),
                escape(&style.font_family),
                fmt_num(style.font_size)
            );
            if style.font_weight != "normal" {
                let _ = write!(out, r#" font-weight="{}""#, escape(&style.font_weight));
            }
            let _ = write!(out, r#" text-anchor="{}""#, style.text_align.svg_anchor());
            let baseline = match style.text_baseline {
                TextBaseline::Top => Some("hanging"),
                TextBaseline::Middle => Some("central"),
                TextBaseline::Bottom => Some("text-after-edge"),
                TextBaseline::Alphabetic => None,
            };
            if let Some(b) = baseline {
                let _ = write!(out, r#" dominant-baseline="{b}""#);
            }
            out.push_str(&transform);
            style_attrs(out, defs, style, &bbox);
            let _ = write!(out, ">{}</text>", escape(&t.text));
        }
        Content::Image(img) => {
            let Some(href) = img.href.as_deref() else {
                tracing::warn!(?id, "image without href skipped in svg output");
                return false;
            };
            let (w, h) = img.size();
            let _ = write!(
                out,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"{transform}"#,
                escape(href),
                fmt_num(img.x),
                fmt_num(img.y),
                fmt_num(w),
                fmt_num(h)
            );
            if style.opacity < 1.0 {
                let _ = write!(out, r#" opacity="{}""#, fmt_num(style.opacity.max(0.0)));
            }
            out.push_str("/>");
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
