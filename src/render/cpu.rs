use std::collections::BTreeMap;
use std::sync::Arc;

use kurbo::{Affine, PathEl};

use crate::{
    foundation::{
        core::Color,
        error::{TesseraError, TesseraResult},
        lru::LruCache,
    },
    path::proxy::PathProxy,
    render::backend::{
        CanvasPainterOpts, FrameRGBA, LayerConfig, Painter, PainterKind, ResolvedGradient,
        sample_stops,
    },
    scene::{
        bbox::BoundingRect,
        node::{ClipChain, Content, ImageData, LineCap, LineJoin, Node, NodeId, Paint, Style},
        storage::DisplayEntry,
        tree::Scene,
    },
};

const IMAGE_CACHE_CAPACITY: usize = 64;
const MAX_GRADIENT_PX: f64 = 1024.0;

/// Rasterizes a scene into premultiplied RGBA8 frames.
pub struct CanvasPainter {
    opts: CanvasPainterOpts,
    layers: BTreeMap<i32, LayerConfig>,
    frame: Option<FrameRGBA>,
    images: LruCache<usize, (Arc<ImageData>, vello_cpu::Image)>,
    disposed: bool,
}

impl std::fmt::Debug for CanvasPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasPainter")
            .field("opts", &self.opts)
            .field("layers", &self.layers)
            .field("has_frame", &self.frame.is_some())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl CanvasPainter {
    pub fn new(opts: CanvasPainterOpts) -> Self {
        Self {
            opts,
            layers: BTreeMap::new(),
            frame: None,
            images: LruCache::new(IMAGE_CACHE_CAPACITY),
            disposed: false,
        }
    }

    /// Render the scene unconditionally and return the frame.
    #[tracing::instrument(skip(self, scene))]
    pub fn render(&mut self, scene: &mut Scene) -> TesseraResult<&FrameRGBA> {
        let frame = self.render_frame(scene, false)?;
        scene.clear_refresh();
        Ok(self.frame.insert(frame))
    }

    fn surface_size(&self) -> TesseraResult<(u16, u16)> {
        let dim = |v: u32| -> TesseraResult<u16> {
            let px = (f64::from(v) * self.opts.dpr).round();
            if !(1.0..=f64::from(u16::MAX)).contains(&px) {
                return Err(TesseraError::render(format!(
                    "surface dimension {px} is out of range"
                )));
            }
            Ok(px as u16)
        };
        Ok((dim(self.opts.width)?, dim(self.opts.height)?))
    }

    fn render_frame(&mut self, scene: &mut Scene, hover_pass: bool) -> TesseraResult<FrameRGBA> {
        let (w, h) = self.surface_size()?;
        let entries = scene.display_list(true).to_vec();
        let base = Affine::scale(self.opts.dpr);
        let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        if let Some(bg) = self.opts.background {
            fill_surface(&mut ctx, full, bg);
        }

        let mut zlevel = None;
        for entry in &entries {
            let z = scene.node(entry.id).map(|n| n.zlevel);
            if z != zlevel {
                zlevel = z;
                if let Some(c) = z
                    .and_then(|z| self.layers.get(&z))
                    .and_then(|l| l.clear_color)
                {
                    fill_surface(&mut ctx, full, c);
                }
            }
            self.draw_entry(&mut ctx, scene, entry, base)?;
        }

        if hover_pass {
            for entry in &entries {
                let hovered = scene
                    .node(entry.id)
                    .and_then(Node::as_displayable)
                    .is_some_and(|d| d.is_hovered());
                if hovered {
                    self.draw_entry(&mut ctx, scene, entry, base)?;
                }
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        tracing::debug!(entries = entries.len(), width = w, height = h, "canvas frame rendered");
        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_entry(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        scene: &mut Scene,
        entry: &DisplayEntry,
        base: Affine,
    ) -> TesseraResult<()> {
        let id = entry.id;
        let Some(node) = scene.node(id) else {
            return Ok(());
        };
        if node.invisible {
            return Ok(());
        }
        let is_path = node
            .as_displayable()
            .is_some_and(|d| matches!(d.content, Content::Path(_)));
        let path = if is_path {
            scene.build_path(id, None).map(PathProxy::to_bez_path)
        } else {
            None
        };
        let Some(node) = scene.node(id) else {
            return Ok(());
        };
        let Some(d) = node.as_displayable() else {
            return Ok(());
        };

        let clips = push_clips(ctx, scene, &entry.clip_chain, base);
        let world = base * node.transform.world();
        ctx.set_transform(affine_to_cpu(world));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let style = &d.style;
        let scale = {
            let s = node.transform.global_scale();
            s.x.abs().max(s.y.abs()) * self.opts.dpr
        };

        match &d.content {
            Content::Path(_) => {
                if let Some(path) = path {
                    draw_path(ctx, &path, style, scale);
                }
            }
            Content::Text(t) => {
                tracing::debug!(?id, len = t.text.len(), "canvas text rendering is not available");
            }
            Content::Image(img) => match img.data.as_ref() {
                Some(data) => {
                    let paint = self.image_paint(data)?;
                    let (w, h) = img.size();
                    let sx = w / f64::from(data.width.max(1));
                    let sy = h / f64::from(data.height.max(1));
                    ctx.set_paint(paint);
                    ctx.set_paint_transform(affine_to_cpu(
                        Affine::translate((img.x, img.y)) * Affine::scale_non_uniform(sx, sy),
                    ));
                    let opacity = style.opacity.clamp(0.0, 1.0) as f32;
                    if opacity < 1.0 {
                        ctx.push_opacity_layer(opacity);
                    }
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        img.x,
                        img.y,
                        img.x + w,
                        img.y + h,
                    ));
                    if opacity < 1.0 {
                        ctx.pop_layer();
                    }
                }
                None => tracing::debug!(?id, "image has no decoded pixels; skipped"),
            },
        }

        for _ in 0..clips {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn image_paint(&mut self, data: &Arc<ImageData>) -> TesseraResult<vello_cpu::Image> {
        let key = Arc::as_ptr(data) as usize;
        if let Some((held, paint)) = self.images.get(&key)
            && Arc::ptr_eq(held, data)
        {
            return Ok(paint.clone());
        }
        let pixmap = image_premul_bytes_to_pixmap(&data.rgba8_premul, data.width, data.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.images.put(key, (data.clone(), paint.clone()));
        Ok(paint)
    }
}

impl Painter for CanvasPainter {
    fn kind(&self) -> PainterKind {
        PainterKind::Canvas
    }

    fn refresh(&mut self, scene: &mut Scene) {
        if self.disposed {
            tracing::warn!("refresh on a disposed canvas painter");
            return;
        }
        if !scene.needs_refresh() && self.frame.is_some() {
            return;
        }
        if let Err(err) = self.render(scene) {
            tracing::error!(%err, "canvas refresh failed");
        }
    }

    fn refresh_hover(&mut self, scene: &mut Scene) {
        if self.disposed {
            return;
        }
        match self.render_frame(scene, true) {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => tracing::error!(%err, "canvas hover refresh failed"),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.opts.width = width;
        self.opts.height = height;
        self.frame = None;
    }

    fn width(&self) -> u32 {
        self.opts.width
    }

    fn height(&self) -> u32 {
        self.opts.height
    }

    fn path_to_image(&mut self, scene: &mut Scene, id: NodeId) -> Option<FrameRGBA> {
        scene.display_list(true);
        let node = scene.node(id)?;
        if node.is_group() {
            tracing::warn!(?id, "path_to_image needs a displayable");
            return None;
        }
        let world = node.transform.world();
        let rect = scene.bounding_rect(id).transformed(&world);
        let dpr = self.opts.dpr;
        let w = (rect.width * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;
        let h = (rect.height * dpr).ceil().clamp(1.0, f64::from(u16::MAX)) as u16;

        let base = Affine::scale(dpr) * Affine::translate((-rect.x, -rect.y));
        let entry = DisplayEntry {
            id,
            clip_chain: ClipChain::new(),
        };
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        if let Err(err) = self.draw_entry(&mut ctx, scene, &entry, base) {
            tracing::error!(%err, ?id, "path_to_image failed");
            return None;
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Some(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn config_layer(&mut self, zlevel: i32, config: LayerConfig) {
        self.layers.insert(zlevel, config);
        self.frame = None;
    }

    fn viewport_root(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    fn dispose(&mut self) {
        self.frame = None;
        self.layers.clear();
        self.images.clear();
        self.disposed = true;
    }
}

fn fill_surface(ctx: &mut vello_cpu::RenderContext, full: vello_cpu::kurbo::Rect, c: Color) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(c));
    ctx.fill_rect(&full);
}

/// Push one clip layer per chain owner; returns how many were pushed.
fn push_clips(
    ctx: &mut vello_cpu::RenderContext,
    scene: &Scene,
    chain: &ClipChain,
    base: Affine,
) -> usize {
    let mut pushed = 0;
    for owner in chain {
        let Some(n) = scene.node(*owner) else {
            continue;
        };
        let Some(clip) = &n.clip else {
            continue;
        };
        ctx.set_transform(affine_to_cpu(base * n.transform.world()));
        ctx.push_clip_layer(&bezpath_to_cpu(&clip.to_path_proxy().to_bez_path()));
        pushed += 1;
    }
    pushed
}

fn draw_path(ctx: &mut vello_cpu::RenderContext, path: &kurbo::BezPath, style: &Style, scale: f64) {
    let cpu_path = bezpath_to_cpu(path);
    let opacity = style.opacity.clamp(0.0, 1.0);
    let bbox = BoundingRect::from_kurbo(kurbo::Shape::bounding_box(path));

    if let Some(fill) = style.fill.as_ref().filter(|_| style.has_fill())
        && set_paint(ctx, fill, style.fill_opacity * opacity, &bbox, &bbox, scale)
    {
        ctx.fill_path(&cpu_path);
    }

    if let Some(stroke) = style.stroke.as_ref().filter(|_| style.has_stroke()) {
        let area = bbox.inflate(style.line_width / 2.0);
        if set_paint(ctx, stroke, style.stroke_opacity * opacity, &bbox, &area, scale) {
            ctx.set_stroke(stroke_to_cpu(style));
            ctx.stroke_path(&cpu_path);
        }
    }
}

/// Install `paint` on the context.
///
/// Gradients resolve against `bbox` and become an image paint covering `area`.
fn set_paint(
    ctx: &mut vello_cpu::RenderContext,
    paint: &Paint,
    opacity: f64,
    bbox: &BoundingRect,
    area: &BoundingRect,
    scale: f64,
) -> bool {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    match paint {
        Paint::Solid(c) => {
            ctx.set_paint(color_to_cpu(c.with_opacity(opacity)));
            true
        }
        _ => {
            let Some(g) = ResolvedGradient::resolve(paint, bbox) else {
                return false;
            };
            match gradient_image(&g, area, scale, opacity) {
                Ok((image, transform)) => {
                    ctx.set_paint(image);
                    ctx.set_paint_transform(affine_to_cpu(transform));
                    true
                }
                Err(err) => {
                    tracing::warn!(%err, "gradient raster failed");
                    false
                }
            }
        }
    }
}

/// Rasterize a gradient over `area` at `scale` device pixels per unit.
///
/// Returns the image and the paint transform placing it over `area`.
fn gradient_image(
    g: &ResolvedGradient<'_>,
    area: &BoundingRect,
    scale: f64,
    opacity: f64,
) -> TesseraResult<(vello_cpu::Image, Affine)> {
    let size = |v: f64| (v * scale).ceil().clamp(1.0, MAX_GRADIENT_PX);
    let (iw, ih) = (size(area.width), size(area.height));
    let sx = area.width.max(1e-6) / iw;
    let sy = area.height.max(1e-6) / ih;

    let mut bytes = Vec::with_capacity(iw as usize * ih as usize * 4);
    for py in 0..ih as u32 {
        for px in 0..iw as u32 {
            let p = kurbo::Point::new(
                area.x + (f64::from(px) + 0.5) * sx,
                area.y + (f64::from(py) + 0.5) * sy,
            );
            let c = sample_stops(g.stops(), g.offset_at(p)).with_opacity(opacity);
            bytes.extend_from_slice(&c.to_rgba8_premul());
        }
    }
    let pixmap = image_premul_bytes_to_pixmap(&bytes, iw as u32, ih as u32)?;
    let image = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    Ok((
        image,
        Affine::translate((area.x, area.y)) * Affine::scale_non_uniform(sx, sy),
    ))
}

fn stroke_to_cpu(style: &Style) -> vello_cpu::kurbo::Stroke {
    use vello_cpu::kurbo::{Cap, Join, Stroke};

    let cap = match style.line_cap {
        LineCap::Butt => Cap::Butt,
        LineCap::Round => Cap::Round,
        LineCap::Square => Cap::Square,
    };
    let join = match style.line_join {
        LineJoin::Miter => Join::Miter,
        LineJoin::Round => Join::Round,
        LineJoin::Bevel => Join::Bevel,
    };
    let stroke = Stroke::new(style.line_width)
        .with_caps(cap)
        .with_join(join)
        .with_miter_limit(style.miter_limit);
    if style.line_dash.iter().any(|d| *d > 0.0) {
        stroke.with_dashes(style.line_dash_offset, style.line_dash.iter().copied())
    } else {
        stroke
    }
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TesseraResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TesseraError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TesseraError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TesseraError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
