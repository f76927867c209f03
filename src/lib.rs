//! Tessera is a retained-mode 2D scene graph.
//!
//! A [`Scene`] owns a tree of groups and displayables (paths, text, images). Nodes carry their
//! own transform, events and animators; the scene keeps a z-sorted display list that two
//! painters consume:
//!
//! - [`CanvasPainter`] rasterizes into premultiplied RGBA8 frames
//! - [`SvgPainter`] serializes a standalone SVG document
//!
//! Geometry is recorded once into a [`PathProxy`] and replayed for hit-testing, painting and
//! SVG path data, so every consumer sees the same shape.
#![forbid(unsafe_code)]

mod foundation;

/// Keyframe animation of node properties.
pub mod animation;
/// Path recording, shapes and geometric queries.
pub mod path;
/// Painter backends.
pub mod render;
/// Scene tree, storage and dispatch.
pub mod scene;

pub use crate::foundation::core::{Affine, BezPath, Color, Point, Rect, Vec2};
pub use crate::foundation::error::{TesseraError, TesseraResult};
pub use crate::foundation::lru::LruCache;
pub use crate::foundation::math;

pub use crate::animation::accessor::AnimRoot;
pub use crate::animation::animator::{Animator, AnimatorId, AnimatorState};
pub use crate::animation::builder::{AnimateOpts, AnimatorBuilder};
pub use crate::animation::ease::Ease;
pub use crate::animation::value::AnimValue;
pub use crate::path::proxy::{PathCommand, PathProxy};
pub use crate::path::shape::{CustomShape, Shape};
pub use crate::path::sink::{ArcSegment, PathSink};
pub use crate::render::backend::{
    CanvasPainterOpts, FrameRGBA, LayerConfig, Painter, PainterKind, SvgPainterOpts,
};
pub use crate::render::cpu::CanvasPainter;
pub use crate::render::svg::SvgPainter;
pub use crate::scene::bbox::BoundingRect;
pub use crate::scene::dispatch::PointerEvent;
pub use crate::scene::event::{EventProcessor, Eventful, Handler, SceneEvent};
pub use crate::scene::node::{
    Content, Displayable, GradientStop, GroupData, ImageContent, ImageData, LineCap, LineJoin,
    LinearGradient, Node, NodeId, NodeKind, Paint, RadialGradient, Style, TextAlign, TextBaseline,
    TextContent,
};
pub use crate::scene::storage::DisplayEntry;
pub use crate::scene::text::{
    FixedAdvanceMeasurer, TextMeasurer, TextMetrics, TextWidthCache,
};
pub use crate::scene::transform::Transformable;
pub use crate::scene::tree::Scene;
