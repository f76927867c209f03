//! Scene node data: ids, styles, drawable content.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use smallvec::SmallVec;

use crate::{
    animation::animator::Animator,
    foundation::{
        core::Color,
        error::{TesseraError, TesseraResult},
    },
    path::{proxy::PathProxy, shape::Shape},
    scene::{
        event::{Eventful, SceneEvent},
        transform::Transformable,
    },
};

/// Generational handle to a node in a [`crate::Scene`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.index, self.generation)
    }
}

/// Clip owners from outermost to innermost.
pub type ClipChain = SmallVec<[NodeId; 4]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "butt" => Some(Self::Butt),
            "round" => Some(Self::Round),
            "square" => Some(Self::Square),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "miter" => Some(Self::Miter),
            "round" => Some(Self::Round),
            "bevel" => Some(Self::Bevel),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" | "start" => Some(Self::Left),
            "center" | "middle" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            _ => None,
        }
    }

    /// SVG `text-anchor` value.
    pub fn svg_anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Bottom,
    #[default]
    Alphabetic,
}

impl TextBaseline {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" | "hanging" => Some(Self::Top),
            "middle" => Some(Self::Middle),
            "bottom" | "ideographic" => Some(Self::Bottom),
            "alphabetic" => Some(Self::Alphabetic),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient from `(x, y)` to `(x2, y2)`.
///
/// Unless `global` is set the coordinates are fractions of the element's bounding rect.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    pub stops: Vec<GradientStop>,
    pub global: bool,
}

/// Radial gradient centered at `(x, y)` with radius `r`; same `global` rule as linear.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub stops: Vec<GradientStop>,
    pub global: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    /// Paint that draws nothing (`none`, fully transparent solid).
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Solid(c) if c.is_transparent())
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Solid(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

/// Visual style of a displayable.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub line_width: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Paint::Solid(Color::BLACK)),
            stroke: None,
            line_width: 1.0,
            opacity: 1.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            font_size: 12.0,
            font_family: "sans-serif".to_owned(),
            font_weight: "normal".to_owned(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        }
    }
}

impl Style {
    pub fn has_fill(&self) -> bool {
        self.fill.as_ref().is_some_and(|p| !p.is_none())
    }

    pub fn has_stroke(&self) -> bool {
        self.line_width > 0.0 && self.stroke.as_ref().is_some_and(|p| !p.is_none())
    }

    /// CSS font shorthand, e.g. `"bold 14px serif"`.
    pub fn font(&self) -> String {
        if self.font_weight == "normal" {
            format!("{}px {}", self.font_size, self.font_family)
        } else {
            format!("{} {}px {}", self.font_weight, self.font_size, self.font_family)
        }
    }

    pub fn fill(mut self, paint: impl Into<Paint>) -> Self {
        self.fill = Some(paint.into());
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn stroke(mut self, paint: impl Into<Paint>, line_width: f64) -> Self {
        self.stroke = Some(paint.into());
        self.line_width = line_width;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextContent {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Decoded raster, premultiplied RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl ImageData {
    /// Decode an encoded image (PNG, JPEG, ...) into premultiplied RGBA8.
    pub fn decode(bytes: &[u8]) -> TesseraResult<Self> {
        let img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }

    /// Wrap already-premultiplied pixels.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TesseraResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| TesseraError::validation("image dimensions overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(TesseraError::validation(format!(
                "image data is {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul,
        })
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageContent {
    pub x: f64,
    pub y: f64,
    /// Zero means "use the decoded width".
    pub width: f64,
    pub height: f64,
    /// Reference emitted by the SVG painter.
    pub href: Option<String>,
    /// Pixels used by the canvas painter.
    pub data: Option<Arc<ImageData>>,
}

impl ImageContent {
    pub fn size(&self) -> (f64, f64) {
        let (dw, dh) = self
            .data
            .as_ref()
            .map_or((0.0, 0.0), |d| (f64::from(d.width), f64::from(d.height)));
        let w = if self.width > 0.0 { self.width } else { dw };
        let h = if self.height > 0.0 { self.height } else { dh };
        (w, h)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Path(Shape),
    Text(TextContent),
    Image(ImageContent),
}

/// Drawable payload of a displayable node.
#[derive(Clone, Debug)]
pub struct Displayable {
    pub style: Style,
    pub content: Content,
    pub(crate) path: PathProxy,
    pub(crate) path_dirty: bool,
    pub(crate) hover: bool,
}

impl Displayable {
    pub fn new(content: Content, style: Style) -> Self {
        Self {
            style,
            content,
            path: PathProxy::new(),
            path_dirty: true,
            hover: false,
        }
    }

    /// Last recorded geometry (see [`crate::Scene::build_path`]).
    pub fn path(&self) -> &PathProxy {
        &self.path
    }

    pub fn shape(&self) -> Option<&Shape> {
        match &self.content {
            Content::Path(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hover
    }
}

#[derive(Clone, Debug, Default)]
pub struct GroupData {
    pub(crate) children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group(GroupData),
    Displayable(Box<Displayable>),
}

/// One element of the scene tree.
pub struct Node {
    pub name: Option<String>,
    pub transform: Transformable,
    pub events: Eventful<SceneEvent>,
    pub ignore: bool,
    pub invisible: bool,
    pub silent: bool,
    pub zlevel: i32,
    pub z: f64,
    pub z2: f64,
    /// Clip shape in this node's local space; applies to the node and its subtree.
    pub clip: Option<Shape>,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) animators: Vec<Animator>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("z", &(self.zlevel, self.z, self.z2))
            .field("kind", &self.kind)
            .field("animators", &self.animators.len())
            .finish_non_exhaustive()
    }
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            name: None,
            transform: Transformable::new(),
            events: Eventful::new(),
            ignore: false,
            invisible: false,
            silent: false,
            zlevel: 0,
            z: 0.0,
            z2: 0.0,
            clip: None,
            kind,
            parent: None,
            animators: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group(GroupData::default()))
    }

    pub fn displayable(content: Content, style: Style) -> Self {
        Self::with_kind(NodeKind::Displayable(Box::new(Displayable::new(
            content, style,
        ))))
    }

    pub fn path(shape: Shape, style: Style) -> Self {
        Self::displayable(Content::Path(shape), style)
    }

    pub fn text(text: impl Into<String>, x: f64, y: f64, style: Style) -> Self {
        Self::displayable(
            Content::Text(TextContent {
                text: text.into(),
                x,
                y,
            }),
            style,
        )
    }

    pub fn image(content: ImageContent) -> Self {
        Self::displayable(Content::Image(content), Style::default())
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform.set_position(x, y);
        self
    }

    pub fn with_z(mut self, zlevel: i32, z: f64, z2: f64) -> Self {
        self.zlevel = zlevel;
        self.z = z;
        self.z2 = z2;
        self
    }

    pub fn with_clip(mut self, clip: Shape) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn as_displayable(&self) -> Option<&Displayable> {
        match &self.kind {
            NodeKind::Displayable(d) => Some(d),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_displayable_mut(&mut self) -> Option<&mut Displayable> {
        match &mut self.kind {
            NodeKind::Displayable(d) => Some(d),
            NodeKind::Group(_) => None,
        }
    }

    pub fn style(&self) -> Option<&Style> {
        self.as_displayable().map(|d| &d.style)
    }

    pub fn style_mut(&mut self) -> Option<&mut Style> {
        self.as_displayable_mut().map(|d| &mut d.style)
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group(g) => &g.children,
            NodeKind::Displayable(_) => &[],
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.animators.is_empty()
    }

    /// Flag geometry and transform as stale.
    pub(crate) fn mark_dirty(&mut self) {
        self.transform.mark_dirty();
        if let NodeKind::Displayable(d) = &mut self.kind {
            d.path_dirty = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
