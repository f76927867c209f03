//! Typed property lenses used by animators.
//!
//! A property path (`""`, `"style"` or `"shape"`) plus a leaf key is resolved once into an
//! [`Accessor`]; every frame afterwards reads and writes the node field directly.

use kurbo::{BezPath, Point, Vec2};
use serde_json::Value;

use crate::{
    animation::value::AnimValue,
    foundation::core::Color,
    path::{proxy::PathProxy, shape::Shape},
    scene::node::{Content, Node, Paint},
};

/// Object an animator writes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimRoot {
    Element,
    Style,
    Shape,
}

impl AnimRoot {
    /// Resolve a property path. Returns `None` for unknown paths.
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "" => Some(Self::Element),
            "style" => Some(Self::Style),
            "shape" => Some(Self::Shape),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Element => "",
            Self::Style => "style",
            Self::Shape => "shape",
        }
    }

    /// Whether `node` has an object at this path.
    pub fn exists_on(self, node: &Node) -> bool {
        match self {
            Self::Element => true,
            Self::Style => node.style().is_some(),
            Self::Shape => node.as_displayable().and_then(|d| d.shape()).is_some(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementProp {
    X,
    Y,
    Position,
    Rotation,
    ScaleX,
    ScaleY,
    Scale,
    OriginX,
    OriginY,
    Z,
    Z2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleProp {
    Fill,
    Stroke,
    Opacity,
    FillOpacity,
    StrokeOpacity,
    LineWidth,
    LineDash,
    LineDashOffset,
    MiterLimit,
    FontSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeProp {
    X,
    Y,
    Width,
    Height,
    R,
    Cx,
    Cy,
    Rx,
    Ry,
    R0,
    StartAngle,
    EndAngle,
    X1,
    Y1,
    X2,
    Y2,
    Points,
    /// Whole path geometry, as SVG path data in keyframes.
    D,
}

/// Resolved property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accessor {
    Element(ElementProp),
    Style(StyleProp),
    Shape(ShapeProp),
}

impl Accessor {
    /// Resolve `key` under `root` for `node`. Shape keys are checked against the current shape.
    pub fn resolve(root: AnimRoot, key: &str, node: &Node) -> Option<Self> {
        match root {
            AnimRoot::Element => {
                let p = match key {
                    "x" => ElementProp::X,
                    "y" => ElementProp::Y,
                    "position" => ElementProp::Position,
                    "rotation" => ElementProp::Rotation,
                    "scaleX" => ElementProp::ScaleX,
                    "scaleY" => ElementProp::ScaleY,
                    "scale" => ElementProp::Scale,
                    "originX" => ElementProp::OriginX,
                    "originY" => ElementProp::OriginY,
                    "z" => ElementProp::Z,
                    "z2" => ElementProp::Z2,
                    _ => return None,
                };
                Some(Self::Element(p))
            }
            AnimRoot::Style => {
                node.style()?;
                let p = match key {
                    "fill" => StyleProp::Fill,
                    "stroke" => StyleProp::Stroke,
                    "opacity" => StyleProp::Opacity,
                    "fillOpacity" => StyleProp::FillOpacity,
                    "strokeOpacity" => StyleProp::StrokeOpacity,
                    "lineWidth" => StyleProp::LineWidth,
                    "lineDash" => StyleProp::LineDash,
                    "lineDashOffset" => StyleProp::LineDashOffset,
                    "miterLimit" => StyleProp::MiterLimit,
                    "fontSize" => StyleProp::FontSize,
                    _ => return None,
                };
                Some(Self::Style(p))
            }
            AnimRoot::Shape => {
                let shape = node.as_displayable()?.shape()?;
                let p = shape_prop(shape, key)?;
                Some(Self::Shape(p))
            }
        }
    }

    /// Convert a JSON keyframe value into the typed value this property stores.
    pub fn parse_value(&self, v: &Value) -> Option<AnimValue> {
        match self {
            Self::Element(ElementProp::Position | ElementProp::Scale)
            | Self::Style(StyleProp::LineDash) => number_array(v).map(AnimValue::Array),
            Self::Style(StyleProp::Fill | StyleProp::Stroke) => parse_color(v).map(AnimValue::Color),
            Self::Shape(ShapeProp::Points) => {
                let pts = v
                    .as_array()?
                    .iter()
                    .map(|p| {
                        let xy = number_array(p)?;
                        match xy.as_slice() {
                            [x, y] => Some(Point::new(*x, *y)),
                            _ => None,
                        }
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(AnimValue::Points(pts))
            }
            Self::Shape(ShapeProp::D) => {
                let path = BezPath::from_svg(v.as_str()?).ok()?;
                Some(AnimValue::Path(PathProxy::from_bez_path(&path)))
            }
            _ => v.as_f64().map(AnimValue::Number),
        }
    }

    /// Read the current value from `node`.
    pub fn get(&self, node: &Node) -> Option<AnimValue> {
        match self {
            Self::Element(p) => {
                let t = &node.transform;
                let n = match p {
                    ElementProp::X => t.position.x,
                    ElementProp::Y => t.position.y,
                    ElementProp::Position => {
                        return Some(AnimValue::Array(vec![t.position.x, t.position.y]));
                    }
                    ElementProp::Rotation => t.rotation,
                    ElementProp::ScaleX => t.scale.x,
                    ElementProp::ScaleY => t.scale.y,
                    ElementProp::Scale => {
                        return Some(AnimValue::Array(vec![t.scale.x, t.scale.y]));
                    }
                    ElementProp::OriginX => t.rotation_origin.x,
                    ElementProp::OriginY => t.rotation_origin.y,
                    ElementProp::Z => node.z,
                    ElementProp::Z2 => node.z2,
                };
                Some(AnimValue::Number(n))
            }
            Self::Style(p) => {
                let s = node.style()?;
                let n = match p {
                    StyleProp::Fill => return paint_color(s.fill.as_ref()),
                    StyleProp::Stroke => return paint_color(s.stroke.as_ref()),
                    StyleProp::LineDash => return Some(AnimValue::Array(s.line_dash.clone())),
                    StyleProp::Opacity => s.opacity,
                    StyleProp::FillOpacity => s.fill_opacity,
                    StyleProp::StrokeOpacity => s.stroke_opacity,
                    StyleProp::LineWidth => s.line_width,
                    StyleProp::LineDashOffset => s.line_dash_offset,
                    StyleProp::MiterLimit => s.miter_limit,
                    StyleProp::FontSize => s.font_size,
                };
                Some(AnimValue::Number(n))
            }
            Self::Shape(p) => {
                let shape = node.as_displayable()?.shape()?;
                shape_get(shape, *p)
            }
        }
    }

    /// Write `value` into `node`. Values of the wrong kind are ignored.
    pub fn set(&self, node: &mut Node, value: &AnimValue) {
        match self {
            Self::Element(p) => {
                let t = &mut node.transform;
                match (p, value) {
                    (ElementProp::X, AnimValue::Number(v)) => t.position.x = *v,
                    (ElementProp::Y, AnimValue::Number(v)) => t.position.y = *v,
                    (ElementProp::Position, AnimValue::Array(v)) if v.len() == 2 => {
                        t.position = Vec2::new(v[0], v[1]);
                    }
                    (ElementProp::Rotation, AnimValue::Number(v)) => t.rotation = *v,
                    (ElementProp::ScaleX, AnimValue::Number(v)) => t.scale.x = *v,
                    (ElementProp::ScaleY, AnimValue::Number(v)) => t.scale.y = *v,
                    (ElementProp::Scale, AnimValue::Array(v)) if v.len() == 2 => {
                        t.scale = Vec2::new(v[0], v[1]);
                    }
                    (ElementProp::OriginX, AnimValue::Number(v)) => {
                        t.rotation_origin.x = *v;
                        t.scale_origin.x = *v;
                    }
                    (ElementProp::OriginY, AnimValue::Number(v)) => {
                        t.rotation_origin.y = *v;
                        t.scale_origin.y = *v;
                    }
                    (ElementProp::Z, AnimValue::Number(v)) => node.z = *v,
                    (ElementProp::Z2, AnimValue::Number(v)) => node.z2 = *v,
                    _ => return,
                }
            }
            Self::Style(p) => {
                let Some(s) = node.style_mut() else {
                    return;
                };
                match (p, value) {
                    (StyleProp::Fill, AnimValue::Color(c)) => s.fill = Some(Paint::Solid(*c)),
                    (StyleProp::Stroke, AnimValue::Color(c)) => s.stroke = Some(Paint::Solid(*c)),
                    (StyleProp::LineDash, AnimValue::Array(v)) => s.line_dash.clone_from(v),
                    (StyleProp::Opacity, AnimValue::Number(v)) => s.opacity = *v,
                    (StyleProp::FillOpacity, AnimValue::Number(v)) => s.fill_opacity = *v,
                    (StyleProp::StrokeOpacity, AnimValue::Number(v)) => s.stroke_opacity = *v,
                    (StyleProp::LineWidth, AnimValue::Number(v)) => s.line_width = *v,
                    (StyleProp::LineDashOffset, AnimValue::Number(v)) => s.line_dash_offset = *v,
                    (StyleProp::MiterLimit, AnimValue::Number(v)) => s.miter_limit = *v,
                    (StyleProp::FontSize, AnimValue::Number(v)) => s.font_size = *v,
                    _ => return,
                }
            }
            Self::Shape(p) => {
                let Some(d) = node.as_displayable_mut() else {
                    return;
                };
                let Content::Path(shape) = &mut d.content else {
                    return;
                };
                if !shape_set(shape, *p, value) {
                    return;
                }
            }
        }
        node.mark_dirty();
    }
}

fn number_array(v: &Value) -> Option<Vec<f64>> {
    v.as_array()?.iter().map(Value::as_f64).collect()
}

fn parse_color(v: &Value) -> Option<Color> {
    serde_json::from_value(v.clone()).ok()
}

fn paint_color(p: Option<&Paint>) -> Option<AnimValue> {
    match p {
        Some(Paint::Solid(c)) => Some(AnimValue::Color(*c)),
        // Missing paint animates from transparent, like `none`.
        None => Some(AnimValue::Color(Color::TRANSPARENT)),
        Some(_) => None,
    }
}

fn shape_prop(shape: &Shape, key: &str) -> Option<ShapeProp> {
    use ShapeProp as P;
    let p = match (shape, key) {
        (Shape::Rect { .. }, "x") => P::X,
        (Shape::Rect { .. }, "y") => P::Y,
        (Shape::Rect { .. }, "width") => P::Width,
        (Shape::Rect { .. }, "height") => P::Height,
        (Shape::Rect { .. } | Shape::Circle { .. } | Shape::Sector { .. }, "r") => P::R,
        (Shape::Circle { .. } | Shape::Ellipse { .. } | Shape::Sector { .. }, "cx") => P::Cx,
        (Shape::Circle { .. } | Shape::Ellipse { .. } | Shape::Sector { .. }, "cy") => P::Cy,
        (Shape::Ellipse { .. }, "rx") => P::Rx,
        (Shape::Ellipse { .. }, "ry") => P::Ry,
        (Shape::Sector { .. }, "r0") => P::R0,
        (Shape::Sector { .. }, "startAngle") => P::StartAngle,
        (Shape::Sector { .. }, "endAngle") => P::EndAngle,
        (Shape::Line { .. }, "x1") => P::X1,
        (Shape::Line { .. }, "y1") => P::Y1,
        (Shape::Line { .. }, "x2") => P::X2,
        (Shape::Line { .. }, "y2") => P::Y2,
        (Shape::Polyline { .. } | Shape::Polygon { .. }, "points") => P::Points,
        (Shape::Path(_), "d" | "path") => P::D,
        _ => return None,
    };
    Some(p)
}

fn shape_field(shape: &mut Shape, p: ShapeProp) -> Option<&mut f64> {
    use ShapeProp as P;
    let f = match (shape, p) {
        (Shape::Rect { x, .. }, P::X) => x,
        (Shape::Rect { y, .. }, P::Y) => y,
        (Shape::Rect { width, .. }, P::Width) => width,
        (Shape::Rect { height, .. }, P::Height) => height,
        (Shape::Rect { r, .. } | Shape::Circle { r, .. } | Shape::Sector { r, .. }, P::R) => r,
        (Shape::Circle { cx, .. } | Shape::Ellipse { cx, .. } | Shape::Sector { cx, .. }, P::Cx) => {
            cx
        }
        (Shape::Circle { cy, .. } | Shape::Ellipse { cy, .. } | Shape::Sector { cy, .. }, P::Cy) => {
            cy
        }
        (Shape::Ellipse { rx, .. }, P::Rx) => rx,
        (Shape::Ellipse { ry, .. }, P::Ry) => ry,
        (Shape::Sector { r0, .. }, P::R0) => r0,
        (Shape::Sector { start_angle, .. }, P::StartAngle) => start_angle,
        (Shape::Sector { end_angle, .. }, P::EndAngle) => end_angle,
        (Shape::Line { x1, .. }, P::X1) => x1,
        (Shape::Line { y1, .. }, P::Y1) => y1,
        (Shape::Line { x2, .. }, P::X2) => x2,
        (Shape::Line { y2, .. }, P::Y2) => y2,
        _ => return None,
    };
    Some(f)
}

fn shape_get(shape: &Shape, p: ShapeProp) -> Option<AnimValue> {
    use ShapeProp as P;
    let v = match (shape, p) {
        (Shape::Polyline { points } | Shape::Polygon { points }, P::Points) => {
            return Some(AnimValue::Points(points.clone()));
        }
        (Shape::Path(proxy), P::D) => return Some(AnimValue::Path(proxy.clone())),
        (Shape::Rect { x, .. }, P::X) => *x,
        (Shape::Rect { y, .. }, P::Y) => *y,
        (Shape::Rect { width, .. }, P::Width) => *width,
        (Shape::Rect { height, .. }, P::Height) => *height,
        (Shape::Rect { r, .. } | Shape::Circle { r, .. } | Shape::Sector { r, .. }, P::R) => *r,
        (Shape::Circle { cx, .. } | Shape::Ellipse { cx, .. } | Shape::Sector { cx, .. }, P::Cx) => {
            *cx
        }
        (Shape::Circle { cy, .. } | Shape::Ellipse { cy, .. } | Shape::Sector { cy, .. }, P::Cy) => {
            *cy
        }
        (Shape::Ellipse { rx, .. }, P::Rx) => *rx,
        (Shape::Ellipse { ry, .. }, P::Ry) => *ry,
        (Shape::Sector { r0, .. }, P::R0) => *r0,
        (Shape::Sector { start_angle, .. }, P::StartAngle) => *start_angle,
        (Shape::Sector { end_angle, .. }, P::EndAngle) => *end_angle,
        (Shape::Line { x1, .. }, P::X1) => *x1,
        (Shape::Line { y1, .. }, P::Y1) => *y1,
        (Shape::Line { x2, .. }, P::X2) => *x2,
        (Shape::Line { y2, .. }, P::Y2) => *y2,
        _ => return None,
    };
    Some(AnimValue::Number(v))
}

fn shape_set(shape: &mut Shape, p: ShapeProp, value: &AnimValue) -> bool {
    match (shape, p, value) {
        (
            Shape::Polyline { points } | Shape::Polygon { points },
            ShapeProp::Points,
            AnimValue::Points(v),
        ) => {
            points.clone_from(v);
            true
        }
        (Shape::Path(proxy), ShapeProp::D, AnimValue::Path(v)) => {
            proxy.clone_from(v);
            true
        }
        (shape, p, AnimValue::Number(v)) => match shape_field(shape, p) {
            Some(f) => {
                *f = *v;
                true
            }
            None => false,
        },
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/accessor.rs"]
mod tests;
