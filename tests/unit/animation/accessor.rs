use super::*;
use crate::scene::node::Style;
use serde_json::json;

fn rect_node() -> Node {
    Node::path(Shape::rect(0.0, 0.0, 10.0, 10.0), Style::default())
}

#[test]
fn roots_parse_and_check_the_node() {
    assert_eq!(AnimRoot::parse("style"), Some(AnimRoot::Style));
    assert_eq!(AnimRoot::parse("shape.x"), None);
    let group = Node::group();
    assert!(AnimRoot::Element.exists_on(&group));
    assert!(!AnimRoot::Shape.exists_on(&group));
    assert!(AnimRoot::Shape.exists_on(&rect_node()));
}

#[test]
fn shape_keys_follow_the_variant() {
    let node = rect_node();
    assert_eq!(
        Accessor::resolve(AnimRoot::Shape, "width", &node),
        Some(Accessor::Shape(ShapeProp::Width))
    );
    assert_eq!(Accessor::resolve(AnimRoot::Shape, "cx", &node), None);
    assert_eq!(Accessor::resolve(AnimRoot::Element, "bogus", &node), None);
}

#[test]
fn read_and_write_through_accessors() {
    let mut node = rect_node();
    let width = Accessor::resolve(AnimRoot::Shape, "width", &node).unwrap();
    width.set(&mut node, &AnimValue::Number(42.0));
    assert_eq!(width.get(&node), Some(AnimValue::Number(42.0)));

    let x = Accessor::resolve(AnimRoot::Element, "x", &node).unwrap();
    x.set(&mut node, &AnimValue::Number(5.0));
    assert_eq!(node.transform.position.x, 5.0);
    assert!(node.transform.is_dirty());

    let fill = Accessor::resolve(AnimRoot::Style, "fill", &node).unwrap();
    let red = fill.parse_value(&json!("#ff0000")).unwrap();
    fill.set(&mut node, &red);
    assert_eq!(
        node.style().and_then(|s| s.fill.clone()),
        Some(Paint::Solid(Color::rgba(1.0, 0.0, 0.0, 1.0)))
    );
}

#[test]
fn wrong_kind_is_ignored() {
    let mut node = rect_node();
    let width = Accessor::resolve(AnimRoot::Shape, "width", &node).unwrap();
    width.set(&mut node, &AnimValue::Array(vec![1.0]));
    assert_eq!(width.get(&node), Some(AnimValue::Number(10.0)));
    assert_eq!(width.parse_value(&json!("wide")), None);
}

#[test]
fn path_data_and_points_parse() {
    let node = Node::path(Shape::Path(PathProxy::new()), Style::default());
    let d = Accessor::resolve(AnimRoot::Shape, "d", &node).unwrap();
    match d.parse_value(&json!("M0 0 L10 0 Z")) {
        Some(AnimValue::Path(p)) => assert_eq!(p.to_svg_path_data(), "M0,0 L10,0 Z"),
        other => panic!("unexpected {other:?}"),
    }

    let poly = Node::path(Shape::Polygon { points: vec![] }, Style::default());
    let pts = Accessor::resolve(AnimRoot::Shape, "points", &poly).unwrap();
    assert_eq!(
        pts.parse_value(&json!([[0, 1], [2, 3]])),
        Some(AnimValue::Points(vec![Point::new(0.0, 1.0), Point::new(2.0, 3.0)]))
    );
    assert_eq!(pts.parse_value(&json!([[0, 1, 2]])), None);
}
