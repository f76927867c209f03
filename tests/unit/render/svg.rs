use super::*;
use crate::{
    foundation::core::Color,
    path::shape::Shape,
    scene::node::{GradientStop, LinearGradient, Node, Style},
};

fn painter() -> SvgPainter {
    SvgPainter::new(SvgPainterOpts {
        width: 100,
        height: 50,
        background: None,
    })
}

fn rect(x: f64) -> Node {
    Node::path(Shape::rect(x, 0.0, 10.0, 10.0), Style::default())
}

#[test]
fn single_rect_document() {
    let mut scene = Scene::new();
    let id = scene.create(rect(0.0));
    scene.add_root(id);

    let svg = painter().render_to_string(&mut scene);
    assert!(svg.starts_with(r#"<svg width="100" height="50" xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"<path d="M0,0 L10,0 L10,10 L0,10 Z" fill="rgb(0,0,0)"/>"#));
    assert!(svg.ends_with("</svg>"));
    assert!(!svg.contains("<defs>"));
}

#[test]
fn background_transform_and_style_attributes() {
    let mut scene = Scene::new();
    let id = scene.create(
        Node::path(
            Shape::rect(0.0, 0.0, 10.0, 10.0),
            Style::default()
                .fill(Color::rgba(1.0, 0.0, 0.0, 0.5))
                .stroke(Color::BLACK, 2.0)
                .opacity(0.25),
        )
        .at(5.0, 6.0),
    );
    scene.add_root(id);

    let mut painter = painter();
    painter.resize(20, 30);
    let painter = SvgPainter::new(SvgPainterOpts {
        background: Some(Color::WHITE),
        ..painter.opts().clone()
    });
    let svg = painter.render_to_string(&mut scene);
    assert!(svg.contains(r#"<rect width="20" height="30" x="0" y="0" fill="rgb(255,255,255)"/>"#));
    assert!(svg.contains(r#"transform="matrix(1,0,0,1,5,6)""#));
    assert!(svg.contains(r#"fill="rgb(255,0,0)" fill-opacity="0.5""#));
    assert!(svg.contains(r#"stroke="rgb(0,0,0)" stroke-width="2""#));
    assert!(svg.contains(r#"opacity="0.25""#));
}

#[test]
fn invisible_displayables_are_skipped() {
    let mut scene = Scene::new();
    let a = scene.create(rect(0.0));
    let mut hidden = rect(20.0);
    hidden.invisible = true;
    let b = scene.create(hidden);
    scene.add_root(a);
    scene.add_root(b);

    let svg = painter().render_to_string(&mut scene);
    assert_eq!(svg.matches("<path").count(), 1);
}

#[test]
fn siblings_share_clip_groups() {
    // g1(clip) > g2(clip) > [a, b]; c is an unclipped sibling of g1.
    let mut scene = Scene::new();
    let root = scene.create(Node::group());
    let g1 = scene.create(Node::group().with_clip(Shape::rect(0.0, 0.0, 50.0, 50.0)));
    let g2 = scene.create(Node::group().with_clip(Shape::rect(0.0, 0.0, 25.0, 25.0)));
    let a = scene.create(rect(0.0));
    let b = scene.create(rect(12.0));
    let c = scene.create(rect(60.0));
    scene.add(g2, a);
    scene.add(g2, b);
    scene.add(g1, g2);
    scene.add(root, g1);
    scene.add(root, c);
    scene.add_root(root);

    let svg = painter().render_to_string(&mut scene);
    assert_eq!(svg.matches("<g clip-path").count(), 2);
    assert_eq!(svg.matches("<clipPath").count(), 2);

    let body_end = svg.find("<defs>").unwrap();
    let body = &svg[..body_end];
    let expected = concat!(
        r#"<g clip-path="url(#clip-0)"><g clip-path="url(#clip-1)">"#,
        r#"<path d="M0,0 L10,0 L10,10 L0,10 Z" fill="rgb(0,0,0)"/>"#,
        r#"<path d="M12,0 L22,0 L22,10 L12,10 Z" fill="rgb(0,0,0)"/>"#,
        r#"</g></g>"#,
        r#"<path d="M60,0 L70,0 L70,10 L60,10 Z" fill="rgb(0,0,0)"/>"#,
    );
    assert!(body.ends_with(expected), "{body}");
}

#[test]
fn partial_clip_pop_reopens_only_the_tail() {
    // g1(clip) > [g2(clip) > a, b]: b keeps g1's wrapper open.
    let mut scene = Scene::new();
    let g1 = scene.create(Node::group().with_clip(Shape::rect(0.0, 0.0, 50.0, 50.0)));
    let g2 = scene.create(Node::group().with_clip(Shape::rect(0.0, 0.0, 25.0, 25.0)));
    let a = scene.create(rect(0.0));
    let b = scene.create(rect(30.0));
    scene.add(g2, a);
    scene.add(g1, g2);
    scene.add(g1, b);
    scene.add_root(g1);

    let svg = painter().render_to_string(&mut scene);
    assert_eq!(svg.matches("<g clip-path").count(), 2);
    assert!(svg.contains(r#"Z" fill="rgb(0,0,0)"/></g><path d="M30,0"#));
    assert!(svg.contains(r#"fill="rgb(0,0,0)"/></g><defs>"#));
}

#[test]
fn gradients_and_text_land_in_defs_and_escape() {
    let mut scene = Scene::new();
    let fill = Paint::Linear(LinearGradient {
        x: 0.0,
        y: 0.0,
        x2: 1.0,
        y2: 0.0,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: Color::BLACK,
            },
            GradientStop {
                offset: 1.0,
                color: Color::rgba(1.0, 1.0, 1.0, 0.5),
            },
        ],
        global: false,
    });
    let shape = scene.create(Node::path(
        Shape::rect(10.0, 0.0, 20.0, 10.0),
        Style::default().fill(fill),
    ));
    let text = scene.create(Node::text("a < b & c", 1.0, 2.0, Style::default()));
    scene.add_root(shape);
    scene.add_root(text);

    let svg = painter().render_to_string(&mut scene);
    assert!(svg.contains(r#"fill="url(#gradient-0)""#));
    assert!(svg.contains(
        r#"<linearGradient id="gradient-0" gradientUnits="userSpaceOnUse" x1="10" y1="0" x2="30" y2="0">"#
    ));
    assert!(svg.contains(r#"<stop offset="1" stop-color="rgb(255,255,255)" stop-opacity="0.5"/>"#));
    assert!(svg.contains(">a &lt; b &amp; c</text>"));
    assert!(svg.contains(r#"text-anchor="start""#));
}

#[test]
fn unsupported_operations_return_nothing() {
    let mut scene = Scene::new();
    let id = scene.create(rect(0.0));
    let mut painter = painter();
    painter.refresh(&mut scene);
    painter.config_layer(0, LayerConfig::default());
    assert_eq!(painter.kind(), PainterKind::Svg);
    assert!(painter.path_to_image(&mut scene, id).is_none());
    assert!(painter.viewport_root().is_none());
    assert_eq!((painter.width(), painter.height()), (100, 50));
}
