use super::*;

fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).expect("buffer size");
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

#[test]
fn decode_premultiplies() {
    let png = encode_png(2, 1, vec![255, 0, 0, 255, 200, 100, 50, 128]);
    let data = ImageData::decode(&png).unwrap();
    assert_eq!((data.width, data.height), (2, 1));
    assert_eq!(&data.rgba8_premul[0..4], &[255, 0, 0, 255]);
    assert_eq!(&data.rgba8_premul[4..8], &[100, 50, 25, 128]);
}

#[test]
fn decode_rejects_garbage() {
    assert!(ImageData::decode(b"not an image").is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(ImageData::from_premul(2, 2, vec![0; 16]).is_ok());
    let err = ImageData::from_premul(2, 2, vec![0; 15]).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn image_size_falls_back_to_pixels() {
    let data = Arc::new(ImageData::from_premul(3, 4, vec![0; 48]).unwrap());
    let content = ImageContent {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 10.0,
        href: None,
        data: Some(data),
    };
    assert_eq!(content.size(), (3.0, 10.0));
}

#[test]
fn style_paint_predicates() {
    let style = Style::default();
    assert!(style.has_fill());
    assert!(!style.has_stroke());

    let style = Style::default()
        .fill(Color::TRANSPARENT)
        .stroke(Color::BLACK, 0.0);
    assert!(!style.has_fill());
    assert!(!style.has_stroke());
    assert_eq!(Style::default().font(), "12px sans-serif");
}

#[test]
fn enum_keywords_parse() {
    assert_eq!(LineCap::parse("round"), Some(LineCap::Round));
    assert_eq!(LineJoin::parse("bevel").map(LineJoin::as_str), Some("bevel"));
    assert_eq!(TextAlign::parse("middle"), Some(TextAlign::Center));
    assert_eq!(TextBaseline::parse("nope"), None);
}

#[test]
fn node_builders() {
    let n = Node::path(Shape::circle(0.0, 0.0, 5.0), Style::default())
        .named("dot")
        .with_z(1, 2.0, 3.0)
        .at(4.0, 5.0);
    assert_eq!(n.name.as_deref(), Some("dot"));
    assert_eq!((n.zlevel, n.z, n.z2), (1, 2.0, 3.0));
    assert!(!n.is_group());
    assert!(n.as_displayable().and_then(Displayable::shape).is_some());
    assert!(Node::group().children().is_empty());
}
