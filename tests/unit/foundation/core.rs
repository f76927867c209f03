use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgb8(255, 0, 0));
    assert_eq!(Color::parse("#f00").unwrap(), Color::rgb8(255, 0, 0));

    let c = Color::parse("#0000ff80").unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgb_functions_and_keywords() {
    assert_eq!(Color::parse("rgb(255, 0, 0)").unwrap(), Color::rgb8(255, 0, 0));
    let c = Color::parse("rgba(0,0,255,0.5)").unwrap();
    assert_eq!(c.a, 0.5);
    assert_eq!(Color::parse("none").unwrap(), Color::TRANSPARENT);
    assert!(Color::parse("chartreuse-ish").is_err());
    assert!(Color::parse("#12345").is_err());
}

#[test]
fn deserializes_string_object_and_array() {
    let c: Color = serde_json::from_value(json!("#ffffff")).unwrap();
    assert_eq!(c, Color::WHITE);
    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));
    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));
}

#[test]
fn lerp_is_channel_wise() {
    let c = Color::BLACK.lerp(Color::WHITE, 0.5);
    assert_eq!(c.to_rgba8(), [128, 128, 128, 255]);
    assert_eq!(Color::rgb8(255, 0, 0).to_svg_rgb(), "rgb(255,0,0)");
}

#[test]
fn premultiplies_alpha() {
    let c = Color::rgba(1.0, 1.0, 1.0, 0.5);
    assert_eq!(c.to_rgba8_premul(), [128, 128, 128, 128]);
}
