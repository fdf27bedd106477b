use super::*;
use crate::color::Rgb;

#[test]
fn recorder_starts_empty() {
    assert!(Recorder::new().commands().is_empty());
}

#[test]
fn clear_discards_previous_frame() {
    let mut rec = Recorder::new();
    let Ok(()) = crate::render::draw(&mut rec, &StyleState::default());
    let first = rec.commands().len();
    let Ok(()) = crate::render::draw(&mut rec, &StyleState::default());
    assert_eq!(rec.commands().len(), first);
    assert_eq!(rec.commands()[0], PaintCommand::Clear);
}

#[test]
fn recorder_measures_with_fixed_advance() {
    let mut rec = Recorder::new();
    let font = Font::from_state(&StyleState::default());
    let expected = FixedAdvance::default().measure_text(&font, "abc");
    assert!((rec.measure_text(&font, "abc") - expected).abs() < f64::EPSILON);
}

#[test]
fn display_list_serializes_with_op_tags() {
    let commands = vec![
        PaintCommand::Clear,
        PaintCommand::FillBackground { paint: Paint::Solid(Rgb::new(255, 0, 0)) },
        PaintCommand::FillText { text: "Hi".into(), center: Point::new(1.0, 2.0) },
    ];
    let json = serde_json::to_value(&commands).unwrap();
    assert_eq!(json[0]["op"], "clear");
    assert_eq!(json[1]["op"], "fill_background");
    assert_eq!(json[1]["paint"]["solid"], "#ff0000");
    assert_eq!(json[2]["text"], "Hi");
    assert_eq!(json[2]["center"]["y"], 2.0);
}

#[test]
fn text_style_serializes_font_fields() {
    let commands = record(&StyleState::default());
    let json = serde_json::to_value(&commands).unwrap();
    let style = json
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["op"] == "set_text_style")
        .unwrap();
    assert_eq!(style["style"]["font"]["weight"], "700");
    assert_eq!(style["style"]["color"], "#ffffff");
}
