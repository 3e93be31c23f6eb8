use super::*;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(Color::from_hex("#FFF").unwrap(), Color::WHITE);
    assert_eq!(
        Color::from_hex("3E1C96").unwrap(),
        Color::rgb(0x3e, 0x1c, 0x96)
    );
    let c = Color::from_hex("#ff000080").unwrap();
    assert_eq!(c.a, 0x80);
}

#[test]
fn parses_from_str() {
    let c: Color = "#2e2e2e".parse().unwrap();
    assert_eq!(c, Color::rgb(0x2e, 0x2e, 0x2e));
    assert!(matches!(
        "blue".parse::<Color>(),
        Err(LexvisError::Validation(_))
    ));
}

#[test]
fn rejects_bad_hex() {
    assert!(Color::from_hex("#12").is_err());
    assert!(Color::from_hex("#zzzzzz").is_err());
}

#[test]
fn palette_round_trips_through_hex() {
    for c in CodeColor::ALL {
        let bg = c.background();
        assert_eq!(Color::from_hex(&bg.to_hex_rgb()).unwrap(), bg);
        assert_ne!(c.background(), c.text());
    }
}

#[test]
fn code_color_names_are_uppercase_in_json() {
    let v = serde_json::to_string(&CodeColor::Orange).unwrap();
    assert_eq!(v, "\"ORANGE\"");
    let back: CodeColor = serde_json::from_str("\"CYAN\"").unwrap();
    assert_eq!(back, CodeColor::Cyan);
}
