use super::*;

#[test]
fn monospace_width_counts_letters_and_spacing() {
    let m = MonospaceMeasure::default();
    let style = TextStyle {
        font_size: 10.0,
        letter_spacing: 4.0,
        ..TextStyle::default()
    };
    let s = m.measure("abcd", &style);
    assert_eq!(s.width, 4.0 * (6.0 + 4.0));
    assert_eq!(s.height, 12.5);
}

#[test]
fn multiline_uses_widest_line() {
    let m = MonospaceMeasure::default();
    let style = TextStyle {
        font_size: 10.0,
        ..TextStyle::default()
    };
    let s = m.measure("ab\nabcdef\n", &style);
    assert_eq!(s.width, 36.0);
    assert_eq!(s.height, 37.5);
}

#[test]
fn empty_text_keeps_one_line_of_height() {
    let m = MonospaceMeasure::default();
    let s = m.measure("", &TextStyle::default());
    assert_eq!(s.width, 0.0);
    assert_eq!(s.height, 60.0);
}

#[test]
fn font_measure_without_faces_falls_back_to_fixed_advance() {
    let m = FontMeasure::new(Arc::new(Database::new()));
    let style = TextStyle {
        font_size: 10.0,
        ..TextStyle::default()
    };
    assert_eq!(
        m.measure("abcd", &style),
        MonospaceMeasure::default().measure("abcd", &style)
    );
}

#[test]
fn proportional_labels_follow_glyph_widths() {
    let m = FontMeasure::system();
    let style = TextStyle::label(40.0);
    let narrow = m.measure("iiiiiiii", &style);
    let wide = m.measure("WWWWWWWW", &style);
    assert!(wide.width > 2.0 * narrow.width, "{wide:?} vs {narrow:?}");
    assert!(narrow.height > 0.0);
}

#[test]
fn code_letters_share_one_advance() {
    let m = FontMeasure::system();
    let style = TextStyle {
        font_size: 40.0,
        ..TextStyle::default()
    };
    let one = m.measure("i", &style).width;
    let many = m.measure("iWmW", &style).width;
    assert!(one > 0.0);
    assert!((many - 4.0 * one).abs() < 1.0, "{many} vs {one}");
}
