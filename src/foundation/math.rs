use crate::foundation::core::{Interval, Point, Rect, Size, Vec2};

/// Axis-aligned box of `size` centered on `center`.
pub fn bbox_around(center: Point, size: Size) -> Rect {
    Rect::from_center_size(center, size)
}

/// Middle of the bottom edge.
pub fn bottom_center(r: Rect) -> Point {
    Point::new(r.center().x, r.y1)
}

/// Middle of the top edge.
pub fn top_center(r: Rect) -> Point {
    Point::new(r.center().x, r.y0)
}

/// Box covering `interval` on a single monospace line.
///
/// `left` is the x of letter 0; the line is vertically centered on `y = 0`.
pub fn interval_bbox(left: f64, letter: Size, interval: Interval) -> Rect {
    let x0 = left + letter.width * interval.start;
    Rect::new(
        x0,
        -letter.height / 2.0,
        x0 + letter.width * interval.len(),
        letter.height / 2.0,
    )
}

/// Inner control points of the S-shaped connector between `p0` and `p3`.
///
/// Each control point is pushed vertically, away from its endpoint and toward the other one,
/// by the vertical distance from that endpoint to the midpoint. The curve flattens as the
/// endpoints reach the same height and degenerates to a straight line when they share x.
pub fn s_curve_controls(p0: Point, p3: Point) -> (Point, Point) {
    let mid = p0.midpoint(p3);
    let p1 = p0 + Vec2::new(0.0, (mid.y - p0.y).abs());
    let p2 = p3 - Vec2::new(0.0, (p3.y - mid.y).abs());
    (p1, p2)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
