use std::fmt::Write;

use crate::Point;

/// Rounds to hundredths with ties away from zero, so `0.125` prints as
/// `0.13` the way browsers format fixed-point numbers.
fn hundredths(value: f64) -> f64 {
    // `+ 0.0` folds negative zero so it prints as `0.00`.
    (value * 100.0).round() / 100.0 + 0.0
}

fn push_coord(out: &mut String, point: Point) {
    let _ = write!(out, "{:.2},{:.2}", hundredths(point.x), hundredths(point.y));
}

/// SVG path data tracing `points` with quadratic curves through the
/// midpoints of consecutive points.
///
/// Fewer than four points cannot form a smooth curve and give an empty string.
pub fn svg_path(points: &[Point], closed: bool) -> String {
    if points.len() < 4 {
        return String::new();
    }

    let mut out = String::with_capacity(points.len() * 14);
    out.push('M');
    push_coord(&mut out, points[0]);
    out.push_str(" Q");
    push_coord(&mut out, points[1]);
    out.push(' ');
    push_coord(&mut out, points[1].midpoint(points[2]));
    out.push_str(" T");

    for pair in points[2..].windows(2) {
        push_coord(&mut out, pair[0].midpoint(pair[1]));
        out.push(' ');
    }

    if closed {
        out.push('Z');
    }
    out
}

pub fn svg_path_closed(points: &[Point]) -> String {
    svg_path(points, true)
}
