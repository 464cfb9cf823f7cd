//! Freehand stroke outlining.
//!
//! A stroke is turned into a closed polygon in two passes: the samples are
//! first streamlined into a run of distinct points, then each point is offset
//! to both sides by its radius. The left side runs forward, the right side
//! runs back, and rounded caps join them at both ends.

use std::f64::consts::PI;

use crate::{Point, SamplePoint};

const CAP_SEGMENTS: usize = 13;
const CORNER_SEGMENTS: usize = 13;
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;
const MIN_RADIUS: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeOptions {
    /// Nominal stroke width.
    pub size: f64,
    /// How strongly pressure narrows the stroke, in `[0, 1]`.
    pub thinning: f64,
    /// Minimum spacing between outline points, relative to `size`.
    pub smoothing: f64,
    /// How far each point lags behind the raw input, in `[0, 1)`.
    pub streamline: f64,
    /// Derive pressure from pointer velocity instead of a constant width.
    pub simulate_pressure: bool,
    /// The stroke is finished; keep the final sample exactly.
    pub last: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 16.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
            last: false,
        }
    }
}

impl StrokeOptions {
    /// Constant-width brush as used by the drawing canvas.
    pub fn pen(size: f64) -> Self {
        Self {
            size,
            simulate_pressure: false,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct StrokePoint {
    point: Point,
    pressure: f64,
    distance: f64,
}

/// Streamlines the raw samples, dropping those that do not advance.
fn stroke_points(samples: &[SamplePoint], options: &StrokeOptions) -> Vec<StrokePoint> {
    let mut finite = samples
        .iter()
        .enumerate()
        .filter(|(_, sample)| sample.is_finite());
    let Some((_, first)) = finite.next() else {
        return Vec::new();
    };
    let t = 1.0 - options.streamline.clamp(0.0, 0.99);
    let mut points = vec![StrokePoint {
        point: first.position(),
        pressure: first.pressure,
        distance: 0.0,
    }];
    for (index, sample) in finite {
        let Some(prev) = points.last().copied() else {
            break;
        };
        let is_last = options.last && index == samples.len() - 1;
        let point = if is_last {
            sample.position()
        } else {
            prev.point.lerp(sample.position(), t)
        };
        let distance = point.distance(prev.point);
        if distance == 0.0 {
            continue;
        }
        points.push(StrokePoint {
            point,
            pressure: sample.pressure,
            distance,
        });
    }
    points
}

fn radius_for(options: &StrokeOptions, pressure: f64) -> f64 {
    if options.simulate_pressure {
        let thinning = options.thinning.clamp(-1.0, 1.0);
        (options.size * (0.5 - thinning * (0.5 - pressure))).max(MIN_RADIUS)
    } else {
        (options.size / 2.0).max(MIN_RADIUS)
    }
}

/// Per-point radii. With simulated pressure, fast movement thins the line.
fn radii(points: &[StrokePoint], options: &StrokeOptions) -> Vec<f64> {
    let mut previous = 0.25;
    points
        .iter()
        .map(|stroke_point| {
            let pressure = if options.simulate_pressure {
                let speed = (stroke_point.distance / options.size.max(MIN_RADIUS)).min(1.0);
                let target = 1.0 - speed;
                previous = (previous + (target - previous) * speed * RATE_OF_PRESSURE_CHANGE)
                    .clamp(0.0, 1.0);
                previous
            } else {
                stroke_point.pressure
            };
            radius_for(options, pressure)
        })
        .collect()
}

fn push_spaced(side: &mut Vec<Point>, point: Point, min_distance_squared: f64) {
    match side.last() {
        Some(last) if last.distance_squared(point) <= min_distance_squared => {}
        _ => side.push(point),
    }
}

/// Polygon outlining a brush of `options.size` swept through `samples`.
///
/// Returns an empty polygon for fewer than two distinct points.
pub fn outline(samples: &[SamplePoint], options: &StrokeOptions) -> Vec<Point> {
    if samples.len() < 2 {
        return Vec::new();
    }
    let points = stroke_points(samples, options);
    if points.len() < 2 {
        return Vec::new();
    }
    let radii = radii(&points, options);
    let directions = points
        .windows(2)
        .map(|pair| pair[1].point.sub(pair[0].point).unit())
        .collect::<Vec<_>>();
    let min_distance_squared = (options.size * options.smoothing).powi(2);

    let mut left = Vec::with_capacity(points.len());
    let mut right = Vec::with_capacity(points.len());
    let last_index = points.len() - 1;

    for (index, stroke_point) in points.iter().enumerate() {
        let point = stroke_point.point;
        let radius = radii[index];
        let direction = directions[index.min(directions.len() - 1)];

        if index > 0 && index < last_index {
            let previous_direction = directions[index - 1];
            if previous_direction.dot(direction) < 0.0 {
                // The path doubles back: round the corner on both sides.
                let offset = previous_direction.perpendicular().scale(radius);
                for step in 0..=CORNER_SEGMENTS {
                    let angle = PI * step as f64 / CORNER_SEGMENTS as f64;
                    left.push(point.add(offset).rotate_around(point, angle));
                    right.push(point.sub(offset).rotate_around(point, -angle));
                }
                continue;
            }
        }

        let offset = direction.perpendicular().scale(radius);
        // End points are always kept so the caps line up.
        let spacing = if index == 0 || index == last_index {
            0.0
        } else {
            min_distance_squared
        };
        push_spaced(&mut left, point.add(offset), spacing);
        push_spaced(&mut right, point.sub(offset), spacing);
    }

    let start = points[0].point;
    let end = points[last_index].point;
    let (Some(&left_start), Some(&left_end)) = (left.first(), left.last()) else {
        return Vec::new();
    };

    let mut polygon = Vec::with_capacity(left.len() + right.len() + 2 * CAP_SEGMENTS);
    polygon.extend_from_slice(&left);
    // Rotating the left offset sweeps forward around the end to the right side.
    for step in 1..CAP_SEGMENTS {
        let angle = PI * step as f64 / CAP_SEGMENTS as f64;
        polygon.push(left_end.rotate_around(end, angle));
    }
    polygon.extend(right.iter().rev());
    let right_start = start.sub(left_start.sub(start));
    for step in 1..CAP_SEGMENTS {
        let angle = PI * step as f64 / CAP_SEGMENTS as f64;
        polygon.push(right_start.rotate_around(start, angle));
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize) -> Vec<SamplePoint> {
        (0..count)
            .map(|i| SamplePoint::at(10.0 + i as f64 * 10.0, 20.0))
            .collect()
    }

    fn bounds(points: &[Point]) -> (f64, f64, f64, f64) {
        points.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    }

    #[test]
    fn degenerate_input_has_no_outline() {
        let options = StrokeOptions::pen(4.0);
        assert!(outline(&[], &options).is_empty());
        assert!(outline(&[SamplePoint::at(1.0, 1.0)], &options).is_empty());
        let still = vec![SamplePoint::at(5.0, 5.0); 6];
        assert!(outline(&still, &options).is_empty());
    }

    #[test]
    fn four_samples_give_closed_outline() {
        let samples = vec![
            SamplePoint::at(10.0, 10.0),
            SamplePoint::at(20.0, 14.0),
            SamplePoint::at(30.0, 20.0),
            SamplePoint::at(40.0, 22.0),
        ];
        let polygon = outline(&samples, &StrokeOptions::pen(4.0));
        assert!(polygon.len() >= 4);
        assert!(polygon.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn constant_width_ignores_pressure() {
        let options = StrokeOptions::pen(4.0);
        let firm = line(5);
        let soft = firm
            .iter()
            .map(|p| SamplePoint::new(p.x, p.y, 0.1))
            .collect::<Vec<_>>();
        assert_eq!(outline(&firm, &options), outline(&soft, &options));
    }

    #[test]
    fn horizontal_line_is_size_tall() {
        let options = StrokeOptions {
            last: true,
            ..StrokeOptions::pen(4.0)
        };
        let polygon = outline(&line(5), &options);
        let (min_x, min_y, max_x, max_y) = bounds(&polygon);
        assert!((max_y - min_y - 4.0).abs() < 1e-9);
        assert!((min_y - 18.0).abs() < 1e-9);
        // Caps extend half the width past the ends.
        assert!(min_x < 10.0 && min_x >= 8.0);
        assert!(max_x > 50.0 && max_x <= 52.0);
    }

    #[test]
    fn streamline_lags_behind_input() {
        let options = StrokeOptions::pen(2.0);
        let polygon = outline(&line(3), &options);
        let (_, _, max_x, _) = bounds(&polygon);
        // Last point is only partway to x = 30 unless the stroke is finished.
        assert!(max_x < 30.0);
    }

    #[test]
    fn simulated_pressure_thins_fast_strokes() {
        let options = StrokeOptions {
            size: 8.0,
            ..StrokeOptions::default()
        };
        let polygon = outline(&line(10), &options);
        let (_, min_y, _, max_y) = bounds(&polygon);
        assert!(!polygon.is_empty());
        assert!(max_y - min_y > 0.0 && max_y - min_y < 8.0);
    }

    #[test]
    fn doubling_back_adds_rounded_corner() {
        let samples = vec![
            SamplePoint::at(0.0, 0.0),
            SamplePoint::at(40.0, 0.0),
            SamplePoint::at(80.0, 0.0),
            SamplePoint::at(0.0, 0.0),
            SamplePoint::at(-80.0, 0.0),
        ];
        let options = StrokeOptions {
            streamline: 0.0,
            ..StrokeOptions::pen(4.0)
        };
        let polygon = outline(&samples, &options);
        let (_, _, max_x, _) = bounds(&polygon);
        assert!(max_x > 81.9 && max_x <= 82.0);
    }

    #[test]
    fn non_finite_samples_are_skipped() {
        let options = StrokeOptions::pen(4.0);
        let clean = outline(&line(5), &options);

        let mut leading = vec![
            SamplePoint::at(f64::NAN, 20.0),
            SamplePoint::new(0.0, f64::INFINITY, 1.0),
        ];
        leading.extend(line(5));
        assert_eq!(outline(&leading, &options), clean);

        let mut interleaved = line(5);
        interleaved.insert(2, SamplePoint::new(30.0, 20.0, f64::NAN));
        assert_eq!(outline(&interleaved, &options), clean);

        let polygon = outline(&leading, &options);
        assert!(polygon.iter().all(|p| p.is_finite()));
        assert!(outline(&[SamplePoint::at(f64::NAN, f64::NAN)], &options).is_empty());
    }

    #[test]
    fn outline_is_deterministic() {
        let samples = line(6);
        let options = StrokeOptions::default();
        assert_eq!(outline(&samples, &options), outline(&samples, &options));
    }
}
