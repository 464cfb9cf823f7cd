use serde::{Deserialize, Serialize};

pub mod debounce;
pub mod outline;
pub mod path;
pub mod recorder;
pub mod relay;
pub mod reply;
pub mod svg;
pub mod vector;

pub use debounce::Debounce;
pub use outline::{outline, StrokeOptions};
pub use path::{svg_path, svg_path_closed};
pub use recorder::Recorder;
pub use relay::{ErrorBody, ErrorResponse, PredictRequest, PredictResponse, RelayReply};
pub use reply::{extract_json_blocks, parse_queries};
pub use vector::VectorError;

/// Key of the local cache slot holding the serialized drawing.
pub const DRAWING_CACHE_KEY: &str = "paths";
/// Quiet period before a modified drawing is written to the cache.
pub const SAVE_DELAY_MS: i32 = 1000;

/// A 2D position on the drawing surface, in canvas pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let d = self.sub(other);
        d.dot(d)
    }

    pub fn distance(self, other: Point) -> f64 {
        self.sub(other).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn unit(self) -> Point {
        let len = self.length();
        if len == 0.0 {
            Point::default()
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Perpendicular, rotated a quarter turn clockwise.
    pub fn perpendicular(self) -> Point {
        Point::new(self.y, -self.x)
    }

    pub fn lerp(self, to: Point, t: f64) -> Point {
        self.add(to.sub(self).scale(t))
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotates this point around `center` by `angle` radians.
    pub fn rotate_around(self, center: Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let d = self.sub(center);
        Point::new(
            center.x + d.x * cos - d.y * sin,
            center.y + d.x * sin + d.y * cos,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One pointer sample. Serialized as the triple `[x, y, pressure]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
}

impl SamplePoint {
    pub const fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// A sample from a device without pressure sensing.
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 1.0)
    }

    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.pressure.is_finite()
    }
}

impl From<[f64; 3]> for SamplePoint {
    fn from([x, y, pressure]: [f64; 3]) -> Self {
        Self { x, y, pressure }
    }
}

impl From<SamplePoint> for [f64; 3] {
    fn from(point: SamplePoint) -> Self {
        [point.x, point.y, point.pressure]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<SamplePoint>,
}

impl Stroke {
    pub fn starting_at(point: SamplePoint) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Outline polygon of this stroke rendered with `options`.
    pub fn outline(&self, options: &StrokeOptions) -> Vec<Point> {
        outline(&self.points, options)
    }

    /// Closed path description of this stroke rendered with `options`.
    pub fn path_data(&self, options: &StrokeOptions) -> String {
        svg_path_closed(&self.outline(options))
    }
}

/// All strokes of a session in draw order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parses a cached drawing, dropping samples with non-finite coordinates.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut drawing: Drawing = serde_json::from_str(text)?;
        for stroke in &mut drawing.strokes {
            stroke.points.retain(|point| point.is_finite());
        }
        drawing.strokes.retain(|stroke| !stroke.is_empty());
        Ok(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_serializes_as_nested_triples() {
        let drawing = Drawing {
            strokes: vec![Stroke {
                points: vec![SamplePoint::at(1.0, 2.0), SamplePoint::new(3.5, 4.0, 0.5)],
            }],
        };
        assert_eq!(drawing.to_json(), "[[[1.0,2.0,1.0],[3.5,4.0,0.5]]]");
    }

    #[test]
    fn drawing_reads_cached_payload() {
        let drawing = Drawing::from_json("[[[10,20,1],[11,21,1]],[[5,5,1]]]").unwrap();
        assert_eq!(drawing.len(), 2);
        assert_eq!(drawing.strokes[0].points[1], SamplePoint::at(11.0, 21.0));
    }

    #[test]
    fn drawing_rejects_garbage() {
        assert!(Drawing::from_json("{\"strokes\": 3}").is_err());
        assert!(Drawing::from_json("").is_err());
    }

    #[test]
    fn empty_drawing_serializes_to_empty_list() {
        assert_eq!(Drawing::default().to_json(), "[]");
    }

    #[test]
    fn rotate_around_quarter_turn() {
        let rotated = Point::new(1.0, 0.0).rotate_around(Point::default(), std::f64::consts::FRAC_PI_2);
        assert!((rotated.x - 0.0).abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }
}
