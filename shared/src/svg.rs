use crate::{Drawing, StrokeOptions};

/// A standalone SVG document with every stroke of `drawing` filled as a path,
/// on an opaque white `width` x `height` background.
pub fn drawing_to_svg(drawing: &Drawing, width: u32, height: u32, options: &StrokeOptions) -> String {
    let mut paths = String::new();
    for stroke in &drawing.strokes {
        let data = stroke.path_data(options);
        if data.is_empty() {
            continue;
        }
        paths.push_str(&format!("<path d=\"{data}\" />"));
    }
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><rect width=\"100%\" height=\"100%\" fill=\"#ffffff\" /><g fill=\"#000000\">{paths}</g></svg>"
    )
}
