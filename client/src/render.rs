use web_sys::Path2d;

use crate::state::{stroke_options, State, CANVAS_SIZE};

const BACKGROUND: &str = "white";
const INK: &str = "black";

/// Repaints the background and fills every stroke's outline.
pub fn redraw(state: &State) {
    let size = CANVAS_SIZE as f64;
    let ctx = &state.ctx;
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, size, size);
    ctx.set_fill_style_str(INK);
    let options = stroke_options();
    for stroke in state.recorder.strokes() {
        let data = stroke.path_data(&options);
        if data.is_empty() {
            continue;
        }
        match Path2d::new_with_path_string(&data) {
            Ok(path) => ctx.fill_with_path_2d(&path),
            Err(error) => web_sys::console::error_2(&"Invalid stroke path".into(), &error),
        }
    }
}

/// Wipes the surface back to the bare background.
pub fn clear_surface(state: &State) {
    let size = CANVAS_SIZE as f64;
    state.ctx.clear_rect(0.0, 0.0, size, size);
    state.ctx.set_fill_style_str(BACKGROUND);
    state.ctx.fill_rect(0.0, 0.0, size, size);
}
