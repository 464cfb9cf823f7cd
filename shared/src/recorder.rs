use crate::{Drawing, SamplePoint, Stroke};

/// Turns pointer events into strokes.
///
/// A pointer-down starts a stroke and captures the pointer; moves are routed
/// to the captured stroke until the pointer is released.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    drawing: Drawing,
    capture: Option<usize>,
}

impl Recorder {
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.drawing.strokes
    }

    /// Whether a stroke is currently receiving moves.
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Starts a stroke at `point`. Returns false for non-finite samples.
    pub fn pointer_down(&mut self, point: SamplePoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.drawing.strokes.push(Stroke::starting_at(point));
        self.capture = Some(self.drawing.strokes.len() - 1);
        true
    }

    /// Appends `point` to the captured stroke. Returns whether it was recorded.
    pub fn pointer_move(&mut self, point: SamplePoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        let Some(index) = self.capture else {
            return false;
        };
        match self.drawing.strokes.get_mut(index) {
            Some(stroke) => {
                stroke.points.push(point);
                true
            }
            None => {
                self.capture = None;
                false
            }
        }
    }

    /// Releases capture on pointer-up, cancel or lost capture.
    pub fn pointer_up(&mut self) -> bool {
        self.capture.take().is_some()
    }

    /// Discards every stroke and any capture.
    pub fn clear(&mut self) {
        self.drawing.strokes.clear();
        self.capture = None;
    }

    /// Replaces the drawing wholesale, e.g. with the cached one.
    pub fn adopt(&mut self, drawing: Drawing) {
        self.drawing = drawing;
        self.capture = None;
    }
}
