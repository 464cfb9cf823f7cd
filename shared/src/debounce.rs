/// Bookkeeping for a deferred action whose deadline restarts on every
/// trigger.
///
/// Each [`schedule`](Debounce::schedule) hands out a ticket; the timer that
/// carries the ticket may only run the action if no later trigger or cancel
/// happened in between.
#[derive(Clone, Debug, Default)]
pub struct Debounce {
    generation: u64,
    pending: bool,
}

impl Debounce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        self.generation
    }

    /// Consumes the pending action if `ticket` is the latest one.
    pub fn fire(&mut self, ticket: u64) -> bool {
        if self.pending && ticket == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Recorder, SamplePoint};

    #[test]
    fn only_latest_ticket_fires() {
        let mut debounce = Debounce::new();
        let first = debounce.schedule();
        let second = debounce.schedule();
        assert!(!debounce.fire(first));
        assert!(debounce.is_pending());
        assert!(debounce.fire(second));
        assert!(!debounce.fire(second));
    }

    #[test]
    fn cancel_suppresses_fire() {
        let mut debounce = Debounce::new();
        let ticket = debounce.schedule();
        debounce.cancel();
        assert!(!debounce.fire(ticket));
    }

    #[test]
    fn saving_early_retires_the_timer() {
        let mut debounce = Debounce::new();
        assert!(!debounce.is_pending());
        let ticket = debounce.schedule();
        assert!(debounce.is_pending());
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert!(!debounce.fire(ticket));
    }

    #[test]
    fn clear_then_save_writes_empty_drawing() {
        let mut recorder = Recorder::default();
        let mut debounce = Debounce::new();
        let mut saved = None;

        recorder.pointer_down(SamplePoint::at(3.0, 4.0));
        let edit = debounce.schedule();
        recorder.pointer_move(SamplePoint::at(5.0, 6.0));
        let move_edit = debounce.schedule();
        recorder.pointer_up();
        recorder.clear();
        let clear = debounce.schedule();

        for ticket in [edit, move_edit, clear] {
            if debounce.fire(ticket) {
                saved = Some(recorder.drawing().to_json());
            }
        }
        assert_eq!(saved.as_deref(), Some("[]"));
        assert!(recorder.drawing().is_empty());
    }
}
