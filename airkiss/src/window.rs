//! Sliding window over recently decoded protocol codes.
//!
//! The decoder never needs more than six codes of history. The window fills
//! one code per observation; once full, each new observation overwrites the
//! last slot, the phase parser runs over the full width, and the window
//! shifts left by one. Every frame therefore triggers a fresh full-width
//! parse attempt without re-examining earlier frames.

use crate::constants::SEQ_DATA_WINDOW_SIZE;

/// Fixed-capacity ordered sequence of decoded codes.
///
/// The active size is chosen by the caller per phase (4 for quads, 6 for
/// SeqData groups); capacity is always the maximum.
#[derive(Debug, Clone, Default)]
pub(crate) struct CodeWindow {
    codes: Vec<i32>,
}

impl CodeWindow {
    pub(crate) fn new() -> Self {
        Self {
            codes: Vec::with_capacity(SEQ_DATA_WINDOW_SIZE),
        }
    }

    /// Drops all collected codes, e.g. on a sequence discontinuity.
    pub(crate) fn clear(&mut self) {
        self.codes.clear();
    }

    /// Adds one code under the given active size.
    ///
    /// Appends while the window is underfull; once full, overwrites the last
    /// slot so a single observation advances the window by one position.
    ///
    /// # Returns
    /// `true` when the window holds `active_size` codes and is ready to parse.
    pub(crate) fn push(&mut self, code: i32, active_size: usize) -> bool {
        if self.codes.len() < active_size {
            self.codes.push(code);
        } else if let Some(last) = self.codes.last_mut() {
            *last = code;
        }
        self.codes.len() >= active_size
    }

    /// Shifts the window left by one, dropping the oldest code.
    ///
    /// Called after a parse attempt so the next observation completes a new
    /// full-width window.
    pub(crate) fn slide(&mut self) {
        if !self.codes.is_empty() {
            self.codes.remove(0);
        }
    }

    pub(crate) fn codes(&self) -> &[i32] {
        &self.codes
    }

    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_reports_ready() {
        let mut window = CodeWindow::new();
        assert!(!window.push(1, 4));
        assert!(!window.push(2, 4));
        assert!(!window.push(3, 4));
        assert!(window.push(4, 4));
        assert_eq!(window.codes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn overwrites_last_slot_when_full() {
        let mut window = CodeWindow::new();
        for code in 1..=4 {
            window.push(code, 4);
        }
        assert!(window.push(9, 4));
        assert_eq!(window.codes(), &[1, 2, 3, 9]);
    }

    #[test]
    fn slide_then_push_forms_new_window() {
        let mut window = CodeWindow::new();
        for code in 1..=4 {
            window.push(code, 4);
        }
        window.slide();
        assert_eq!(window.codes(), &[2, 3, 4]);
        assert!(window.push(5, 4));
        assert_eq!(window.codes(), &[2, 3, 4, 5]);
    }

    #[test]
    fn slide_on_empty_is_noop() {
        let mut window = CodeWindow::new();
        window.slide();
        assert_eq!(window.len(), 0);
    }

    #[test]
    fn clear_discards_partial_fill() {
        let mut window = CodeWindow::new();
        window.push(10, 6);
        window.push(11, 6);
        window.clear();
        assert_eq!(window.len(), 0);
        assert!(!window.push(12, 6));
    }
}
