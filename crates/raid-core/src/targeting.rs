//! Target cursor over the active enemy sequence.
//!
//! The cursor is a plain index. It only has meaning relative to the arena's
//! active-enemy slice, so every operation takes the current length and keeps
//! the index valid for it. With no enemies the cursor is inert.

use serde::{Deserialize, Serialize};

/// Index of the current target in the active enemy sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    index: usize,
}

impl Targeting {
    /// Creates a cursor pointing at the first enemy.
    #[must_use]
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Raw index. Only meaningful while the sequence is non-empty.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Index if it points into a sequence of `len` enemies.
    #[must_use]
    pub const fn current(&self, len: usize) -> Option<usize> {
        if self.index < len {
            Some(self.index)
        } else {
            None
        }
    }

    /// Back to the first enemy.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Advances by one, wrapping to 0. Returns the new index, or `None`
    /// (cursor untouched) when there are no enemies.
    pub fn cycle(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.index = (self.index + 1) % len;
        Some(self.index)
    }

    /// Points at `position`. Returns false if it is out of range.
    pub fn select(&mut self, position: usize, len: usize) -> bool {
        if position >= len {
            return false;
        }
        self.index = position;
        true
    }

    /// Keeps the cursor valid after the enemy at `removed` left a sequence
    /// that now holds `len` enemies.
    ///
    /// Removal before the cursor shifts it down so it keeps pointing at the
    /// same enemy. Removal of the targeted enemy leaves the index on its
    /// successor, or wraps to 0 if it fell off the end.
    pub fn on_removed(&mut self, removed: usize, len: usize) {
        if removed < self.index {
            self.index -= 1;
        }
        if self.index >= len {
            self.index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod cycle_tests {
        use super::*;

        #[test]
        fn cycle_wraps() {
            let mut t = Targeting::new();
            assert_eq!(t.cycle(3), Some(1));
            assert_eq!(t.cycle(3), Some(2));
            assert_eq!(t.cycle(3), Some(0));
        }

        #[test]
        fn cycle_with_no_enemies_is_inert() {
            let mut t = Targeting::new();
            assert_eq!(t.cycle(0), None);
            assert_eq!(t.index(), 0);
            assert_eq!(t.current(0), None);
        }

        #[test]
        fn single_enemy_stays_put() {
            let mut t = Targeting::new();
            assert_eq!(t.cycle(1), Some(0));
        }
    }

    mod select_tests {
        use super::*;

        #[test]
        fn select_out_of_range_is_refused() {
            let mut t = Targeting::new();
            assert!(t.select(1, 3));
            assert!(!t.select(3, 3));
            assert_eq!(t.index(), 1);
        }

        #[test]
        fn reset_goes_to_first() {
            let mut t = Targeting::new();
            t.select(2, 3);
            t.reset();
            assert_eq!(t.index(), 0);
        }
    }

    mod removal_tests {
        use super::*;

        #[test]
        fn removal_before_cursor_shifts_down() {
            let mut t = Targeting::new();
            t.select(2, 4);
            t.on_removed(0, 3);
            assert_eq!(t.index(), 1);
        }

        #[test]
        fn removal_after_cursor_keeps_index() {
            let mut t = Targeting::new();
            t.select(1, 4);
            t.on_removed(3, 3);
            assert_eq!(t.index(), 1);
        }

        #[test]
        fn removing_last_targeted_enemy_wraps() {
            let mut t = Targeting::new();
            t.select(2, 3);
            t.on_removed(2, 2);
            assert_eq!(t.index(), 0);
        }

        #[test]
        fn removing_targeted_enemy_moves_to_successor() {
            let mut t = Targeting::new();
            t.select(1, 3);
            t.on_removed(1, 2);
            assert_eq!(t.index(), 1);
        }
    }
}
