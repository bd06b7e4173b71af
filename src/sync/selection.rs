// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ephemeral multi-select state.
//!
//! Multi-select mode is entered by a sustained press on a record, which
//! seeds the selection with that one id. While active, presses toggle
//! membership. The set is never persisted and deactivates the instant it
//! becomes empty.

use std::collections::HashSet;
use std::time::Duration;

/// Minimum hold duration that enters multi-select mode.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// In-memory selection of record ids.
#[derive(Debug, Default)]
pub struct SelectionSet {
    ids: HashSet<String>,
    active: bool,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press on a record, held for `held`.
    ///
    /// Outside multi-select mode a sustained press (>= 500 ms) activates
    /// the mode and seeds the selection with this id; a short press is
    /// ignored here (it is an ordinary activation, not a selection).
    /// Inside multi-select mode any press toggles membership.
    ///
    /// Returns whether multi-select mode is active afterwards.
    pub fn press(&mut self, record_id: &str, held: Duration) -> bool {
        if self.active {
            self.toggle(record_id);
        } else if held >= LONG_PRESS_THRESHOLD {
            self.active = true;
            self.ids.insert(record_id.to_string());
        }
        self.active
    }

    /// Toggle membership of one id.
    ///
    /// No-op outside multi-select mode. Removing the last id clears the
    /// set and deactivates the mode immediately.
    pub fn toggle(&mut self, record_id: &str) {
        if !self.active {
            return;
        }
        if !self.ids.remove(record_id) {
            self.ids.insert(record_id.to_string());
        }
        if self.ids.is_empty() {
            self.active = false;
        }
    }

    /// Replace the selection with an explicit id set.
    pub fn bulk_select<I, S>(&mut self, record_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = record_ids.into_iter().map(Into::into).collect();
        self.active = !self.ids.is_empty();
    }

    /// Whether multi-select mode is currently active.
    pub fn is_multi_select(&self) -> bool {
        self.active
    }

    pub fn contains(&self, record_id: &str) -> bool {
        self.ids.contains(record_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Snapshot of the selected ids, sorted for stable iteration.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop the whole selection and leave multi-select mode.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(600);
    const TAP: Duration = Duration::from_millis(80);

    #[test]
    fn short_press_does_not_enter_multi_select() {
        let mut selection = SelectionSet::new();
        assert!(!selection.press("a", TAP));
        assert!(selection.is_empty());
        assert!(!selection.is_multi_select());
    }

    #[test]
    fn sustained_press_seeds_selection() {
        let mut selection = SelectionSet::new();
        assert!(selection.press("a", HOLD));
        assert!(selection.is_multi_select());
        assert_eq!(selection.ids(), vec!["a".to_string()]);
    }

    #[test]
    fn toggle_twice_restores_set_and_emptying_exits_mode() {
        let mut selection = SelectionSet::new();
        selection.press("a", HOLD);

        // Toggle B twice: selection is back to {A}.
        selection.toggle("b");
        selection.toggle("b");
        assert_eq!(selection.ids(), vec!["a".to_string()]);
        assert!(selection.is_multi_select());

        // Toggling A empties the set and exits multi-select immediately.
        selection.toggle("a");
        assert!(selection.is_empty());
        assert!(!selection.is_multi_select());
    }

    #[test]
    fn toggle_outside_mode_is_noop() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        assert!(selection.is_empty());
        assert!(!selection.is_multi_select());
    }

    #[test]
    fn taps_toggle_while_active() {
        let mut selection = SelectionSet::new();
        selection.press("a", HOLD);
        selection.press("b", TAP);
        assert!(selection.contains("a"));
        assert!(selection.contains("b"));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn bulk_select_replaces_and_empty_deactivates() {
        let mut selection = SelectionSet::new();
        selection.press("a", HOLD);

        selection.bulk_select(["x", "y"]);
        assert_eq!(selection.ids(), vec!["x".to_string(), "y".to_string()]);
        assert!(selection.is_multi_select());

        selection.bulk_select(Vec::<String>::new());
        assert!(!selection.is_multi_select());
    }
}
