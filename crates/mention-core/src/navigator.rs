//! Dropdown selection state machine.

use crate::candidate::Candidate;

/// Keys the navigator claims while the dropdown is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
}

/// Commands understood by [`Navigator::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorCommand {
    /// Highlight the next row (wraps).
    Next,
    /// Highlight the previous row (wraps).
    Previous,
    /// Emit the highlighted row and close.
    Confirm,
    /// Close without emitting.
    Cancel,
    /// Emit a specific row (pointer/tap selection) and close.
    Pick(usize),
}

impl NavigatorCommand {
    /// Map a key to a command.
    pub fn from_key(key: NavigationKey) -> Self {
        match key {
            NavigationKey::Up => Self::Previous,
            NavigationKey::Down => Self::Next,
            NavigationKey::Enter | NavigationKey::Tab => Self::Confirm,
            NavigationKey::Escape => Self::Cancel,
        }
    }
}

/// Navigator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    /// Dropdown hidden.
    Closed,
    /// Dropdown shown with a highlighted row.
    Open {
        /// Index into the visible candidates.
        highlighted: usize,
    },
}

/// A finite-state cursor over the visible candidate list.
#[derive(Debug, Clone)]
pub struct Navigator {
    visible: Vec<Candidate>,
    state: NavigatorState,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Create a closed navigator with no candidates.
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            state: NavigatorState::Closed,
        }
    }

    /// Current state.
    pub fn state(&self) -> NavigatorState {
        self.state
    }

    /// Returns `true` if the dropdown is open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, NavigatorState::Open { .. })
    }

    /// Highlighted row, if open.
    pub fn highlighted_index(&self) -> Option<usize> {
        match self.state {
            NavigatorState::Open { highlighted } => Some(highlighted),
            NavigatorState::Closed => None,
        }
    }

    /// Highlighted candidate, if open.
    pub fn highlighted(&self) -> Option<&Candidate> {
        self.highlighted_index().and_then(|i| self.visible.get(i))
    }

    /// Visible candidates (may be non-empty while closed, e.g. after cancel).
    pub fn candidates(&self) -> &[Candidate] {
        &self.visible
    }

    /// Replace the candidate list.
    ///
    /// Opens at row 0 when `list` is non-empty and the trigger is active; closes otherwise.
    /// The highlight always resets.
    pub fn set_candidates(&mut self, list: Vec<Candidate>, trigger_active: bool) {
        self.visible = list;
        self.state = if trigger_active && !self.visible.is_empty() {
            NavigatorState::Open { highlighted: 0 }
        } else {
            NavigatorState::Closed
        };
    }

    /// Close and forget the candidates.
    pub fn reset(&mut self) {
        self.visible.clear();
        self.state = NavigatorState::Closed;
    }

    /// Highlight the next row (wraps). No-op while closed.
    pub fn next(&mut self) {
        if let NavigatorState::Open { highlighted } = self.state {
            let len = self.visible.len();
            self.state = NavigatorState::Open {
                highlighted: (highlighted + 1) % len,
            };
        }
    }

    /// Highlight the previous row (wraps). No-op while closed.
    pub fn previous(&mut self) {
        if let NavigatorState::Open { highlighted } = self.state {
            let len = self.visible.len();
            self.state = NavigatorState::Open {
                highlighted: (highlighted + len - 1) % len,
            };
        }
    }

    /// Emit the highlighted candidate and close.
    pub fn confirm(&mut self) -> Option<Candidate> {
        let picked = self.highlighted().cloned();
        self.state = NavigatorState::Closed;
        picked
    }

    /// Close without emitting.
    pub fn cancel(&mut self) {
        self.state = NavigatorState::Closed;
    }

    /// Emit row `index` directly, bypassing the highlight, and close.
    ///
    /// Out-of-range rows emit nothing and leave the state untouched.
    pub fn pick(&mut self, index: usize) -> Option<Candidate> {
        let picked = self.visible.get(index).cloned()?;
        self.state = NavigatorState::Closed;
        Some(picked)
    }

    /// Apply a command; returns the emitted candidate for `Confirm` / `Pick`.
    pub fn apply(&mut self, command: NavigatorCommand) -> Option<Candidate> {
        match command {
            NavigatorCommand::Next => {
                self.next();
                None
            }
            NavigatorCommand::Previous => {
                self.previous();
                None
            }
            NavigatorCommand::Confirm => self.confirm(),
            NavigatorCommand::Cancel => {
                self.cancel();
                None
            }
            NavigatorCommand::Pick(index) => self.pick(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> Vec<Candidate> {
        vec![
            Candidate::new("a", "A"),
            Candidate::new("b", "B"),
            Candidate::new("c", "C"),
        ]
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut nav = Navigator::new();
        nav.set_candidates(three(), true);
        nav.previous();
        assert_eq!(nav.highlighted_index(), Some(2));
    }

    #[test]
    fn test_inactive_trigger_keeps_closed() {
        let mut nav = Navigator::new();
        nav.set_candidates(three(), false);
        assert!(!nav.is_open());
        assert_eq!(nav.confirm(), None);
    }
}
