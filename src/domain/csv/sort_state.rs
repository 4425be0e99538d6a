// ============================================================
// SORT STATE
// ============================================================
// Which column a table is ordered by, and the pure transition
// function that header clicks drive

use serde::{Deserialize, Serialize};

/// Current ordering of a rendered table
///
/// `column_index == None` means the rows are shown in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column_index: Option<usize>,
    pub ascending: bool,
}

/// Something that changes the sort state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortEvent {
    /// A fresh file was loaded
    Load,
    /// The header of a data column was clicked
    Click(usize),
}

impl SortState {
    pub const fn unsorted() -> Self {
        Self {
            column_index: None,
            ascending: true,
        }
    }

    pub const fn ascending(column_index: usize) -> Self {
        Self {
            column_index: Some(column_index),
            ascending: true,
        }
    }

    pub const fn descending(column_index: usize) -> Self {
        Self {
            column_index: Some(column_index),
            ascending: false,
        }
    }

    /// Query/file-name token for the direction
    pub fn order_param(&self) -> &'static str {
        if self.ascending {
            "asc"
        } else {
            "desc"
        }
    }

    /// Marker appended to the active column's header label
    pub fn indicator_for(&self, column_index: usize) -> Option<&'static str> {
        match self.column_index {
            Some(active) if active == column_index => {
                Some(if self.ascending { "▲" } else { "▼" })
            }
            _ => None,
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::unsorted()
    }
}

/// Apply one event to a sort state.
///
/// Clicking the active column flips its direction; clicking any other column
/// starts over in ascending order. Loading a file always returns to unsorted.
pub fn reduce(state: SortState, event: SortEvent) -> SortState {
    match event {
        SortEvent::Load => SortState::unsorted(),
        SortEvent::Click(column_index) => match state.column_index {
            Some(active) if active == column_index => SortState {
                column_index: Some(column_index),
                ascending: !state.ascending,
            },
            _ => SortState::ascending(column_index),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_from_unsorted_sorts_ascending() {
        let next = reduce(SortState::unsorted(), SortEvent::Click(2));
        assert_eq!(next, SortState::ascending(2));
    }

    #[test]
    fn test_click_same_column_toggles() {
        let asc = SortState::ascending(1);
        let desc = reduce(asc, SortEvent::Click(1));
        assert_eq!(desc, SortState::descending(1));
        assert_eq!(reduce(desc, SortEvent::Click(1)), asc);
    }

    #[test]
    fn test_click_other_column_resets_to_ascending() {
        assert_eq!(
            reduce(SortState::descending(0), SortEvent::Click(3)),
            SortState::ascending(3)
        );
        assert_eq!(
            reduce(SortState::ascending(0), SortEvent::Click(3)),
            SortState::ascending(3)
        );
    }

    #[test]
    fn test_load_resets_any_state() {
        for state in [
            SortState::unsorted(),
            SortState::ascending(4),
            SortState::descending(4),
        ] {
            assert_eq!(reduce(state, SortEvent::Load), SortState::unsorted());
        }
    }

    #[test]
    fn test_indicator_only_on_active_column() {
        let state = SortState::descending(1);
        assert_eq!(state.indicator_for(1), Some("▼"));
        assert_eq!(state.indicator_for(0), None);
        assert_eq!(SortState::unsorted().indicator_for(0), None);
        assert_eq!(SortState::ascending(0).order_param(), "asc");
    }
}
