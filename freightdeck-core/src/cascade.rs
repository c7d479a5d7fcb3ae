//! Cascading selection filter for the schedule screens.
//!
//! An operator narrows the schedule list by exactly one of two paths:
//!
//! - Vessel path: vessel → voyage → transit hub → destination
//! - Origin path: country → port → destination
//!
//! Each selection triggers a fetch of the next level's options and clears
//! every deeper selection and option list. The state machine is explicit and
//! UI-free: the caller dispatches the fetches it is told to perform and
//! feeds the results back with [`CascadeFilter::set_options`] /
//! [`CascadeFilter::set_rows`].
//!
//! Every mutating operation bumps a generation counter. Fetch results are
//! tagged with the generation current at dispatch; results carrying an
//! older generation are dropped on receipt, so an out-of-order response can
//! never overwrite newer state with a stale one.

use serde::{Deserialize, Serialize};

use crate::domain::{Schedule, SelectOption};

/// Which of the two mutually exclusive filter paths is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// vessel → voyage → transit hub → destination
    Vessel,
    /// country → port → destination
    Origin,
}

impl FilterMode {
    /// Number of levels in this path.
    pub fn depth(self) -> usize {
        match self {
            FilterMode::Vessel => 4,
            FilterMode::Origin => 3,
        }
    }

    /// Display label for the path itself.
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Vessel => "vessel",
            FilterMode::Origin => "origin",
        }
    }

    /// Display label for a level of this path.
    pub fn level_label(self, level: usize) -> &'static str {
        match (self, level) {
            (FilterMode::Vessel, 0) => "Vessel",
            (FilterMode::Vessel, 1) => "Voyage",
            (FilterMode::Vessel, 2) => "Transit hub",
            (FilterMode::Vessel, 3) => "Destination",
            (FilterMode::Origin, 0) => "Country",
            (FilterMode::Origin, 1) => "Port",
            (FilterMode::Origin, 2) => "Destination",
            _ => "",
        }
    }
}

/// Option list and current selection for one level.
#[derive(Debug, Clone, Default)]
struct LevelState {
    options: Vec<SelectOption>,
    selection: Option<String>,
}

/// Outcome of a [`CascadeFilter::select`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection was a no-op: an upstream level is unselected, the id
    /// is not among the level's options, or the level is out of range.
    Ignored,
    /// Selection stored; fetch options for `level` and feed them back with
    /// the given generation tag.
    FetchNext { level: usize, generation: u64 },
    /// The last level is now selected; the path is complete and the result
    /// rows may be fetched under the given generation tag.
    Complete { generation: u64 },
}

/// A fully selected filter path, ready to query the schedule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleQuery {
    ByVessel {
        vessel_id: String,
        voyage: String,
        transit: String,
        destination: String,
    },
    ByOrigin {
        country_id: String,
        port_id: String,
        destination: String,
    },
}

/// The cascading filter state machine.
///
/// Result rows live beside the selections: `None` means never fetched (or
/// invalidated by a selection change), `Some(vec![])` is the explicit
/// no-data state. A stale table is therefore unrepresentable: any mutation
/// resets rows to `None`.
#[derive(Debug, Clone)]
pub struct CascadeFilter {
    mode: FilterMode,
    levels: Vec<LevelState>,
    rows: Option<Vec<Schedule>>,
    generation: u64,
}

impl CascadeFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            levels: vec![LevelState::default(); mode.depth()],
            rows: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn depth(&self) -> usize {
        self.mode.depth()
    }

    /// Current generation. Fetches dispatched under an older generation are
    /// rejected when their results arrive.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self, level: usize) -> &[SelectOption] {
        self.levels.get(level).map_or(&[], |l| &l.options)
    }

    pub fn selection(&self, level: usize) -> Option<&str> {
        self.levels
            .get(level)
            .and_then(|l| l.selection.as_deref())
    }

    /// Display label of the selected option at a level, if any.
    pub fn selection_label(&self, level: usize) -> Option<&str> {
        let state = self.levels.get(level)?;
        let id = state.selection.as_deref()?;
        state
            .options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    pub fn rows(&self) -> Option<&[Schedule]> {
        self.rows.as_deref()
    }

    /// True once every level of the active path has a selection. Only then
    /// is the result table fetched.
    pub fn is_complete(&self) -> bool {
        self.levels.iter().all(|l| l.selection.is_some())
    }

    /// Switch the filter path. Resets every selection, every option list,
    /// and the result rows, regardless of prior state.
    ///
    /// Returns the generation tag under which the caller should fetch the
    /// new level-0 options.
    pub fn set_mode(&mut self, mode: FilterMode) -> u64 {
        self.mode = mode;
        self.levels = vec![LevelState::default(); mode.depth()];
        self.rows = None;
        self.generation += 1;
        self.generation
    }

    /// Select an option at a level.
    ///
    /// No-ops (returns [`SelectOutcome::Ignored`]) when any upstream level
    /// is unselected or the id is not among the level's current options.
    /// On success the selection is stored, every deeper selection and
    /// option list is cleared, the result rows are invalidated, and the
    /// outcome says which level to fetch next (or that the path is
    /// complete).
    pub fn select(&mut self, level: usize, id: &str) -> SelectOutcome {
        if level >= self.levels.len() {
            return SelectOutcome::Ignored;
        }
        if self.levels[..level].iter().any(|l| l.selection.is_none()) {
            return SelectOutcome::Ignored;
        }
        if !self.levels[level].options.iter().any(|o| o.id == id) {
            return SelectOutcome::Ignored;
        }

        self.levels[level].selection = Some(id.to_string());
        self.clear_below(level);
        self.rows = None;
        self.generation += 1;

        if level + 1 < self.levels.len() {
            SelectOutcome::FetchNext {
                level: level + 1,
                generation: self.generation,
            }
        } else {
            SelectOutcome::Complete {
                generation: self.generation,
            }
        }
    }

    /// Clear the selection at a level. Everything deeper (selections and
    /// option lists) is cleared too, and the result rows are invalidated.
    pub fn clear(&mut self, level: usize) {
        if level >= self.levels.len() {
            return;
        }
        self.levels[level].selection = None;
        self.clear_below(level);
        self.rows = None;
        self.generation += 1;
    }

    /// Replace a level's option list with a fetch result.
    ///
    /// Rejected (returns false) when the generation tag is stale or when an
    /// upstream level has lost its selection since the fetch was dispatched.
    pub fn set_options(
        &mut self,
        level: usize,
        generation: u64,
        options: Vec<SelectOption>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        if level >= self.levels.len() {
            return false;
        }
        if self.levels[..level].iter().any(|l| l.selection.is_none()) {
            return false;
        }
        self.levels[level].options = options;
        self.levels[level].selection = None;
        self.clear_below(level);
        true
    }

    /// Store fetched result rows. Rejected when the generation tag is stale
    /// or the path is no longer complete.
    pub fn set_rows(&mut self, generation: u64, rows: Vec<Schedule>) -> bool {
        if generation != self.generation || !self.is_complete() {
            return false;
        }
        self.rows = Some(rows);
        true
    }

    /// Build the query for the active path. `None` until the path is
    /// complete.
    pub fn query(&self) -> Option<ScheduleQuery> {
        if !self.is_complete() {
            return None;
        }
        let sel = |i: usize| self.levels[i].selection.clone().unwrap_or_default();
        Some(match self.mode {
            FilterMode::Vessel => ScheduleQuery::ByVessel {
                vessel_id: sel(0),
                voyage: sel(1),
                transit: sel(2),
                destination: sel(3),
            },
            FilterMode::Origin => ScheduleQuery::ByOrigin {
                country_id: sel(0),
                port_id: sel(1),
                destination: sel(2),
            },
        })
    }

    fn clear_below(&mut self, level: usize) {
        for l in &mut self.levels[level + 1..] {
            l.options.clear();
            l.selection = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ids: &[&str]) -> Vec<SelectOption> {
        ids.iter().map(|id| SelectOption::plain(*id)).collect()
    }

    /// Drive a vessel-path cascade to the given depth.
    fn filled(depth: usize) -> CascadeFilter {
        let mut c = CascadeFilter::new(FilterMode::Vessel);
        let gen = c.generation();
        assert!(c.set_options(0, gen, opts(&["v1", "v2"])));
        let picks = ["v1", "012E", "Dubai", "Europe"];
        for (level, pick) in picks.iter().enumerate().take(depth) {
            let outcome = c.select(level, pick);
            match outcome {
                SelectOutcome::FetchNext { level: next, generation } => {
                    let next_opts = match next {
                        1 => opts(&["012E", "013W"]),
                        2 => opts(&["Dubai", "Singapore"]),
                        3 => opts(&["Europe", "USA"]),
                        _ => unreachable!(),
                    };
                    assert!(c.set_options(next, generation, next_opts));
                }
                SelectOutcome::Complete { .. } => {}
                SelectOutcome::Ignored => panic!("selection at level {level} ignored"),
            }
        }
        c
    }

    #[test]
    fn select_with_empty_upstream_is_a_no_op() {
        let mut c = CascadeFilter::new(FilterMode::Vessel);
        // No options loaded at all: level 1 has empty upstream.
        assert_eq!(c.select(1, "012E"), SelectOutcome::Ignored);
        // Unknown id at level 0 is also ignored.
        assert_eq!(c.select(0, "ghost"), SelectOutcome::Ignored);
    }

    #[test]
    fn select_clears_deeper_selections_and_options() {
        let mut c = filled(4);
        assert!(c.is_complete());
        assert!(!c.options(3).is_empty());

        // Re-selecting the voyage clears transit and destination entirely.
        let outcome = c.select(1, "013W");
        assert!(matches!(outcome, SelectOutcome::FetchNext { level: 2, .. }));
        assert_eq!(c.selection(2), None);
        assert_eq!(c.selection(3), None);
        assert!(c.options(2).is_empty());
        assert!(c.options(3).is_empty());
        assert!(!c.is_complete());
    }

    #[test]
    fn clear_at_level_clears_everything_deeper() {
        let mut c = filled(4);
        c.clear(1);
        assert_eq!(c.selection(1), None);
        for level in 2..4 {
            assert_eq!(c.selection(level), None, "level {level} selection");
            assert!(c.options(level).is_empty(), "level {level} options");
        }
        // Level 0 is untouched.
        assert_eq!(c.selection(0), Some("v1"));
        assert!(!c.options(0).is_empty());
    }

    #[test]
    fn mode_switch_resets_everything() {
        let mut c = filled(4);
        c.set_mode(FilterMode::Origin);
        assert_eq!(c.depth(), 3);
        for level in 0..3 {
            assert_eq!(c.selection(level), None);
            assert!(c.options(level).is_empty());
        }
        assert_eq!(c.rows(), None);
        assert!(!c.is_complete());
    }

    #[test]
    fn rows_invalidated_on_any_selection_change() {
        let mut c = filled(4);
        let gen = c.generation();
        assert!(c.set_rows(gen, vec![]));
        // Explicit no-data state, not a missing fetch.
        assert_eq!(c.rows(), Some(&[][..]));

        c.select(3, "USA");
        assert_eq!(c.rows(), None);
    }

    #[test]
    fn stale_options_are_dropped() {
        let mut c = filled(2);
        let stale_gen = c.generation();
        // Operator changes the vessel before the voyage fetch lands.
        c.select(0, "v2");
        assert!(!c.set_options(1, stale_gen, opts(&["999Z"])));
        assert!(c.options(1).is_empty());
    }

    #[test]
    fn stale_rows_are_dropped() {
        let mut c = filled(4);
        let stale_gen = c.generation();
        c.select(2, "Singapore");
        assert!(!c.set_rows(stale_gen, vec![]));
        assert_eq!(c.rows(), None);
    }

    #[test]
    fn rows_rejected_while_path_incomplete() {
        let mut c = filled(3);
        let gen = c.generation();
        assert!(!c.set_rows(gen, vec![]));
    }

    #[test]
    fn query_none_until_complete() {
        let c = filled(3);
        assert_eq!(c.query(), None);

        let c = filled(4);
        assert_eq!(
            c.query(),
            Some(ScheduleQuery::ByVessel {
                vessel_id: "v1".into(),
                voyage: "012E".into(),
                transit: "Dubai".into(),
                destination: "Europe".into(),
            })
        );
    }

    #[test]
    fn origin_path_has_three_levels() {
        let mut c = CascadeFilter::new(FilterMode::Origin);
        let gen = c.generation();
        assert!(c.set_options(0, gen, opts(&["de"])));
        let SelectOutcome::FetchNext { level, generation } = c.select(0, "de") else {
            panic!("expected FetchNext");
        };
        assert_eq!(level, 1);
        assert!(c.set_options(level, generation, opts(&["p1"])));
        let SelectOutcome::FetchNext { level, generation } = c.select(1, "p1") else {
            panic!("expected FetchNext");
        };
        assert!(c.set_options(level, generation, opts(&["Europe"])));
        assert!(matches!(c.select(2, "Europe"), SelectOutcome::Complete { .. }));
        assert_eq!(
            c.query(),
            Some(ScheduleQuery::ByOrigin {
                country_id: "de".into(),
                port_id: "p1".into(),
                destination: "Europe".into(),
            })
        );
    }

    #[test]
    fn selection_label_resolves_through_options() {
        let mut c = CascadeFilter::new(FilterMode::Vessel);
        let gen = c.generation();
        c.set_options(
            0,
            gen,
            vec![SelectOption::new("v1", "MAERSK ONE")],
        );
        c.select(0, "v1");
        assert_eq!(c.selection_label(0), Some("MAERSK ONE"));
    }
}
