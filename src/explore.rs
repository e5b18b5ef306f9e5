//! Exploration gate: the forward-only state machine that unlocks the summary
//! and visualization steps after an explicit user confirmation.

use crate::chart::ChartKind;
use crate::ingest::Dataset;

/// A yes/no selection value, as reported by the presentation layer's
/// selection widgets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    #[default]
    No,
}

/// Gate state. Transitions only move forward within a session: loading data
/// never resets a granted `ExploreRequested`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    #[default]
    NoData,
    DataLoaded,
    ExploreRequested,
}

/// Tracks whether exploration has been unlocked. Unlocking requires two
/// independent signals: a stored `Choice::Yes` and a submit event, with the
/// choice in effect at submit time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExploreGate {
    state: GateState,
}

impl ExploreGate {
    pub fn state(&self) -> GateState {
        self.state
    }

    /// True once `ExploreRequested` has been reached.
    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::ExploreRequested
    }

    /// Records a successful ingestion. Never downgrades: once exploration has
    /// been requested, replacing the dataset leaves the gate open.
    pub fn notify_data_loaded(&mut self) {
        if self.state == GateState::NoData {
            self.state = GateState::DataLoaded;
        }
    }

    /// Handles a submit event with the choice currently in effect. Returns
    /// true when the gate is unlocked after the event.
    pub fn submit(&mut self, choice: Choice) -> bool {
        if self.state == GateState::DataLoaded && choice == Choice::Yes {
            self.state = GateState::ExploreRequested;
        }
        self.is_unlocked()
    }
}

/// Exploration-side session state: the dataset store for this context plus
/// the widget values that drive the gate and the visualization selector.
#[derive(Debug, Default)]
pub struct ExploreSession {
    pub dataset: Option<Dataset>,
    pub gate: ExploreGate,
    pub choice: Choice,
    pub correlation_choice: Choice,
    pub chart_kind: ChartKind,
    pub selected_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_locked_without_data() {
        let mut gate = ExploreGate::default();
        assert_eq!(gate.state(), GateState::NoData);
        assert!(!gate.submit(Choice::Yes));
        assert_eq!(gate.state(), GateState::NoData);
    }

    #[test]
    fn unlocks_only_with_yes_and_submit() {
        let mut gate = ExploreGate::default();
        gate.notify_data_loaded();
        assert_eq!(gate.state(), GateState::DataLoaded);

        assert!(!gate.submit(Choice::No));
        assert_eq!(gate.state(), GateState::DataLoaded);

        assert!(gate.submit(Choice::Yes));
        assert_eq!(gate.state(), GateState::ExploreRequested);
    }

    #[test]
    fn choice_must_be_in_effect_at_submit_time() {
        let mut gate = ExploreGate::default();
        gate.notify_data_loaded();
        // Submit first, flip to yes afterwards: still locked until the next submit.
        assert!(!gate.submit(Choice::No));
        assert!(!gate.is_unlocked());
        assert!(gate.submit(Choice::Yes));
    }

    #[test]
    fn reingestion_does_not_reset_the_latch() {
        let mut gate = ExploreGate::default();
        gate.notify_data_loaded();
        gate.submit(Choice::Yes);
        gate.notify_data_loaded();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn submit_is_idempotent_once_unlocked() {
        let mut gate = ExploreGate::default();
        gate.notify_data_loaded();
        gate.submit(Choice::Yes);
        assert!(gate.submit(Choice::No));
        assert_eq!(gate.state(), GateState::ExploreRequested);
    }
}
