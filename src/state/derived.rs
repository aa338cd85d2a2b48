use crate::engine::{
    self, FutureSimulation, ProjectedAverage, RecoveryAnalysis,
};

use super::types::CalculatorState;

/// Every value the UI displays, recomputed from scratch on each call.
/// Nothing here is cached across state changes; staleness would be a
/// correctness bug, and the arithmetic is closed-form over at most tens
/// of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub total_weight: f64,
    pub available_weight: f64,
    pub current_average: f64,
    /// The redistributed exam average in exam mode, otherwise the same
    /// as the current average.
    pub final_average: f64,
    pub needed_exam_grade: f64,
    pub projected: ProjectedAverage,
    pub simulation: Option<FutureSimulation>,
    pub recovery: RecoveryAnalysis,
}

impl Derived {
    pub fn compute(state: &CalculatorState) -> Self {
        let total_weight = engine::total_weight(&state.entries);
        let available_weight = engine::available_weight(state.exam_mode, state.exam_weight);
        let current_average = engine::current_average(&state.entries);

        let final_average = if state.exam_mode {
            engine::final_average(&state.entries, state.exam_weight, state.exam_grade)
        } else {
            current_average
        };

        let needed_exam_grade =
            engine::needed_exam_grade(&state.entries, state.exam_weight, state.pass_grade);

        let projected = engine::projected_average(
            &state.entries,
            state.exam_mode,
            state.exam_weight,
            current_average,
        );

        let simulation = engine::simulate_future(
            &state.entries,
            state.exam_mode,
            state.exam_weight,
            state.future_count,
            state.future_percent,
            state.pass_grade,
            current_average,
            final_average,
        );

        let recovery = engine::recovery_analysis(
            &state.entries,
            state.exam_mode,
            state.exam_weight,
            current_average,
            final_average,
            state.pass_grade,
        );

        Self {
            total_weight,
            available_weight,
            current_average,
            final_average,
            needed_exam_grade,
            projected,
            simulation,
            recovery,
        }
    }

    /// Pass/fail verdict for the headline average.
    pub fn passed(&self, pass_grade: f64) -> bool {
        self.final_average >= pass_grade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::{reduce, Action};

    fn filled_state() -> CalculatorState {
        let state = CalculatorState::default();
        let id = state.entries[0].id;
        let state = reduce(&state, Action::UpdateValue { id, value: 50.0 });
        reduce(&state, Action::UpdateWeight { id, weight: 40.0 })
    }

    #[test]
    fn test_final_average_tracks_current_without_exam() {
        let derived = Derived::compute(&filled_state());
        assert_eq!(derived.current_average, 20.0);
        assert_eq!(derived.final_average, 20.0);
        assert_eq!(derived.total_weight, 40.0);
        assert_eq!(derived.available_weight, 100.0);
    }

    #[test]
    fn test_exam_mode_switches_final_average() {
        let state = filled_state();
        let state = reduce(&state, Action::SetExamMode(true));
        let state = reduce(&state, Action::SetExamGrade(60.0));
        let derived = Derived::compute(&state);
        // raw 20 rescaled by 70/40, plus 18 from the exam
        assert!((derived.final_average - 53.0).abs() < 1e-9);
        assert_eq!(derived.available_weight, 70.0);
    }

    #[test]
    fn test_simulation_absent_by_default() {
        let derived = Derived::compute(&filled_state());
        assert!(derived.simulation.is_none());
    }

    #[test]
    fn test_simulation_present_when_configured() {
        let state = filled_state();
        let state = reduce(&state, Action::SetFutureCount(2));
        let state = reduce(&state, Action::SetFuturePercent(30.0));
        let derived = Derived::compute(&state);
        let sim = derived.simulation.expect("simulation configured");
        assert_eq!(sim.available_percent, 60.0);
    }

    #[test]
    fn test_recovery_always_present() {
        let derived = Derived::compute(&CalculatorState::default());
        assert_eq!(derived.recovery.remaining_percent, 100.0);
        assert!(derived.recovery.feasible);
    }

    #[test]
    fn test_passed_verdict() {
        let derived = Derived::compute(&filled_state());
        assert!(!derived.passed(40.0));
        assert!(derived.passed(20.0));
    }
}
