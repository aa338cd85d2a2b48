use crate::engine::GradeEntry;

/// Pass-grade presets the UI cycles through, in ascending order.
pub const PASS_GRADE_PRESETS: [f64; 5] = [40.0, 45.0, 50.0, 55.0, 60.0];

const DEFAULT_EXAM_WEIGHT: f64 = 30.0;
const DEFAULT_PASS_GRADE: f64 = 40.0;
const INITIAL_ENTRY_COUNT: u64 = 3;

/// Everything the calculator computes from: the entry list plus the
/// scalar knobs. Owned by the top-level component, transformed only
/// through [`reduce`], handed to the engine as plain borrowed data.
/// Persistence goes field-by-field through the session store, so the
/// struct itself never touches serde.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    pub entries: Vec<GradeEntry>,
    pub exam_mode: bool,
    /// Percentage the exam counts for (meaningful only in exam mode).
    pub exam_weight: f64,
    /// Grade obtained on the exam, 0 = not yet entered.
    pub exam_grade: f64,
    /// Minimum average required to pass.
    pub pass_grade: f64,
    /// "Simulate N future evaluations" knobs.
    pub future_count: u32,
    pub future_percent: f64,
    /// Next id handed to a new entry. Ids are never reused within a
    /// session so table selections stay unambiguous.
    next_id: u64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        let entries = (1..=INITIAL_ENTRY_COUNT).map(GradeEntry::new).collect();
        Self {
            entries,
            exam_mode: false,
            exam_weight: DEFAULT_EXAM_WEIGHT,
            exam_grade: 0.0,
            pass_grade: DEFAULT_PASS_GRADE,
            future_count: 0,
            future_percent: 0.0,
            next_id: INITIAL_ENTRY_COUNT + 1,
        }
    }
}

impl CalculatorState {
    /// Rebuild a state from persisted parts, re-deriving the id counter
    /// so future entries never collide with loaded ones.
    pub fn from_parts(
        entries: Vec<GradeEntry>,
        exam_mode: bool,
        exam_weight: f64,
        exam_grade: f64,
        pass_grade: f64,
        future_count: u32,
        future_percent: f64,
    ) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        Self {
            entries,
            exam_mode,
            exam_weight,
            exam_grade,
            pass_grade,
            future_count,
            future_percent,
            next_id,
        }
    }

    /// The preset after the current pass grade, wrapping around. A pass
    /// grade off the preset list snaps to the first preset.
    pub fn next_pass_grade(&self) -> f64 {
        match PASS_GRADE_PRESETS.iter().position(|&p| p == self.pass_grade) {
            Some(i) => PASS_GRADE_PRESETS[(i + 1) % PASS_GRADE_PRESETS.len()],
            None => PASS_GRADE_PRESETS[0],
        }
    }
}

/// Every mutation the UI can request. Field updates carry raw values;
/// domain validation stays a display concern.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddEntry,
    RemoveEntry { id: u64 },
    UpdateName { id: u64, name: String },
    UpdateValue { id: u64, value: f64 },
    UpdateWeight { id: u64, weight: f64 },
    SetExamMode(bool),
    SetExamWeight(f64),
    SetExamGrade(f64),
    SetPassGrade(f64),
    SetFutureCount(u32),
    SetFuturePercent(f64),
    Reset,
}

/// Pure state transition: builds the successor state, never touches the
/// input.
pub fn reduce(state: &CalculatorState, action: Action) -> CalculatorState {
    let mut next = state.clone();
    match action {
        Action::AddEntry => {
            next.entries.push(GradeEntry::new(next.next_id));
            next.next_id += 1;
        }
        Action::RemoveEntry { id } => {
            next.entries.retain(|e| e.id != id);
        }
        Action::UpdateName { id, name } => {
            if let Some(entry) = next.entries.iter_mut().find(|e| e.id == id) {
                entry.name = name;
            }
        }
        Action::UpdateValue { id, value } => {
            if let Some(entry) = next.entries.iter_mut().find(|e| e.id == id) {
                entry.value = value;
            }
        }
        Action::UpdateWeight { id, weight } => {
            if let Some(entry) = next.entries.iter_mut().find(|e| e.id == id) {
                entry.weight = weight;
            }
        }
        Action::SetExamMode(on) => next.exam_mode = on,
        Action::SetExamWeight(weight) => next.exam_weight = weight,
        Action::SetExamGrade(grade) => next.exam_grade = grade,
        Action::SetPassGrade(grade) => next.pass_grade = grade,
        Action::SetFutureCount(count) => next.future_count = count,
        Action::SetFuturePercent(percent) => next.future_percent = percent,
        Action::Reset => next = CalculatorState::default(),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = CalculatorState::default();
        assert_eq!(state.entries.len(), 3);
        assert!(state.entries.iter().all(|e| !e.is_filled()));
        assert!(!state.exam_mode);
        assert_eq!(state.exam_weight, 30.0);
        assert_eq!(state.pass_grade, 40.0);
        assert_eq!(state.future_count, 0);
    }

    #[test]
    fn test_add_entry_assigns_fresh_id() {
        let state = CalculatorState::default();
        let next = reduce(&state, Action::AddEntry);
        assert_eq!(next.entries.len(), 4);
        let new_id = next.entries.last().unwrap().id;
        assert!(state.entries.iter().all(|e| e.id != new_id));
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let state = CalculatorState::default();
        let snapshot = state.clone();
        let _ = reduce(&state, Action::AddEntry);
        let _ = reduce(&state, Action::SetExamMode(true));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_remove_entry() {
        let state = CalculatorState::default();
        let id = state.entries[1].id;
        let next = reduce(&state, Action::RemoveEntry { id });
        assert_eq!(next.entries.len(), 2);
        assert!(next.entries.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let state = CalculatorState::default();
        let next = reduce(&state, Action::RemoveEntry { id: 999 });
        assert_eq!(next.entries.len(), 3);
    }

    #[test]
    fn test_update_fields() {
        let state = CalculatorState::default();
        let id = state.entries[0].id;
        let next = reduce(&state, Action::UpdateValue { id, value: 55.0 });
        let next = reduce(&next, Action::UpdateWeight { id, weight: 25.0 });
        let next = reduce(
            &next,
            Action::UpdateName {
                id,
                name: "Midterm".to_string(),
            },
        );
        let entry = next.entries.iter().find(|e| e.id == id).unwrap();
        assert_eq!(entry.value, 55.0);
        assert_eq!(entry.weight, 25.0);
        assert_eq!(entry.name, "Midterm");
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let state = CalculatorState::default();
        let id = state.entries[2].id;
        let next = reduce(&state, Action::RemoveEntry { id });
        let next = reduce(&next, Action::AddEntry);
        let new_id = next.entries.last().unwrap().id;
        assert_ne!(new_id, id);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let state = CalculatorState::default();
        let next = reduce(&state, Action::SetExamMode(true));
        let next = reduce(&next, Action::SetPassGrade(55.0));
        let next = reduce(&next, Action::AddEntry);
        let reset = reduce(&next, Action::Reset);
        assert_eq!(reset, CalculatorState::default());
    }

    #[test]
    fn test_next_pass_grade_cycles_presets() {
        let mut state = CalculatorState::default();
        assert_eq!(state.next_pass_grade(), 45.0);
        state.pass_grade = 60.0;
        assert_eq!(state.next_pass_grade(), 40.0);
        state.pass_grade = 42.0; // off-preset snaps to the first
        assert_eq!(state.next_pass_grade(), 40.0);
    }

    #[test]
    fn test_from_parts_rederives_id_counter() {
        let entries = vec![GradeEntry::new(5), GradeEntry::new(9)];
        let state =
            CalculatorState::from_parts(entries, false, 30.0, 0.0, 40.0, 0, 0.0);
        let next = reduce(&state, Action::AddEntry);
        assert_eq!(next.entries.last().unwrap().id, 10);
    }
}
