use super::types::{GradeEntry, GRADE_MAX, GRADE_MIN};

/// Display-level classification of an input. Validation never blocks
/// computation; the engine runs on the raw values either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Valid,
    Invalid,
    Warning,
    Neutral,
}

/// Classify a single entry against the grade scale and the weight cap.
///
/// A fully blank entry is neutral, not wrong; anything half-entered or
/// out of range is invalid.
pub fn entry_validation(entry: &GradeEntry, available_weight: f64) -> ValidationState {
    if entry.value == 0.0 && entry.weight == 0.0 {
        return ValidationState::Neutral;
    }

    let value_ok = entry.value >= GRADE_MIN && entry.value <= GRADE_MAX;
    let weight_ok = entry.weight > 0.0 && entry.weight <= available_weight;

    if value_ok && weight_ok {
        ValidationState::Valid
    } else {
        ValidationState::Invalid
    }
}

/// Classify the weight total against its limit: the available weight in
/// exam mode, a flat 100 otherwise. An exact match is the goal, a surplus
/// is an error, a shortfall just means work left to enter.
pub fn total_weight_validation(
    total: f64,
    exam_mode: bool,
    available_weight: f64,
) -> ValidationState {
    if total == 0.0 {
        return ValidationState::Neutral;
    }

    let limit = if exam_mode { available_weight } else { 100.0 };

    if total == limit {
        ValidationState::Valid
    } else if total > limit {
        ValidationState::Invalid
    } else {
        ValidationState::Warning
    }
}

/// True when no entry is in an error state (blank entries are fine).
pub fn all_entries_acceptable(entries: &[GradeEntry], available_weight: f64) -> bool {
    entries.iter().all(|e| {
        matches!(
            entry_validation(e, available_weight),
            ValidationState::Valid | ValidationState::Neutral
        )
    })
}

/// Error message for a grade outside the scale.
pub fn grade_range_message() -> String {
    format!("Grade must be between {:.0} and {:.0}", GRADE_MIN, GRADE_MAX)
}

/// Error message for an over-committed weight total. Mentions the exam
/// share when that is what shrank the limit.
pub fn weight_overflow_message(
    total: f64,
    limit: f64,
    exam_mode: bool,
    exam_weight: f64,
) -> String {
    if exam_mode && exam_weight > 0.0 {
        format!(
            "Weights add up to {}% but only {}% is available (the exam takes {}%)",
            total, limit, exam_weight
        )
    } else {
        format!("Weights add up to {}% but the maximum is {}%", total, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: f64, weight: f64) -> GradeEntry {
        GradeEntry {
            id: 0,
            name: String::new(),
            value,
            weight,
        }
    }

    #[test]
    fn test_blank_entry_is_neutral() {
        assert_eq!(entry_validation(&entry(0.0, 0.0), 100.0), ValidationState::Neutral);
    }

    #[test]
    fn test_entry_in_range_is_valid() {
        assert_eq!(entry_validation(&entry(10.0, 1.0), 100.0), ValidationState::Valid);
        assert_eq!(entry_validation(&entry(70.0, 100.0), 100.0), ValidationState::Valid);
        assert_eq!(entry_validation(&entry(45.0, 30.0), 70.0), ValidationState::Valid);
    }

    #[test]
    fn test_entry_below_scale_is_invalid() {
        assert_eq!(entry_validation(&entry(9.9, 30.0), 100.0), ValidationState::Invalid);
    }

    #[test]
    fn test_entry_above_scale_is_invalid() {
        assert_eq!(entry_validation(&entry(70.1, 30.0), 100.0), ValidationState::Invalid);
    }

    #[test]
    fn test_entry_weight_over_available_is_invalid() {
        assert_eq!(entry_validation(&entry(50.0, 80.0), 70.0), ValidationState::Invalid);
    }

    #[test]
    fn test_half_entered_entry_is_invalid() {
        // A grade without a weight (and vice versa) is an error, not
        // neutral.
        assert_eq!(entry_validation(&entry(50.0, 0.0), 100.0), ValidationState::Invalid);
        assert_eq!(entry_validation(&entry(0.0, 30.0), 100.0), ValidationState::Invalid);
    }

    #[test]
    fn test_total_zero_is_neutral() {
        assert_eq!(total_weight_validation(0.0, false, 100.0), ValidationState::Neutral);
    }

    #[test]
    fn test_total_exact_limit_is_valid() {
        assert_eq!(total_weight_validation(100.0, false, 100.0), ValidationState::Valid);
        assert_eq!(total_weight_validation(70.0, true, 70.0), ValidationState::Valid);
    }

    #[test]
    fn test_total_over_limit_is_invalid() {
        assert_eq!(total_weight_validation(105.0, false, 100.0), ValidationState::Invalid);
        assert_eq!(total_weight_validation(75.0, true, 70.0), ValidationState::Invalid);
    }

    #[test]
    fn test_total_under_limit_is_warning() {
        assert_eq!(total_weight_validation(60.0, false, 100.0), ValidationState::Warning);
    }

    #[test]
    fn test_all_entries_acceptable_mixed() {
        let ok = vec![entry(0.0, 0.0), entry(50.0, 40.0)];
        assert!(all_entries_acceptable(&ok, 100.0));

        let bad = vec![entry(50.0, 40.0), entry(5.0, 10.0)];
        assert!(!all_entries_acceptable(&bad, 100.0));
    }

    #[test]
    fn test_grade_range_message_names_the_scale() {
        assert_eq!(grade_range_message(), "Grade must be between 10 and 70");
    }

    #[test]
    fn test_weight_overflow_message_mentions_exam() {
        let msg = weight_overflow_message(80.0, 70.0, true, 30.0);
        assert!(msg.contains("80%"));
        assert!(msg.contains("70%"));
        assert!(msg.contains("exam takes 30%"));

        let plain = weight_overflow_message(110.0, 100.0, false, 0.0);
        assert!(plain.contains("110%"));
        assert!(!plain.contains("exam"));
    }
}
