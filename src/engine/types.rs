use serde::{Deserialize, Serialize};

/// Lowest grade the scale allows. Unfilled weight is assumed to score
/// this in conservative projections.
pub const GRADE_MIN: f64 = 10.0;

/// Highest grade the scale allows. A required grade above this is
/// unattainable.
pub const GRADE_MAX: f64 = 70.0;

/// One weighted graded item.
///
/// `value == 0` or `weight == 0` means "not yet entered"; such entries
/// contribute nothing to any weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    /// Stable identifier, assigned once at creation.
    pub id: u64,
    /// Free-text label, may be empty.
    #[serde(default)]
    pub name: String,
    /// Numeric grade on the 10-70 scale, 0 = not yet entered.
    pub value: f64,
    /// Percentage this entry contributes to the total, 0 = inactive.
    pub weight: f64,
}

impl GradeEntry {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            value: 0.0,
            weight: 0.0,
        }
    }

    /// Whether both fields are entered. Only filled entries count toward
    /// used weight in projections and simulations.
    pub fn is_filled(&self) -> bool {
        self.value > 0.0 && self.weight > 0.0
    }

    /// Points this entry adds to a weighted average.
    pub fn contribution(&self) -> f64 {
        self.value * self.weight / 100.0
    }
}

/// Result of simulating N future evaluations worth a chosen slice of the
/// remaining percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct FutureSimulation {
    /// Average needed across the simulated evaluations, floored at 0.
    pub needed_grade: f64,
    /// Whether that average fits on the grade scale.
    pub feasible: bool,
    /// Total percentage still unassigned before the simulation.
    pub available_percent: f64,
}

/// Can-I-still-pass analysis over all remaining weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryAnalysis {
    pub feasible: bool,
    /// Human-readable verdict, ready for display.
    pub message: String,
    /// Average needed in the remaining percentage, floored at 0.
    pub needed_grade: f64,
    /// Percentage not yet consumed by entries or the exam. 0 when the
    /// outcome is already decided.
    pub remaining_percent: f64,
}

/// Conservative forward projection: unfilled weight assumed to score the
/// scale minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedAverage {
    pub average: f64,
    pub remaining_percent: f64,
    /// Points the assumed-minimum remainder adds on top of the current
    /// average.
    pub contribution: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_blank() {
        let entry = GradeEntry::new(7);
        assert_eq!(entry.id, 7);
        assert!(entry.name.is_empty());
        assert_eq!(entry.value, 0.0);
        assert_eq!(entry.weight, 0.0);
        assert!(!entry.is_filled());
    }

    #[test]
    fn test_is_filled_requires_both_fields() {
        let mut entry = GradeEntry::new(1);
        entry.value = 55.0;
        assert!(!entry.is_filled());
        entry.weight = 30.0;
        assert!(entry.is_filled());
        entry.value = 0.0;
        assert!(!entry.is_filled());
    }

    #[test]
    fn test_contribution() {
        let entry = GradeEntry {
            id: 1,
            name: "Midterm".to_string(),
            value: 60.0,
            weight: 25.0,
        };
        assert_eq!(entry.contribution(), 15.0);
    }

    #[test]
    fn test_entry_serde_roundtrip() {
        let entry = GradeEntry {
            id: 3,
            name: "Lab 1".to_string(),
            value: 48.0,
            weight: 15.0,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: GradeEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}
