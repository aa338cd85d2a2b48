pub mod calc;
pub mod types;
pub mod validation;

pub use calc::{
    available_weight, current_average, final_average, needed_exam_grade, projected_average,
    recovery_analysis, simulate_future, total_weight,
};
pub use types::{
    FutureSimulation, GradeEntry, ProjectedAverage, RecoveryAnalysis, GRADE_MAX, GRADE_MIN,
};
pub use validation::{
    all_entries_acceptable, entry_validation, total_weight_validation, ValidationState,
};
