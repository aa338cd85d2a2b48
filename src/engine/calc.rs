use super::types::{
    FutureSimulation, GradeEntry, ProjectedAverage, RecoveryAnalysis, GRADE_MAX, GRADE_MIN,
};

/// Sum of all entry weights, including blank ones. 0 for an empty list.
pub fn total_weight(entries: &[GradeEntry]) -> f64 {
    entries.iter().map(|e| e.weight).sum()
}

/// Percentage the non-exam entries may occupy: 100, minus the exam share
/// when exam mode is active. Not clamped; an exam weight above 100 is a
/// caller-input problem, not an arithmetic one.
pub fn available_weight(exam_mode: bool, exam_weight: f64) -> f64 {
    if exam_mode {
        100.0 - exam_weight
    } else {
        100.0
    }
}

/// Weighted average over entries with a weight. Entries with `weight == 0`
/// are ignored regardless of value; an entered weight with a zero value
/// still drags the average as a real zero-contribution item.
pub fn current_average(entries: &[GradeEntry]) -> f64 {
    let weighted: Vec<&GradeEntry> = entries.iter().filter(|e| e.weight > 0.0).collect();
    if weighted.is_empty() {
        return 0.0;
    }

    weighted.iter().map(|e| e.contribution()).sum()
}

/// Average including the actual exam grade, with the non-exam weights
/// rescaled proportionally so they always fill exactly `100 - exam_weight`
/// percent, whether or not they originally summed to 100.
pub fn final_average(entries: &[GradeEntry], exam_weight: f64, exam_grade: f64) -> f64 {
    let used_weight = total_weight(entries);
    let exam_points = exam_grade * exam_weight / 100.0;

    if used_weight == 0.0 {
        // Only the exam counts.
        return exam_points;
    }

    let raw_avg: f64 = entries.iter().map(|e| e.contribution()).sum();
    let remaining_weight = 100.0 - exam_weight;
    let scale_factor = remaining_weight / used_weight;

    raw_avg * scale_factor + exam_points
}

/// Exam grade required to reach `pass_grade`, solving the `final_average`
/// redistribution for the exam term. Floored at 0: a negative requirement
/// means the entries alone already pass.
pub fn needed_exam_grade(entries: &[GradeEntry], exam_weight: f64, pass_grade: f64) -> f64 {
    let used_weight = total_weight(entries);
    let remaining_weight = 100.0 - exam_weight;

    if used_weight == 0.0 {
        return (pass_grade * 100.0 / exam_weight).max(0.0);
    }

    let raw_avg: f64 = entries.iter().map(|e| e.contribution()).sum();
    let scale_factor = remaining_weight / used_weight;
    let adjusted_avg = raw_avg * scale_factor;

    let needed = (pass_grade - adjusted_avg) * 100.0 / exam_weight;
    needed.max(0.0)
}

/// Simulate scoring only `future_percent` of the remaining weight across
/// `future_count` evaluations. The slice NOT simulated is assumed to score
/// the scale minimum, so the result is a conservative target.
///
/// Returns `None` when there is nothing to simulate or the requested slice
/// exceeds what is actually left.
#[allow(clippy::too_many_arguments)]
pub fn simulate_future(
    entries: &[GradeEntry],
    exam_mode: bool,
    exam_weight: f64,
    future_count: u32,
    future_percent: f64,
    pass_grade: f64,
    current_average: f64,
    final_average: f64,
) -> Option<FutureSimulation> {
    let used_weight: f64 = entries.iter().filter(|e| e.is_filled()).map(|e| e.weight).sum();
    let exam_weight_used = if exam_mode { exam_weight } else { 0.0 };
    let available_total = 100.0 - used_weight - exam_weight_used;

    if future_count == 0 || future_percent == 0.0 || future_percent > available_total {
        return None;
    }

    let baseline = if exam_mode { final_average } else { current_average };
    let unsimulated_percent = available_total - future_percent;
    let floor_contribution = if unsimulated_percent > 0.0 {
        GRADE_MIN * unsimulated_percent / 100.0
    } else {
        0.0
    };

    let needed = (pass_grade - baseline - floor_contribution) / (future_percent / 100.0);

    Some(FutureSimulation {
        needed_grade: needed.max(0.0),
        feasible: needed <= GRADE_MAX,
        available_percent: available_total,
    })
}

/// Whether the pass grade is still reachable using ALL remaining weight.
/// With nothing left to earn, the verdict is simply where the average
/// stands today.
pub fn recovery_analysis(
    entries: &[GradeEntry],
    exam_mode: bool,
    exam_weight: f64,
    current_average: f64,
    final_average: f64,
    pass_grade: f64,
) -> RecoveryAnalysis {
    let used_weight: f64 = entries.iter().filter(|e| e.is_filled()).map(|e| e.weight).sum();
    let exam_weight_used = if exam_mode { exam_weight } else { 0.0 };
    let available_total = 100.0 - used_weight - exam_weight_used;

    let baseline = if exam_mode { final_average } else { current_average };

    if available_total <= 0.0 {
        let passed = baseline >= pass_grade;
        return RecoveryAnalysis {
            feasible: passed,
            message: if passed {
                "You already have the grades to pass!".to_string()
            } else {
                "Cannot pass with the current grades".to_string()
            },
            needed_grade: 0.0,
            remaining_percent: 0.0,
        };
    }

    let needed = (pass_grade - baseline) / (available_total / 100.0);
    let feasible = needed <= GRADE_MAX;

    RecoveryAnalysis {
        feasible,
        message: if feasible {
            format!(
                "You need an average of at least {:.1} in the remaining {}%",
                needed.max(0.0),
                available_total
            )
        } else {
            format!(
                "Impossible to pass. You would need {:.1} in the remaining {}%",
                needed, available_total
            )
        },
        needed_grade: needed.max(0.0),
        remaining_percent: available_total,
    }
}

/// Conservative forecast: the current average plus the scale minimum for
/// every percent not yet entered. Distinct from `final_average` (which
/// uses the actual exam grade) and from the target solvers.
pub fn projected_average(
    entries: &[GradeEntry],
    exam_mode: bool,
    exam_weight: f64,
    current_average: f64,
) -> ProjectedAverage {
    let used_weight: f64 = entries.iter().filter(|e| e.is_filled()).map(|e| e.weight).sum();
    let exam_weight_used = if exam_mode { exam_weight } else { 0.0 };
    let remaining_percent = 100.0 - used_weight - exam_weight_used;

    let contribution = if remaining_percent > 0.0 {
        GRADE_MIN * remaining_percent / 100.0
    } else {
        0.0
    };

    ProjectedAverage {
        average: current_average + contribution,
        remaining_percent,
        contribution,
    }
}
