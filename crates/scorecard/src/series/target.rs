use super::domain::{KpiDirection, KpiStatus};

/// Gap between the evaluated rollup and the target, always
/// `evaluated - target`. The sign is never normalized by direction; callers
/// label it as gap or surplus themselves.
pub fn delta(evaluated: Option<f64>, target: Option<f64>) -> Option<f64> {
    match (evaluated, target) {
        (Some(evaluated), Some(target)) => Some(evaluated - target),
        _ => None,
    }
}

/// Standing of a KPI for the requested period.
///
/// Presence is judged on the period's raw measurement, magnitude on the
/// evaluated rollup: a month that was never measured reports `NO_DATA` even
/// when earlier months keep the rollup computable. A KPI without a target
/// cannot fail and reports `ON_TARGET`.
pub fn status(
    current_raw: Option<f64>,
    evaluated: Option<f64>,
    target: Option<f64>,
    direction: KpiDirection,
) -> KpiStatus {
    if current_raw.is_none() {
        return KpiStatus::NoData;
    }
    let Some(target) = target else {
        return KpiStatus::OnTarget;
    };
    let Some(evaluated) = evaluated else {
        return KpiStatus::OffTarget;
    };

    let on_target = match direction {
        KpiDirection::HigherIsBetter => evaluated >= target,
        KpiDirection::LowerIsBetter => evaluated <= target,
    };
    if on_target {
        KpiStatus::OnTarget
    } else {
        KpiStatus::OffTarget
    }
}
