//! Daily target ramp.
//!
//! The ramp climbs in equal steps of `target / n` and always lands exactly on
//! `target` on the last training day:
//!
//! ```
//! use focus180::plan::compute_daily_targets;
//!
//! assert_eq!(compute_daily_targets(180, 4), vec![45, 90, 135, 180]);
//! ```

use chrono::NaiveDate;

/// Computes one daily target per training day.
///
/// Day `i` (1-based) gets `round(target / n * i)`; the last day is pinned to
/// `target`. A repair pass then raises any value that dips below its
/// predecessor, so the result is non-decreasing.
pub fn compute_daily_targets(target: u32, n: usize) -> Vec<u32> {
    match n {
        0 => return Vec::new(),
        1 => return vec![target],
        _ => {}
    }

    let step = f64::from(target) / n as f64;
    let mut targets: Vec<u32> = (1..=n)
        .map(|i| {
            if i == n {
                target
            } else {
                (step * i as f64).round() as u32
            }
        })
        .collect();

    for i in 1..targets.len() {
        if targets[i] < targets[i - 1] {
            targets[i] = targets[i - 1];
        }
    }

    targets
}

/// Same as [`compute_daily_targets`], one value per date in `dates`.
pub fn compute_daily_targets_for(target: u32, dates: &[NaiveDate]) -> Vec<u32> {
    compute_daily_targets(target, dates.len())
}
