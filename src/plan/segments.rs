//! Pomodoro-style segmentation of a day's target.
//!
//! Rules:
//! - Work segments never exceed [`MAX_WORK_MINUTES`].
//! - Work segments stay at or above [`MIN_WORK_MINUTES`] unless the total is
//!   too small; only the trailing one or two segments may fall below it.
//! - A [`BREAK_MINUTES`] break separates consecutive work segments.
//! - Days under [`SPLIT_THRESHOLD_MINUTES`] are a single work segment.
//! - Totals above [`MAX_DAY_MINUTES`] are clamped to it.

use crate::types::{Segment, SegmentKind};

/// Longest allowed work segment.
pub const MAX_WORK_MINUTES: u32 = 25;

/// Preferred shortest work segment.
pub const MIN_WORK_MINUTES: u32 = 15;

/// Length of the break between work segments.
pub const BREAK_MINUTES: u32 = 5;

/// Days shorter than this are not split.
pub const SPLIT_THRESHOLD_MINUTES: u32 = 20;

/// Largest total that is split; one calendar day.
pub const MAX_DAY_MINUTES: u32 = 24 * 60;

/// Builds the work/break segment sequence for one day.
///
/// The sum of work minutes equals `total_minutes` up to [`MAX_DAY_MINUTES`];
/// non-positive totals give an empty sequence.
pub fn build_segments(total_minutes: i64) -> Vec<Segment> {
    if total_minutes <= 0 {
        return Vec::new();
    }
    let total = u32::try_from(total_minutes)
        .unwrap_or(MAX_DAY_MINUTES)
        .min(MAX_DAY_MINUTES);

    if total < SPLIT_THRESHOLD_MINUTES {
        return vec![Segment::work(total)];
    }

    let count = total.div_ceil(MAX_WORK_MINUTES);
    let mut work = vec![MAX_WORK_MINUTES; count as usize];
    let mut shortfall = (count * MAX_WORK_MINUTES).saturating_sub(total);

    // Trim from the end, first down to the preferred minimum, then to 1.
    for floor in [MIN_WORK_MINUTES, 1] {
        for minutes in work.iter_mut().rev() {
            if shortfall == 0 {
                break;
            }
            let reduction = minutes.saturating_sub(floor).min(shortfall);
            *minutes -= reduction;
            shortfall -= reduction;
        }
    }

    let mut segments = Vec::with_capacity(work.len() * 2 - 1);
    for (i, minutes) in work.into_iter().enumerate() {
        if i > 0 {
            segments.push(Segment::rest(BREAK_MINUTES));
        }
        segments.push(Segment::work(minutes));
    }
    segments
}

fn sum_of(segments: &[Segment], kind: SegmentKind) -> u32 {
    segments
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.minutes)
        .sum()
}

/// Total work minutes in `segments`.
pub fn total_work_minutes(segments: &[Segment]) -> u32 {
    sum_of(segments, SegmentKind::Work)
}

/// Total break minutes in `segments`.
pub fn total_break_minutes(segments: &[Segment]) -> u32 {
    sum_of(segments, SegmentKind::Break)
}

/// Wall-clock length of the whole sequence.
pub fn total_minutes(segments: &[Segment]) -> u32 {
    segments.iter().map(|s| s.minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| s.minutes.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    fn work_minutes(segments: &[Segment]) -> Vec<u32> {
        segments.iter().filter(|s| s.is_work()).map(|s| s.minutes).collect()
    }

    fn assert_pattern(total: i64, expected: &str) {
        let segments = build_segments(total);
        assert_eq!(pattern(&segments), expected, "for {total} minutes");
        assert_eq!(i64::from(total_work_minutes(&segments)), total);
    }

    fn assert_well_formed(total: i64) {
        let segments = build_segments(total);
        assert_eq!(i64::from(total_work_minutes(&segments)), total, "total {total}");
        assert!(segments.first().unwrap().is_work(), "total {total}");
        assert!(segments.last().unwrap().is_work(), "total {total}");
        assert!(
            work_minutes(&segments).iter().all(|m| *m <= MAX_WORK_MINUTES && *m >= 1),
            "total {total}"
        );
        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind, "total {total}");
        }
        assert!(segments
            .iter()
            .filter(|s| !s.is_work())
            .all(|s| s.minutes == BREAK_MINUTES));
    }

    mod short_day_tests {
        use super::*;

        #[test]
        fn test_non_positive_is_empty() {
            assert!(build_segments(0).is_empty());
            assert!(build_segments(-5).is_empty());
        }

        #[test]
        fn test_below_threshold_single_segment() {
            assert_eq!(build_segments(1), vec![Segment::work(1)]);
            assert_eq!(build_segments(10), vec![Segment::work(10)]);
            assert_eq!(build_segments(19), vec![Segment::work(19)]);
        }

        #[test]
        fn test_threshold_and_single_block() {
            assert_eq!(build_segments(20), vec![Segment::work(20)]);
            assert_eq!(build_segments(25), vec![Segment::work(25)]);
        }
    }

    mod split_day_tests {
        use super::*;

        #[test]
        fn test_two_segments() {
            assert_pattern(29, "15 / 5 / 14");
            assert_pattern(32, "17 / 5 / 15");
            assert_pattern(45, "25 / 5 / 20");
            assert_pattern(50, "25 / 5 / 25");
        }

        #[test]
        fn test_three_segments() {
            assert_pattern(52, "22 / 5 / 15 / 5 / 15");
            assert_pattern(60, "25 / 5 / 20 / 5 / 15");
        }

        #[test]
        fn test_larger_days() {
            assert_pattern(76, "25 / 5 / 21 / 5 / 15 / 5 / 15");
            assert_pattern(104, "25 / 5 / 25 / 5 / 24 / 5 / 15 / 5 / 15");
        }

        #[test]
        fn test_full_target_day() {
            let segments = build_segments(180);
            let work = work_minutes(&segments);
            assert_eq!(work.len(), 8);
            assert_eq!(work.iter().sum::<u32>(), 180);
            assert_eq!(work, vec![25, 25, 25, 25, 25, 25, 15, 15]);
            assert_eq!(total_break_minutes(&segments), 35);
            assert_eq!(total_minutes(&segments), 215);
        }

        #[test]
        fn test_exact_sample_sequence() {
            assert_eq!(
                build_segments(60),
                vec![
                    Segment::work(25),
                    Segment::rest(5),
                    Segment::work(20),
                    Segment::rest(5),
                    Segment::work(15),
                ]
            );
        }
    }

    mod invariant_tests {
        use super::*;

        #[test]
        fn test_every_total_up_to_max_target() {
            for total in 1..=480 {
                assert_well_formed(total);
            }
        }

        #[test]
        fn test_only_trailing_segments_below_minimum() {
            for total in 20..=480 {
                let work = work_minutes(&build_segments(total));
                let short = work.iter().filter(|m| **m < MIN_WORK_MINUTES).count();
                assert!(short <= 2, "total {total}: {work:?}");
                if let Some(first_short) = work.iter().position(|m| *m < MIN_WORK_MINUTES) {
                    assert!(first_short + 2 >= work.len(), "total {total}: {work:?}");
                }
            }
        }

        #[test]
        fn test_whole_day_is_largest_split() {
            assert_well_formed(i64::from(MAX_DAY_MINUTES));
            assert_eq!(
                work_minutes(&build_segments(i64::from(MAX_DAY_MINUTES))).len(),
                58
            );
        }

        #[test]
        fn test_huge_totals_clamped_to_one_day() {
            for total in [
                i64::from(MAX_DAY_MINUTES) + 1,
                4_294_967_290,
                i64::from(u32::MAX),
                i64::MAX,
            ] {
                let segments = build_segments(total);
                assert_eq!(total_work_minutes(&segments), MAX_DAY_MINUTES, "total {total}");
                assert_eq!(segments, build_segments(i64::from(MAX_DAY_MINUTES)));
            }
        }
    }
}
