use super::normalize::{Anchor, months_between, normalize};
use super::types::{AxisTick, TimelineRange};
use crate::ir::TimelineRecord;

/// Visible span of a record set: one month of margin on each side, with the
/// newest edge pushed out to `now` when any record is still ongoing.
pub fn compute_range(records: &[TimelineRecord], now: Anchor) -> TimelineRange {
    range_from_spans(
        records.iter().map(|record| {
            (
                normalize(Some(&record.start_date), now),
                record.end_date.as_ref().map(|end| normalize(Some(end), now)),
            )
        }),
        now,
    )
}

/// [`compute_range`] over already-normalised `(start, end)` spans.
pub(crate) fn range_from_spans(
    spans: impl IntoIterator<Item = (Anchor, Option<Anchor>)>,
    now: Anchor,
) -> TimelineRange {
    let mut earliest: Option<Anchor> = None;
    let mut latest: Option<Anchor> = None;
    for (start, end) in spans {
        let oldest = end.map_or(start, |end| end.min(start));
        earliest = Some(earliest.map_or(oldest, |current| current.min(oldest)));
        let newest = end.unwrap_or(now).max(start);
        latest = Some(latest.map_or(newest, |current| current.max(newest)));
    }

    match (earliest, latest) {
        (Some(earliest), Some(latest)) => TimelineRange {
            start: earliest.add_months(-1),
            end: latest.add_months(1),
        },
        _ => TimelineRange {
            start: now,
            end: now,
        },
    }
}

/// Pixel offset of `anchor` measured down from the newest edge of `range`.
///
/// `range.end` maps to `0`; older anchors map to larger offsets.
pub fn px_from_end(anchor: Anchor, range: &TimelineRange, px_per_month: f32) -> f32 {
    months_between(anchor, range.end) as f32 * px_per_month
}

/// Axis ticks every `interval_months`, oldest first.
///
/// A zero-duration range yields no ticks.
pub fn axis_ticks(range: &TimelineRange, px_per_month: f32, interval_months: u32) -> Vec<AxisTick> {
    let span = range.months();
    if span <= 0 {
        return Vec::new();
    }
    let step = interval_months.max(1) as i64;
    let mut ticks = Vec::with_capacity((span / step + 1) as usize);
    let mut offset = 0_i64;
    while offset <= span {
        let anchor = range.start.add_months(offset);
        ticks.push(AxisTick {
            text: anchor.label(),
            top_px: px_from_end(anchor, range, px_per_month),
            anchor,
        });
        offset += step;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{RecordKind, TimelineRecord};
    use proptest::prelude::*;

    fn anchor(year: i32, month: u32) -> Anchor {
        Anchor::new(year, month).unwrap()
    }

    const NOW: Anchor = Anchor {
        year: 2026,
        month: 10,
    };

    #[test]
    fn empty_records_collapse_to_now() {
        let range = compute_range(&[], NOW);
        assert_eq!(range.start, NOW);
        assert_eq!(range.end, NOW);
        assert_eq!(range.months(), 0);
        assert!(axis_ticks(&range, 40.0, 3).is_empty());
    }

    #[test]
    fn bounded_range_adds_a_month_each_side() {
        let records = vec![
            TimelineRecord::new("P1", "Site", RecordKind::Project, "2023-01").ending("2023-06"),
            TimelineRecord::new("E1", "BSc", RecordKind::Education, "2022-09").ending("2026-02"),
        ];
        let range = compute_range(&records, NOW);
        assert_eq!(range.start, anchor(2022, 8));
        assert_eq!(range.end, anchor(2026, 3));
    }

    #[test]
    fn ongoing_record_extends_range_to_now() {
        let records = vec![TimelineRecord::new("P1", "Site", RecordKind::Project, "2024-01")];
        let range = compute_range(&records, NOW);
        assert_eq!(range.start, anchor(2023, 12));
        assert_eq!(range.end, NOW.add_months(1));
    }

    #[test]
    fn inverted_record_never_yields_negative_span() {
        let records = vec![
            TimelineRecord::new("X", "Backwards", RecordKind::Experience, "2025-01").ending("2024-01"),
        ];
        let range = compute_range(&records, NOW);
        assert!(range.months() > 0);
        assert_eq!(range.start, anchor(2023, 12));
        assert_eq!(range.end, anchor(2025, 2));
    }

    #[test]
    fn scale_maps_newest_edge_to_zero() {
        let range = TimelineRange {
            start: anchor(2022, 8),
            end: anchor(2026, 3),
        };
        assert_eq!(px_from_end(range.end, &range, 40.0), 0.0);
        assert_eq!(px_from_end(range.start, &range, 40.0), 43.0 * 40.0);
        assert_eq!(px_from_end(anchor(2023, 6), &range, 40.0), 33.0 * 40.0);
    }

    #[test]
    fn ticks_step_from_start_in_fixed_intervals() {
        let range = TimelineRange {
            start: anchor(2023, 1),
            end: anchor(2024, 1),
        };
        let ticks = axis_ticks(&range, 10.0, 3);
        let anchors: Vec<Anchor> = ticks.iter().map(|tick| tick.anchor).collect();
        assert_eq!(
            anchors,
            vec![
                anchor(2023, 1),
                anchor(2023, 4),
                anchor(2023, 7),
                anchor(2023, 10),
                anchor(2024, 1)
            ]
        );
        assert_eq!(ticks[0].top_px, 120.0);
        assert_eq!(ticks[4].top_px, 0.0);
        assert_eq!(ticks[0].text, "Jan 2023");
    }

    proptest! {
        #[test]
        fn prop_scale_is_monotonic(
            a in 0i64..600,
            b in 0i64..600,
            px_per_month in 1.0f32..80.0,
        ) {
            let range = TimelineRange { start: anchor(2000, 1), end: anchor(2050, 1) };
            let newer = range.start.add_months(a.max(b));
            let older = range.start.add_months(a.min(b));
            prop_assert!(px_from_end(newer, &range, px_per_month) <= px_from_end(older, &range, px_per_month));
        }
    }
}
