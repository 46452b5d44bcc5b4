pub mod label_placement;
pub mod normalize;
pub mod scale;
pub(crate) mod types;

pub use label_placement::{LabelResolution, PlacementStats, resolve_label_offsets};
pub use normalize::{Anchor, months_between, normalize, normalize_now};
pub use scale::{axis_ticks, compute_range, px_from_end};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{RecordKind, TimelineRecord};

/// Project bar width from its status hint; other kinds are always full width.
pub fn width_class(kind: RecordKind, status_hint: Option<&str>) -> WidthClass {
    match (kind, status_hint) {
        (RecordKind::Project, Some("in_progress")) => WidthClass::Thin,
        (RecordKind::Project, Some("maintenance")) => WidthClass::Medium,
        _ => WidthClass::Full,
    }
}

/// Full layout pass: normalise, scale, place bars and resolve labels.
///
/// Stateless; every call recomputes from the records. `now` anchors ongoing
/// records and stands in for unparseable dates.
pub fn compute_layout(records: &[TimelineRecord], config: &LayoutConfig, now: Anchor) -> Layout {
    let px_per_month = config.px_per_month;

    let ordered: Vec<&TimelineRecord> = RecordKind::PROCESSING_ORDER
        .iter()
        .flat_map(|kind| records.iter().filter(move |record| record.kind == *kind))
        .collect();

    let spans: Vec<(Anchor, Option<Anchor>)> = ordered
        .iter()
        .map(|record| {
            (
                normalize(Some(&record.start_date), now),
                record.end_date.as_ref().map(|end| normalize(Some(end), now)),
            )
        })
        .collect();

    let range = scale::range_from_spans(spans.iter().copied(), now);
    if ordered.is_empty() {
        return Layout {
            range,
            px_per_month,
            height: 0.0,
            items: Vec::new(),
            ticks: Vec::new(),
            placement: PlacementStats::default(),
            label_threshold: config.label_collision_threshold,
        };
    }

    let mut items: Vec<LaidOutItem> = ordered
        .iter()
        .zip(&spans)
        .map(|(record, &(start, end))| place_bar(record, start, end, &range, config))
        .collect();

    let centers: Vec<f32> = items.iter().map(|item| item.label_center_px).collect();
    let resolution = resolve_label_offsets(
        &centers,
        config.label_collision_threshold,
        config.label_nudge,
    );
    for (item, offset) in items.iter_mut().zip(&resolution.offsets) {
        item.label_offset_px = *offset;
    }

    let height = range.months() as f32 * px_per_month;
    let ticks = axis_ticks(&range, px_per_month, config.tick_interval_months);
    tracing::debug!(
        items = items.len(),
        start = %range.start,
        end = %range.end,
        height,
        nudged = resolution.stats.nudged,
        "timeline layout computed"
    );

    Layout {
        range,
        px_per_month,
        height,
        items,
        ticks,
        placement: resolution.stats,
        label_threshold: config.label_collision_threshold,
    }
}

/// [`compute_layout`] against the wall clock.
pub fn compute_layout_now(records: &[TimelineRecord], config: &LayoutConfig) -> Layout {
    compute_layout(records, config, Anchor::now())
}

fn place_bar(
    record: &TimelineRecord,
    start: Anchor,
    end: Option<Anchor>,
    range: &TimelineRange,
    config: &LayoutConfig,
) -> LaidOutItem {
    let start_px = px_from_end(start, range, config.px_per_month);
    let (top_px, height_px, label_center_px, shape) = match end {
        Some(end) => {
            let end_px = px_from_end(end, range, config.px_per_month);
            let top = start_px.min(end_px);
            let height = (end_px - start_px).abs().max(config.min_bar_height);
            (top, height, top + height / 2.0, BarShape::Bar)
        }
        None => {
            let height = start_px.max(config.min_bar_height);
            (0.0, height, height / 2.0, BarShape::Connector)
        }
    };

    LaidOutItem {
        record: record.clone(),
        start,
        end,
        top_px,
        height_px,
        label_center_px,
        label_offset_px: 0.0,
        shape,
        width_class: width_class(record.kind, record.status_hint.as_deref()),
        lane_percent: config.lanes.percent(record.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::DateLike;

    const NOW: Anchor = Anchor {
        year: 2026,
        month: 10,
    };

    fn anchor(year: i32, month: u32) -> Anchor {
        Anchor::new(year, month).unwrap()
    }

    fn scenario() -> Vec<TimelineRecord> {
        vec![
            TimelineRecord::new("P1", "Portfolio site", RecordKind::Project, "2023-01")
                .ending("2023-06"),
            TimelineRecord::new("E1", "BSc Computing", RecordKind::Education, "2022-09")
                .ending("2026-02"),
        ]
    }

    #[test]
    fn bounded_scenario_geometry() {
        let layout = compute_layout(&scenario(), &LayoutConfig::default(), NOW);
        assert_eq!(layout.range.start, anchor(2022, 8));
        assert_eq!(layout.range.end, anchor(2026, 3));
        assert_eq!(layout.height, 43.0 * 40.0);

        let p1 = layout.item("P1").unwrap();
        assert_eq!(p1.top_px, 33.0 * 40.0);
        assert_eq!(p1.height_px, 200.0);
        assert_eq!(p1.shape, BarShape::Bar);
        assert_eq!(p1.label_center_px, 33.0 * 40.0 + 100.0);
    }

    #[test]
    fn education_is_processed_before_projects() {
        let layout = compute_layout(&scenario(), &LayoutConfig::default(), NOW);
        let ids: Vec<&str> = layout.items.iter().map(LaidOutItem::id).collect();
        assert_eq!(ids, vec!["E1", "P1"]);
    }

    #[test]
    fn ongoing_record_hangs_from_now_edge() {
        let records = vec![TimelineRecord::new("P1", "Site", RecordKind::Project, "2024-01")];
        let layout = compute_layout(&records, &LayoutConfig::default(), NOW);
        assert_eq!(layout.range.end, NOW.add_months(1));
        let item = &layout.items[0];
        assert_eq!(item.top_px, 0.0);
        assert_eq!(item.shape, BarShape::Connector);
        let months = months_between(anchor(2024, 1), layout.range.end) as f32;
        assert_eq!(item.height_px, months * 40.0);
        assert_eq!(item.label_center_px, item.height_px / 2.0);
    }

    #[test]
    fn same_month_bar_is_clamped_to_minimum() {
        for px_per_month in [1.0, 40.0, 300.0] {
            let config = LayoutConfig {
                px_per_month,
                ..LayoutConfig::default()
            };
            let records = vec![
                TimelineRecord::new("X", "Hackathon", RecordKind::Project, "2024-05-02")
                    .ending("2024-05-28"),
            ];
            let layout = compute_layout(&records, &config, NOW);
            assert_eq!(layout.items[0].height_px, 20.0, "px_per_month={px_per_month}");
        }
    }

    #[test]
    fn inverted_interval_is_clamped_not_negative() {
        let config = LayoutConfig {
            px_per_month: 2.0,
            ..LayoutConfig::default()
        };
        let records = vec![
            TimelineRecord::new("X", "Backwards", RecordKind::Experience, "2024-06")
                .ending("2024-01"),
        ];
        let layout = compute_layout(&records, &config, NOW);
        let item = &layout.items[0];
        assert!(item.height_px > 0.0);
        assert_eq!(item.height_px, 20.0);
        assert_eq!(item.top_px, px_from_end(anchor(2024, 6), &layout.range, 2.0));
    }

    #[test]
    fn empty_input_is_a_zero_height_layout() {
        let layout = compute_layout(&[], &LayoutConfig::default(), NOW);
        assert!(layout.is_empty());
        assert_eq!(layout.height, 0.0);
        assert!(layout.ticks.is_empty());
        assert_eq!(layout.range.start, NOW);
        assert_eq!(layout.range.end, NOW);
    }

    #[test]
    fn malformed_dates_do_not_blank_the_timeline() {
        let records = vec![
            TimelineRecord::new("A", "Bad", RecordKind::Project, DateLike::text("soon")),
            TimelineRecord::new("B", "Good", RecordKind::Experience, "2025-01").ending("2025-06"),
        ];
        let layout = compute_layout(&records, &LayoutConfig::default(), NOW);
        assert_eq!(layout.items.len(), 2);
        assert_eq!(layout.item("A").unwrap().start, NOW);
    }

    #[test]
    fn out_of_calendar_years_keep_the_range_bounded() {
        let records = vec![
            TimelineRecord::new("T", "Timestamp", RecordKind::Project, "2024-01")
                .ending(DateLike::Parts(vec![1_700_000_000, 1, 1])),
            TimelineRecord::new("M", "Max", RecordKind::Experience, "2023-01")
                .ending(DateLike::Parts(vec![i32::MAX as i64, 12, 1])),
        ];
        let layout = compute_layout(&records, &LayoutConfig::default(), NOW);
        assert_eq!(layout.item("T").unwrap().end, Some(NOW));
        assert_eq!(layout.item("M").unwrap().end, Some(NOW));
        assert_eq!(layout.range.start, anchor(2022, 12));
        assert_eq!(layout.range.end, NOW.add_months(1));
        assert!(layout.height > 0.0);
        assert!(layout.ticks.len() < 32);
    }

    #[test]
    fn width_policy_does_not_move_bars() {
        assert_eq!(width_class(RecordKind::Project, Some("in_progress")), WidthClass::Thin);
        assert_eq!(width_class(RecordKind::Project, Some("maintenance")), WidthClass::Medium);
        assert_eq!(width_class(RecordKind::Project, Some("completed")), WidthClass::Full);
        assert_eq!(width_class(RecordKind::Project, None), WidthClass::Full);
        assert_eq!(width_class(RecordKind::Education, Some("in_progress")), WidthClass::Full);

        let base = TimelineRecord::new("P", "Tool", RecordKind::Project, "2023-02").ending("2024-02");
        let thin = compute_layout(
            &[base.clone().with_status("in_progress")],
            &LayoutConfig::default(),
            NOW,
        );
        let full = compute_layout(&[base], &LayoutConfig::default(), NOW);
        assert_eq!(thin.items[0].width_class, WidthClass::Thin);
        assert_eq!(thin.items[0].top_px, full.items[0].top_px);
        assert_eq!(thin.items[0].height_px, full.items[0].height_px);
    }

    #[test]
    fn lanes_are_a_function_of_kind() {
        let records = vec![
            TimelineRecord::new("P1", "A", RecordKind::Project, "2020-01").ending("2020-02"),
            TimelineRecord::new("X1", "B", RecordKind::Experience, "2021-01").ending("2022-02"),
            TimelineRecord::new("P2", "C", RecordKind::Project, "2023-01").ending("2025-02"),
        ];
        let layout = compute_layout(&records, &LayoutConfig::default(), NOW);
        assert_eq!(layout.item("P1").unwrap().lane_percent, 60.0);
        assert_eq!(layout.item("P2").unwrap().lane_percent, 60.0);
        assert_eq!(layout.item("X1").unwrap().lane_percent, 40.0);
    }

    #[test]
    fn colliding_labels_are_separated() {
        let records = vec![
            TimelineRecord::new("E1", "School", RecordKind::Education, "2020-01").ending("2020-06"),
            TimelineRecord::new("P1", "App", RecordKind::Project, "2020-02").ending("2020-05"),
        ];
        let layout = compute_layout(&records, &LayoutConfig::default(), NOW);
        let e1 = layout.item("E1").unwrap();
        let p1 = layout.item("P1").unwrap();
        assert!((e1.label_center_px - p1.label_center_px).abs() < 30.0);
        assert_eq!(e1.label_offset_px, 0.0);
        let gap = e1.label_final_center_px() - p1.label_final_center_px();
        assert!(gap.abs() >= 30.0);
        assert!(layout.overlapping_labels().is_empty());
    }

    #[test]
    fn repeated_passes_are_identical() {
        let mut records = scenario();
        records.push(TimelineRecord::new("X1", "Job", RecordKind::Experience, "2023-02"));
        records.push(
            TimelineRecord::new("P2", "Lib", RecordKind::Project, [2023, 2, 10]).ending("2023-05"),
        );
        let first = compute_layout(&records, &LayoutConfig::default(), NOW);
        for _ in 0..5 {
            let again = compute_layout(&records, &LayoutConfig::default(), NOW);
            assert_eq!(first.bars(), again.bars());
            assert_eq!(first.labels(), again.labels());
        }
    }
}
