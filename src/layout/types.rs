use serde::Serialize;

use super::label_placement::PlacementStats;
use super::normalize::{Anchor, months_between};
use crate::ir::{RecordKind, TimelineRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl TimelineRange {
    pub fn months(&self) -> i64 {
        months_between(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarShape {
    /// Bounded record: a filled rectangle.
    Bar,
    /// Ongoing record: a thin line from the "now" edge to the start.
    Connector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthClass {
    Full,
    Medium,
    Thin,
}

#[derive(Debug, Clone)]
pub struct LaidOutItem {
    pub record: TimelineRecord,
    pub start: Anchor,
    pub end: Option<Anchor>,
    pub top_px: f32,
    pub height_px: f32,
    pub label_center_px: f32,
    pub label_offset_px: f32,
    pub shape: BarShape,
    pub width_class: WidthClass,
    pub lane_percent: f32,
}

impl LaidOutItem {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn kind(&self) -> RecordKind {
        self.record.kind
    }

    pub fn bottom_px(&self) -> f32 {
        self.top_px + self.height_px
    }

    /// Label centre after collision avoidance.
    pub fn label_final_center_px(&self) -> f32 {
        self.label_center_px + self.label_offset_px
    }

    pub fn bar(&self) -> BarRect {
        BarRect {
            id: self.record.id.clone(),
            kind: self.record.kind,
            top_px: self.top_px,
            height_px: self.height_px,
            left_lane_percent: self.lane_percent,
            width_class: self.width_class,
            shape: self.shape,
        }
    }

    pub fn label(&self) -> LabelPlacement {
        LabelPlacement {
            id: self.record.id.clone(),
            text: self.record.title.clone(),
            top_px: self.label_final_center_px(),
            left_lane_percent: self.lane_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarRect {
    pub id: String,
    pub kind: RecordKind,
    pub top_px: f32,
    pub height_px: f32,
    pub left_lane_percent: f32,
    pub width_class: WidthClass,
    pub shape: BarShape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub id: String,
    pub text: String,
    pub top_px: f32,
    pub left_lane_percent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub text: String,
    pub top_px: f32,
    #[serde(skip)]
    pub anchor: Anchor,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub range: TimelineRange,
    pub px_per_month: f32,
    /// Height of the timeline body; zero for an empty record set.
    pub height: f32,
    /// Education, then experience, then projects; input order within a kind.
    pub items: Vec<LaidOutItem>,
    /// Oldest first.
    pub ticks: Vec<AxisTick>,
    pub placement: PlacementStats,
    pub label_threshold: f32,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&LaidOutItem> {
        self.items.iter().find(|item| item.record.id == id)
    }

    pub fn bars(&self) -> Vec<BarRect> {
        self.items.iter().map(LaidOutItem::bar).collect()
    }

    pub fn labels(&self) -> Vec<LabelPlacement> {
        self.items.iter().map(LaidOutItem::label).collect()
    }

    /// Newest first, the order the axis is read top to bottom.
    pub fn ticks_for_display(&self) -> impl Iterator<Item = &AxisTick> {
        self.ticks.iter().rev()
    }

    /// Id pairs whose final labels remain closer than the collision threshold.
    pub fn overlapping_labels(&self) -> Vec<(&str, &str)> {
        let centers: Vec<f32> = self.items.iter().map(|item| item.label_center_px).collect();
        let offsets: Vec<f32> = self.items.iter().map(|item| item.label_offset_px).collect();
        super::label_placement::overlapping_pairs(&centers, &offsets, self.label_threshold)
            .into_iter()
            .map(|(a, b)| (self.items[a].id(), self.items[b].id()))
            .collect()
    }
}
