use crate::layout::{AxisTick, BarRect, LabelPlacement, Layout, PlacementStats};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// The rendering output contract as plain data, for non-SVG backends.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub range_start: String,
    pub range_end: String,
    pub px_per_month: f32,
    pub height: f32,
    pub bars: Vec<BarRect>,
    pub labels: Vec<LabelPlacement>,
    /// Newest first.
    pub ticks: Vec<AxisTick>,
    pub placement: PlacementStats,
    pub overlapping_labels: Vec<[String; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        LayoutDump {
            range_start: layout.range.start.to_string(),
            range_end: layout.range.end.to_string(),
            px_per_month: layout.px_per_month,
            height: layout.height,
            bars: layout.bars(),
            labels: layout.labels(),
            ticks: layout.ticks_for_display().cloned().collect(),
            placement: layout.placement,
            overlapping_labels: layout
                .overlapping_labels()
                .into_iter()
                .map(|(a, b)| [a.to_string(), b.to_string()])
                .collect(),
        }
    }
}

pub fn layout_to_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
