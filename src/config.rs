use crate::ir::RecordKind;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Horizontal lane of each record kind, as a percentage of panel width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneConfig {
    pub education: f32,
    pub experience: f32,
    pub project: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            education: 20.0,
            experience: 40.0,
            project: 60.0,
        }
    }
}

impl LaneConfig {
    pub fn percent(&self, kind: RecordKind) -> f32 {
        match kind {
            RecordKind::Education => self.education,
            RecordKind::Experience => self.experience,
            RecordKind::Project => self.project,
        }
    }
}

/// Pixel widths behind each [`WidthClass`](crate::layout::WidthClass).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarWidthTable {
    pub full: f32,
    pub medium: f32,
    pub thin: f32,
    /// Stroke width of an ongoing record's connector line.
    pub connector: f32,
}

impl Default for BarWidthTable {
    fn default() -> Self {
        Self {
            full: 12.0,
            medium: 8.0,
            thin: 4.0,
            connector: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub long_hover_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { long_hover_ms: 500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub px_per_month: f32,
    pub min_bar_height: f32,
    pub label_collision_threshold: f32,
    pub label_nudge: f32,
    pub tick_interval_months: u32,
    pub lanes: LaneConfig,
    pub bar_widths: BarWidthTable,
    pub interaction: InteractionConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            px_per_month: 40.0,
            min_bar_height: 20.0,
            label_collision_threshold: 30.0,
            label_nudge: 25.0,
            tick_interval_months: 3,
            lanes: LaneConfig::default(),
            bar_widths: BarWidthTable::default(),
            interaction: InteractionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Panel width in pixels; lanes are placed as a share of this.
    pub width: f32,
    pub padding: f32,
    /// Left gutter reserved for axis tick labels.
    pub axis_gutter: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 420.0,
            padding: 24.0,
            axis_gutter: 64.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::light(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    timeline: Option<TimelineOverrides>,
    render: Option<RenderOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    axis_color: Option<String>,
    education_color: Option<String>,
    experience_color: Option<String>,
    project_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineOverrides {
    px_per_month: Option<f32>,
    min_bar_height: Option<f32>,
    label_collision_threshold: Option<f32>,
    label_nudge: Option<f32>,
    tick_interval_months: Option<u32>,
    lanes: Option<LaneOverrides>,
    bar_widths: Option<BarWidthOverrides>,
    long_hover_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LaneOverrides {
    education: Option<f32>,
    experience: Option<f32>,
    project: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct BarWidthOverrides {
    full: Option<f32>,
    medium: Option<f32>,
    thin: Option<f32>,
    connector: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOverrides {
    width: Option<f32>,
    padding: Option<f32>,
    axis_gutter: Option<f32>,
}

/// Largest collision threshold accepted, in multiples of the label nudge.
const MAX_THRESHOLD_NUDGES: f32 = 100.0;

fn set_positive(target: &mut f32, value: Option<f32>) {
    if let Some(v) = value.filter(|v| v.is_finite() && *v > 0.0) {
        *target = v;
    }
}

fn set_string(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config {}", path.display()))
}

/// Parses a JSON (or JSON5) config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("config is neither JSON nor JSON5: {json_err}"))?,
    };
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "dark" => config.theme = Theme::dark(),
            "light" | "default" => config.theme = Theme::light(),
            other => tracing::warn!(theme = other, "unknown theme, keeping light"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        set_string(&mut theme.font_family, vars.font_family);
        set_positive(&mut theme.font_size, vars.font_size);
        set_string(&mut theme.background, vars.background);
        set_string(&mut theme.text_color, vars.text_color);
        set_string(&mut theme.muted_text_color, vars.muted_text_color);
        set_string(&mut theme.axis_color, vars.axis_color);
        set_string(&mut theme.education_color, vars.education_color);
        set_string(&mut theme.experience_color, vars.experience_color);
        set_string(&mut theme.project_color, vars.project_color);
    }

    if let Some(timeline) = parsed.timeline {
        let layout = &mut config.layout;
        set_positive(&mut layout.px_per_month, timeline.px_per_month);
        set_positive(&mut layout.min_bar_height, timeline.min_bar_height);
        set_positive(
            &mut layout.label_collision_threshold,
            timeline.label_collision_threshold,
        );
        set_positive(&mut layout.label_nudge, timeline.label_nudge);
        if let Some(v) = timeline.tick_interval_months.filter(|v| *v > 0) {
            layout.tick_interval_months = v;
        }
        if let Some(lanes) = timeline.lanes {
            set_positive(&mut layout.lanes.education, lanes.education);
            set_positive(&mut layout.lanes.experience, lanes.experience);
            set_positive(&mut layout.lanes.project, lanes.project);
        }
        if let Some(widths) = timeline.bar_widths {
            set_positive(&mut layout.bar_widths.full, widths.full);
            set_positive(&mut layout.bar_widths.medium, widths.medium);
            set_positive(&mut layout.bar_widths.thin, widths.thin);
            set_positive(&mut layout.bar_widths.connector, widths.connector);
        }
        if let Some(v) = timeline.long_hover_ms.filter(|v| *v > 0) {
            layout.interaction.long_hover_ms = v;
        }
        anyhow::ensure!(
            layout.label_collision_threshold <= layout.label_nudge * MAX_THRESHOLD_NUDGES,
            "labelCollisionThreshold {} exceeds {} nudges of {}px",
            layout.label_collision_threshold,
            MAX_THRESHOLD_NUDGES,
            layout.label_nudge
        );
    }

    if let Some(render) = parsed.render {
        set_positive(&mut config.render.width, render.width);
        set_positive(&mut config.render.padding, render.padding);
        set_positive(&mut config.render.axis_gutter, render.axis_gutter);
    }

    Ok(config)
}
