use crate::ir::RecordKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub education_color: String,
    pub experience_color: String,
    pub project_color: String,
    /// Opacity applied to bars that are not highlighted.
    pub dimmed_opacity: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            axis_color: "#C7D2E5".to_string(),
            grid_color: "#EEF2F8".to_string(),
            education_color: "#6366F1".to_string(),
            experience_color: "#0EA5E9".to_string(),
            project_color: "#10B981".to_string(),
            dimmed_opacity: 0.35,
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#0F172A".to_string(),
            text_color: "#E2E8F0".to_string(),
            muted_text_color: "#94A3B8".to_string(),
            axis_color: "#334155".to_string(),
            grid_color: "#1E293B".to_string(),
            education_color: "#818CF8".to_string(),
            experience_color: "#38BDF8".to_string(),
            project_color: "#34D399".to_string(),
            dimmed_opacity: 0.3,
        }
    }

    pub fn kind_color(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Education => &self.education_color,
            RecordKind::Experience => &self.experience_color,
            RecordKind::Project => &self.project_color,
        }
    }
}
