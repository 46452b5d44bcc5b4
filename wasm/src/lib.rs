use history_timeline::layout_dump::layout_to_json;
use history_timeline::{Anchor, RenderOptions, layout_document, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    px_per_month: Option<f32>,
    width: Option<f32>,
    now: Option<String>,
    highlighted: Option<String>,
}

fn build_render_options(options: TimelineRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("dark") {
        RenderOptions::dark()
    } else {
        RenderOptions::light()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size.filter(|size| *size > 0.0) {
        render_options.theme.font_size = font_size;
    }
    if let Some(px) = options.px_per_month.filter(|px| *px > 0.0) {
        render_options.layout.px_per_month = px;
    }
    if let Some(width) = options.width.filter(|width| *width > 0.0) {
        render_options.render.width = width;
    }
    if let Some(now) = options.now {
        render_options.now = Some(now.parse::<Anchor>()?);
    }
    render_options.highlighted = options.highlighted;

    Ok(render_options)
}

fn parse_options(options_json: Option<String>) -> Result<RenderOptions, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TimelineRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TimelineRenderOptions::default()
    };
    build_render_options(options).map_err(|error| JsValue::from_str(&error))
}

/// Renders a portfolio document (JSON) to an SVG string.
#[wasm_bindgen]
pub fn render_timeline_svg(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    render_with_options(document, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Returns the laid-out bars, labels and ticks as JSON for a DOM renderer.
#[wasm_bindgen]
pub fn layout_timeline_json(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = parse_options(options_json)?;
    let layout = layout_document(document, &render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    layout_to_json(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}
