use crate::config::{LayoutConfig, RenderConfig};
use crate::interaction::bar_element_id;
use crate::layout::{BarShape, LaidOutItem, Layout, WidthClass};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const EMPTY_STATE_HEIGHT: f32 = 80.0;
const LABEL_GAP: f32 = 6.0;

pub fn render_svg(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    render_svg_highlighted(layout, theme, config, render, None)
}

/// Renders the panel, dimming every bar except `highlighted` when given.
pub fn render_svg_highlighted(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
    highlighted: Option<&str>,
) -> String {
    let width = render.width.max(1.0);
    if layout.is_empty() {
        return render_empty_state(width, theme);
    }
    let top = render.padding;
    let height = layout.height + render.padding * 2.0;

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    );

    svg.push_str("<g class=\"history-axis\">");
    let grid_end = width - render.padding;
    for tick in layout.ticks_for_display() {
        let y = top + tick.top_px;
        let _ = write!(
            svg,
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{grid_end:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            render.axis_gutter, theme.grid_color
        );
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{y:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            render.axis_gutter - LABEL_GAP,
            escape_xml(&theme.font_family),
            theme.font_size * 0.85,
            theme.muted_text_color,
            escape_xml(&tick.text)
        );
    }
    let _ = write!(
        svg,
        "<line x1=\"{gutter:.2}\" y1=\"{top:.2}\" x2=\"{gutter:.2}\" y2=\"{bottom:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.axis_color,
        gutter = render.axis_gutter,
        bottom = top + layout.height,
    );
    svg.push_str("</g>");

    svg.push_str("<g class=\"history-bars\">");
    for item in &layout.items {
        let opacity = match highlighted {
            Some(id) if id != item.id() => theme.dimmed_opacity,
            _ => 1.0,
        };
        bar_svg(&mut svg, item, theme, config, render, opacity);
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"history-labels\">");
    for item in &layout.items {
        label_svg(&mut svg, item, theme, config, render);
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn lane_x(item: &LaidOutItem, render: &RenderConfig) -> f32 {
    render.width * item.lane_percent / 100.0
}

fn bar_width(item: &LaidOutItem, config: &LayoutConfig) -> f32 {
    match (item.shape, item.width_class) {
        (BarShape::Connector, _) => config.bar_widths.connector,
        (BarShape::Bar, WidthClass::Full) => config.bar_widths.full,
        (BarShape::Bar, WidthClass::Medium) => config.bar_widths.medium,
        (BarShape::Bar, WidthClass::Thin) => config.bar_widths.thin,
    }
}

fn bar_svg(
    svg: &mut String,
    item: &LaidOutItem,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
    opacity: f32,
) {
    let x = lane_x(item, render);
    let y = render.padding + item.top_px;
    let w = bar_width(item, config);
    let color = theme.kind_color(item.kind());
    let element_id = escape_xml(&bar_element_id(item.id()));
    match item.shape {
        BarShape::Bar => {
            let _ = write!(
                svg,
                "<rect id=\"{element_id}\" data-kind=\"{}\" x=\"{:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"{color}\" fill-opacity=\"{opacity}\"/>",
                item.kind().as_str(),
                x - w / 2.0,
                item.height_px,
                w / 2.0,
                w / 2.0,
            );
        }
        BarShape::Connector => {
            let bottom = y + item.height_px;
            let _ = write!(
                svg,
                "<line id=\"{element_id}\" data-kind=\"{}\" x1=\"{x:.2}\" y1=\"{y:.2}\" x2=\"{x:.2}\" y2=\"{bottom:.2}\" stroke=\"{color}\" stroke-width=\"{w:.2}\" stroke-dasharray=\"4 3\" stroke-opacity=\"{opacity}\"/>",
                item.kind().as_str(),
            );
            let _ = write!(
                svg,
                "<circle cx=\"{x:.2}\" cy=\"{bottom:.2}\" r=\"{:.2}\" fill=\"{color}\" fill-opacity=\"{opacity}\"/>",
                w * 1.5 + 1.0
            );
        }
    }
}

fn label_svg(
    svg: &mut String,
    item: &LaidOutItem,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) {
    let bar_edge = lane_x(item, render) + bar_width(item, config) / 2.0;
    let text_x = bar_edge + LABEL_GAP;
    let text_y = render.padding + item.label_final_center_px();
    if item.label_offset_px != 0.0 {
        let _ = write!(
            svg,
            "<line x1=\"{bar_edge:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{text_y:.2}\" stroke=\"{}\" stroke-width=\"0.8\"/>",
            render.padding + item.label_center_px,
            text_x - 2.0,
            theme.axis_color
        );
    }
    let _ = write!(
        svg,
        "<text x=\"{text_x:.2}\" y=\"{text_y:.2}\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.text_color,
        escape_xml(&item.record.title)
    );
}

fn render_empty_state(width: f32, theme: &Theme) -> String {
    let height = EMPTY_STATE_HEIGHT;
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\"><rect width=\"100%\" height=\"100%\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">No entries</text></svg>",
        theme.background,
        width / 2.0,
        height / 2.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.muted_text_color
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.width) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
