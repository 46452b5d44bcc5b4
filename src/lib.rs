#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{DateLike, RecordKind, TimelineRecord};
pub use layout::{Anchor, Layout, compute_layout, compute_layout_now};
pub use parser::{DocumentError, parse_records};
pub use render::{render_svg, render_svg_highlighted};
pub use theme::Theme;

/// Everything needed to turn a portfolio document into a rendered panel.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    /// Overrides the wall clock for ongoing records.
    pub now: Option<Anchor>,
    pub highlighted: Option<String>,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::from_config(Config::default())
    }

    pub fn dark() -> Self {
        let mut options = Self::light();
        options.theme = Theme::dark();
        options
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            now: None,
            highlighted: None,
        }
    }

    pub fn with_now(mut self, now: Anchor) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> Anchor {
        self.now.unwrap_or_else(Anchor::now)
    }
}

/// Lays out a portfolio document with `options`.
pub fn layout_document(input: &str, options: &RenderOptions) -> Result<Layout, DocumentError> {
    let records = parse_records(input)?;
    Ok(compute_layout(&records, &options.layout, options.now()))
}

/// Parses, lays out and renders a portfolio document to SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let layout = layout_document(input, &options)?;
    Ok(render_svg_highlighted(
        &layout,
        &options.theme,
        &options.layout,
        &options.render,
        options.highlighted.as_deref(),
    ))
}
