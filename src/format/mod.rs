//! Rendering a loaded newsletter.
//!
//! The core exposes the loaded graph; formatters turn the time-windowed view
//! into presentable output. Only console output is implemented - the trait is
//! the seam where other renderers would slot in.

mod console;

pub use console::ConsoleFormatter;

use chrono::Duration;

use crate::newsletter::Newsletter;

/// Rendering options: the time window around now.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How far back past results are included.
    pub past: Duration,
    /// How far ahead upcoming matches are included.
    pub future: Duration,
}

/// Renders a generated newsletter.
pub trait Formatter {
    /// Produces the rendered output for `newsletter` over the given window.
    fn render(&self, newsletter: &Newsletter, options: &RenderOptions) -> String;
}
