//! Source files and the error panel shown when compilation fails

mod panel;
mod source;

pub use panel::{PANEL_SCOPE, render_panel, report};
pub use source::{SourceError, SourceFile};
