//! Embedded static web assets.
//!
//! Both files are compiled into the binary via `include_str!` so `serve` and
//! `build` need nothing beside the executable.

/// Stylesheet for the portfolio page.
pub const CSS: &str = include_str!("assets/folio.css");

/// Page script: section tracker, navigator, theme and menu toggles.
pub const JS: &str = include_str!("assets/folio.js");

/// Request path and body of each embedded asset, as linked from the page.
pub const ASSETS: [(&str, &str); 2] = [("assets/folio.css", CSS), ("assets/folio.js", JS)];
