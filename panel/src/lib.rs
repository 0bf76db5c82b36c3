//! Terminal control panel for the comics indexing service.
//!
//! The panel is a thin consumer of `comics_core::ComicsApi`: `panel` maps
//! operator actions to API calls and `view` renders the resolved results.

pub mod panel;
pub mod view;

pub use panel::Panel;
