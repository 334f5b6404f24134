//! CLI library components for Supporting Information pages.

pub mod logging;
pub mod render;
pub mod settings;
pub mod uploads;
