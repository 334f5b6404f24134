//! Report composition for Supporting Information pages.
//!
//! Report markup arrives with a sentinel token (`{{ viewer3d }}` by default)
//! wherever the molecule's 3D viewer belongs. [`PlaceholderResolver`] rewrites
//! each report's token stream, replacing the sentinel with a mount point
//! `viewport{i}` plus a deferred registration call, and returns the
//! [`RegistrationIntent`]s alongside the markup. [`PageSession`] owns the
//! viewer registry and runs the intents once the document is ready.

pub mod html;
pub mod page;
pub mod resolver;
pub mod token;

pub use page::{CONTENT_REGION_ID, PageSession, compose_page};
pub use resolver::{
    DEFAULT_SENTINEL, PlaceholderResolver, RegistrationIntent, Resolution, ResolvedReport,
};
pub use token::{Token, tokenize};
