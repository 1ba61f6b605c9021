#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod render;
pub mod text;
pub mod text_metrics;

#[cfg(feature = "cli")]
pub use cli::run;
pub use error::RenderError;
pub use render::SvgRenderer;
