//! Command implementations for hst-cli

pub mod overlay;
pub mod render;
pub mod resolve;
pub mod show;

pub use overlay::run_overlay;
pub use resolve::run_resolve;
pub use show::run_show;
