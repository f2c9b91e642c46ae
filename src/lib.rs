//! Media focus view with a freehand masking ("surgery") tool.
//!
//! [`store::AppStore`] holds the orbit/focus view state, [`overlay::FocusOverlay`]
//! renders the focused node, and [`masking::MaskingSession`] turns pointer drags
//! into a raster mask that [`repair`] packages for the repair service.

pub mod app;
pub mod brush;
pub mod config;
pub mod error;
pub mod logging;
pub mod masking;
pub mod notice;
pub mod orbit;
pub mod overlay;
pub mod repair;
pub mod store;
pub mod surface;
pub mod toggle;
