//! Floating window management core: geometry, stacking, gestures and
//! lifecycle for overlapping windows, plus a small crossterm/ratatui front
//! end that drives it from terminal mouse input.

pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod layout;
pub mod render;
pub mod tracing_sub;
pub mod window;

pub use config::{FrameZones, WindowOptions, WmConfig};
pub use error::{WmError, WmResult};
pub use window::{WindowId, WindowManager, WindowState};
