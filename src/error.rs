use thiserror::Error;

use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WmError {
    /// The rect still had a non-positive dimension after the minimum-size
    /// clamp.
    #[error("invalid window rect: {width}x{height}")]
    InvalidRect { width: i32, height: i32 },
    /// The id was never opened or has been closed.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
    /// Pointer move/up with no gesture in progress. Browsers and terminals
    /// emit these spuriously; callers normally ignore it.
    #[error("no gesture in progress")]
    InvalidGesture,
}

pub type WmResult<T> = Result<T, WmError>;
