//! Domain model types (pure).

pub mod encoding;
pub mod error;
pub mod identity;
pub mod key_action;

pub use encoding::{detect_encoding, Detection, DetectionReason, LineFeed, TextEncoding};
pub use error::{
    AppError, EncodingError, IndexError, InputError, LineError, ProgressError, ViewportError,
};
pub use identity::FileIdentity;
pub use key_action::KeyAction;
