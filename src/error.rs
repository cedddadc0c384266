//! Error kinds and their dispositions (see `SPEC_FULL.md` §7).

use thiserror::Error;

/// Unrecoverable setup-time failures. The process logs and exits nonzero.
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("could not open X display")]
    NoDisplay,
    #[error("another window manager is already running")]
    OtherWmRunning,
    #[error("no fonts could be loaded")]
    NoFonts,
    #[error("allocation failed: {0}")]
    Alloc(&'static str),
}

/// An X protocol error, carrying just enough to decide whether it is
/// benign (a window vanished asynchronously) or worth logging.
#[derive(Debug, Clone, Copy)]
pub struct XError {
    pub request_code: u8,
    pub error_code: u8,
}

// X11 error codes and major opcodes the whitelist below references.
// Values per the X11 protocol, mirrored from `x11::xlib` constants.
const BAD_WINDOW: u8 = 3;
const BAD_MATCH: u8 = 8;
const BAD_DRAWABLE: u8 = 9;
const BAD_ACCESS: u8 = 10;

const X_POLY_TEXT8: u8 = 74;
const X_POLY_FILL_RECTANGLE: u8 = 70;
const X_POLY_SEGMENT: u8 = 66;
const X_CONFIGURE_WINDOW: u8 = 12;
const X_GRAB_BUTTON: u8 = 28;
const X_GRAB_KEY: u8 = 33;
const X_COPY_AREA: u8 = 62;
const X_SET_INPUT_FOCUS: u8 = 42;

/// Whitelist of errors expected whenever a client window vanishes out from
/// under a still-in-flight request; logged at trace level instead of error.
pub fn is_benign_error(e: XError) -> bool {
    e.error_code == BAD_WINDOW
        || (e.request_code == X_SET_INPUT_FOCUS && e.error_code == BAD_MATCH)
        || (e.request_code == X_POLY_TEXT8 && e.error_code == BAD_DRAWABLE)
        || (e.request_code == X_POLY_FILL_RECTANGLE && e.error_code == BAD_DRAWABLE)
        || (e.request_code == X_POLY_SEGMENT && e.error_code == BAD_DRAWABLE)
        || (e.request_code == X_CONFIGURE_WINDOW && e.error_code == BAD_MATCH)
        || (e.request_code == X_GRAB_BUTTON && e.error_code == BAD_ACCESS)
        || (e.request_code == X_GRAB_KEY && e.error_code == BAD_ACCESS)
        || (e.request_code == X_COPY_AREA && e.error_code == BAD_DRAWABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_window_is_always_benign() {
        assert!(is_benign_error(XError {
            request_code: 0,
            error_code: BAD_WINDOW,
        }));
    }

    #[test]
    fn bad_match_on_unrelated_request_is_not_benign() {
        assert!(!is_benign_error(XError {
            request_code: 99,
            error_code: BAD_MATCH,
        }));
    }

    #[test]
    fn grab_key_bad_access_is_benign() {
        assert!(is_benign_error(XError {
            request_code: X_GRAB_KEY,
            error_code: BAD_ACCESS,
        }));
    }
}
