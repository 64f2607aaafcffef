use std::{error, fmt, io, path::PathBuf};

use crate::event::{EventType, Key};

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which write of a key operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// The key press event.
    Down,
    /// The key release event.
    Up,
    /// The `SYN_REPORT` that ends the operation.
    Sync,
}

impl fmt::Display for WritePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WritePhase::Down => "key down",
            WritePhase::Up => "key up",
            WritePhase::Sync => "sync",
        })
    }
}

/// Errors returned when creating or driving a virtual keyboard.
///
/// Every variant identifies the step that failed. Variants caused by the operating system carry
/// the underlying [`io::Error`], available through [`Error::source`][error::Error::source].
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The device path is empty or does not exist.
    InvalidPath { path: PathBuf, reason: &'static str },
    /// The device name is empty, too long, or contains a NUL byte.
    InvalidName { reason: &'static str },
    /// Opening the `uinput` device file failed.
    Open { path: PathBuf, source: io::Error },
    /// A key code outside of `KEY_MIN..=KEY_MAX` was passed in. No events were written.
    OutOfRangeKeyCode(i32),
    /// Enabling an event type on the device failed.
    EventTypeRegistration {
        event_type: EventType,
        source: io::Error,
    },
    /// Enabling a key code on the device failed. No later key codes were registered.
    KeyRegistration { key: Key, source: io::Error },
    /// Submitting the device descriptor or creating the device failed.
    DeviceCreation(io::Error),
    /// Writing an event to the device failed.
    Write {
        key: Key,
        phase: WritePhase,
        source: io::Error,
    },
    /// Destroying the device or closing the device file failed.
    Close(io::Error),
}

impl Error {
    /// Returns the [`io::ErrorKind`] of the underlying OS error, or
    /// [`io::ErrorKind::InvalidInput`] for argument validation errors.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::InvalidPath { .. } | Error::InvalidName { .. } | Error::OutOfRangeKeyCode(_) => {
                io::ErrorKind::InvalidInput
            }
            Error::Open { source, .. }
            | Error::EventTypeRegistration { source, .. }
            | Error::KeyRegistration { source, .. }
            | Error::Write { source, .. } => source.kind(),
            Error::DeviceCreation(source) | Error::Close(source) => source.kind(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPath { path, reason } => {
                write!(f, "invalid device path '{}': {reason}", path.display())
            }
            Error::InvalidName { reason } => write!(f, "invalid device name: {reason}"),
            Error::Open { path, .. } => write!(f, "failed to open '{}'", path.display()),
            Error::OutOfRangeKeyCode(code) => write!(
                f,
                "key code {code} is not in range {}..={}",
                Key::KEY_MIN.raw(),
                Key::KEY_MAX.raw()
            ),
            Error::EventTypeRegistration { event_type, .. } => {
                write!(f, "failed to enable event type {event_type:?}")
            }
            Error::KeyRegistration { key, .. } => {
                write!(f, "failed to register key number {}", key.raw())
            }
            Error::DeviceCreation(_) => f.write_str("failed to create virtual keyboard device"),
            Error::Write { key, phase, .. } => {
                write!(f, "failed to write {phase} event for {key:?}")
            }
            Error::Close(_) => f.write_str("failed to close virtual keyboard device"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Open { source, .. }
            | Error::EventTypeRegistration { source, .. }
            | Error::KeyRegistration { source, .. }
            | Error::Write { source, .. } => Some(source),
            Error::DeviceCreation(source) | Error::Close(source) => Some(source),
            Error::InvalidPath { .. } | Error::InvalidName { .. } | Error::OutOfRangeKeyCode(_) => {
                None
            }
        }
    }
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        io::Error::new(value.kind(), value)
    }
}
