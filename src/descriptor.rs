use std::{ffi::c_char, fmt};

use crate::{
    Error, InputId, Result,
    raw::uinput::{UINPUT_MAX_NAME_SIZE, uinput_setup},
};

/// A device name in the fixed-size buffer the kernel expects.
///
/// The name is stored NUL-padded. It has to be non-empty, must not contain NUL bytes, and may be
/// at most 79 bytes long so that the terminating NUL fits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceName {
    buf: [u8; UINPUT_MAX_NAME_SIZE],
    len: usize,
}

impl DeviceName {
    /// Longest accepted name, in bytes.
    pub const MAX_LEN: usize = UINPUT_MAX_NAME_SIZE - 1;

    pub fn new(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() {
            return Err(Error::InvalidName {
                reason: "name is empty",
            });
        }
        if bytes.len() > Self::MAX_LEN {
            return Err(Error::InvalidName {
                reason: "name is longer than 79 bytes",
            });
        }
        if bytes.contains(&0) {
            return Err(Error::InvalidName {
                reason: "name contains a NUL byte",
            });
        }

        let mut buf = [0; UINPUT_MAX_NAME_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            buf,
            len: bytes.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        // Only ever constructed from a `&str`, and truncation never happens.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Returns the full padded buffer, including the trailing NULs.
    pub fn as_padded_bytes(&self) -> &[u8; UINPUT_MAX_NAME_SIZE] {
        &self.buf
    }
}

impl fmt::Debug for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and name of a virtual keyboard, submitted to the kernel once when the device is
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    id: InputId,
    name: DeviceName,
}

impl DeviceDescriptor {
    pub fn new(id: InputId, name: DeviceName) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub(crate) fn to_setup(&self) -> uinput_setup {
        let mut name = [0 as c_char; UINPUT_MAX_NAME_SIZE];
        for (dest, src) in name.iter_mut().zip(self.name.buf) {
            *dest = src as c_char;
        }
        uinput_setup {
            id: self.id.0,
            name,
            ff_effects_max: 0,
        }
    }
}
