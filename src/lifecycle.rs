//! Creation of virtual keyboards.

use std::path::{Path, PathBuf};

use crate::{
    DeviceDescriptor, DeviceName, Error, InputId, Keyboard, Result,
    device::{DeviceFile, UinputFile},
    event::EventType,
    registrar::{begin_registration, finalize_creation, register_all_keys},
};

/// Creates a virtual keyboard named `name` using the `uinput` device file at `path`.
///
/// This is a shorthand for `Keyboard::builder().with_path(path).build(name)`.
pub fn create_keyboard(path: impl AsRef<Path>, name: &str) -> Result<Keyboard> {
    Keyboard::builder().with_path(path).build(name)
}

/// A builder for creating a [`Keyboard`].
///
/// Returned by [`Keyboard::builder`].
#[derive(Debug, Clone)]
pub struct Builder {
    path: PathBuf,
    id: InputId,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            path: PathBuf::from(UinputFile::DEFAULT_PATH),
            id: InputId::default(),
        }
    }
}

impl Builder {
    /// Sets the path of the `uinput` device file.
    ///
    /// Defaults to `/dev/uinput`.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Configures the device's hardware IDs.
    ///
    /// Defaults to [`InputId::DEFAULT_KEYBOARD`].
    pub fn with_device_id(mut self, id: InputId) -> Self {
        self.id = id;
        self
    }

    /// Creates the keyboard.
    ///
    /// After this method returns successfully, the device shows up in `/dev/input`. Note that
    /// `udev` may take a moment to apply the final permissions to the new device node.
    ///
    /// # Parameters
    ///
    /// - `name`: The name of the device. Must be non-empty and at most 79 bytes long, and must
    ///   not contain NUL bytes.
    pub fn build(self, name: &str) -> Result<Keyboard> {
        let descriptor = DeviceDescriptor::new(self.id, DeviceName::new(name)?);
        validate_path(&self.path)?;

        let file = UinputFile::open(&self.path).map_err(|source| Error::Open {
            path: self.path.clone(),
            source,
        })?;
        Keyboard::create_on(file, descriptor)
    }
}

fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is empty",
        });
    }
    if !path.exists() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "file does not exist",
        });
    }
    Ok(())
}

impl Keyboard {
    /// Returns a [`Builder`] for configuring a new keyboard.
    pub fn builder() -> Builder {
        Builder::default()
    }
}

impl<D: DeviceFile> Keyboard<D> {
    /// Registers the keyboard's capabilities on an open `device` and creates the device.
    ///
    /// Enables [`EventType::KEY`], registers every key code from [`Key::KEY_MIN`] to
    /// [`Key::KEY_MAX`], then submits `descriptor`. If any step fails, `device` is closed before
    /// the error is returned.
    ///
    /// [`Key::KEY_MIN`]: crate::event::Key::KEY_MIN
    /// [`Key::KEY_MAX`]: crate::event::Key::KEY_MAX
    pub fn create_on(mut device: D, descriptor: DeviceDescriptor) -> Result<Self> {
        let res = begin_registration(&mut device, EventType::KEY)
            .and_then(|()| register_all_keys(&mut device))
            .and_then(|()| finalize_creation(&mut device, &descriptor));

        match res {
            Ok(()) => Ok(Keyboard::from_parts(device, *descriptor.name())),
            Err(e) => {
                log::debug!("creating virtual keyboard failed: {e}");
                if let Err(close_err) = device.close() {
                    log::warn!("failed to close device file after error: {close_err}");
                }
                Err(e)
            }
        }
    }
}
