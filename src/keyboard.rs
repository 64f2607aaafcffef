use std::{ffi::OsString, io, path::PathBuf};

use crate::{
    DeviceName, Error, Result, WritePhase,
    device::{Control, DeviceFile, UinputFile},
    emitter::{send_key_event, send_sync},
    event::{Key, KeyState},
};

/// A virtual keyboard.
///
/// Events written through a [`Keyboard`] are indistinguishable from those of a physical keyboard
/// for other processes reading from the created input device.
///
/// Every method that changes key state writes a `SYN_REPORT` after its key events, so each call
/// is delivered to readers as one complete update.
///
/// Create one with [`create_keyboard`][crate::create_keyboard] or [`Keyboard::builder`], and
/// release it with [`Keyboard::close`]. Dropping a [`Keyboard`] without closing it still releases
/// the device file, which also makes the kernel remove the device, but close errors are lost.
#[derive(Debug)]
pub struct Keyboard<D: DeviceFile = UinputFile> {
    device: D,
    name: DeviceName,
}

impl<D: DeviceFile> Keyboard<D> {
    pub(crate) fn from_parts(device: D, name: DeviceName) -> Self {
        Self { device, name }
    }

    /// Presses `key` and immediately releases it.
    ///
    /// Writes the press, the release, and a single `SYN_REPORT`.
    ///
    /// If writing the release fails after the press went through, the error is returned as-is
    /// and the key stays pressed as far as the kernel is concerned. Call [`Keyboard::key_up`] to
    /// recover.
    pub fn key_press(&mut self, key: Key) -> Result<()> {
        check_range(key)?;
        self.send(key, KeyState::PRESSED, WritePhase::Down)?;
        self.send(key, KeyState::RELEASED, WritePhase::Up)?;
        self.sync(key)
    }

    /// Presses `key` and leaves it held down.
    ///
    /// The key stays pressed until [`Keyboard::key_up`] is called with the same key. Pressing
    /// a key that is already down is not rejected.
    pub fn key_down(&mut self, key: Key) -> Result<()> {
        check_range(key)?;
        self.send(key, KeyState::PRESSED, WritePhase::Down)?;
        self.sync(key)
    }

    /// Releases `key`.
    ///
    /// Releasing a key that was never pressed is not rejected; the kernel will typically drop the
    /// redundant event.
    pub fn key_up(&mut self, key: Key) -> Result<()> {
        check_range(key)?;
        self.send(key, KeyState::RELEASED, WritePhase::Up)?;
        self.sync(key)
    }

    /// Destroys the virtual device and closes the device file.
    ///
    /// The file is closed even if destroying the device fails. The first error is returned.
    pub fn close(self) -> Result<()> {
        let Self { mut device, name } = self;
        let destroyed = device.control(Control::Destroy);
        let closed = device.close();
        log::debug!("closed virtual keyboard {name}");
        destroyed.map_err(Error::Close)?;
        closed.map_err(Error::Close)
    }

    /// Returns the name the device was created with.
    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    /// Returns a reference to the underlying device file.
    pub fn device(&self) -> &D {
        &self.device
    }

    fn send(&mut self, key: Key, state: KeyState, phase: WritePhase) -> Result<()> {
        send_key_event(&mut self.device, key, state)
            .map_err(|source| Error::Write { key, phase, source })
    }

    fn sync(&mut self, key: Key) -> Result<()> {
        send_sync(&mut self.device).map_err(|source| Error::Write {
            key,
            phase: WritePhase::Sync,
            source,
        })
    }
}

impl Keyboard<UinputFile> {
    /// Retrieves the device's directory name in the sysfs hierarchy (eg. `input42`).
    pub fn sysname(&self) -> io::Result<OsString> {
        self.device.sysname()
    }

    /// Returns the full sysfs path of the device, `/sys/devices/virtual/input/` followed by
    /// [`Keyboard::sysname`].
    pub fn syspath(&self) -> io::Result<PathBuf> {
        Ok(PathBuf::from("/sys/devices/virtual/input").join(self.sysname()?))
    }
}

fn check_range(key: Key) -> Result<()> {
    if key.is_keyboard_key() {
        Ok(())
    } else {
        Err(Error::OutOfRangeKeyCode(key.raw().into()))
    }
}
