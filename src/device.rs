//! Access to the `uinput` device file.
//!
//! [`DeviceFile`] is the seam between the keyboard logic and the operating system: everything a
//! [`Keyboard`][crate::Keyboard] does ends up as a [`DeviceFile::write`] of encoded events or a
//! [`DeviceFile::control`] call. [`UinputFile`] implements it on top of the real device file.

use std::{
    error::Error,
    ffi::{OsString, c_char, c_int},
    fmt,
    fs::File,
    io::{self, Write as _},
    os::{
        fd::{AsFd, AsRawFd, BorrowedFd, IntoRawFd, RawFd},
        unix::ffi::OsStringExt,
    },
    path::Path,
};

use uoctl::Ioctl;

use crate::{
    DeviceDescriptor,
    event::{EventType, Key},
    raw::uinput::{
        UI_DEV_CREATE, UI_DEV_DESTROY, UI_DEV_SETUP, UI_GET_SYSNAME, UI_GET_VERSION,
        UI_SET_EVBIT, UI_SET_KEYBIT,
    },
};

/// A control request understood by a [`DeviceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control<'a> {
    /// Declares that the device emits events of this type (`UI_SET_EVBIT`).
    EnableEventType(EventType),
    /// Declares that the device can emit this key (`UI_SET_KEYBIT`).
    EnableKey(Key),
    /// Submits the device identity and name (`UI_DEV_SETUP`).
    Setup(&'a DeviceDescriptor),
    /// Creates the device node (`UI_DEV_CREATE`).
    Create,
    /// Removes the device node (`UI_DEV_DESTROY`).
    Destroy,
}

impl Control<'_> {
    /// The name of the `ioctl` this request maps to.
    pub fn name(&self) -> &'static str {
        match self {
            Control::EnableEventType(_) => "UI_SET_EVBIT",
            Control::EnableKey(_) => "UI_SET_KEYBIT",
            Control::Setup(_) => "UI_DEV_SETUP",
            Control::Create => "UI_DEV_CREATE",
            Control::Destroy => "UI_DEV_DESTROY",
        }
    }
}

/// An open handle to a virtual input device file.
///
/// Implementations perform no retries and no interpretation of the data; every failure is
/// returned immediately.
pub trait DeviceFile {
    /// Writes all of `bytes` to the device.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Issues a control request.
    fn control(&mut self, request: Control<'_>) -> io::Result<()>;

    /// Closes the handle, reporting any error from the operating system.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// The real `uinput` device file.
#[derive(Debug)]
pub struct UinputFile {
    file: File,
}

impl UinputFile {
    /// The usual location of the `uinput` device file on Linux.
    pub const DEFAULT_PATH: &str = "/dev/uinput";

    /// Opens the `uinput` device file at `path` for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::options().read(true).write(true).open(path)?;
        let this = Self { file };

        let mut version = 0;
        match unsafe { this.ioctl("UI_GET_VERSION", UI_GET_VERSION, &mut version) } {
            Ok(_) => log::debug!("opened {}; version={version:#x}", path.display()),
            // Kernels before 4.5 lack `UI_GET_VERSION`; what matters is whether the setup works.
            Err(e) => log::debug!("opened {}; unknown uinput version ({e})", path.display()),
        }
        Ok(this)
    }

    /// Retrieves the device's directory name in the sysfs hierarchy.
    ///
    /// Only meaningful once the device has been created. The full path is
    /// `/sys/devices/virtual/input/` followed by the returned name.
    pub fn sysname(&self) -> io::Result<OsString> {
        // The ioctl returns the number of bytes copied, including the trailing NUL. If the buffer
        // was filled completely, the name may have been cut off, so retry with a bigger one.
        const INITIAL_LEN: usize = 64;
        let mut buf = vec![0_u8; INITIAL_LEN];
        let len = loop {
            let len = unsafe {
                self.ioctl(
                    "UI_GET_SYSNAME",
                    UI_GET_SYSNAME(buf.len()),
                    buf.as_mut_ptr() as *mut c_char,
                )?
            };
            if len as usize == buf.len() {
                buf.resize(buf.len() * 2, 0);
            } else {
                break len;
            }
        };

        buf.truncate(len.saturating_sub(1) as usize);
        Ok(OsString::from_vec(buf))
    }

    /// Executes `ioctl` and adds context to the error.
    unsafe fn ioctl<T>(&self, name: &'static str, ioctl: Ioctl<T>, arg: T) -> io::Result<c_int> {
        match unsafe { ioctl.ioctl(&self.file, arg) } {
            Ok(ok) => Ok(ok),
            Err(e) => Err(wrap_ioctl_error(name, e)),
        }
    }
}

fn wrap_ioctl_error(name: &'static str, cause: io::Error) -> io::Error {
    #[derive(Debug)]
    struct IoctlError {
        cause: io::Error,
        msg: String,
    }

    impl fmt::Display for IoctlError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.msg)
        }
    }
    impl Error for IoctlError {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.cause)
        }
    }

    log::trace!("ioctl {name} failed with error {cause} ({:?})", cause.kind());
    let kind = cause.kind();
    let msg = format!("ioctl {name} failed ({kind:?})");
    io::Error::new(kind, IoctlError { cause, msg })
}

impl DeviceFile for UinputFile {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)
    }

    fn control(&mut self, request: Control<'_>) -> io::Result<()> {
        let name = request.name();
        unsafe {
            match request {
                Control::EnableEventType(ty) => {
                    self.ioctl(name, UI_SET_EVBIT, c_int::from(ty.raw()))?;
                }
                Control::EnableKey(key) => {
                    self.ioctl(name, UI_SET_KEYBIT, c_int::from(key.raw()))?;
                }
                Control::Setup(descriptor) => {
                    let setup = descriptor.to_setup();
                    self.ioctl(name, UI_DEV_SETUP, &setup)?;
                }
                Control::Create => {
                    UI_DEV_CREATE
                        .ioctl(&self.file)
                        .map_err(|e| wrap_ioctl_error(name, e))?;
                }
                Control::Destroy => {
                    UI_DEV_DESTROY
                        .ioctl(&self.file)
                        .map_err(|e| wrap_ioctl_error(name, e))?;
                }
            }
        }
        Ok(())
    }

    fn close(self) -> io::Result<()> {
        // `File`'s destructor ignores errors from `close(2)`, so close the descriptor by hand.
        let fd = self.file.into_raw_fd();
        let ret = unsafe { libc::close(fd) };
        if ret == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl AsFd for UinputFile {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for UinputFile {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}
