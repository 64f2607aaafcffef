//! `linux/uinput.h`.

use std::ffi::{c_char, c_int, c_uint};

use uoctl::{_IO, _IOC, _IOC_READ, _IOR, _IOW, Ioctl};

use super::input::input_id;

pub const UINPUT_MAX_NAME_SIZE: usize = 80;

pub const UINPUT_IOCTL_BASE: u8 = b'U';
pub const UI_DEV_CREATE: Ioctl = _IO(UINPUT_IOCTL_BASE, 1);
pub const UI_DEV_DESTROY: Ioctl = _IO(UINPUT_IOCTL_BASE, 2);

#[derive(Clone, Copy)]
#[repr(C)]
pub struct uinput_setup {
    pub id: input_id,
    pub name: [c_char; UINPUT_MAX_NAME_SIZE],
    pub ff_effects_max: u32,
}

pub const UI_DEV_SETUP: Ioctl<*const uinput_setup> = _IOW(UINPUT_IOCTL_BASE, 3);

#[cfg(target_os = "freebsd")]
mod ioctls {
    use uoctl::IOC_VOID;

    use super::*;

    const fn _IOWINT(group: u8, nr: u8) -> Ioctl<c_int> {
        _IOC(IOC_VOID, group, nr, size_of::<c_int>())
    }

    pub const UI_SET_EVBIT: Ioctl<c_int> = _IOWINT(UINPUT_IOCTL_BASE, 100);
    pub const UI_SET_KEYBIT: Ioctl<c_int> = _IOWINT(UINPUT_IOCTL_BASE, 101);
}

#[cfg(not(target_os = "freebsd"))]
mod ioctls {
    use super::*;

    pub const UI_SET_EVBIT: Ioctl<c_int> = _IOW(UINPUT_IOCTL_BASE, 100).with_direct_arg();
    pub const UI_SET_KEYBIT: Ioctl<c_int> = _IOW(UINPUT_IOCTL_BASE, 101).with_direct_arg();
}

pub use ioctls::*;

pub const fn UI_GET_SYSNAME(len: usize) -> Ioctl<*mut c_char> {
    _IOC(_IOC_READ, UINPUT_IOCTL_BASE, 44, len)
}

pub const UI_GET_VERSION: Ioctl<*mut c_uint> = _IOR(UINPUT_IOCTL_BASE, 45);
