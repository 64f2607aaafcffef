use std::fmt::{self, LowerHex};

use crate::raw::input::input_id;

/// Hardware identity reported by the virtual keyboard.
///
/// Readers see these values via `EVIOCGID` and in `/proc/bus/input/devices`.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct InputId(pub(crate) input_id);

impl InputId {
    /// The identity used when none is configured: a USB device with vendor `0x4711`, product
    /// `0x0815` and version 1.
    pub const DEFAULT_KEYBOARD: Self = Self::new(Bus::USB, 0x4711, 0x0815, 1);

    /// Creates an [`InputId`] from its components.
    #[inline]
    pub const fn new(bus: Bus, vendor: u16, product: u16, version: u16) -> Self {
        Self(input_id {
            bustype: bus.0,
            vendor,
            product,
            version,
        })
    }

    /// Returns the bus type the device claims to be attached with.
    #[inline]
    pub fn bus(&self) -> Bus {
        Bus(self.0.bustype)
    }

    #[inline]
    pub fn vendor(&self) -> u16 {
        self.0.vendor
    }

    #[inline]
    pub fn product(&self) -> u16 {
        self.0.product
    }

    #[inline]
    pub fn version(&self) -> u16 {
        self.0.version
    }
}

impl Default for InputId {
    fn default() -> Self {
        Self::DEFAULT_KEYBOARD
    }
}

impl fmt::Debug for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Hex<T: LowerHex>(T);
        impl<T: LowerHex> fmt::Debug for Hex<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#06x}", self.0)
            }
        }

        f.debug_struct("InputId")
            .field("bustype", &self.bus())
            .field("vendor", &Hex(self.vendor()))
            .field("product", &Hex(self.product()))
            .field("version", &Hex(self.version()))
            .finish()
    }
}

ffi_enum! {
    /// Bus types a keyboard can be attached to the system with.
    pub enum Bus: u16 {
        PCI         = 0x01,
        USB         = 0x03,
        BLUETOOTH   = 0x05,
        VIRTUAL     = 0x06,
        I8042       = 0x11,
        HOST        = 0x19,
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_name() {
            Some(name) => write!(f, "BUS_{name}"),
            None => write!(f, "Bus({:#x})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_debug() {
        assert_eq!(format!("{:?}", Bus::USB), "BUS_USB");
        assert_eq!(format!("{:?}", Bus(0xffff)), "Bus(0xffff)");
    }

    #[test]
    fn default_id() {
        let id = InputId::default();
        assert_eq!(id.bus(), Bus::USB);
        assert_eq!(id.vendor(), 0x4711);
        assert_eq!(id.product(), 0x0815);
        assert_eq!(id.version(), 1);
        assert_eq!(
            format!("{id:?}"),
            "InputId { bustype: BUS_USB, vendor: 0x4711, product: 0x0815, version: 0x0001 }"
        );
    }
}
