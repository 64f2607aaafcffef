#![doc = include_str!("../README.md")]
#![warn(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod macros;


mod descriptor;
pub mod device;
pub mod emitter;
mod error;
pub mod event;
mod input_id;
mod keyboard;
mod lifecycle;
mod raw;
pub mod registrar;

pub use descriptor::{DeviceDescriptor, DeviceName};
#[doc(inline)]
pub use device::{Control, DeviceFile, UinputFile};
pub use error::{Error, Result, WritePhase};
pub use input_id::{Bus, InputId};
pub use keyboard::Keyboard;
pub use lifecycle::{Builder, create_keyboard};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_sync() {
        fn assert<T: Send + Sync>() {}

        assert::<Keyboard>();
        assert::<UinputFile>();
        assert::<Error>();
    }
}
