//! Encoding and writing of individual events.
//!
//! Each function performs exactly one write. Nothing is buffered, so events reach the device in
//! the order the functions are called.

use std::io;

use crate::{
    device::DeviceFile,
    event::{InputEvent, Key, KeyEvent, KeyState, Syn, SynEvent},
};

fn send<D: DeviceFile>(device: &mut D, event: InputEvent) -> io::Result<()> {
    log::trace!("writing {event:?}");
    device.write(event.as_bytes())
}

/// Writes a single key event.
pub fn send_key_event<D: DeviceFile>(device: &mut D, key: Key, state: KeyState) -> io::Result<()> {
    send(device, KeyEvent::new(key, state).into())
}

/// Writes a `SYN_REPORT` event, which makes all preceding events visible to readers.
pub fn send_sync<D: DeviceFile>(device: &mut D) -> io::Result<()> {
    send(device, SynEvent::new(Syn::REPORT).into())
}

#[cfg(test)]
mod tests {
    use crate::test::FakeDevice;

    use super::*;

    #[test]
    fn one_write_per_event() {
        let mut dev = FakeDevice::new();
        send_key_event(&mut dev, Key::KEY_Z, KeyState::PRESSED).unwrap();
        send_sync(&mut dev).unwrap();

        let writes = dev.log().writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(
            writes[0],
            InputEvent::from(KeyEvent::new(Key::KEY_Z, KeyState::PRESSED))
        );
        assert_eq!(writes[1], InputEvent::from(SynEvent::new(Syn::REPORT)));
        assert!(writes.iter().all(InputEvent::has_zero_time));
    }

    #[test]
    fn write_error_is_returned() {
        let mut dev = FakeDevice::new().fail_write(0);
        let err = send_sync(&mut dev).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(dev.log().writes().is_empty());
    }
}
