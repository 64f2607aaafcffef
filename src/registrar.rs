//! Capability registration and device creation.
//!
//! A `uinput` device has to declare every event type and key code it will emit before it is
//! created. Events for anything not declared are dropped by the kernel.

use crate::{
    DeviceDescriptor, Error, Result,
    device::{Control, DeviceFile},
    event::{EventType, Key},
};

/// Declares that the device will emit events of type `event_type`.
///
/// Has to happen before any key code is registered.
pub fn begin_registration<D: DeviceFile>(device: &mut D, event_type: EventType) -> Result<()> {
    device
        .control(Control::EnableEventType(event_type))
        .map_err(|source| Error::EventTypeRegistration { event_type, source })
}

/// Declares that the device can emit `key`.
pub fn register_key_code<D: DeviceFile>(device: &mut D, key: Key) -> Result<()> {
    device
        .control(Control::EnableKey(key))
        .map_err(|source| Error::KeyRegistration { key, source })
}

/// Registers every key in `KEY_MIN..=KEY_MAX`, in ascending order.
///
/// Stops at the first failure.
pub fn register_all_keys<D: DeviceFile>(device: &mut D) -> Result<()> {
    for key in Key::keyboard_keys() {
        register_key_code(device, key)?;
    }
    log::trace!(
        "registered key codes {}..={}",
        Key::KEY_MIN.raw(),
        Key::KEY_MAX.raw()
    );
    Ok(())
}

/// Submits `descriptor` and creates the device node.
///
/// After this returns successfully, the device shows up in `/dev/input` and written events are
/// delivered to readers.
pub fn finalize_creation<D: DeviceFile>(
    device: &mut D,
    descriptor: &DeviceDescriptor,
) -> Result<()> {
    device
        .control(Control::Setup(descriptor))
        .map_err(Error::DeviceCreation)?;
    device
        .control(Control::Create)
        .map_err(Error::DeviceCreation)?;
    log::debug!(
        "created virtual keyboard {} ({:?})",
        descriptor.name(),
        descriptor.id()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        DeviceName, InputId,
        test::{Call, FakeDevice},
    };

    use super::*;

    #[test]
    fn registers_every_key_in_order() {
        let mut dev = FakeDevice::new();
        register_all_keys(&mut dev).unwrap();

        let keys = dev.log().registered_keys();
        assert_eq!(keys.len(), 249);
        assert!(keys.iter().copied().eq(Key::keyboard_keys()));
    }

    #[test]
    fn stops_at_first_failure() {
        let mut dev = FakeDevice::new().fail_key_registration(Key::KEY_B);
        match register_all_keys(&mut dev) {
            Err(Error::KeyRegistration { key, .. }) => assert_eq!(key, Key::KEY_B),
            other => panic!("unexpected result {other:?}"),
        }

        let keys = dev.log().registered_keys();
        assert_eq!(keys.last(), Some(&Key::KEY_B));
        assert_eq!(keys.len(), usize::from(Key::KEY_B.raw()) + 1);
    }

    #[test]
    fn event_type_failure() {
        let mut dev = FakeDevice::new().fail_event_type_registration();
        assert!(matches!(
            begin_registration(&mut dev, EventType::KEY),
            Err(Error::EventTypeRegistration {
                event_type: EventType::KEY,
                ..
            })
        ));
    }

    #[test]
    fn finalize_sends_setup_then_create() {
        let mut dev = FakeDevice::new();
        let desc = DeviceDescriptor::new(InputId::default(), DeviceName::new("kbd").unwrap());
        finalize_creation(&mut dev, &desc).unwrap();
        assert_eq!(dev.log().calls(), vec![Call::Setup(desc), Call::Create]);
    }

    #[test]
    fn finalize_failure() {
        let mut dev = FakeDevice::new().fail_create();
        let desc = DeviceDescriptor::new(InputId::default(), DeviceName::new("kbd").unwrap());
        assert!(matches!(
            finalize_creation(&mut dev, &desc),
            Err(Error::DeviceCreation(_))
        ));
    }
}
