//! Input event records and key codes.
//!
//! Every event written to a virtual keyboard is an [`InputEvent`], the in-memory representation of
//! the kernel's `struct input_event`. It carries:
//!
//! - **Event Type** ([`InputEvent::event_type`]): [`EventType::KEY`] for key state changes, or
//!   [`EventType::SYN`] for the marker that ends a group of events.
//! - **Event Code** ([`InputEvent::raw_code`]): the [`Key`] that changed, or the kind of [`Syn`]
//!   event.
//! - **Event Value** ([`InputEvent::raw_value`]): the new [`KeyState`] for key events, `0` for
//!   synchronization events.
//! - **Timestamp**: always zero when written. The kernel stamps each event as it is queued.
//!
//! The typed wrappers [`KeyEvent`] and [`SynEvent`] construct and inspect the two kinds of events
//! a keyboard emits. [`InputEvent::kind`] converts a raw event back into a matchable
//! [`EventKind`].
//!
//! # Serde support
//!
//! If the `serde` feature is enabled, [`Key`] implements `Serialize` and `Deserialize`.
//! Human-readable formats use the constant name (`KEY_F1`) when there is one and the raw code
//! otherwise; binary formats always use the raw `u16`.

pub(crate) mod codes;

#[cfg(any(test, feature = "serde"))]
mod serde;

use std::{fmt, mem, ops::Deref, slice};

use crate::raw::input::input_event;

pub use codes::{EventType, Key, Syn, UnknownVariant};

/// An input event sent to a virtual keyboard.
///
/// Use [`InputEvent::kind`] to convert it to a `match`able enum.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct InputEvent(input_event);

impl InputEvent {
    /// Creates an [`InputEvent`] from raw values.
    ///
    /// The timestamp of the event is set to 0, which makes the kernel fill in the current time.
    #[inline]
    pub const fn new(ty: EventType, raw_code: u16, raw_value: i32) -> Self {
        Self(input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: ty.0,
            code: raw_code,
            value: raw_value,
        })
    }

    /// Returns the [`EventKind`] this [`InputEvent`] encodes.
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self.event_type() {
            EventType::SYN => EventKind::Syn(SynEvent(*self)),
            EventType::KEY => EventKind::Key(KeyEvent(*self)),
            _ => EventKind::Other(*self),
        }
    }

    /// Returns the [`EventType`] of this event.
    #[inline]
    pub fn event_type(&self) -> EventType {
        EventType(self.0.type_)
    }

    /// Returns the raw *event code* field.
    #[inline]
    pub fn raw_code(&self) -> u16 {
        self.0.code
    }

    /// Returns the raw *event value* field.
    #[inline]
    pub fn raw_value(&self) -> i32 {
        self.0.value
    }

    /// Returns whether the timestamp fields are zero.
    ///
    /// This holds for every event created by this crate.
    #[inline]
    pub fn has_zero_time(&self) -> bool {
        self.0.time.tv_sec == 0 && self.0.time.tv_usec == 0
    }

    /// Returns the binary encoding of this event, as expected by the `uinput` device's `write`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let ptr = (self as *const Self).cast::<u8>();
        // Safety: `input_event` contains no padding (tested in `raw::input`), so every byte is
        // initialized.
        unsafe { slice::from_raw_parts(ptr, mem::size_of::<Self>()) }
    }

    /// Decodes a single event from its binary encoding.
    ///
    /// Returns [`None`] if `bytes` is not exactly one event long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != mem::size_of::<Self>() {
            return None;
        }
        // Safety: the length matches, any bit pattern is a valid `input_event`, and
        // `read_unaligned` has no alignment requirement.
        Some(unsafe { bytes.as_ptr().cast::<Self>().read_unaligned() })
    }
}

impl fmt::Debug for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            EventKind::Other(_) => f
                .debug_struct("InputEvent")
                .field("type", &self.event_type())
                .field("code", &self.raw_code())
                .field("value", &self.raw_value())
                .finish(),
            kind => kind.fmt(f),
        }
    }
}

/// Enumeration of the event kinds a keyboard deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EventKind {
    /// A synchronization event.
    Syn(SynEvent),
    /// A key press or release.
    Key(KeyEvent),
    /// Fallback variant for any other event type.
    #[non_exhaustive]
    Other(InputEvent),
}

/// A synchronization event.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SynEvent(InputEvent);

impl SynEvent {
    #[inline]
    pub fn new(syn: Syn) -> Self {
        Self(InputEvent::new(EventType::SYN, syn.0, 0))
    }

    /// Returns the event code as a [`Syn`] (the specific kind of `SYN` event).
    #[inline]
    pub fn syn(&self) -> Syn {
        Syn(self.raw_code())
    }
}
impl fmt::Debug for SynEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynEvent")
            .field("syn", &self.syn())
            .field("value", &self.raw_value())
            .finish()
    }
}
impl From<SynEvent> for InputEvent {
    #[inline]
    fn from(value: SynEvent) -> Self {
        value.0
    }
}
impl From<Syn> for InputEvent {
    #[inline]
    fn from(value: Syn) -> Self {
        SynEvent::new(value).into()
    }
}
impl Deref for SynEvent {
    type Target = InputEvent;

    #[inline]
    fn deref(&self) -> &InputEvent {
        &self.0
    }
}

/// A key press or release event.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent(InputEvent);

impl KeyEvent {
    #[inline]
    pub fn new(key: Key, state: KeyState) -> Self {
        Self(InputEvent::new(EventType::KEY, key.0, state.0))
    }

    /// Returns the [`Key`] code that has been pressed or released.
    #[inline]
    pub fn key(&self) -> Key {
        Key(self.raw_code())
    }

    /// Returns the state of the key.
    #[inline]
    pub fn state(&self) -> KeyState {
        KeyState(self.raw_value())
    }
}
impl fmt::Debug for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEvent")
            .field("key", &self.key())
            .field("state", &self.state())
            .finish()
    }
}
impl From<KeyEvent> for InputEvent {
    #[inline]
    fn from(value: KeyEvent) -> Self {
        value.0
    }
}
impl Deref for KeyEvent {
    type Target = InputEvent;

    #[inline]
    fn deref(&self) -> &InputEvent {
        &self.0
    }
}

ffi_enum! {
    /// State of a [`Key`], stored as the value of a [`KeyEvent`].
    pub enum KeyState: i32 {
        /// The key has been released.
        RELEASED = 0,
        /// The key has been pressed.
        PRESSED = 1,
    }
}
impl fmt::Debug for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "KeyState({:#?})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_fields() {
        let ev = KeyEvent::new(Key::KEY_A, KeyState::PRESSED);
        assert_eq!(ev.event_type(), EventType::KEY);
        assert_eq!(ev.raw_code(), 30);
        assert_eq!(ev.raw_value(), 1);
        assert!(ev.has_zero_time());

        let ev = KeyEvent::new(Key::KEY_A, KeyState::RELEASED);
        assert_eq!(ev.raw_value(), 0);
        assert_eq!(ev.state(), KeyState::RELEASED);
    }

    #[test]
    fn syn_event_fields() {
        let ev = SynEvent::new(Syn::REPORT);
        assert_eq!(ev.event_type(), EventType::SYN);
        assert_eq!(ev.raw_code(), 0);
        assert_eq!(ev.raw_value(), 0);
        assert!(ev.has_zero_time());
    }

    #[test]
    fn encoding() {
        let ev: InputEvent = KeyEvent::new(Key::KEY_Q, KeyState::PRESSED).into();
        let bytes = ev.as_bytes();
        assert_eq!(bytes.len(), size_of::<libc::timeval>() + 8);

        // The timestamp is all zeroes, followed by type, code and value in native byte order.
        let tail = &bytes[size_of::<libc::timeval>()..];
        assert!(bytes[..size_of::<libc::timeval>()].iter().all(|b| *b == 0));
        assert_eq!(tail[0..2], EventType::KEY.raw().to_ne_bytes());
        assert_eq!(tail[2..4], Key::KEY_Q.raw().to_ne_bytes());
        assert_eq!(tail[4..8], 1i32.to_ne_bytes());

        assert_eq!(InputEvent::from_bytes(bytes), Some(ev));
        assert_eq!(InputEvent::from_bytes(&bytes[1..]), None);
    }

    #[test]
    fn kind() {
        let ev: InputEvent = KeyEvent::new(Key::KEY_B, KeyState::RELEASED).into();
        match ev.kind() {
            EventKind::Key(key) => {
                assert_eq!(key.key(), Key::KEY_B);
                assert_eq!(key.state(), KeyState::RELEASED);
            }
            other => panic!("unexpected {other:?}"),
        }

        let ev: InputEvent = Syn::REPORT.into();
        assert!(matches!(ev.kind(), EventKind::Syn(s) if s.syn() == Syn::REPORT));

        let ev = InputEvent::new(EventType::from_raw(0x02), 0, 1);
        assert!(matches!(ev.kind(), EventKind::Other(_)));
    }

    #[test]
    fn debug() {
        let ev: InputEvent = KeyEvent::new(Key::KEY_A, KeyState::PRESSED).into();
        assert_eq!(format!("{ev:?}"), "Key(KeyEvent { key: KEY_A, state: PRESSED })");
        assert_eq!(format!("{:?}", KeyState(2)), "KeyState(2)");
    }
}
