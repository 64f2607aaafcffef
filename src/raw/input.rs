//! `linux/input.h`

use libc::timeval;

#[derive(Clone, Copy)]
#[repr(C)]
pub struct input_event {
    pub time: timeval,
    pub type_: u16,
    pub code: u16,
    pub value: i32,
}

impl PartialEq for input_event {
    fn eq(&self, other: &Self) -> bool {
        self.time.tv_sec == other.time.tv_sec
            && self.time.tv_usec == other.time.tv_usec
            && self.type_ == other.type_
            && self.code == other.code
            && self.value == other.value
    }
}
impl Eq for input_event {}

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct input_id {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    #[test]
    fn input_event_has_no_padding() {
        // `InputEvent::as_bytes` relies on this.
        assert_eq!(
            size_of::<input_event>(),
            size_of::<timeval>() + 2 + 2 + 4,
        );
        assert_eq!(offset_of!(input_event, type_), size_of::<timeval>());
        assert_eq!(offset_of!(input_event, code), size_of::<timeval>() + 2);
        assert_eq!(offset_of!(input_event, value), size_of::<timeval>() + 4);
    }

    #[test]
    fn input_id_layout() {
        assert_eq!(size_of::<input_id>(), 8);
    }
}
