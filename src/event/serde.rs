use std::fmt;

use serde::{Deserialize, Serialize, de};

use crate::event::Key;

struct KeyVisitor;

impl<'de> de::Visitor<'de> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("key name or raw key code")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse()
            .map_err(|_| E::custom(format!("unknown key name '{v}'")))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match u16::try_from(v) {
            Ok(raw) => Ok(Key::from_raw(raw)),
            Err(_) => Err(E::invalid_value(
                de::Unexpected::Unsigned(v),
                &"unsigned 16-bit value",
            )),
        }
    }
}

/// Deserialization from a raw 16-bit code or a named constant.
impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            // Human-readable formats may use either the name or the raw code, so they have to be
            // self-describing.
            deserializer.deserialize_any(KeyVisitor)
        } else {
            let raw = u16::deserialize(deserializer)?;
            Ok(Key::from_raw(raw))
        }
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.name() {
            Some(name) if serializer.is_human_readable() => serializer.serialize_str(name),
            _ => self.raw().serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use csv::{ReaderBuilder, WriterBuilder};

    use super::*;

    #[test]
    fn csv() {
        let mut out = Vec::new();
        let mut w = WriterBuilder::new().from_writer(&mut out);
        w.serialize(Key::KEY_F12).unwrap();
        w.serialize(Key::from_raw(0xffff)).unwrap();
        w.flush().unwrap();
        drop(w);

        let s = String::from_utf8(out).unwrap();
        assert_eq!(s, "KEY_F12\n65535\n");

        let mut r = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(s.as_bytes());
        let mut iter = r.deserialize::<Key>();
        assert_eq!(iter.next().unwrap().unwrap(), Key::KEY_F12);
        assert_eq!(iter.next().unwrap().unwrap(), Key::from_raw(0xffff));
        assert!(iter.next().is_none());
    }

    #[test]
    fn postcard() {
        let b = postcard::to_allocvec(&Key::KEY_LEFTSHIFT).unwrap();
        assert_eq!(
            postcard::from_bytes::<Key>(&b).unwrap(),
            Key::KEY_LEFTSHIFT
        );
    }
}
