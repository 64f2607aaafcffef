//! Creates a virtual keyboard and types the text given on the command line.
//!
//! Only lowercase and uppercase ASCII letters, digits, spaces and newlines are supported, and the
//! text is typed using the US keyboard layout.

use std::{env, io, thread, time::Duration};

use vkbd::{Keyboard, event::Key};

fn key_for(c: char) -> Option<(Key, bool)> {
    const LETTERS: [Key; 26] = [
        Key::KEY_A, Key::KEY_B, Key::KEY_C, Key::KEY_D, Key::KEY_E, Key::KEY_F, Key::KEY_G,
        Key::KEY_H, Key::KEY_I, Key::KEY_J, Key::KEY_K, Key::KEY_L, Key::KEY_M, Key::KEY_N,
        Key::KEY_O, Key::KEY_P, Key::KEY_Q, Key::KEY_R, Key::KEY_S, Key::KEY_T, Key::KEY_U,
        Key::KEY_V, Key::KEY_W, Key::KEY_X, Key::KEY_Y, Key::KEY_Z,
    ];
    const DIGITS: [Key; 10] = [
        Key::KEY_0, Key::KEY_1, Key::KEY_2, Key::KEY_3, Key::KEY_4, Key::KEY_5, Key::KEY_6,
        Key::KEY_7, Key::KEY_8, Key::KEY_9,
    ];

    Some(match c {
        'a'..='z' => (LETTERS[usize::from(c as u8 - b'a')], false),
        'A'..='Z' => (LETTERS[usize::from(c as u8 - b'A')], true),
        '0'..='9' => (DIGITS[usize::from(c as u8 - b'0')], false),
        ' ' => (Key::KEY_SPACE, false),
        '\n' => (Key::KEY_ENTER, false),
        _ => return None,
    })
}

fn main() -> io::Result<()> {
    env_logger::init();

    let text = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let mut kb = Keyboard::builder().build("vkbd demo keyboard")?;
    println!("Created device {:?}", kb.sysname()?);

    // Give the desktop a moment to pick up the new device.
    thread::sleep(Duration::from_secs(1));

    for c in text.chars() {
        let Some((key, shift)) = key_for(c) else {
            eprintln!("skipping unsupported character {c:?}");
            continue;
        };
        if shift {
            kb.key_down(Key::KEY_LEFTSHIFT)?;
            kb.key_press(key)?;
            kb.key_up(Key::KEY_LEFTSHIFT)?;
        } else {
            kb.key_press(key)?;
        }
        thread::sleep(Duration::from_millis(20));
    }

    kb.close()?;
    Ok(())
}
