//! Creates a real virtual keyboard and reads its events back from the `evdev` node the kernel
//! creates for it.
//!
//! Requires read/write access to `/dev/uinput` and read access to the new `/dev/input/event*`
//! node. If `/dev/uinput` cannot be opened, the tests print a message and pass without doing
//! anything.

use std::{
    fs::{self, File},
    hash::{BuildHasher, Hasher, RandomState},
    io::{self, Read},
    iter::zip,
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    thread,
    time::{Duration, Instant},
};

use vkbd::{
    Bus, Error, InputId, Keyboard, UinputFile, create_keyboard,
    event::{EventType, InputEvent, Key, KeyEvent, KeyState, Syn},
};

/// The tests create kernel devices and poll for their nodes, so they run one at a time.
static SERIAL: Mutex<()> = Mutex::new(());

/// Returns `None` if the test should be skipped.
fn setup() -> Option<MutexGuard<'static, ()>> {
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());

    let _ = env_logger::builder()
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Trace)
        .is_test(true)
        .try_init();

    match File::options()
        .read(true)
        .write(true)
        .open(UinputFile::DEFAULT_PATH)
    {
        Ok(_) => Some(guard),
        Err(e) => {
            eprintln!("skipping test: cannot open {}: {e}", UinputFile::DEFAULT_PATH);
            None
        }
    }
}

fn unique_name() -> String {
    let hash = RandomState::new().build_hasher().finish();
    format!("-@-rust-vkbd-{hash:x}-@-")
}

/// Opens the `evdev` node belonging to `kb` in non-blocking mode.
fn open_evdev(kb: &Keyboard) -> io::Result<File> {
    let syspath = kb.syspath()?;
    let mut retries = 10;
    loop {
        let res = find_event_node(&syspath).and_then(|node| {
            File::options()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(node)
        });
        match res {
            Ok(file) => return Ok(file),
            // `udev` may not have created the node or fixed its permissions yet.
            Err(e) if retries > 0 => {
                println!("(retrying) {e}");
                retries -= 1;
                thread::sleep(Duration::from_millis(150));
            }
            Err(e) => return Err(e),
        }
    }
}

fn find_event_node(syspath: &Path) -> io::Result<PathBuf> {
    for entry in fs::read_dir(syspath)? {
        let name = entry?.file_name();
        if name.to_string_lossy().starts_with("event") {
            return Ok(Path::new("/dev/input").join(name));
        }
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no event node in {}", syspath.display()),
    ))
}

/// Reads exactly `count` events, failing if they don't arrive within a second.
fn read_events(evdev: &mut File, count: usize) -> io::Result<Vec<InputEvent>> {
    const EVENT_SIZE: usize = size_of::<InputEvent>();
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut events = Vec::new();
    let mut buf = [0; EVENT_SIZE];
    while events.len() < count {
        match evdev.read(&mut buf) {
            Ok(EVENT_SIZE) => events.extend(InputEvent::from_bytes(&buf)),
            Ok(n) => panic!("short read of {n} bytes"),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() > deadline {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("expected {count} events, got {events:?}"),
                    ));
                }
                thread::sleep(Duration::from_millis(5));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(events)
}

fn events_eq(recv: InputEvent, expected: InputEvent) -> bool {
    if recv.event_type() != expected.event_type() || recv.raw_code() != expected.raw_code() {
        return false;
    }

    // Value is ignored for SYN events
    recv.event_type() == EventType::SYN || recv.raw_value() == expected.raw_value()
}

#[track_caller]
fn check_events(actual: Vec<InputEvent>, expected: &[InputEvent]) {
    assert_eq!(actual.len(), expected.len(), "got {actual:?}");
    if !zip(&actual, expected).all(|(a, b)| events_eq(*a, *b)) {
        panic!("expected {expected:?}, got {actual:?}");
    }
    // Events are written with a zero timestamp and stamped by the kernel.
    assert!(actual.iter().all(|ev| !ev.has_zero_time()));
}

#[test]
fn key_press_is_delivered() -> io::Result<()> {
    let Some(_guard) = setup() else {
        return Ok(());
    };

    let mut kb = create_keyboard(UinputFile::DEFAULT_PATH, &unique_name())?;
    let mut evdev = open_evdev(&kb)?;

    kb.key_press(Key::KEY_A)?;
    check_events(
        read_events(&mut evdev, 3)?,
        &[
            KeyEvent::new(Key::KEY_A, KeyState::PRESSED).into(),
            KeyEvent::new(Key::KEY_A, KeyState::RELEASED).into(),
            Syn::REPORT.into(),
        ],
    );

    kb.key_down(Key::KEY_LEFTSHIFT)?;
    kb.key_up(Key::KEY_LEFTSHIFT)?;
    check_events(
        read_events(&mut evdev, 4)?,
        &[
            KeyEvent::new(Key::KEY_LEFTSHIFT, KeyState::PRESSED).into(),
            Syn::REPORT.into(),
            KeyEvent::new(Key::KEY_LEFTSHIFT, KeyState::RELEASED).into(),
            Syn::REPORT.into(),
        ],
    );

    kb.close()?;
    Ok(())
}

#[test]
fn device_identity() -> io::Result<()> {
    let Some(_guard) = setup() else {
        return Ok(());
    };

    let name = unique_name();
    let kb = Keyboard::builder()
        .with_device_id(InputId::new(Bus::VIRTUAL, 0x1234, 0x5678, 2))
        .build(&name)?;
    let syspath = kb.syspath()?;

    let read = |attr: &str| -> io::Result<String> {
        Ok(fs::read_to_string(syspath.join(attr))?.trim().to_string())
    };
    assert_eq!(read("name")?, name);
    assert_eq!(read("id/bustype")?, "0006");
    assert_eq!(read("id/vendor")?, "1234");
    assert_eq!(read("id/product")?, "5678");
    assert_eq!(read("id/version")?, "0002");

    kb.close()?;

    // The device disappears once closed.
    let mut retries = 20;
    while syspath.exists() && retries > 0 {
        retries -= 1;
        thread::sleep(Duration::from_millis(50));
    }
    assert!(!syspath.exists());
    Ok(())
}

#[test]
fn out_of_range_key_is_rejected() -> io::Result<()> {
    let Some(_guard) = setup() else {
        return Ok(());
    };

    let mut kb = create_keyboard(UinputFile::DEFAULT_PATH, &unique_name())?;
    let mut evdev = open_evdev(&kb)?;

    let err = kb.key_press(Key::from_raw(0x2ff)).unwrap_err();
    assert!(matches!(err, Error::OutOfRangeKeyCode(0x2ff)), "{err:?}");
    assert!(matches!(
        Key::try_from(99999_i32),
        Err(Error::OutOfRangeKeyCode(99999))
    ));

    // Nothing reached the device.
    let mut buf = [0; 64];
    let err = evdev.read(&mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

    kb.close()?;
    Ok(())
}
