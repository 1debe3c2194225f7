// Spells a one-word list through the real binary inside a pseudo terminal,
// covering crossterm key capture and the tick loop end to end.
//
// Needs a PTY (expectrl), so it is unix-only and ignored by default:
// `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::io::Write;
use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let mut words = tempfile::NamedTempFile::new()?;
    write!(words, r#"[{{"id": "ox", "text": "ox"}}]"#)?;

    let bin = assert_cmd::cargo::cargo_bin("spelldrill");
    let cmd = format!(
        "{} --words {} --no-speech --no-sound",
        bin.display(),
        words.path().display()
    );

    let mut p = spawn(cmd)?;

    // alternate screen setup
    std::thread::sleep(Duration::from_millis(200));

    // Spell the only word
    p.send("ox")?;

    // Let the success transition run
    std::thread::sleep(Duration::from_millis(400));

    // Send ESC to exit
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
