#![forbid(unsafe_code)]

//! Test harness for the Atelier widget stack.
//!
//! Renders widgets into an in-memory [`Buffer`] and compares the text
//! projection against snapshot files under `tests/snapshots/`. A missing
//! snapshot is written on first run; set `BLESS=1` to rewrite all of
//! them after an intentional visual change.
//!
//! The text projection drops colors and attributes. Use
//! [`buffer_hash`] when a test must pin styling too.

use std::fs;
use std::path::PathBuf;

use atelier_render::{Buffer, Frame};

/// Plain-text projection of a buffer, one line per row, trailing
/// whitespace trimmed.
#[must_use]
pub fn buffer_text(buffer: &Buffer) -> String {
    let mut out = String::new();
    for y in 0..buffer.height() {
        let mut line = String::new();
        for x in 0..buffer.width() {
            if let Some(cell) = buffer.get(x, y) {
                line.push(cell.ch);
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Text projection of a frame's buffer.
#[must_use]
pub fn frame_text(frame: &Frame) -> String {
    buffer_text(&frame.buffer)
}

/// Content hash covering characters, colors, and attributes.
#[must_use]
pub fn buffer_hash(buffer: &Buffer) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&buffer.width().to_le_bytes());
    hasher.update(&buffer.height().to_le_bytes());
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if let Some(cell) = buffer.get(x, y) {
                let mut ch = [0u8; 4];
                hasher.update(cell.ch.encode_utf8(&mut ch).as_bytes());
                hasher.update(&cell.fg.0.to_le_bytes());
                hasher.update(&cell.bg.0.to_le_bytes());
                hasher.update(&[cell.attrs.bits()]);
            }
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Compare `actual` against `tests/snapshots/{name}.txt` under
/// `manifest_dir`. Writes the file when it does not exist or when
/// `BLESS=1` is set.
///
/// # Panics
///
/// Panics on mismatch, or when the snapshot directory cannot be
/// written.
pub fn assert_snapshot_text(name: &str, actual: &str, manifest_dir: &str) {
    let dir = PathBuf::from(manifest_dir).join("tests").join("snapshots");
    let path = dir.join(format!("{name}.txt"));
    let bless = std::env::var("BLESS").is_ok_and(|value| value == "1");

    if bless || !path.exists() {
        fs::create_dir_all(&dir)
            .unwrap_or_else(|err| panic!("cannot create {}: {err}", dir.display()));
        fs::write(&path, actual)
            .unwrap_or_else(|err| panic!("cannot write {}: {err}", path.display()));
        if !bless {
            eprintln!("wrote new snapshot {}", path.display());
        }
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
    assert!(
        expected == actual,
        "snapshot mismatch for `{name}`\n--- expected ({})\n{expected}\n--- actual\n{actual}\nset BLESS=1 to update",
        path.display(),
    );
}

/// Snapshot a [`Buffer`] (or anything [`buffer_text`] accepts).
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $buffer:expr) => {
        $crate::assert_snapshot_text(
            $name,
            &$crate::buffer_text($buffer),
            env!("CARGO_MANIFEST_DIR"),
        )
    };
}
