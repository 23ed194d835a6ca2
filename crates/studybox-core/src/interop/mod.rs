//! Interop - delimited-text bridges
//!
//! Cards travel in and out as separator-delimited text with a small block of
//! `#key:value` header directives in front:
//!
//! ```text
//! #separator:Semicolon
//! #html:true
//! #deck column:1
//! #tags column:4
//! "Languages::German";"der Hund";"the dog";"nouns animals"
//! ```
//!
//! - [`import`]: parse such text into [`ImportRow`]s and add them to a collection
//! - [`export`]: write a collection back out in the same shape

pub mod export;
pub mod import;

pub use export::{export_delimited, export_to_string};
pub use import::{import_rows, parse_delimited, ImportReport, ImportRow};

/// Separator assumed when the text does not declare one
pub const DEFAULT_SEPARATOR: u8 = b';';

/// 1-based deck column assumed when the text does not declare one
pub const DEFAULT_DECK_COLUMN: usize = 1;

/// 1-based tags column assumed when the text does not declare one
pub const DEFAULT_TAGS_COLUMN: usize = 4;

/// Map a `#separator:` value to its byte.
///
/// Accepts the named forms (`Semicolon`, `Comma`, `Tab`, `Space`, `Pipe`,
/// `Colon`, case-insensitive) or a single literal character.
pub fn separator_byte(name: &str) -> Option<u8> {
    let name = name.trim();
    match name.to_ascii_lowercase().as_str() {
        "semicolon" => Some(b';'),
        "comma" => Some(b','),
        "tab" => Some(b'\t'),
        "space" => Some(b' '),
        "pipe" => Some(b'|'),
        "colon" => Some(b':'),
        _ => match name.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ if name == "\\t" => Some(b'\t'),
            _ => None,
        },
    }
}

/// Name written into the `#separator:` directive for a byte.
pub fn separator_name(byte: u8) -> String {
    match byte {
        b';' => "Semicolon".to_string(),
        b',' => "Comma".to_string(),
        b'\t' => "Tab".to_string(),
        b' ' => "Space".to_string(),
        b'|' => "Pipe".to_string(),
        b':' => "Colon".to_string(),
        other => (other as char).to_string(),
    }
}
