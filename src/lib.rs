// ── Safety policy ────────────────────────────────────────────────────────────
// The crate is plain text processing; no unsafe code anywhere.
#![deny(unsafe_code)]

//! Parser and surgical serializer for Windows dialog templates.
//!
//! Text is scanned into a [`DialogTemplate`] (header fields plus an ordered
//! control list) and written back one control line at a time, while the
//! header is only ever patched in place, so statements the parser does not
//! model survive a load/save cycle byte for byte.

pub mod array;
pub mod document;
pub mod error;
pub mod format;
pub mod keywords;
pub mod model;
pub mod parser;
pub mod text;

pub use array::ExpArray;
pub use document::{Direction, Document, Encoding, NudgeMode, Selection, TemplateSource};
pub use error::{DlgError, Result};
pub use format::{format_control, format_header};
pub use keywords::{KeywordTable, RenderKind};
pub use model::{BeginMarker, Control, DialogTemplate, FixedText, Header, Point};
pub use parser::{
    parse_control, parse_header, parse_template, Diagnostics, ParseError, ParseErrorKind, Scanner,
};
pub use text::EolMode;
