// ── Dialog template data model ────────────────────────────────────────────────
//
// Structured view of one dialog template.  `DialogTemplate::head_text` keeps
// the preamble verbatim so that statements the parser does not model
// (STYLE, EXSTYLE, MENU, …) survive a load/save cycle untouched.
//
// Caption and window-class fields are bounded to `MAX_FIELD_LEN` bytes and
// truncate silently; every other string is unbounded.

use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};

use crate::array::ExpArray;
use crate::keywords::RenderKind;

/// Longest caption or window class stored, in bytes.
pub const MAX_FIELD_LEN: usize = 255;

// ── Bounded text ──────────────────────────────────────────────────────────────

/// A string that never holds more than [`MAX_FIELD_LEN`] bytes.
///
/// Longer input is cut at the last character boundary at or below the limit.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct FixedText(String);

impl FixedText {
    pub fn new(text: &str) -> Self {
        let mut end = text.len().min(MAX_FIELD_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self(text[..end].to_owned())
    }

    /// Replace the contents, truncating as [`FixedText::new`] does.
    pub fn set(&mut self, text: &str) {
        *self = Self::new(text);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for FixedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FixedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for FixedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for FixedText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FixedText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for FixedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A position in dialog units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

// ── Control ───────────────────────────────────────────────────────────────────

/// One control statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Control {
    pub kind: RenderKind,
    /// Caption; the resource token for ICON; empty for captionless classes.
    pub text: FixedText,
    /// Verbatim ID token, numeric or symbolic.
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub cx: i32,
    pub cy: i32,
    /// `CONTROL` only: the window class token as written, quotes included.
    pub window_class: FixedText,
    /// `CONTROL`: the style token.  Other classes: the whole trailing clause.
    pub style: String,
    /// `CONTROL` only: the trailing clause after the geometry.
    pub ex_style: String,
}

impl Control {
    /// The keyword this control is written with.
    pub fn keyword(&self) -> Option<&'static str> {
        self.kind.keyword()
    }

    /// The window class with surrounding quotes removed.
    pub fn window_class_name(&self) -> &str {
        let class = self.window_class.trim();
        class
            .strip_prefix('"')
            .and_then(|c| c.strip_suffix('"'))
            .unwrap_or(class)
    }

    /// The unparsed trailing clause, wherever this control's class keeps it.
    pub fn trailing_clause(&self) -> &str {
        if self.kind.is_custom() {
            &self.ex_style
        } else {
            &self.style
        }
    }

    /// Reset the unbounded strings to empty, dropping whatever they held.
    pub(crate) fn clear_owned(&mut self) {
        self.id = String::new();
        self.style = String::new();
        self.ex_style = String::new();
    }
}

// ── Dialog template ───────────────────────────────────────────────────────────

/// Which begin marker closed the header; the end marker written on save
/// mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BeginMarker {
    #[default]
    Begin,
    Brace,
}

impl BeginMarker {
    /// The matching end-of-list line.
    pub fn end_line(self) -> &'static str {
        match self {
            Self::Begin => "END\n",
            Self::Brace => "}\n",
        }
    }
}

/// Structured fields of a dialog header, as produced by the header parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    pub head_text: String,
    pub position: Point,
    pub width: i32,
    pub height: i32,
    pub has_caption: bool,
    pub caption: FixedText,
    pub font_point_size: u32,
    pub font_family: Option<String>,
    pub begin_marker: BeginMarker,
}

/// A whole dialog template: header plus controls in tab order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DialogTemplate {
    #[serde(flatten)]
    pub header: Header,
    pub controls: ExpArray<Control>,
}

impl DialogTemplate {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            controls: ExpArray::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_text_truncates_to_limit() {
        let long = "x".repeat(400);
        let t = FixedText::new(&long);
        assert_eq!(t.len(), MAX_FIELD_LEN);
        assert_eq!(FixedText::new("short"), "short");
    }

    #[test]
    fn fixed_text_keeps_exactly_the_limit() {
        let exact = "y".repeat(MAX_FIELD_LEN);
        assert_eq!(FixedText::new(&exact).as_str(), exact);
    }

    #[test]
    fn fixed_text_never_splits_a_character() {
        // 254 ASCII bytes followed by a two-byte character straddling the limit.
        let text = format!("{}é", "a".repeat(254));
        let t = FixedText::new(&text);
        assert_eq!(t.len(), 254);
    }

    #[test]
    fn window_class_name_strips_quotes() {
        let c = Control {
            window_class: FixedText::new("\"SysListView32\""),
            ..Control::default()
        };
        assert_eq!(c.window_class_name(), "SysListView32");

        let bare = Control {
            window_class: FixedText::new("Button"),
            ..Control::default()
        };
        assert_eq!(bare.window_class_name(), "Button");
    }

    #[test]
    fn trailing_clause_follows_class() {
        let custom = Control {
            kind: RenderKind::new(0, 0),
            style: "WS_VISIBLE".to_owned(),
            ex_style: "WS_EX_CLIENTEDGE".to_owned(),
            ..Control::default()
        };
        assert_eq!(custom.trailing_clause(), "WS_EX_CLIENTEDGE");

        let text = Control {
            kind: RenderKind::new(4, 0),
            style: "SS_NOPREFIX".to_owned(),
            ..Control::default()
        };
        assert_eq!(text.trailing_clause(), "SS_NOPREFIX");
    }

    #[test]
    fn end_marker_mirrors_begin_marker() {
        assert_eq!(BeginMarker::Begin.end_line(), "END\n");
        assert_eq!(BeginMarker::Brace.end_line(), "}\n");
    }
}
