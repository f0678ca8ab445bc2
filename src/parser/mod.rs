// ── Dialog template scanner ───────────────────────────────────────────────────
//
// Hand-written recursive-descent scanning over LF-normalized text.  All parse
// state lives in an explicit `Scanner` (byte cursor + 1-based line number);
// nothing is global.  Every delimiter the grammar cares about is ASCII, so the
// scanner walks bytes and only ever slices the text at ASCII positions.
//
// Every lookahead is bounds-checked: the scanner never reads past the end of
// the supplied text.

mod control;
mod header;

pub use control::parse_control;
pub use header::parse_header;
pub(crate) use header::scan_preamble;

use std::ops::Range;

use thiserror::Error;
use tracing::debug;

use crate::model::DialogTemplate;

// ── Errors ────────────────────────────────────────────────────────────────────

/// What went wrong; the message is shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Missing dialog template data.")]
    MissingTemplateData,
    #[error("Missing dialog ID.")]
    MissingDialogId,
    #[error("Missing space after dialog ID.")]
    MissingSpaceAfterId,
    #[error("Missing dialog resource specifier.")]
    MissingResourceSpecifier,
    #[error("Missing space after DIALOG or DIALOGEX.")]
    MissingSpaceAfterDialog,
    #[error("Missing dialog coordinates.")]
    MissingCoordinates,
    #[error("Expected end of line.")]
    ExpectedEndOfLine,
    #[error("Missing beginning marker of dialog control list.")]
    MissingBeginMarker,
    #[error("Missing dialog caption string.")]
    MissingCaptionString,
    #[error("Missing closing quote on dialog caption string.")]
    UnterminatedDialogCaption,
    #[error("Missing font point size.")]
    MissingFontSize,
    #[error("Missing font face name.")]
    MissingFontFace,
    #[error("Missing closing quote on font face string.")]
    UnterminatedFontFace,
    #[error("Missing control type statement.")]
    MissingControlType,
    #[error("Unrecognized control type.")]
    UnrecognizedControl,
    #[error("Missing control parameters.")]
    MissingControlParameters,
    #[error("Missing control parameters after icon resource ID.")]
    MissingParametersAfterIcon,
    #[error("Missing quotes around caption text.")]
    MissingCaptionQuotes,
    #[error("Missing closing quote on caption text.")]
    UnterminatedCaption,
    #[error("Missing control parameters after caption parameter.")]
    MissingParametersAfterCaption,
    #[error("Missing control parameters after ID parameter.")]
    MissingParametersAfterId,
    #[error("Missing control parameters after class parameter.")]
    MissingParametersAfterClass,
    #[error("Missing control parameters after style parameter.")]
    MissingParametersAfterStyle,
    #[error("Missing control dimensions.")]
    MissingDimensions,
    #[error("Missing newline character.")]
    MissingNewline,
    #[error("Missing end marker of dialog control list.")]
    MissingEndMarker,
}

/// A syntax error with the position where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Parse error on line {line}. {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line number.
    pub line: u32,
    /// Byte offset of the scan cursor.
    pub pos: usize,
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Scanner state left behind by the most recent parse call.
///
/// Valid until the next parse call on the same document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub scan_pos: usize,
    /// 1-based line the scanner stopped on; 0 when no text was scanned
    /// (e.g. the file could not be read).
    pub line_number: u32,
    pub last_error: Option<ParseError>,
}

impl Diagnostics {
    pub fn capture<T>(scanner: &Scanner<'_>, result: &ParseResult<T>) -> Self {
        Self {
            scan_pos: scanner.pos(),
            line_number: scanner.line(),
            last_error: result.as_ref().err().copied(),
        }
    }
}

// ── Scanner ───────────────────────────────────────────────────────────────────

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Cursor over LF-normalized template text.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    /// A scanner at the start of `text`, on line 1.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Move back to the start of the text, on line 1.
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.line = 1;
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub(crate) fn at_newline(&self) -> bool {
        self.peek() == Some(b'\n')
    }

    pub(crate) fn at_blank(&self) -> bool {
        self.peek().is_some_and(is_blank)
    }

    /// Unscanned remainder of the text.
    pub(crate) fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Consume `b` if it is next.
    pub(crate) fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            line: self.line,
            pos: self.pos,
        }
    }

    /// Skip spaces and tabs.
    pub(crate) fn skip_blanks(&mut self) {
        while self.at_blank() {
            self.pos += 1;
        }
    }

    /// Skip spaces, tabs and newlines, counting lines.
    pub(crate) fn skip_blank_lines(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => self.line += 1,
                b' ' | b'\t' => {}
                _ => break,
            }
            self.pos += 1;
        }
    }

    /// Consume bytes up to (not including) the first byte matching `stop`,
    /// or to the end of the text.
    pub(crate) fn take_until(&mut self, stop: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|b| !stop(b)) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// Fail with `kind` at the end of the text or at a newline.
    pub(crate) fn require_more(&self, kind: ParseErrorKind) -> ParseResult<()> {
        if self.at_end() || self.at_newline() {
            Err(self.error(kind))
        } else {
            Ok(())
        }
    }

    /// A `,` followed by optional blanks, with more of the line after it.
    pub(crate) fn field_separator(&mut self, kind: ParseErrorKind) -> ParseResult<()> {
        self.skip_blanks();
        if !self.eat(b',') {
            return Err(self.error(kind));
        }
        self.skip_blanks();
        self.require_more(kind)
    }

    /// Body of a double-quoted string whose opening quote was just consumed.
    ///
    /// `\"` does not terminate the string and is returned undecoded.  The
    /// string may not span lines.  The closing quote is consumed.
    pub(crate) fn quoted(&mut self, unterminated: ParseErrorKind) -> ParseResult<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(self.error(unterminated)),
                Some(b'"') => break,
                Some(b'\\') => {
                    self.pos += 1;
                    self.require_more(unterminated)?;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
        let body = &self.text[start..self.pos];
        self.pos += 1;
        Ok(body)
    }

    /// Consume the newline ending the current line.
    pub(crate) fn newline(&mut self, kind: ParseErrorKind) -> ParseResult<()> {
        if !self.eat(b'\n') {
            return Err(self.error(kind));
        }
        self.line += 1;
        Ok(())
    }

    /// Skip the rest of the current line, newline included.
    pub(crate) fn skip_line(&mut self, kind: ParseErrorKind) -> ParseResult<()> {
        self.take_until(|b| b == b'\n');
        self.newline(kind)
    }

    /// Four comma-separated integers (`x, y, width, height`).
    ///
    /// Returns the values and the byte span from the start of the first to
    /// the end of the fourth.  The cursor is left after any blanks following
    /// the fourth value.  `missing` is reported for gaps among the first
    /// three values; `unterminated` when the text ends after the fourth.
    pub(crate) fn coordinates(
        &mut self,
        missing: ParseErrorKind,
        unterminated: ParseErrorKind,
    ) -> ParseResult<([i32; 4], Range<usize>)> {
        let mut values = [0; 4];
        let start = self.pos;
        let mut end = start;
        for (i, value) in values.iter_mut().enumerate() {
            let last = i == 3;
            let token = self.take_until(|b| b == b',' || b == b'\n' || is_blank(b));
            if self.at_end() {
                return Err(self.error(if last { unterminated } else { missing }));
            }
            if token.is_empty() {
                return Err(self.error(missing));
            }
            *value = parse_int(token);
            end = self.pos;
            if last {
                self.skip_blanks();
                if self.at_end() {
                    return Err(self.error(unterminated));
                }
            } else {
                self.field_separator(missing)?;
            }
        }
        Ok((values, start..end))
    }
}

/// Leading decimal integer of `token`, C `atoi` style: optional sign, then
/// digits; anything after the digits is ignored and no digits yields 0.
/// Out-of-range values saturate.
pub fn parse_int(token: &str) -> i32 {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// ── Whole template ────────────────────────────────────────────────────────────

/// Parse a complete template: header, then controls until `END` or `}`.
///
/// Blank lines between controls are skipped.  On failure nothing of the
/// partially scanned template is returned; the scanner is left where the
/// error was detected.
pub fn parse_template(scanner: &mut Scanner<'_>) -> ParseResult<DialogTemplate> {
    let header = parse_header(scanner)?;
    let mut template = DialogTemplate::new(header);
    loop {
        scanner.skip_blank_lines();
        if scanner.at_end() {
            return Err(scanner.error(ParseErrorKind::MissingEndMarker));
        }
        let rest = scanner.rest();
        if rest.starts_with('}') || rest.starts_with("END") {
            break;
        }
        if let Err(e) = parse_control(scanner, template.controls.staging_mut()) {
            template.controls.discard_staging();
            return Err(e);
        }
        template.controls.commit();
    }
    debug!(
        controls = template.controls.len(),
        line = scanner.line(),
        "template parsed"
    );
    Ok(template)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
