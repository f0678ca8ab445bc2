// ── Header parser ─────────────────────────────────────────────────────────────
//
// Scans the preamble: `<id> DIALOG[EX] x, y, w, h`, then CAPTION / FONT
// statements and any other lines up to and including the begin marker.
// Unmodeled lines (STYLE, EXSTYLE, MENU, CLASS, …) are skipped and survive
// only inside `head_text`.

use std::ops::Range;

use tracing::debug;

use super::{is_blank, parse_int, ParseErrorKind as E, ParseResult, Scanner};
use crate::model::{BeginMarker, FixedText, Header, Point};

/// The first line of a header: identifier, resource keyword, coordinates.
#[derive(Debug)]
pub(crate) struct Preamble<'a> {
    pub(crate) id: &'a str,
    pub(crate) keyword: &'a str,
    pub(crate) coords: [i32; 4],
    /// Byte span of the `x, y, w, h` clause.
    pub(crate) span: Range<usize>,
}

fn is_blank_or_newline(b: u8) -> bool {
    is_blank(b) || b == b'\n'
}

/// Scan the identifier, the DIALOG/DIALOGEX keyword and the four
/// coordinates.  Neither token is validated beyond being present.
pub(crate) fn scan_preamble<'a>(s: &mut Scanner<'a>) -> ParseResult<Preamble<'a>> {
    s.skip_blank_lines();
    if s.at_end() {
        return Err(s.error(E::MissingTemplateData));
    }

    let id = s.take_until(is_blank_or_newline);
    s.require_more(E::MissingDialogId)?;
    s.skip_blanks();
    s.require_more(E::MissingSpaceAfterId)?;

    let keyword = s.take_until(is_blank_or_newline);
    s.require_more(E::MissingResourceSpecifier)?;
    s.skip_blanks();
    s.require_more(E::MissingSpaceAfterDialog)?;

    let (coords, span) = s.coordinates(E::MissingCoordinates, E::MissingTemplateData)?;
    Ok(Preamble {
        id,
        keyword,
        coords,
        span,
    })
}

/// Parse a dialog header from the start of the scanner's text.
///
/// The scanner is rewound to position 0, line 1 first.  On success it is
/// left at the start of the line after the begin marker, and `head_text`
/// holds everything before that point verbatim.
pub fn parse_header(s: &mut Scanner<'_>) -> ParseResult<Header> {
    s.rewind();
    let preamble = scan_preamble(s)?;
    s.newline(E::ExpectedEndOfLine)?;
    if s.at_end() {
        return Err(s.error(E::MissingTemplateData));
    }

    let [x, y, width, height] = preamble.coords;
    let mut header = Header {
        position: Point { x, y },
        width,
        height,
        ..Header::default()
    };

    let marker = loop {
        s.skip_blanks();
        if s.at_end() {
            return Err(s.error(E::MissingBeginMarker));
        }
        let rest = s.rest();
        let mut marker = None;
        if let Some(after) = rest.strip_prefix("CAPTION") {
            s.advance(rest.len() - after.len());
            header.caption = caption_statement(s)?;
            header.has_caption = true;
        } else if let Some(after) = rest.strip_prefix("FONT") {
            s.advance(rest.len() - after.len());
            let (size, family) = font_statement(s)?;
            header.font_point_size = size;
            header.font_family = Some(family);
        } else if rest.starts_with('{') {
            marker = Some(BeginMarker::Brace);
        } else if rest.starts_with("BEGIN") {
            marker = Some(BeginMarker::Begin);
        }
        s.skip_line(E::MissingBeginMarker)?;
        if let Some(marker) = marker {
            break marker;
        }
    };

    header.begin_marker = marker;
    header.head_text = s.text()[..s.pos()].to_owned();
    debug!(
        id = preamble.id,
        keyword = preamble.keyword,
        lines = s.line() - 1,
        "dialog header parsed"
    );
    Ok(header)
}

/// `CAPTION "text"` after the keyword.  The caption is stored as written
/// (escape codes are not decoded), truncated to the field limit.
fn caption_statement(s: &mut Scanner<'_>) -> ParseResult<FixedText> {
    s.require_more(E::MissingCaptionString)?;
    s.skip_blanks();
    if !s.eat(b'"') {
        return Err(s.error(E::MissingCaptionString));
    }
    let body = s.quoted(E::UnterminatedDialogCaption)?;
    Ok(FixedText::new(body))
}

/// `FONT size, "family"` after the keyword.  Anything after the family
/// (weight, italic, charset in DIALOGEX) is left for the line skip.
fn font_statement(s: &mut Scanner<'_>) -> ParseResult<(u32, String)> {
    s.require_more(E::MissingFontSize)?;
    s.skip_blanks();
    let size = s.take_until(|b| b == b',' || b == b'\n');
    if !s.eat(b',') || size.trim().is_empty() {
        return Err(s.error(E::MissingFontSize));
    }
    let size = u32::try_from(parse_int(size)).unwrap_or(0);

    s.skip_blanks();
    if !s.eat(b'"') {
        return Err(s.error(E::MissingFontFace));
    }
    let family = s.quoted(E::UnterminatedFontFace)?;
    Ok((size, family.to_owned()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
