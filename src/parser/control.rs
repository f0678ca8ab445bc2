// ── Control statement parser ──────────────────────────────────────────────────
//
// One line:  KEYWORD [caption,] id[, class, style], x, y, cx, cy[, trailing]
//
// The caption field depends on the keyword's render class (quoted string,
// bare ICON token, or absent).  Everything after the geometry is kept as one
// opaque clause: in `ex_style` for CONTROL, in `style` for every other class.

use tracing::debug;

use super::{ParseErrorKind as E, ParseResult, Scanner};
use crate::keywords::{CaptionForm, KeywordTable};
use crate::model::{Control, FixedText};
use crate::text::encode_escapes;

fn is_field_end(b: u8) -> bool {
    b == b',' || b == b'\n'
}

/// Parse one control statement starting at the scanner's position into
/// `slot`.
///
/// To parse a lone control outside a full template scan, start from a fresh
/// (or rewound) scanner.  On failure `slot.id`, `slot.style` and
/// `slot.ex_style` are left as empty strings; other fields may hold partial
/// results.
pub fn parse_control(s: &mut Scanner<'_>, slot: &mut Control) -> ParseResult<()> {
    let result = scan_control(s, slot);
    if result.is_err() {
        slot.clear_owned();
    }
    result
}

fn scan_control(s: &mut Scanner<'_>, slot: &mut Control) -> ParseResult<()> {
    s.skip_blanks();
    if s.at_end() {
        return Err(s.error(E::MissingControlType));
    }
    let Some((kind, len)) = KeywordTable::get().match_prefix(s.rest()) else {
        return Err(s.error(E::UnrecognizedControl));
    };
    s.advance(len);
    s.require_more(E::MissingControlParameters)?;
    if !s.at_blank() {
        return Err(s.error(E::UnrecognizedControl));
    }
    s.skip_blanks();
    s.require_more(E::MissingControlParameters)?;
    slot.kind = kind;

    // Caption
    match kind.caption_form() {
        CaptionForm::None => slot.text = FixedText::default(),
        CaptionForm::Token => {
            let token = s.take_until(is_field_end);
            s.require_more(E::MissingParametersAfterIcon)?;
            slot.text.set(token);
            s.field_separator(E::MissingParametersAfterIcon)?;
        }
        CaptionForm::Quoted => {
            if !s.eat(b'"') {
                return Err(s.error(E::MissingCaptionQuotes));
            }
            let body = s.quoted(E::UnterminatedCaption)?;
            slot.text.set(&encode_escapes(body));
            s.field_separator(E::MissingParametersAfterCaption)?;
        }
    }

    // ID
    let id = s.take_until(is_field_end);
    s.require_more(E::MissingParametersAfterId)?;
    slot.id = id.to_owned();
    s.field_separator(E::MissingParametersAfterId)?;

    // Window class and style (CONTROL only)
    if kind.is_custom() {
        let class = s.take_until(is_field_end);
        s.require_more(E::MissingParametersAfterClass)?;
        slot.window_class.set(class);
        s.field_separator(E::MissingParametersAfterClass)?;

        let style = s.take_until(is_field_end);
        s.require_more(E::MissingParametersAfterStyle)?;
        slot.style = style.to_owned();
        s.field_separator(E::MissingParametersAfterStyle)?;
    } else {
        slot.window_class = FixedText::default();
    }

    let ([x, y, cx, cy], _) = s.coordinates(E::MissingDimensions, E::MissingNewline)?;
    slot.x = x;
    slot.y = y;
    slot.cx = cx;
    slot.cy = cy;
    if s.eat(b',') {
        s.skip_blanks();
    }

    // Trailing clause, kept verbatim.
    let trailing = s.take_until(|b| b == b'\n');
    if kind.is_custom() {
        slot.ex_style = trailing.to_owned();
    } else {
        slot.style = trailing.to_owned();
        slot.ex_style = String::new();
    }
    s.newline(E::MissingNewline)?;

    debug!(
        keyword = slot.keyword().unwrap_or(""),
        id = %slot.id,
        line = s.line() - 1,
        "control parsed"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
