// ── Statement serializer ──────────────────────────────────────────────────────
//
// Model → text.  Control lines are regenerated whole from their fields; the
// header is never regenerated, only its coordinate clause is spliced in place
// so that every other byte of `head_text` survives untouched.

use std::fmt::Write as _;

use tracing::warn;

use crate::keywords::CaptionForm;
use crate::model::{Control, Header};
use crate::parser::{scan_preamble, Scanner};
use crate::text::decode_escapes;

/// Render one control as a single LF-terminated statement line.
///
/// The trailing clause (and its leading comma) is only written when the
/// control has one.
pub fn format_control(control: &Control) -> String {
    let mut line = String::with_capacity(64 + control.style.len() + control.ex_style.len());
    line.push('\t');
    line.push_str(control.keyword().unwrap_or(""));
    line.push(' ');

    match control.kind.caption_form() {
        CaptionForm::None => {}
        CaptionForm::Token => {
            line.push_str(&control.text);
            line.push_str(", ");
        }
        CaptionForm::Quoted => {
            line.push('"');
            line.push_str(&decode_escapes(&control.text));
            line.push_str("\", ");
        }
    }

    line.push_str(&control.id);
    line.push_str(", ");
    if control.kind.is_custom() {
        line.push_str(&control.window_class);
        line.push_str(", ");
        line.push_str(&control.style);
        line.push_str(", ");
    }

    // Writing to a String cannot fail.
    let _ = write!(
        line,
        "{}, {}, {}, {}",
        control.x, control.y, control.cx, control.cy
    );

    let trailing = control.trailing_clause();
    if !trailing.is_empty() {
        line.push_str(", ");
        line.push_str(trailing);
    }
    line.push('\n');
    line
}

/// Splice the model's position and size into the coordinate clause of
/// `header.head_text`.
///
/// Returns `false`, leaving the text alone, when `head_text` no longer
/// starts with a well-formed `<id> DIALOG[EX] x, y, w, h` line.
pub fn format_header(header: &mut Header) -> bool {
    let span = {
        let mut s = Scanner::new(&header.head_text);
        match scan_preamble(&mut s) {
            Ok(preamble) => preamble.span,
            Err(e) => {
                warn!(error = %e, "header text no longer parses; coordinates not updated");
                return false;
            }
        }
    };
    let coords = format!(
        "{}, {}, {}, {}",
        header.position.x, header.position.y, header.width, header.height
    );
    header.head_text.replace_range(span, &coords);
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
