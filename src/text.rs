// ── Text normalization ────────────────────────────────────────────────────────
//
// Two independent translations:
//   • newline conventions: CRLF / CR ↔ LF, applied to whole buffers before
//     parsing and when producing text for the editing surface or disk;
//   • escape codes: backslash sequences in caption text ↔ literal control
//     characters.
//
// The escape set is small.  Unknown sequences pass through
// untouched and are never an error.

// ── Newlines ──────────────────────────────────────────────────────────────────

/// Rewrite `"\r\n"` and lone `"\r"` to `"\n"` in place.
///
/// Returns the new length of `buf` in bytes.  Running it twice is a no-op.
pub fn normalize_newlines(buf: &mut String) -> usize {
    if !buf.contains('\r') {
        return buf.len();
    }
    let mut bytes = std::mem::take(buf).into_bytes();
    let mut write = 0;
    let mut read = 0;
    while read < bytes.len() {
        if bytes[read] == b'\r' {
            if bytes.get(read + 1) == Some(&b'\n') {
                read += 1;
            }
            bytes[write] = b'\n';
        } else {
            bytes[write] = bytes[read];
        }
        read += 1;
        write += 1;
    }
    bytes.truncate(write);
    // Only ASCII bytes were rewritten or removed, so the buffer is still
    // valid UTF-8.
    *buf = String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
    buf.len()
}

/// Copy `text`, expanding every `"\n"` to `"\r\n"`.
pub fn denormalize_newlines(text: &str) -> String {
    let extra = text.bytes().filter(|&b| b == b'\n').count();
    let mut out = String::with_capacity(text.len() + extra);
    for c in text.chars() {
        if c == '\n' {
            out.push('\r');
        }
        out.push(c);
    }
    out
}

/// Convert LF text to lone-CR line endings.
pub fn lf_to_cr(text: &str) -> String {
    text.replace('\n', "\r")
}

/// Line-ending convention of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EolMode {
    #[default]
    Crlf,
    Lf,
    Cr,
}

impl EolMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "CRLF",
            Self::Lf => "LF",
            Self::Cr => "CR",
        }
    }

    /// Rewrite normalized (LF) text to this convention.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Crlf => denormalize_newlines(text),
            Self::Lf => text.to_owned(),
            Self::Cr => lf_to_cr(text),
        }
    }
}

/// Convention used by most line breaks in `text`.
///
/// Ties go to CRLF, then LF.  Text without any line break is CRLF.
pub fn detect_eol(text: &str) -> EolMode {
    let mut counts = [(EolMode::Crlf, 0usize), (EolMode::Lf, 0), (EolMode::Cr, 0)];
    let mut bytes = text.bytes().peekable();
    while let Some(b) = bytes.next() {
        let slot = match b {
            b'\r' if bytes.next_if_eq(&b'\n').is_some() => 0,
            b'\n' => 1,
            b'\r' => 2,
            _ => continue,
        };
        counts[slot].1 += 1;
    }
    // `max_by_key` keeps the last maximum, so scan from the low-priority end.
    counts
        .into_iter()
        .rev()
        .max_by_key(|&(_, n)| n)
        .map_or(EolMode::Crlf, |(mode, _)| mode)
}

// ── Escape codes ──────────────────────────────────────────────────────────────

/// Literal character for the escape letter following a backslash.
fn unescaped(letter: char) -> Option<char> {
    Some(match letter {
        '\\' => '\\',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        'v' => '\u{0B}',
        't' => '\t',
        '\'' => '\'',
        '"' => '"',
        '?' => '?',
        _ => return None,
    })
}

/// Escape letter for a literal character.  `?` is accepted when decoding
/// source text but never re-escaped.
fn escaped(c: char) -> Option<char> {
    Some(match c {
        '\\' => '\\',
        '\u{07}' => 'a',
        '\u{08}' => 'b',
        '\u{0C}' => 'f',
        '\n' => 'n',
        '\r' => 'r',
        '\u{0B}' => 'v',
        '\t' => 't',
        '\'' => '\'',
        '"' => '"',
        _ => return None,
    })
}

/// Replace the recognised backslash sequences in `text` with the characters
/// they stand for.
///
/// An unrecognised sequence keeps both the backslash and the following
/// character; a trailing lone backslash is kept as well.
pub fn encode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(letter) => match unescaped(letter) {
                Some(literal) => out.push(literal),
                None => {
                    out.push('\\');
                    out.push(letter);
                }
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Inverse of [`encode_escapes`]: write each special character back as a
/// backslash sequence, for display in source form.
pub fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match escaped(c) {
            Some(letter) => {
                out.push('\\');
                out.push(letter);
            }
            None => out.push(c),
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
