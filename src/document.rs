// ── Document session ──────────────────────────────────────────────────────────
//
// A single `Document` owns the live dialog template together with everything
// the editing surface needs around it: the file it came from, how that file
// was encoded, whether it has unsaved changes, which item is selected, and
// what the last parse call reported.  Nothing here is global.
//
// Text crossing this boundary is in one of three forms:
//   • on disk: any supported encoding and line-ending convention;
//   • in the model and the parsers: UTF-8 with LF line endings;
//   • on the editing surface: UTF-8 with CRLF line endings.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{DlgError, Result};
use crate::format::{format_control, format_header};
use crate::model::{Control, DialogTemplate};
use crate::parser::{parse_control, parse_header, parse_template, Diagnostics, Scanner};
use crate::text::{denormalize_newlines, detect_eol, normalize_newlines, EolMode};

/// Name shown for a document that has never been saved.
pub const UNTITLED_NAME: &str = "Untitled.dlg";

/// Application name used in window titles.
pub const APP_NAME: &str = "Dialog Editor";

/// Keyboard nudge distance in dialog units.
pub const NUDGE_STRIDE: i32 = 8;
/// Keyboard nudge distance with the fine modifier held.
pub const NUDGE_STRIDE_FINE: i32 = 1;

/// Template loaded by [`TemplateSource::Default`].
pub const DEFAULT_TEMPLATE: &str = "\
IDD_DIALOG1 DIALOGEX 0, 0, 186, 95
STYLE DS_SETFONT | DS_MODALFRAME | DS_FIXEDSYS | WS_POPUP | WS_CAPTION | WS_SYSMENU
CAPTION \"Dialog\"
FONT 8, \"MS Shell Dlg\", 400, 0, 0x1
BEGIN
    DEFPUSHBUTTON \"OK\", IDOK, 129, 7, 50, 14
    PUSHBUTTON \"Cancel\", IDCANCEL, 129, 24, 50, 14
END
";

// ── Encoding ──────────────────────────────────────────────────────────────────

/// How the template file is stored on disk.  The model and every editing
/// buffer hold UTF-8; saving converts back to the encoding recorded at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 without a byte-order mark.
    #[default]
    Utf8,
    /// UTF-8 behind an `EF BB BF` mark, as older resource editors wrote it.
    Utf8Bom,
    /// UTF-16 little-endian behind `FF FE`.
    Utf16Le,
    /// UTF-16 big-endian behind `FE FF`.
    Utf16Be,
    /// Single-byte code page, read and written as Latin-1.
    Ansi,
}

impl Encoding {
    /// Label for status lines and `check` output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 BOM",
            Self::Utf16Le => "UTF-16 LE",
            Self::Utf16Be => "UTF-16 BE",
            Self::Ansi => "ANSI",
        }
    }

    /// Byte-order mark written ahead of the payload.
    fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            Self::Utf16Le => &[0xFF, 0xFE],
            Self::Utf16Be => &[0xFE, 0xFF],
            Self::Utf8 | Self::Ansi => &[],
        }
    }
}

// ── Selection & editing ───────────────────────────────────────────────────────

/// Where a template is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The built-in [`DEFAULT_TEMPLATE`], as an untitled document.
    Default,
    File(PathBuf),
}

/// The item the editing surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// The dialog header.
    #[default]
    Dialog,
    /// One control, by index into the control list.
    Control(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self, stride: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -stride),
            Self::Down => (0, stride),
            Self::Left => (-stride, 0),
            Self::Right => (stride, 0),
        }
    }
}

/// Whether a nudge changes the position or the size of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NudgeMode {
    #[default]
    Move,
    Resize,
}

// ── Document ──────────────────────────────────────────────────────────────────

/// The open dialog template and its session state.
#[derive(Debug, Default)]
pub struct Document {
    template: Option<DialogTemplate>,
    /// File on disk, or `None` for an untitled document.
    path: Option<PathBuf>,
    encoding: Encoding,
    eol: EolMode,
    /// `true` when the model has changes not yet saved to disk.
    dirty: bool,
    selection: Selection,
    diagnostics: Diagnostics,
}

impl Document {
    /// An empty document with no template loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self) -> Option<&DialogTemplate> {
        self.template.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn eol(&self) -> EolMode {
        self.eol
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `true` until the document has been loaded from or saved to a file.
    pub fn no_file_loaded(&self) -> bool {
        self.path.is_none()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Scanner state and error left by the last parse call.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The bare filename component, or [`UNTITLED_NAME`].
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_NAME.to_owned())
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No file, clean | `"Dialog Editor"` |
    /// | File, clean | `"name — Dialog Editor"` |
    /// | Any, dirty | `"*name — Dialog Editor"` |
    pub fn window_title(&self) -> String {
        if self.path.is_none() && !self.dirty {
            return APP_NAME.to_owned();
        }
        let dirty = if self.dirty { "*" } else { "" };
        format!("{dirty}{} \u{2014} {APP_NAME}", self.display_name())
    }

    // ── Load / save ───────────────────────────────────────────────────────────

    /// Replace the current template with one read from `source`.
    ///
    /// On failure the previously loaded template, path and encoding are
    /// kept; [`Document::diagnostics`] describes the error.
    pub fn load_template(&mut self, source: TemplateSource) -> Result<()> {
        match source {
            TemplateSource::Default => {
                self.load_text(DEFAULT_TEMPLATE)?;
                self.path = None;
                self.encoding = Encoding::Utf8;
                self.eol = EolMode::Crlf;
                info!("default template loaded");
            }
            TemplateSource::File(path) => {
                let bytes = std::fs::read(&path).map_err(|e| {
                    warn!(path = %path.display(), error = %e, "template could not be read");
                    self.diagnostics = Diagnostics::default();
                    e
                })?;
                let (encoding, text) = detect_and_decode(&bytes);
                let eol = detect_eol(&text);
                if let Err(e) = self.load_text(&text) {
                    warn!(path = %path.display(), error = %e, "template failed to parse");
                    return Err(e);
                }
                info!(
                    path = %path.display(),
                    encoding = encoding.as_str(),
                    eol = eol.as_str(),
                    "template loaded"
                );
                self.path = Some(path);
                self.encoding = encoding;
                self.eol = eol;
            }
        }
        Ok(())
    }

    /// Parse a whole template from in-memory text and make it current.
    ///
    /// The document's path and encoding are left alone.  On failure the
    /// previous template is kept.
    pub fn load_text(&mut self, text: &str) -> Result<()> {
        let mut buf = text.to_owned();
        normalize_newlines(&mut buf);
        let mut scanner = Scanner::new(&buf);
        let result = parse_template(&mut scanner);
        self.diagnostics = Diagnostics::capture(&scanner, &result);
        self.template = Some(result?);
        self.dirty = false;
        self.selection = Selection::Dialog;
        Ok(())
    }

    /// The full template text with LF line endings, header coordinates
    /// refreshed from the model.
    pub fn template_text(&mut self) -> Result<String> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        format_header(&mut template.header);
        let mut out = template.header.head_text.clone();
        for control in &template.controls {
            out.push_str(&format_control(control));
        }
        out.push_str(template.header.begin_marker.end_line());
        Ok(out)
    }

    /// Write the template to `path` in the document's encoding and line-ending
    /// convention, and make `path` the document's file.
    pub fn save_template(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let text = self.template_text()?;
        let bytes = encode_for_disk(&self.eol.apply(&text), self.encoding);
        std::fs::write(&path, bytes)?;
        info!(
            path = %path.display(),
            encoding = self.encoding.as_str(),
            eol = self.eol.as_str(),
            "template saved"
        );
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Drop the loaded template.  The document keeps its path.
    pub fn free_template(&mut self) {
        self.template = None;
        self.selection = Selection::Dialog;
    }

    // ── Editing surface ───────────────────────────────────────────────────────

    /// Re-parse the dialog header from editor text.
    ///
    /// The current header is replaced only on success.
    pub fn parse_header_text(&mut self, text: &str) -> Result<()> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        let buf = surface_to_model(text);
        let mut scanner = Scanner::new(&buf);
        let result = parse_header(&mut scanner);
        self.diagnostics = Diagnostics::capture(&scanner, &result);
        template.header = result?;
        self.dirty = true;
        debug!("header replaced from editor text");
        Ok(())
    }

    /// Re-parse control `index` from editor text.
    ///
    /// On failure the control's ID, style and extended style are left empty
    /// and its other fields may be partially overwritten.
    pub fn parse_control_text(&mut self, text: &str, index: usize) -> Result<()> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        let slot = template
            .controls
            .get_mut(index)
            .ok_or(DlgError::NoSuchControl(index))?;
        let buf = surface_to_model(text);
        let mut scanner = Scanner::new(&buf);
        let result = parse_control(&mut scanner, slot);
        self.diagnostics = Diagnostics::capture(&scanner, &result);
        self.dirty = true;
        result?;
        debug!(index, "control replaced from editor text");
        Ok(())
    }

    /// Parse editor text as a new control appended to the end of the tab
    /// order, and select it.  Nothing is added on failure.
    pub fn add_control_text(&mut self, text: &str) -> Result<usize> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        let buf = surface_to_model(text);
        let mut scanner = Scanner::new(&buf);
        let result = parse_control(&mut scanner, template.controls.staging_mut());
        self.diagnostics = Diagnostics::capture(&scanner, &result);
        if let Err(e) = result {
            template.controls.discard_staging();
            return Err(e.into());
        }
        let index = template.controls.commit();
        self.selection = Selection::Control(index);
        self.dirty = true;
        debug!(index, "control added");
        Ok(index)
    }

    /// Remove control `index`.  The selection falls back to the dialog.
    pub fn delete_control(&mut self, index: usize) -> Result<Control> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        let removed = template
            .controls
            .remove(index)
            .ok_or(DlgError::NoSuchControl(index))?;
        self.selection = Selection::Dialog;
        self.dirty = true;
        debug!(index, "control deleted");
        Ok(removed)
    }

    /// Route editor text to the header or control parser, whichever the
    /// selection names.
    pub fn apply_selection_text(&mut self, text: &str) -> Result<()> {
        match self.selection {
            Selection::Dialog => self.parse_header_text(text),
            Selection::Control(index) => self.parse_control_text(text, index),
        }
    }

    /// Control `index` as one LF-terminated statement line.
    pub fn format_control_text(&self, index: usize) -> Result<String> {
        let template = self.template.as_ref().ok_or(DlgError::NoTemplate)?;
        let control = template
            .controls
            .get(index)
            .ok_or(DlgError::NoSuchControl(index))?;
        Ok(format_control(control))
    }

    /// The header text with its coordinates refreshed from the model.
    pub fn format_header_text(&mut self) -> Result<String> {
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        format_header(&mut template.header);
        Ok(template.header.head_text.clone())
    }

    /// Editor-surface text for the current selection, in CRLF form.
    pub fn selection_text(&mut self) -> Result<String> {
        let text = match self.selection {
            Selection::Dialog => self.format_header_text()?,
            Selection::Control(index) => self.format_control_text(index)?,
        };
        Ok(denormalize_newlines(&text))
    }

    // ── Selection & keyboard editing ──────────────────────────────────────────

    /// Select the dialog or one control.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        if let Selection::Control(index) = selection {
            if index >= self.control_count() {
                return Err(DlgError::NoSuchControl(index));
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Advance in tab order: dialog → first control → … → last → dialog.
    pub fn select_next(&mut self) -> Selection {
        let count = self.control_count();
        self.selection = match self.selection {
            Selection::Dialog if count > 0 => Selection::Control(0),
            Selection::Control(i) if i + 1 < count => Selection::Control(i + 1),
            _ => Selection::Dialog,
        };
        self.selection
    }

    /// Step back in tab order: dialog → last control → … → first → dialog.
    pub fn select_prev(&mut self) -> Selection {
        let count = self.control_count();
        self.selection = match self.selection {
            Selection::Dialog if count > 0 => Selection::Control(count - 1),
            Selection::Control(i) if i > 0 && i <= count => Selection::Control(i - 1),
            _ => Selection::Dialog,
        };
        self.selection
    }

    /// Move or resize the selection by one keyboard stride.
    pub fn nudge(&mut self, direction: Direction, mode: NudgeMode, fine: bool) -> Result<()> {
        let stride = if fine { NUDGE_STRIDE_FINE } else { NUDGE_STRIDE };
        let (dx, dy) = direction.delta(stride);
        let template = self.template.as_mut().ok_or(DlgError::NoTemplate)?;
        match self.selection {
            Selection::Dialog => {
                let h = &mut template.header;
                match mode {
                    NudgeMode::Move => {
                        h.position.x = h.position.x.wrapping_add(dx);
                        h.position.y = h.position.y.wrapping_add(dy);
                    }
                    NudgeMode::Resize => {
                        h.width = h.width.wrapping_add(dx);
                        h.height = h.height.wrapping_add(dy);
                    }
                }
            }
            Selection::Control(index) => {
                let c = template
                    .controls
                    .get_mut(index)
                    .ok_or(DlgError::NoSuchControl(index))?;
                match mode {
                    NudgeMode::Move => {
                        c.x = c.x.wrapping_add(dx);
                        c.y = c.y.wrapping_add(dy);
                    }
                    NudgeMode::Resize => {
                        c.cx = c.cx.wrapping_add(dx);
                        c.cy = c.cy.wrapping_add(dy);
                    }
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn control_count(&self) -> usize {
        self.template.as_ref().map_or(0, |t| t.controls.len())
    }
}

/// Editor text → parser input: LF line endings and a final newline.
fn surface_to_model(text: &str) -> String {
    let mut buf = text.to_owned();
    normalize_newlines(&mut buf);
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf
}

// ── Disk encoding ─────────────────────────────────────────────────────────────

/// Detect the encoding of `bytes` and return it with the decoded text.
///
/// Detection order:
/// 1. UTF-16 LE BOM (`FF FE`)
/// 2. UTF-16 BE BOM (`FE FF`)
/// 3. UTF-8 BOM (`EF BB BF`)
/// 4. Valid UTF-8 without BOM
/// 5. Fallback: ANSI, each byte read as the Latin-1 character of that value
pub fn detect_and_decode(bytes: &[u8]) -> (Encoding, String) {
    if let Some(payload) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        return (Encoding::Utf16Le, String::from_utf16_lossy(&units));
    }

    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return (Encoding::Utf16Be, String::from_utf16_lossy(&units));
    }

    if let Some(payload) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return (Encoding::Utf8Bom, String::from_utf8_lossy(payload).into_owned());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (Encoding::Utf8, text.to_owned()),
        Err(_) => (Encoding::Ansi, bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Encode `text` for disk, byte-order mark first.  Characters outside
/// Latin-1 are written as `?` in ANSI output.
pub fn encode_for_disk(text: &str, encoding: Encoding) -> Vec<u8> {
    let mut out = encoding.bom().to_vec();
    match encoding {
        Encoding::Utf8 | Encoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
        Encoding::Utf16Le => out.extend(text.encode_utf16().flat_map(u16::to_le_bytes)),
        Encoding::Utf16Be => out.extend(text.encode_utf16().flat_map(u16::to_be_bytes)),
        Encoding::Ansi => out.extend(
            text.chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')),
        ),
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::RenderKind;
    use crate::parser::ParseErrorKind;

    const SCENARIO_A: &str = "100 DIALOGEX 0, 0, 186, 95\r\n\
                              CAPTION \"Test\"\r\n\
                              FONT 8, \"MS Shell Dlg\"\r\n\
                              BEGIN\r\n\
                              \x20   DEFPUSHBUTTON \"OK\", 1, 129, 7, 50, 14\r\n\
                              END\r\n";

    fn loaded(text: &str) -> Document {
        let mut doc = Document::new();
        doc.load_text(text).expect("template should load");
        doc
    }

    #[test]
    fn title_clean_untitled() {
        assert_eq!(Document::new().window_title(), "Dialog Editor");
    }

    #[test]
    fn title_dirty_untitled() {
        let mut doc = loaded(SCENARIO_A);
        doc.dirty = true;
        assert_eq!(doc.window_title(), "*Untitled.dlg \u{2014} Dialog Editor");
    }

    #[test]
    fn title_with_path() {
        let mut doc = Document::new();
        doc.path = Some(PathBuf::from("res/about.dlg"));
        assert_eq!(doc.window_title(), "about.dlg \u{2014} Dialog Editor");
        doc.dirty = true;
        assert_eq!(doc.window_title(), "*about.dlg \u{2014} Dialog Editor");
    }

    #[test]
    fn scenario_a_loads() {
        let doc = loaded(SCENARIO_A);
        let t = doc.template().expect("template");
        assert_eq!((t.header.position.x, t.header.position.y), (0, 0));
        assert_eq!((t.header.width, t.header.height), (186, 95));
        assert_eq!(t.header.caption, "Test");
        assert_eq!(t.controls.len(), 1);
        let c = &t.controls[0];
        assert_eq!(c.kind, RenderKind::new(5, 0));
        assert_eq!(c.text, "OK");
        assert_eq!(c.id, "1");
        assert_eq!((c.x, c.y, c.cx, c.cy), (129, 7, 50, 14));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn default_template_loads_untitled() {
        let mut doc = Document::new();
        doc.load_template(TemplateSource::Default).expect("default");
        assert!(doc.no_file_loaded());
        assert_eq!(doc.display_name(), UNTITLED_NAME);
        let t = doc.template().expect("template");
        assert_eq!(t.header.caption, "Dialog");
        assert_eq!(t.controls.len(), 2);
        assert_eq!(t.controls[1].id, "IDCANCEL");
    }

    #[test]
    fn failed_load_keeps_previous_template() {
        let mut doc = loaded(SCENARIO_A);
        let err = doc
            .load_text("1 DIALOG 0, 0, 1, 1\nCAPTION \"Oops\nBEGIN\nEND\n")
            .unwrap_err();
        assert!(matches!(err, DlgError::Parse(_)));
        let diag = doc.diagnostics();
        assert_eq!(diag.line_number, 2);
        assert_eq!(
            diag.last_error.map(|e| e.kind),
            Some(ParseErrorKind::UnterminatedDialogCaption)
        );
        assert_eq!(doc.template().expect("kept").header.caption, "Test");
    }

    #[test]
    fn missing_file_keeps_previous_template() {
        let mut doc = loaded(SCENARIO_A);
        let err = doc
            .load_template(TemplateSource::File(PathBuf::from("/nonexistent/x.dlg")))
            .unwrap_err();
        assert!(matches!(err, DlgError::Io(_)));
        assert_eq!(doc.diagnostics().line_number, 0);
        assert!(doc.template().is_some());
    }

    #[test]
    fn template_text_round_trips() {
        let mut doc = loaded(SCENARIO_A);
        let text = doc.template_text().expect("text");
        assert_eq!(
            text,
            "100 DIALOGEX 0, 0, 186, 95\nCAPTION \"Test\"\nFONT 8, \"MS Shell Dlg\"\nBEGIN\n\
             \tDEFPUSHBUTTON \"OK\", 1, 129, 7, 50, 14\nEND\n"
        );
    }

    #[test]
    fn brace_template_ends_with_brace() {
        let mut doc = loaded("1 DIALOG 0, 0, 10, 10\n{\n\n  LTEXT \"a\", 1, 0, 0, 5, 5\n\n}\n");
        let text = doc.template_text().expect("text");
        assert!(text.ends_with("5, 5\n}\n"));
    }

    #[test]
    fn header_edit_replaces_header_only_on_success() {
        let mut doc = loaded(SCENARIO_A);
        let err = doc.parse_header_text("100 DIALOGEX 0, 0\r\nBEGIN").unwrap_err();
        assert!(matches!(err, DlgError::Parse(_)));
        assert_eq!(doc.template().expect("t").header.width, 186);

        doc.parse_header_text("100 DIALOGEX 4, 5, 60, 70\r\nCAPTION \"New\"\r\nBEGIN")
            .expect("valid header");
        let h = &doc.template().expect("t").header;
        assert_eq!((h.position.x, h.position.y, h.width, h.height), (4, 5, 60, 70));
        assert_eq!(h.caption, "New");
        assert!(h.head_text.ends_with("BEGIN\n"));
        assert!(doc.is_dirty());
    }

    #[test]
    fn control_edit_without_final_newline() {
        let mut doc = loaded(SCENARIO_A);
        doc.parse_control_text("PUSHBUTTON \"Go\", 7, 1, 2, 3, 4", 0)
            .expect("control");
        let c = &doc.template().expect("t").controls[0];
        assert_eq!(c.kind, RenderKind::new(5, 1));
        assert_eq!(c.id, "7");
    }

    #[test]
    fn failed_control_edit_empties_owned_strings() {
        let mut doc = loaded(SCENARIO_A);
        assert!(doc.parse_control_text("PUSHBUTTON \"Go\"", 0).is_err());
        let c = &doc.template().expect("t").controls[0];
        assert_eq!(c.id, "");
        assert_eq!(c.style, "");
        assert_eq!(c.ex_style, "");
        assert_eq!(
            doc.diagnostics().last_error.map(|e| e.kind),
            Some(ParseErrorKind::MissingParametersAfterCaption)
        );
    }

    #[test]
    fn control_edit_index_is_checked() {
        let mut doc = loaded(SCENARIO_A);
        assert!(matches!(
            doc.parse_control_text("LTEXT \"a\", 1, 0, 0, 1, 1", 3),
            Err(DlgError::NoSuchControl(3))
        ));
        assert!(matches!(Document::new().format_header_text(), Err(DlgError::NoTemplate)));
    }

    #[test]
    fn add_and_delete_controls() {
        let mut doc = loaded(SCENARIO_A);
        assert!(doc.add_control_text("BOGUS").is_err());
        assert_eq!(doc.template().expect("t").controls.len(), 1);

        let index = doc
            .add_control_text("GROUPBOX \"Options\", IDC_GROUP, 7, 30, 100, 40\r\n")
            .expect("add");
        assert_eq!(index, 1);
        assert_eq!(doc.selection(), Selection::Control(1));
        assert_eq!(doc.template().expect("t").controls.len(), 2);

        let removed = doc.delete_control(0).expect("delete");
        assert_eq!(removed.id, "1");
        assert_eq!(doc.selection(), Selection::Dialog);
        assert_eq!(doc.template().expect("t").controls[0].id, "IDC_GROUP");
        assert!(matches!(doc.delete_control(5), Err(DlgError::NoSuchControl(5))));
    }

    #[test]
    fn tab_order_cycles_through_dialog() {
        let mut doc = loaded(DEFAULT_TEMPLATE);
        assert_eq!(doc.select_next(), Selection::Control(0));
        assert_eq!(doc.select_next(), Selection::Control(1));
        assert_eq!(doc.select_next(), Selection::Dialog);
        assert_eq!(doc.select_prev(), Selection::Control(1));
        assert_eq!(doc.select_prev(), Selection::Control(0));
        assert_eq!(doc.select_prev(), Selection::Dialog);
    }

    #[test]
    fn tab_order_without_controls_stays_on_dialog() {
        let mut doc = loaded("1 DIALOG 0, 0, 1, 1\nBEGIN\nEND\n");
        assert_eq!(doc.select_next(), Selection::Dialog);
        assert_eq!(doc.select_prev(), Selection::Dialog);
        assert!(matches!(doc.select(Selection::Control(0)), Err(DlgError::NoSuchControl(0))));
    }

    #[test]
    fn nudge_moves_and_resizes() {
        let mut doc = loaded(SCENARIO_A);
        doc.nudge(Direction::Right, NudgeMode::Move, false).expect("nudge");
        doc.nudge(Direction::Down, NudgeMode::Resize, true).expect("nudge");
        let h = &doc.template().expect("t").header;
        assert_eq!(h.position.x, 8);
        assert_eq!(h.height, 96);
        assert!(doc.is_dirty());

        doc.select(Selection::Control(0)).expect("select");
        doc.nudge(Direction::Up, NudgeMode::Move, false).expect("nudge");
        doc.nudge(Direction::Left, NudgeMode::Resize, true).expect("nudge");
        let c = &doc.template().expect("t").controls[0];
        assert_eq!((c.x, c.y, c.cx, c.cy), (129, -1, 49, 14));
    }

    #[test]
    fn nudge_wraps_at_coordinate_limits() {
        let mut doc = loaded("1 DIALOG 2147483647, 0, 10, 10\nBEGIN\n\tLTEXT \"x\", 1, 0, -2147483648, 1, 1\nEND\n");
        doc.nudge(Direction::Right, NudgeMode::Move, false).expect("nudge");
        let h = &doc.template().expect("t").header;
        assert_eq!(h.position.x, i32::MIN + 7);

        doc.select(Selection::Control(0)).expect("select");
        doc.nudge(Direction::Up, NudgeMode::Move, true).expect("nudge");
        assert_eq!(doc.template().expect("t").controls[0].y, i32::MAX);
    }

    #[test]
    fn selection_text_is_crlf_and_patched() {
        let mut doc = loaded(SCENARIO_A);
        doc.nudge(Direction::Left, NudgeMode::Resize, false).expect("nudge");
        let text = doc.selection_text().expect("text");
        assert!(text.starts_with("100 DIALOGEX 0, 0, 178, 95\r\n"));
        assert!(text.ends_with("BEGIN\r\n"));

        doc.select_next();
        assert_eq!(
            doc.selection_text().expect("text"),
            "\tDEFPUSHBUTTON \"OK\", 1, 129, 7, 50, 14\r\n"
        );
    }

    #[test]
    fn apply_selection_text_follows_selection() {
        let mut doc = loaded(SCENARIO_A);
        doc.select(Selection::Control(0)).expect("select");
        doc.apply_selection_text("\tDEFPUSHBUTTON \"Yes\", IDYES, 1, 1, 40, 14\r\n")
            .expect("apply");
        assert_eq!(doc.template().expect("t").controls[0].text, "Yes");

        doc.select(Selection::Dialog).expect("select");
        doc.apply_selection_text("100 DIALOG 0, 0, 50, 50\r\n{\r\n")
            .expect("apply");
        assert!(doc.template_text().expect("text").ends_with("}\n"));
    }

    #[test]
    fn free_template_drops_model() {
        let mut doc = loaded(SCENARIO_A);
        doc.free_template();
        assert!(doc.template().is_none());
        assert!(matches!(doc.template_text(), Err(DlgError::NoTemplate)));
    }

    #[test]
    fn encoding_display() {
        assert_eq!(Encoding::Utf8.as_str(), "UTF-8");
        assert_eq!(Encoding::Utf8Bom.as_str(), "UTF-8 BOM");
        assert_eq!(Encoding::Utf16Le.as_str(), "UTF-16 LE");
        assert_eq!(Encoding::Utf16Be.as_str(), "UTF-16 BE");
        assert_eq!(Encoding::Ansi.as_str(), "ANSI");
    }

    #[test]
    fn detect_encoding_utf16() {
        let (enc, text) = detect_and_decode(b"\xFF\xFEh\x00i\x00");
        assert_eq!(enc, Encoding::Utf16Le);
        assert_eq!(text, "hi");

        let (enc, text) = detect_and_decode(b"\xFE\xFF\x00h\x00i");
        assert_eq!(enc, Encoding::Utf16Be);
        assert_eq!(text, "hi");
    }

    #[test]
    fn detect_encoding_utf8_bom() {
        let (enc, text) = detect_and_decode(b"\xEF\xBB\xBFhello");
        assert_eq!(enc, Encoding::Utf8Bom);
        assert_eq!(text, "hello");
        assert_eq!(encode_for_disk(&text, enc), b"\xEF\xBB\xBFhello");
        assert_eq!(encode_for_disk(&text, Encoding::Utf8), b"hello");
    }

    #[test]
    fn detect_encoding_ansi_fallback() {
        let (enc, text) = detect_and_decode(b"caf\xE9");
        assert_eq!(enc, Encoding::Ansi);
        assert_eq!(text, "café");
        assert_eq!(encode_for_disk(&text, Encoding::Ansi), b"caf\xE9");
        assert_eq!(encode_for_disk("\u{2014}", Encoding::Ansi), b"?");
    }

    #[test]
    fn utf16_encoding_writes_bom() {
        assert_eq!(encode_for_disk("hi", Encoding::Utf16Le), b"\xFF\xFEh\x00i\x00");
        assert_eq!(encode_for_disk("hi", Encoding::Utf16Be), b"\xFE\xFF\x00h\x00i");
    }
}
