// ── Control keyword table ─────────────────────────────────────────────────────
//
// The closed set of control statements understood by the parser, grouped by
// how the editor draws them.  The same table drives both directions:
//   • parsing: first prefix match in table order → (class, type);
//   • formatting: exact (class, type) → keyword.

use serde::Serialize;

/// Keywords per render class, in match order.
const GROUPS: [&[&str]; 8] = [
    &["CONTROL"],
    &["AUTO3STATE", "STATE3", "AUTOCHECKBOX", "CHECKBOX"],
    &["AUTORADIOBUTTON", "RADIOBUTTON"],
    &["EDITTEXT", "LISTBOX", "COMBOBOX", "ICON"],
    &["LTEXT", "CTEXT", "RTEXT", "PUSHBOX"],
    &["DEFPUSHBUTTON", "PUSHBUTTON"],
    &["GROUPBOX"],
    &["SCROLLBAR"],
];

/// Render class of a generic `CONTROL` statement.
pub const CLASS_CUSTOM: u8 = 0;
/// Render class of EDITTEXT / LISTBOX / COMBOBOX / ICON.
pub const CLASS_CLIENT_BOX: u8 = 3;
/// Render class of SCROLLBAR.
pub const CLASS_SCROLLBAR: u8 = 7;
/// Render type of ICON within [`CLASS_CLIENT_BOX`].
pub const TYPE_ICON: u8 = 3;

/// Which keyword a control statement used: a render class (group) and a
/// render type (position within the group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RenderKind {
    pub class: u8,
    #[serde(rename = "type")]
    pub ty: u8,
}

/// How a control statement spells its caption field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionForm {
    /// No caption field at all.
    None,
    /// Bare resource token (ICON).
    Token,
    /// Double-quoted string with escape codes.
    Quoted,
}

impl RenderKind {
    pub const fn new(class: u8, ty: u8) -> Self {
        Self { class, ty }
    }

    /// `true` for the generic `CONTROL` statement, which carries a window
    /// class and a separate style field.
    pub fn is_custom(self) -> bool {
        self.class == CLASS_CUSTOM
    }

    pub fn caption_form(self) -> CaptionForm {
        match (self.class, self.ty) {
            (CLASS_CLIENT_BOX, TYPE_ICON) => CaptionForm::Token,
            (CLASS_CLIENT_BOX, _) | (CLASS_SCROLLBAR, _) => CaptionForm::None,
            _ => CaptionForm::Quoted,
        }
    }

    /// The keyword spelling, or `None` for indices outside the table.
    pub fn keyword(self) -> Option<&'static str> {
        KeywordTable::get().keyword(self)
    }
}

/// Forward and inverse lookup over the keyword groups.
#[derive(Debug)]
pub struct KeywordTable {
    groups: &'static [&'static [&'static str]],
}

static TABLE: KeywordTable = KeywordTable { groups: &GROUPS };

impl KeywordTable {
    /// The one shared table.
    pub fn get() -> &'static KeywordTable {
        &TABLE
    }

    /// Match the start of `text` against every keyword in table order and
    /// return the first hit together with the keyword's length.
    pub fn match_prefix(&self, text: &str) -> Option<(RenderKind, usize)> {
        self.entries()
            .find(|(_, keyword)| text.starts_with(*keyword))
            .map(|(kind, keyword)| (kind, keyword.len()))
    }

    /// Exact reverse lookup.
    pub fn keyword(&self, kind: RenderKind) -> Option<&'static str> {
        self.groups
            .get(usize::from(kind.class))?
            .get(usize::from(kind.ty))
            .copied()
    }

    /// Every `(kind, keyword)` pair in match order.
    pub fn entries(&self) -> impl Iterator<Item = (RenderKind, &'static str)> + '_ {
        self.groups.iter().enumerate().flat_map(|(class, group)| {
            group
                .iter()
                .enumerate()
                .map(move |(ty, &keyword)| (RenderKind::new(class as u8, ty as u8), keyword))
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_nineteen_keywords() {
        assert_eq!(KeywordTable::get().entries().count(), 19);
    }

    #[test]
    fn every_keyword_maps_back_to_itself() {
        let table = KeywordTable::get();
        for (kind, keyword) in table.entries() {
            assert_eq!(table.keyword(kind), Some(keyword));
            let (found, len) = table
                .match_prefix(&format!("{keyword} \"x\""))
                .expect("keyword should match");
            assert_eq!(found, kind, "{keyword}");
            assert_eq!(len, keyword.len());
        }
    }

    #[test]
    fn known_positions() {
        let table = KeywordTable::get();
        assert_eq!(table.keyword(RenderKind::new(1, 2)), Some("AUTOCHECKBOX"));
        assert_eq!(table.keyword(RenderKind::new(3, 3)), Some("ICON"));
        assert_eq!(table.keyword(RenderKind::new(5, 0)), Some("DEFPUSHBUTTON"));
        assert_eq!(table.keyword(RenderKind::new(6, 1)), None);
        assert_eq!(table.keyword(RenderKind::new(8, 0)), None);
    }

    #[test]
    fn unknown_statement_does_not_match() {
        assert_eq!(KeywordTable::get().match_prefix("BUTTON \"x\""), None);
        assert_eq!(KeywordTable::get().match_prefix("ltext"), None);
    }

    #[test]
    fn caption_forms_by_class() {
        assert_eq!(RenderKind::new(3, 0).caption_form(), CaptionForm::None);
        assert_eq!(RenderKind::new(3, 2).caption_form(), CaptionForm::None);
        assert_eq!(RenderKind::new(3, 3).caption_form(), CaptionForm::Token);
        assert_eq!(RenderKind::new(7, 0).caption_form(), CaptionForm::None);
        assert_eq!(RenderKind::new(0, 0).caption_form(), CaptionForm::Quoted);
        assert_eq!(RenderKind::new(4, 0).caption_form(), CaptionForm::Quoted);
    }
}
