use crate::model::PrefCode;

/// Checked prefecture codes in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    codes: Vec<PrefCode>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a checkbox change. Returns `true` when the selection changed.
    pub fn toggle(&mut self, pref_code: PrefCode, checked: bool) -> bool {
        if checked {
            if self.contains(pref_code) {
                return false;
            }
            self.codes.push(pref_code);
            true
        } else {
            let before = self.codes.len();
            self.codes.retain(|code| *code != pref_code);
            self.codes.len() != before
        }
    }

    pub fn contains(&self, pref_code: PrefCode) -> bool {
        self.codes.contains(&pref_code)
    }

    pub fn codes(&self) -> &[PrefCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = PrefCode> + '_ {
        self.codes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
