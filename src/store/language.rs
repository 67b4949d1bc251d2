use serde::{Deserialize, Serialize};

use crate::types::Locale;

/// Preferred display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageState {
    pub locale: Locale,
    /// Set while a locale switch is being applied.
    pub is_changing: bool,
}

impl LanguageState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            is_changing: false,
        }
    }

    /// Switch locale. Returns false when `locale` is already current.
    pub fn set_locale(&mut self, locale: Locale) -> bool {
        if self.locale == locale {
            return false;
        }
        self.locale = locale;
        self.is_changing = true;
        true
    }

    pub fn change_complete(&mut self) {
        self.is_changing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_chinese() {
        assert_eq!(LanguageState::default().locale, Locale::Cn);
    }

    #[test]
    fn test_set_same_locale_is_noop() {
        let mut state = LanguageState::new(Locale::En);
        assert!(!state.set_locale(Locale::En));
        assert!(!state.is_changing);
    }

    #[test]
    fn test_change_cycle() {
        let mut state = LanguageState::new(Locale::En);
        assert!(state.set_locale(Locale::Th));
        assert!(state.is_changing);
        state.change_complete();
        assert_eq!(state.locale, Locale::Th);
        assert!(!state.is_changing);
    }
}
