use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::{LanguageState, Store};
use crate::types::{Locale, VALID_LOCALES};

/// Show the preferred locale, or switch to `locale` and persist it.
pub fn cmd_locale(locale: Option<Locale>, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    let language = Store::new(LanguageState::new(config.locale));

    let changed = match locale {
        Some(next) => language.update_if(|state| state.set_locale(next)),
        None => false,
    };

    if changed {
        config.locale = language.read(|state| state.locale);
        config.save()?;
        language.update(LanguageState::change_complete);
        tracing::debug!(locale = %config.locale, "locale changed");
    }

    let current = language.get();
    let text = match (locale, changed) {
        (Some(_), true) => format!("Locale set to {}", current.locale.to_string().cyan()),
        (Some(_), false) => format!(
            "Locale is already {}",
            current.locale.to_string().cyan()
        ),
        (None, _) => format!(
            "{} {}",
            current.locale.to_string().cyan(),
            format!("(available: {})", VALID_LOCALES.join(", ")).dimmed()
        ),
    };

    CommandOutput::new(json!({
        "locale": current.locale.to_string(),
        "changed": changed,
        "available": VALID_LOCALES,
    }))
    .with_text(text)
    .print(output)
}
