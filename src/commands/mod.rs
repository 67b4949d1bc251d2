mod browse;
mod cart;
mod config;
mod filter_url;
mod locale;

pub use browse::{BrowseOptions, BrowseSummary, DEFAULT_ROWS, browse_list, cmd_browse};
pub use cart::{
    cmd_cart_add, cmd_cart_clear, cmd_cart_login, cmd_cart_logout, cmd_cart_remove,
    cmd_cart_show, cmd_cart_update,
};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use filter_url::{cmd_url_build, cmd_url_parse};
pub use locale::cmd_locale;

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::error::Result;

/// Output of a command in both machine and human form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form (or JSON if there is none).
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match (output.json, self.text) {
            (false, Some(text)) => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}
