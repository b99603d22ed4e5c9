use crate::imports::*;

pub mod render;
#[cfg(test)]
pub mod scripted;
pub mod terminal;

/*
    Types:
    * Tone - Styling hint for printed messages
    * SelectOption - A (value, label) pair offered in a single-select prompt

    Traits:
    * Console - Blocking line-oriented console the resolver and handlers talk to
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Bad,
    Warning,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub trait Console: Send + Sync {
    fn print(&self, tone: Tone, text: &str);

    /// Read one line. `initial` is shown and returned when the user submits nothing.
    fn prompt_line(&self, message: &str, initial: Option<&str>) -> Result<String>;

    /// Yes/no dialog. `Ok(None)` means the user skipped, only possible with `allow_skip`.
    fn prompt_bool(
        &self,
        message: &str,
        yes: &str,
        no: &str,
        allow_skip: bool,
    ) -> Result<Option<bool>>;

    /// Single selection. `Ok(None)` means nothing was chosen.
    fn select(&self, message: &str, options: &[SelectOption]) -> Result<Option<String>>;

    fn message(&self, tone: Tone, title: &str, text: &str) {
        if title.is_empty() {
            self.print(tone, text);
        } else {
            self.print(tone, &format!("{title}: {text}"));
        }
    }
}

pub fn render_error(console: &dyn Console, title: &str, text: &str) {
    console.message(Tone::Bad, title, text);
}

pub fn render_good(console: &dyn Console, text: &str) {
    console.print(Tone::Good, text);
}

pub fn render_canceled(console: &dyn Console, text: &str) {
    console.print(Tone::Warning, text);
}
