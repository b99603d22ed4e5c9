use crate::imports::*;

use colored::Colorize;
use std::io::{BufRead, Write};

/*
    Interactive stdin/stdout console. Plain render mode drops all colour so output can
    be piped or diffed.
*/
pub struct TerminalConsole {
    plain: bool,
}

impl TerminalConsole {
    pub fn new(plain: bool) -> Self {
        Self { plain }
    }

    fn style(&self, tone: Tone, text: &str) -> String {
        if self.plain {
            return text.to_string();
        }
        match tone {
            Tone::Plain => text.to_string(),
            Tone::Good => text.green().to_string(),
            Tone::Bad => text.red().bold().to_string(),
            Tone::Warning => text.yellow().to_string(),
            Tone::Heading => text.cyan().bold().to_string(),
        }
    }

    fn read_line(&self, message: &str) -> Result<String> {
        print!("{}: ", self.style(Tone::Heading, message));
        std::io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut input)
            .context("failed to read from stdin")?;
        if read == 0 {
            return Err(AssistantError::InputClosed.into());
        }
        Ok(input.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Console for TerminalConsole {
    fn print(&self, tone: Tone, text: &str) {
        println!("{}", self.style(tone, text));
    }

    fn prompt_line(&self, message: &str, initial: Option<&str>) -> Result<String> {
        let message = match initial {
            Some(initial) if !initial.is_empty() => format!("{message} [{initial}]"),
            _ => message.to_string(),
        };
        let input = self.read_line(&message)?;
        match (input.trim(), initial) {
            ("", Some(initial)) => Ok(initial.to_string()),
            (trimmed, _) => Ok(trimmed.to_string()),
        }
    }

    fn prompt_bool(
        &self,
        message: &str,
        yes: &str,
        no: &str,
        allow_skip: bool,
    ) -> Result<Option<bool>> {
        let choices = if allow_skip {
            format!("{message} (y = {yes}, n = {no}, empty = skip)")
        } else {
            format!("{message} (y = {yes}, n = {no})")
        };
        loop {
            let input = self.read_line(&choices)?.trim().to_lowercase();
            match input.as_str() {
                "" if allow_skip => return Ok(None),
                _ if input == yes.to_lowercase() => return Ok(Some(true)),
                _ if input == no.to_lowercase() => return Ok(Some(false)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => self.print(Tone::Warning, "Please answer y or n."),
            }
        }
    }

    fn select(&self, message: &str, options: &[SelectOption]) -> Result<Option<String>> {
        if options.is_empty() {
            return Ok(None);
        }
        self.print(Tone::Heading, message);
        for (index, option) in options.iter().enumerate() {
            println!("  {}) {}", index + 1, option.label);
        }
        loop {
            let input = self.read_line("Choose a number (empty to cancel)")?;
            let input = input.trim();
            if input.is_empty() {
                return Ok(None);
            }
            // Accept either the position or the option value itself.
            if let Ok(position) = input.parse::<usize>() {
                if let Some(option) = position.checked_sub(1).and_then(|i| options.get(i)) {
                    return Ok(Some(option.value.clone()));
                }
            }
            if let Some(option) = options.iter().find(|option| option.value == input) {
                return Ok(Some(option.value.clone()));
            }
            self.print(Tone::Warning, &format!("'{input}' is not one of the options."));
        }
    }
}
