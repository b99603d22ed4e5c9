use crate::imports::*;

use std::sync::Mutex;

/*
    Test console. Answers are consumed in order; a prompt with no matching answer fails
    the call so tests catch unexpected interaction.
*/

#[derive(Debug, Clone)]
pub enum Answer {
    Line(String),
    Bool(Option<bool>),
    Select(Option<String>),
}

#[derive(Default)]
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<Answer>>,
    prompts: Mutex<Vec<String>>,
    output: Mutex<Vec<(Tone, String)>>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: impl IntoIterator<Item = Answer>) -> Self {
        let console = Self::default();
        console.answers.lock().unwrap().extend(answers);
        console
    }

    pub fn push_answers(&self, answers: impl IntoIterator<Item = Answer>) {
        self.answers.lock().unwrap().extend(answers);
    }

    pub fn line(self, text: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Answer::Line(text.to_string()));
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn output(&self) -> String {
        self.output
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn output_with(&self, tone: Tone) -> Vec<String> {
        self.output
            .lock()
            .unwrap()
            .iter()
            .filter(|(printed, _)| *printed == tone)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, message: &str) -> Result<Answer> {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(AssistantError::InputClosed.into())
    }
}

impl Console for ScriptedConsole {
    fn print(&self, tone: Tone, text: &str) {
        self.output.lock().unwrap().push((tone, text.to_string()));
    }

    fn prompt_line(&self, message: &str, initial: Option<&str>) -> Result<String> {
        match self.next(message)? {
            Answer::Line(text) if text.is_empty() => Ok(initial.unwrap_or_default().to_string()),
            Answer::Line(text) => Ok(text),
            other => Err(anyhow::anyhow!("expected a line answer for '{message}', got {other:?}")),
        }
    }

    fn prompt_bool(
        &self,
        message: &str,
        _yes: &str,
        _no: &str,
        allow_skip: bool,
    ) -> Result<Option<bool>> {
        match self.next(message)? {
            Answer::Bool(None) if !allow_skip => {
                Err(anyhow::anyhow!("skip is not allowed for '{message}'"))
            }
            Answer::Bool(answer) => Ok(answer),
            other => Err(anyhow::anyhow!("expected a bool answer for '{message}', got {other:?}")),
        }
    }

    fn select(&self, message: &str, options: &[SelectOption]) -> Result<Option<String>> {
        match self.next(message)? {
            Answer::Select(Some(value)) => {
                if !options.iter().any(|option| option.value == value) {
                    anyhow::bail!("'{value}' is not an option for '{message}'");
                }
                Ok(Some(value))
            }
            Answer::Select(None) => Ok(None),
            other => Err(anyhow::anyhow!("expected a select answer for '{message}', got {other:?}")),
        }
    }
}
