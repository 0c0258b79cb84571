use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

use super::{PromptError, PromptIo};

/// Prompts on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl PromptIo for TerminalPrompt {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?
            .ok_or(PromptError::Cancelled)
    }

    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String, PromptError> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()?;
        Ok(answer)
    }
}
