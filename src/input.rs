// Copyright 2026 Gleaner Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interactive input for the two run parameters.
//!
//! Parameter parsing is strict: non-numeric page-count input is a
//! configuration error surfaced to the operator, never silently coerced to a
//! default.

use crate::errors::ConfigError;
use anyhow::Result;

/// Source of interactive run parameters. Abstracted so tests can script the
/// answers.
pub trait InputProvider {
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Line editor over the controlling terminal.
pub struct ConsoleInput {
    editor: rustyline::DefaultEditor,
}

impl ConsoleInput {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: rustyline::DefaultEditor::new()?,
        })
    }
}

impl InputProvider for ConsoleInput {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        Ok(self.editor.readline(prompt)?)
    }
}

/// Ask how many listing pages to visit. The raw reply is parsed as a signed
/// integer so the ≤ 0 boundary stays an explicit, observable case downstream.
pub fn prompt_page_count(input: &mut dyn InputProvider) -> Result<i64> {
    let raw = input.read_line("How many pages of StackOverflow do you want to scrape? ")?;
    let trimmed = raw.trim();
    let count = trimmed
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidPageCount(trimmed.to_string()))?;
    Ok(count)
}

/// Ask for the destination file name (including extension).
pub fn prompt_destination(input: &mut dyn InputProvider) -> Result<String> {
    let raw =
        input.read_line("What CSV file name should the data be exported to? (include extension) ")?;
    let name = raw.trim().to_string();
    if name.is_empty() {
        return Err(ConfigError::MissingDestination.into());
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays canned answers in order.
    pub struct ScriptedInput {
        answers: Vec<String>,
    }

    impl ScriptedInput {
        pub fn new(answers: &[&str]) -> Self {
            let mut answers: Vec<String> = answers.iter().map(|s| s.to_string()).collect();
            answers.reverse();
            Self { answers }
        }
    }

    impl InputProvider for ScriptedInput {
        fn read_line(&mut self, _prompt: &str) -> Result<String> {
            self.answers
                .pop()
                .ok_or_else(|| anyhow::anyhow!("no scripted answer left"))
        }
    }

    #[test]
    fn test_page_count_parses_trimmed_integer() {
        let mut input = ScriptedInput::new(&["  7  "]);
        assert_eq!(prompt_page_count(&mut input).unwrap(), 7);
    }

    #[test]
    fn test_page_count_accepts_negative_values() {
        // The ≤ 0 policy lives in the pagination loop, not the prompt.
        let mut input = ScriptedInput::new(&["-2"]);
        assert_eq!(prompt_page_count(&mut input).unwrap(), -2);
    }

    #[test]
    fn test_non_numeric_page_count_is_a_config_error() {
        let mut input = ScriptedInput::new(&["three"]);
        let err = prompt_page_count(&mut input).unwrap_err();
        let config = err.downcast_ref::<ConfigError>().expect("ConfigError");
        assert!(matches!(config, ConfigError::InvalidPageCount(v) if v == "three"));
    }

    #[test]
    fn test_destination_requires_non_empty_name() {
        let mut input = ScriptedInput::new(&["questions.csv"]);
        assert_eq!(prompt_destination(&mut input).unwrap(), "questions.csv");

        let mut input = ScriptedInput::new(&["   "]);
        let err = prompt_destination(&mut input).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
