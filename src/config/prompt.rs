// file: src/config/prompt.rs
// version: 1.0.0
// guid: 24e36a8f-620a-487e-92e7-600f25a0b488

//! Interactive prompt resolver
//!
//! Fields deliberately left out of file defaulting (capacity bounds and the
//! instance type) are collected from the operator here, through the same
//! rules the struct validator uses.

use super::rules::FieldRule;
use crate::error::{ClusterConfigError, FieldError, FieldErrorKind};
use crate::Result;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::debug;

/// Terminal (or equivalent) boundary that asks the operator for one value
pub trait Prompter {
    /// Show `label`, with `default` when there is one, and return the raw answer.
    /// An empty answer means "accept the default".
    fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String>;
}

/// Prompter over any line reader and writer, normally stdin/stdout
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) => write!(self.output, "{} [{}]: ", label, default)?,
            None => write!(self.output, "{}: ", label)?,
        }
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(ClusterConfigError::prompt(format!(
                "input closed while waiting for \"{}\"",
                label
            )));
        }

        Ok(answer.trim().to_string())
    }
}

/// Prompter that replays queued answers, for tests and non-interactive runs
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Labels asked so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, label: &str, _default: Option<&str>) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ClusterConfigError::prompt(format!("no answer queued for \"{}\"", label)))
    }
}

/// One prompted field: the label shown and the rule the answer must satisfy
pub struct PromptItem<T> {
    pub label: &'static str,
    pub rule: FieldRule<T>,
}

/// Ordered prompt sequence for a target struct
pub struct PromptValidation<T> {
    pub skip_populated_fields: bool,
    pub items: Vec<PromptItem<T>>,
}

impl<T> PromptValidation<T> {
    /// Labels in the order they will be asked
    pub fn labels(&self) -> Vec<&'static str> {
        self.items.iter().map(|item| item.label).collect()
    }

    /// Ask for every item in order. Stops at the first rejected answer and
    /// returns its field error so the caller can decide whether to retry.
    pub fn run<P>(&self, target: &mut T, prompter: &mut P) -> Result<()>
    where
        P: Prompter + ?Sized,
    {
        for item in &self.items {
            if self.skip_populated_fields && item.rule.is_populated(target) {
                debug!("Keeping populated field {}", item.rule.key);
                continue;
            }

            let default = item.rule.default_text();
            let answer = prompter.ask(item.label, default.as_deref())?;
            let text = match (answer.is_empty(), default) {
                (false, _) => answer,
                (true, Some(default)) => default,
                (true, None) => {
                    return Err(FieldError::new(item.rule.key, FieldErrorKind::MissingRequired).into())
                }
            };

            let value = item.rule.parse_text(&text)?;
            item.rule.apply(target, Some(&value))?;
        }
        Ok(())
    }
}
