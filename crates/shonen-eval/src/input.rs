//! The prompt sink `READ` statements draw their answers from.

use std::collections::VecDeque;

/// Supplies answers to `READ` prompts.
///
/// Returning `None` means the user cancelled; the engine treats it as an
/// empty answer.
pub trait InputSource {
    fn prompt(&mut self, prompt: &str) -> Option<String>;
}

impl<F> InputSource for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        self(prompt)
    }
}

/// Answers from a fixed list, consumed in order. Records every prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front()
    }
}

/// A sink that never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn prompt(&mut self, _prompt: &str) -> Option<String> {
        None
    }
}
