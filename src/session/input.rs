//! Input sources for the interactive prompt

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Something that can ask the user a question and return one line of answer
pub trait InputSource {
    /// Show `message` and read one line; `None` when input is exhausted
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>>;
}

/// Terminal input: prompts go to stdout (or stderr when stdout carries JSON)
pub struct StdinInput {
    prompt_to_stderr: bool,
}

impl StdinInput {
    /// Create a stdin-backed input source
    pub fn new(prompt_to_stderr: bool) -> Self {
        Self { prompt_to_stderr }
    }
}

impl InputSource for StdinInput {
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        if self.prompt_to_stderr {
            let mut err = io::stderr().lock();
            write!(err, "{}", message)?;
            err.flush()?;
        } else {
            let mut out = io::stdout().lock();
            write!(out, "{}", message)?;
            out.flush()?;
        }

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Pre-recorded answers, for tests and non-interactive callers
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    /// Create an input source that replays `answers` in order
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

    /// Prompts shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.prompts.push(message.to_string());
        Ok(self.answers.pop_front())
    }
}
