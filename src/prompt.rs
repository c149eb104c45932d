//! Modal prompt: single-line text entry or a yes/no confirmation.
//!
//! A prompt captures every key while it is open. The controller feeds it
//! `PromptInput`s and acts on the `PromptStep` it gets back.

use std::path::PathBuf;

/// How the prompt reads input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    FreeText,
    Confirm,
}

/// What the prompt's answer will be used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purpose {
    Rename { target: PathBuf },
    ConfirmRename { target: PathBuf, new_name: String },
    Delete { target: PathBuf },
    Copy { source: PathBuf },
    Move { source: PathBuf },
    Create,
    Search,
}

impl Purpose {
    pub fn kind(&self) -> PromptKind {
        match self {
            Purpose::ConfirmRename { .. } | Purpose::Delete { .. } => PromptKind::Confirm,
            _ => PromptKind::FreeText,
        }
    }
}

/// One logical key as seen by a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptInput {
    Char(char),
    Backspace,
    Enter,
    Yes,
    No,
    Cancel,
}

/// Result of feeding one input to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    /// Keep prompting.
    Pending,
    /// FreeText committed with this buffer.
    Submitted(String),
    /// Confirm answered.
    Answered(bool),
    /// FreeText abandoned.
    Cancelled,
}

/// State of an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    buffer: String,
    cursor_len: usize,
    purpose: Purpose,
}

impl Prompt {
    pub fn new(purpose: Purpose) -> Self {
        Self {
            buffer: String::new(),
            cursor_len: 0,
            purpose,
        }
    }

    /// Open a FreeText prompt with `initial` already typed.
    pub fn with_text(purpose: Purpose, initial: &str) -> Self {
        let mut prompt = Self::new(purpose);
        if prompt.kind() == PromptKind::FreeText {
            prompt.buffer = initial.to_string();
            prompt.cursor_len = prompt.buffer.chars().count();
        }
        prompt
    }

    pub fn kind(&self) -> PromptKind {
        self.purpose.kind()
    }

    pub fn purpose(&self) -> &Purpose {
        &self.purpose
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters; always the end of the buffer.
    pub fn cursor_len(&self) -> usize {
        self.cursor_len
    }

    /// Feed one input.
    pub fn handle(&mut self, input: PromptInput) -> PromptStep {
        match self.kind() {
            PromptKind::FreeText => self.handle_text(input),
            PromptKind::Confirm => match input {
                PromptInput::Yes => PromptStep::Answered(true),
                PromptInput::No => PromptStep::Answered(false),
                PromptInput::Char('y' | 'Y') => PromptStep::Answered(true),
                PromptInput::Char('n' | 'N') => PromptStep::Answered(false),
                _ => PromptStep::Pending,
            },
        }
    }

    fn handle_text(&mut self, input: PromptInput) -> PromptStep {
        match input {
            PromptInput::Char(c) if !c.is_control() => {
                self.buffer.push(c);
                self.cursor_len += 1;
                PromptStep::Pending
            }
            PromptInput::Char(_) => PromptStep::Pending,
            PromptInput::Backspace => {
                if self.buffer.pop().is_some() {
                    self.cursor_len -= 1;
                }
                PromptStep::Pending
            }
            PromptInput::Enter => {
                self.cursor_len = 0;
                PromptStep::Submitted(std::mem::take(&mut self.buffer))
            }
            PromptInput::Cancel => PromptStep::Cancelled,
            PromptInput::Yes => self.handle_text(PromptInput::Char('y')),
            PromptInput::No => self.handle_text(PromptInput::Char('n')),
        }
    }

    /// Question shown above the input.
    pub fn title(&self) -> String {
        match &self.purpose {
            Purpose::Rename { target } => format!("Rename {}", display_name(target)),
            Purpose::ConfirmRename { target, new_name } => {
                format!("Rename {} to {}? (y/n)", display_name(target), new_name)
            }
            Purpose::Delete { target } => {
                format!("Are you sure to delete {}? (y/n)", display_name(target))
            }
            Purpose::Copy { source } => format!("Copy {} to directory", display_name(source)),
            Purpose::Move { source } => format!("Move {} to directory", display_name(source)),
            Purpose::Create => "Create new file".to_string(),
            Purpose::Search => "Search".to_string(),
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
