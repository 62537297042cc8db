//! The cyclic instruction tape.

use crate::error::ParseError;
use crate::ids::Label;
use serde::Serialize;
use std::fmt;

/// A finite sequence of labels, conceptually repeated forever.
///
/// Step `s` reads the label at phase `s mod len()`. An empty tape can be
/// constructed but is rejected when a walker is analysed.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct InstructionTape {
    labels: Vec<Label>,
}

impl InstructionTape {
    /// Create a tape from its labels.
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    /// Parse a tape from a string of `L`/`R` characters.
    ///
    /// Leading and trailing whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::MissingInstructions);
        }
        let labels = line
            .chars()
            .enumerate()
            .map(|(i, c)| {
                Label::from_char(c).ok_or(ParseError::InvalidLabel {
                    column: i + 1,
                    found: c,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { labels })
    }

    /// Tape length `L`.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the tape holds no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Phase of the tape at a global step.
    ///
    /// # Panics
    ///
    /// Panics if the tape is empty.
    pub fn phase(&self, step: u64) -> usize {
        (step % self.labels.len() as u64) as usize
    }

    /// Label read at the given phase.
    ///
    /// # Panics
    ///
    /// Panics if `phase >= len()`.
    pub fn label(&self, phase: usize) -> Label {
        self.labels[phase]
    }

    /// All labels in tape order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

impl From<Vec<Label>> for InstructionTape {
    fn from(labels: Vec<Label>) -> Self {
        Self::new(labels)
    }
}

impl fmt::Display for InstructionTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}

impl fmt::Debug for InstructionTape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstructionTape({})", self)
    }
}
