use rand::seq::SliceRandom;
use teloxide::utils::html;
use thiserror::Error;

pub const OPTIONS_PER_QUESTION: usize = 4;

/// One entry of the static question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizEntry {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [&'static str],
    pub correct: usize,
    pub explanation: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question list is empty")]
    Empty,

    #[error("question #{id} is malformed: {reason}")]
    MalformedEntry { id: u32, reason: String },
}

impl QuizEntry {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(QuizError::MalformedEntry {
                id: self.id,
                reason: format!(
                    "expected {OPTIONS_PER_QUESTION} options, got {}",
                    self.options.len()
                ),
            });
        }
        if self.correct >= OPTIONS_PER_QUESTION {
            return Err(QuizError::MalformedEntry {
                id: self.id,
                reason: format!("correct option index {} is out of range", self.correct),
            });
        }
        Ok(())
    }
}

/// A question drawn for one user, plus whether they got it right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    entry: QuizEntry,
    is_correct: bool,
}

impl Quiz {
    /// Draws a question uniformly at random from `entries`.
    pub fn random(entries: &[QuizEntry]) -> Result<Self, QuizError> {
        let entry = entries.choose(&mut rand::thread_rng()).ok_or(QuizError::Empty)?;
        Self::from_entry(*entry)
    }

    pub fn from_entry(entry: QuizEntry) -> Result<Self, QuizError> {
        entry.validate()?;
        Ok(Self {
            entry,
            is_correct: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.entry.id
    }

    pub fn correct_index(&self) -> usize {
        self.entry.correct
    }

    /// `choice` is what the user pressed, counted from 1.
    pub fn is_correct_choice(&self, choice: usize) -> bool {
        choice.checked_sub(1) == Some(self.entry.correct)
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub fn set_correct(&mut self, is_correct: bool) {
        self.is_correct = is_correct;
    }

    pub fn render_question(&self) -> String {
        let mut text = format!(
            "<b>What will be printed to the console?</b>\n\n<pre>{}</pre>\n\n<b>Options:</b>",
            html::escape(self.entry.question)
        );
        for (i, option) in self.entry.options.iter().enumerate() {
            text.push_str(&format!("\nOption {}: {}", i + 1, html::escape(option)));
        }
        text
    }

    pub fn render_result(&self) -> String {
        let verdict = if self.is_correct {
            "<b>✅ Correct!</b>".to_owned()
        } else {
            format!(
                "<b>❌ Wrong!</b>\n\n<b>Correct answer:</b> {}",
                html::escape(self.entry.options[self.entry.correct])
            )
        };
        format!(
            "{verdict}\n\n<b>Explanation:</b>\n<tg-spoiler>{}</tg-spoiler>",
            html::escape(self.entry.explanation)
        )
    }
}
