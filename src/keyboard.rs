use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::quiz::OPTIONS_PER_QUESTION;

pub const FIRST_QUESTION: &str = "First question";
pub const NEXT_QUESTION: &str = "Next question";
pub const OPTION_PREFIX: &str = "Option";

pub(crate) fn first_question_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(FIRST_QUESTION)]]).resize_keyboard()
}

pub(crate) fn next_question_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(NEXT_QUESTION)]]).resize_keyboard()
}

pub(crate) fn options_keyboard() -> KeyboardMarkup {
    let row: Vec<KeyboardButton> = (1..=OPTIONS_PER_QUESTION)
        .map(|i| KeyboardButton::new(format!("{OPTION_PREFIX} {i}")))
        .collect();

    KeyboardMarkup::new(vec![row]).resize_keyboard()
}

/// Parses an option button label such as `Option 3` into its 1-based number.
pub fn parse_option(text: &str) -> Option<usize> {
    let (prefix, number) = text.trim().split_once(' ')?;
    if !prefix.eq_ignore_ascii_case(OPTION_PREFIX) {
        return None;
    }
    let choice: usize = number.trim().parse().ok()?;
    (1..=OPTIONS_PER_QUESTION).contains(&choice).then_some(choice)
}

/// Text that asks for a new question, e.g. the `First question` and
/// `Next question` buttons.
pub fn asks_for_question(text: &str) -> bool {
    text.trim().to_lowercase().ends_with("question")
}
