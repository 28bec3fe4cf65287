//! Answer extraction from free-form model output.

use crate::config::{CAPTCHA_CHAR_FIRST, CAPTCHA_CHAR_LAST, CAPTCHA_LENGTH};

/// Keeps only hiragana from the model output and returns the first
/// `CAPTCHA_LENGTH` of them, or `None` if there are fewer.
///
/// Models often wrap the answer in quotes or punctuation, or space the
/// characters out; anything outside the hiragana block is noise.
pub fn extract_answer(output: &str) -> Option<String> {
    let answer: String = output
        .chars()
        .filter(|c| (CAPTCHA_CHAR_FIRST..=CAPTCHA_CHAR_LAST).contains(c))
        .take(CAPTCHA_LENGTH)
        .collect();
    (answer.chars().count() == CAPTCHA_LENGTH).then_some(answer)
}
