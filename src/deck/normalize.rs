//! Text Normalization
//!
//! Repairs spacing artifacts in generated text. Rules run in order:
//!
//! 1. Split lowercase→uppercase joins (`endStart` → `end Start`), Latin and Cyrillic
//! 2. Collapse whitespace runs to one space
//! 3. Drop whitespace before `. , ! ? : ;`
//! 4. Put one space after punctuation followed by a letter or digit
//! 5. Trim
//!
//! Rule 4 leaves runs of punctuation (`...`, `?!`) intact so that the
//! function is idempotent.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::PresentationData;

static CASE_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([а-яёa-z])([А-ЯЁA-Z])").expect("static regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?:;])").expect("static regex"));

static PUNCT_THEN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,!?:;])([^\s.,!?:;])").expect("static regex"));

pub fn normalize(text: &str) -> String {
    let text = CASE_JOIN.replace_all(text, "$1 $2");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = PUNCT_THEN_WORD.replace_all(&text, "$1 $2");
    text.trim().to_string()
}

/// Normalize deck title and every slide's title, subtitle and bullets.
///
/// Visual element descriptions are left as generated.
pub fn normalize_deck(data: &mut PresentationData) {
    data.title = normalize(&data.title);

    for slide in &mut data.slides {
        slide.title = normalize(&slide.title);
        if let Some(subtitle) = slide.subtitle.as_mut() {
            *subtitle = normalize(subtitle);
        }
        if let Some(bullets) = slide.bullet_points.as_mut() {
            for bullet in bullets.iter_mut() {
                *bullet = normalize(bullet);
            }
        }
    }
}
