//! Numeric literal scanning for G-code words and metadata comments

use regex::Regex;
use std::sync::OnceLock;

const LITERAL: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)";

fn leading_literal_regex() -> &'static Regex {
    static LEADING: OnceLock<Regex> = OnceLock::new();
    LEADING.get_or_init(|| {
        Regex::new(&format!(r"^\s*({LITERAL})")).expect("invalid leading literal pattern")
    })
}

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(&format!(r"([A-Z])({LITERAL})")).expect("invalid word pattern"))
}

/// Parse the numeric literal at the start of `text`.
///
/// Leading whitespace is skipped and anything after the literal is ignored, so
/// `" 0.45 mm"` yields `0.45`. Returns `None` when no literal is present.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    leading_literal_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Strip a trailing `;` comment from a command line.
pub fn code_part(line: &str) -> &str {
    match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Address words of one command line, first occurrence per letter.
///
/// A word is an upper-case letter immediately followed by a numeric literal
/// (`X12.5`, `E-.8`). Letters whose value is malformed are simply absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Words {
    values: [Option<f64>; 26],
}

impl Words {
    /// Scan the code part of `line` (everything before a `;` comment)
    pub fn scan(line: &str) -> Self {
        let mut words = Self::default();
        for caps in word_regex().captures_iter(code_part(line)) {
            let (Some(letter), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Some(index) = letter_index(letter.as_str()) else {
                continue;
            };
            if words.values[index].is_some() {
                continue;
            }
            if let Ok(parsed) = value.as_str().parse::<f64>() {
                words.values[index] = Some(parsed);
            }
        }
        words
    }

    /// Value of the word addressed by `letter`, if present
    pub fn get(&self, letter: char) -> Option<f64> {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        self.values[(letter as u8 - b'A') as usize]
    }
}

fn letter_index(letter: &str) -> Option<usize> {
    let byte = *letter.as_bytes().first()?;
    byte.is_ascii_uppercase().then(|| (byte - b'A') as usize)
}
