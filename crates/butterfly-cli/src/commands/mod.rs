//! CLI command implementations

pub mod carbon;
pub mod card;
pub mod chat;
pub mod globe;
pub mod hub;
pub mod landing;
pub mod quiz;

use anyhow::Result;
use std::io::{BufRead, Write};

/// Print `prompt` and read one trimmed line; `None` at end of input
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Map "A".."D" or "1".."4" to an option index
pub fn parse_choice(answer: &str) -> Option<usize> {
    let answer = answer.trim();
    let mut chars = answer.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c.to_ascii_uppercase() {
        'A'..='D' => Some(c.to_ascii_uppercase() as usize - 'A' as usize),
        '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn choices_accept_letters_and_numbers() {
        assert_eq!(parse_choice("a"), Some(0));
        assert_eq!(parse_choice(" D "), Some(3));
        assert_eq!(parse_choice("2"), Some(1));
        assert_eq!(parse_choice("E"), None);
        assert_eq!(parse_choice("5"), None);
        assert_eq!(parse_choice("ab"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn prompt_returns_none_at_eof() {
        let mut input = Cursor::new("yes\n");
        let mut out = Vec::new();
        assert_eq!(prompt(&mut input, &mut out, "> ").unwrap(), Some("yes".into()));
        assert_eq!(prompt(&mut input, &mut out, "> ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
    }
}
