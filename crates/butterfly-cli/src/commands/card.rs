//! Climate Champions flashcard

use super::{parse_choice, prompt};
use anyhow::Result;
use butterfly_quiz::Flashcard;
use std::io::{self, BufRead, Write};

pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    practice(&mut Flashcard::default(), &mut stdin.lock(), &mut stdout.lock())
}

/// Let the player pick answers until they find the right one or stop
pub fn practice<R: BufRead, W: Write>(
    card: &mut Flashcard,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}", card.title())?;
    writeln!(out, "{}", card.question().prompt)?;
    for (i, option) in card.question().options.iter().enumerate() {
        writeln!(out, "  {}) {}", Flashcard::marker(i), option)?;
    }

    loop {
        let Some(answer) = prompt(input, out, "Pick an answer (Enter to leave): ")? else {
            return Ok(());
        };
        if answer.is_empty() {
            return Ok(());
        }
        let Some(index) = parse_choice(&answer).filter(|&i| card.select(i)) else {
            writeln!(out, "Answer with A, B, C or D.")?;
            continue;
        };
        match card.is_correct() {
            Some(true) => {
                writeln!(out, "{}) is right!", Flashcard::marker(index))?;
                return Ok(());
            }
            _ => writeln!(out, "{}) is not it. Try another.", Flashcard::marker(index))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn wrong_then_right() {
        let mut card = Flashcard::default();
        let mut out = Vec::new();
        practice(&mut card, &mut Cursor::new("c\na\n"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Climate Champions"));
        assert!(text.contains("C) is not it."));
        assert!(text.contains("A) is right!"));
        assert_eq!(card.selected(), Some(0));
    }

    #[test]
    fn empty_line_leaves_unanswered() {
        let mut card = Flashcard::default();
        practice(&mut card, &mut Cursor::new("\n"), &mut Vec::new()).unwrap();
        assert_eq!(card.selected(), None);
    }
}
