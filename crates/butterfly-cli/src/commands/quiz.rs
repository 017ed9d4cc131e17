//! Interactive quiz and the briefing gate in front of it

use super::hub::open_badges;
use super::{parse_choice, prompt};
use anyhow::{bail, Result};
use butterfly_core::{AppConfig, Route, Topic};
use butterfly_quiz::{
    Advance, BadgeBook, BriefingGate, Completion, DirectoryQuestionSource, Flashcard,
    HttpQuestionSource, KeyValueStore, LoadStatus, OptionState, QuestionSource, QuizSession,
    Tier, LOAD_FAILED_MESSAGE, START_LABEL,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn question_source(config: &AppConfig, questions_dir: Option<&Path>) -> Box<dyn QuestionSource> {
    match questions_dir {
        Some(dir) => Box::new(DirectoryQuestionSource::new(dir)),
        None => Box::new(HttpQuestionSource::new(&config.question_base_url)),
    }
}

pub fn run(config: &AppConfig, topic: Topic, questions_dir: Option<&Path>) -> Result<()> {
    let source = question_source(config, questions_dir);
    let mut badges = open_badges(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    play(
        topic,
        source.as_ref(),
        &mut badges,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;
    Ok(())
}

pub fn briefing(config: &AppConfig, topic: Topic, questions_dir: Option<&Path>) -> Result<()> {
    let Some(mut gate) = BriefingGate::new(topic) else {
        bail!(
            "{} has no briefing; try `butterfly quiz {}`",
            topic.display_name(),
            topic.key()
        );
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let route = watch_briefing(&mut gate, &mut stdin.lock(), &mut stdout.lock())?;
    match route {
        Some(Route::Quiz(topic)) => run(config, topic, questions_dir),
        _ => Ok(()),
    }
}

/// Hold the quiz back until the player confirms the video has ended
pub fn watch_briefing<R: BufRead, W: Write>(
    gate: &mut BriefingGate,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Route>> {
    writeln!(out, "{}", gate.topic().display_name())?;
    writeln!(out, "Now playing: {}", gate.video())?;
    if prompt(input, out, "Press Enter when the video has finished...")?.is_none() {
        return Ok(None);
    }
    gate.video_ended();
    writeln!(out, "{}", START_LABEL)?;
    Ok(gate.start_quiz())
}

/// Run attempts at `topic` until the player stops; returns the last completion
pub fn play<S: KeyValueStore, R: BufRead, W: Write>(
    topic: Topic,
    source: &dyn QuestionSource,
    badges: &mut BadgeBook<S>,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Completion>> {
    let mut session = QuizSession::new(topic);
    writeln!(out, "{}", topic.display_name())?;

    let mut last = None;
    let mut ready = session.load(source).is_ok();
    loop {
        while !ready {
            writeln!(out, "{}", LOAD_FAILED_MESSAGE)?;
            if let LoadStatus::Failed(reason) = session.status() {
                log::debug!("Load failure for '{}': {}", topic, reason);
            }
            if !confirm(input, out, "Retry? [y/N] ")? {
                session.close();
                return Ok(last);
            }
            ready = session.restart(source).is_ok();
        }

        match attempt(&mut session, input, out)? {
            Some(completion) => {
                report(&completion, session.percentage(), badges, out)?;
                last = Some(completion);
            }
            None => {
                session.close();
                return Ok(last);
            }
        }

        if !confirm(input, out, "Try again? [y/N] ")? {
            session.close();
            return Ok(last);
        }
        ready = session.restart(source).is_ok();
    }
}

/// One pass through the loaded questions; `None` if input ran out
fn attempt<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Completion>> {
    loop {
        let Some(question) = session.current_question().cloned() else {
            return Ok(None);
        };
        if let Some((number, total)) = session.progress() {
            writeln!(out, "\nQuestion {} of {}  (score {})", number, total, session.score())?;
        }
        writeln!(out, "{}", question.prompt)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", Flashcard::marker(i), option)?;
        }

        loop {
            let Some(answer) = prompt(input, out, "Your answer: ")? else {
                return Ok(None);
            };
            match parse_choice(&answer) {
                Some(index) if session.select_answer(index) => break,
                _ => writeln!(out, "Answer with A, B, C or D.")?,
            }
        }

        let states = session.option_states();
        if states.contains(&OptionState::ChosenCorrect) {
            writeln!(out, "Correct!")?;
        } else if let Some(i) = states
            .iter()
            .position(|s| *s == OptionState::RevealedCorrect)
        {
            writeln!(
                out,
                "Not quite. The answer was {}) {}",
                Flashcard::marker(i),
                question.options[i]
            )?;
        }

        match session.advance() {
            Some(Advance::Next) => {}
            Some(Advance::Completed(completion)) => return Ok(Some(completion)),
            None => return Ok(None),
        }
    }
}

fn report<S: KeyValueStore, W: Write>(
    completion: &Completion,
    percentage: f64,
    badges: &mut BadgeBook<S>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "\nQuiz Complete!")?;
    writeln!(
        out,
        "Your score: {} out of {}",
        completion.score, completion.total
    )?;
    writeln!(out, "Percentage: {:.1}%", percentage)?;
    if let Some(message) = completion.message() {
        writeln!(out, "{}", message)?;
    }

    match badges.record_completion(completion) {
        Ok(true) => {}
        Ok(false) => {
            let held = badges.tier(completion.topic);
            if held != Tier::None && held > completion.tier {
                writeln!(out, "You keep your {} badge for this topic.", held)?;
            }
        }
        Err(e) => log::warn!("Could not save badge for '{}': {}", completion.topic, e),
    }
    Ok(())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<bool> {
    Ok(matches!(
        prompt(input, out, question)?.as_deref(),
        Some("y") | Some("Y") | Some("yes")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_core::{ButterflyError, Result as ButterflyResult};
    use butterfly_quiz::{MemoryQuestionSource, MemoryStore, Question};
    use std::io::Cursor;

    /// Storage that refuses every write, like a read-only badge file
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> ButterflyResult<()> {
            Err(ButterflyError::StorageError("read-only".into()))
        }

        fn remove(&mut self, _key: &str) -> ButterflyResult<()> {
            Err(ButterflyError::StorageError("read-only".into()))
        }
    }

    fn five_questions() -> Vec<Question> {
        (0..5)
            .map(|i| {
                Question::new(
                    &format!("Question {}", i + 1),
                    ["right", "wrong", "wrong", "wrong"],
                    0,
                )
            })
            .collect()
    }

    fn run_quiz(
        source: &MemoryQuestionSource,
        badges: &mut BadgeBook<MemoryStore>,
        input: &str,
    ) -> (Option<Completion>, String) {
        let mut out = Vec::new();
        let completion = play(
            Topic::Deforestation,
            source,
            badges,
            &mut Cursor::new(input.to_string()),
            &mut out,
        )
        .unwrap();
        (completion, String::from_utf8(out).unwrap())
    }

    #[test]
    fn perfect_run_earns_gold() {
        let source =
            MemoryQuestionSource::new().with_questions(Topic::Deforestation, five_questions());
        let mut badges = BadgeBook::new(MemoryStore::new());

        let (completion, text) = run_quiz(&source, &mut badges, "a\na\na\na\na\nn\n");
        let completion = completion.unwrap();
        assert_eq!(completion.score, 5);
        assert_eq!(completion.tier, Tier::Gold);
        assert_eq!(badges.tier(Topic::Deforestation), Tier::Gold);
        assert!(text.contains("Percentage: 100.0%"));
    }

    #[test]
    fn worse_retry_keeps_gold() {
        let source =
            MemoryQuestionSource::new().with_questions(Topic::Deforestation, five_questions());
        let mut badges = BadgeBook::new(MemoryStore::new());

        let input = "a\na\na\na\na\ny\na\na\nb\nb\nb\nn\n";
        let (completion, text) = run_quiz(&source, &mut badges, input);
        let completion = completion.unwrap();
        assert_eq!(completion.score, 2);
        assert_eq!(completion.tier, Tier::Bronze);
        assert_eq!(badges.tier(Topic::Deforestation), Tier::Gold);
        assert!(text.contains("You keep your gold badge"));
    }

    #[test]
    fn badge_save_failure_still_finishes_quiz() {
        let source =
            MemoryQuestionSource::new().with_questions(Topic::Deforestation, five_questions());
        let mut badges = BadgeBook::new(ReadOnlyStore);
        let mut out = Vec::new();

        let completion = play(
            Topic::Deforestation,
            &source,
            &mut badges,
            &mut Cursor::new("a\na\na\na\na\nn\n"),
            &mut out,
        )
        .unwrap()
        .unwrap();
        assert_eq!(completion.tier, Tier::Gold);
        assert_eq!(badges.tier(Topic::Deforestation), Tier::None);
        assert!(String::from_utf8(out).unwrap().contains("Quiz Complete!"));
    }

    #[test]
    fn invalid_answers_reprompt() {
        let source =
            MemoryQuestionSource::new().with_questions(Topic::Deforestation, five_questions());
        let mut badges = BadgeBook::new(MemoryStore::new());

        let (_, text) = run_quiz(&source, &mut badges, "z\nb\n");
        assert!(text.contains("Answer with A, B, C or D."));
        assert!(text.contains("Not quite. The answer was A) right"));
    }

    #[test]
    fn load_failure_shows_message_and_no_question() {
        let source =
            MemoryQuestionSource::new().with_error(Topic::Deforestation, "topic not found");
        let mut badges = BadgeBook::new(MemoryStore::new());

        let (completion, text) = run_quiz(&source, &mut badges, "n\n");
        assert!(completion.is_none());
        assert!(text.contains(LOAD_FAILED_MESSAGE));
        assert!(!text.contains("Question 1"));
    }

    #[test]
    fn briefing_opens_quiz_after_video() {
        let mut gate = BriefingGate::new(Topic::Deforestation).unwrap();
        let mut out = Vec::new();
        let route = watch_briefing(&mut gate, &mut Cursor::new("\n"), &mut out).unwrap();
        assert_eq!(route, Some(Route::Quiz(Topic::Deforestation)));
        assert!(String::from_utf8(out).unwrap().contains(START_LABEL));
    }

    #[test]
    fn briefing_abandoned_before_video_ends() {
        let mut gate = BriefingGate::new(Topic::Deforestation).unwrap();
        let mut out = Vec::new();
        let route = watch_briefing(&mut gate, &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(route, None);
        assert!(!gate.can_start());
    }
}
