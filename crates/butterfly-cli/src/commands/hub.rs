//! Topic hub and badge inventory

use super::{chat, prompt, quiz};
use anyhow::{Context, Result};
use butterfly_core::{AppConfig, Route};
use butterfly_quiz::{BadgeBook, JsonFileStore, KeyValueStore, TopicHub, HUB_SUBTITLE, HUB_TITLE};
use std::io::{self, BufRead, Write};

pub fn open_badges(config: &AppConfig) -> Result<BadgeBook<JsonFileStore>> {
    let store = JsonFileStore::open(&config.storage_path).with_context(|| {
        format!(
            "Failed to open badge storage at {}",
            config.storage_path.display()
        )
    })?;
    Ok(BadgeBook::new(store))
}

pub fn run(config: &AppConfig) -> Result<()> {
    let badges = open_badges(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let choice = choose(&badges, &mut stdin.lock(), &mut stdout.lock())?;
    drop(badges);

    match choice {
        Some(Route::Quiz(topic)) => quiz::run(config, topic, None),
        Some(Route::Chat) => chat::run(config, None),
        _ => Ok(()),
    }
}

pub fn badges(config: &AppConfig) -> Result<()> {
    let badges = open_badges(config)?;
    print_inventory(&TopicHub::new(&badges), &mut io::stdout().lock())
}

/// Show the hub until the player picks a destination or leaves
pub fn choose<S: KeyValueStore, R: BufRead, W: Write>(
    badges: &BadgeBook<S>,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Route>> {
    let mut hub = TopicHub::new(badges);
    let entries = hub.entries();

    writeln!(out, "{}", HUB_TITLE)?;
    writeln!(out, "{}", HUB_SUBTITLE)?;
    writeln!(out)?;
    for (i, entry) in entries.iter().enumerate() {
        match entry.badge {
            Some(tier) => writeln!(out, "  {}. {} [{}]", i + 1, entry.name, tier)?,
            None => writeln!(out, "  {}. {}", i + 1, entry.name)?,
        }
    }

    loop {
        let Some(answer) = prompt(
            input,
            out,
            "\nTopic number, (i)nventory, (c)hat, or Enter to leave: ",
        )?
        else {
            return Ok(None);
        };

        match answer.to_ascii_lowercase().as_str() {
            "" | "q" => return Ok(None),
            "i" => {
                if hub.toggle_inventory() {
                    print_inventory(&hub, out)?;
                }
            }
            "c" => return Ok(Some(hub.chat_route())),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=entries.len()).contains(&n) => {
                    return Ok(Some(hub.select(entries[n - 1].topic)));
                }
                _ => writeln!(out, "Pick a number from 1 to {}.", entries.len())?,
            },
        }
    }
}

fn print_inventory<S: KeyValueStore, W: Write>(
    hub: &TopicHub<'_, S>,
    out: &mut W,
) -> Result<()> {
    let items = hub.inventory();
    if items.is_empty() {
        writeln!(out, "No badges yet. Finish a quiz to earn one!")?;
        return Ok(());
    }
    writeln!(out, "Your badges:")?;
    for item in items {
        writeln!(
            out,
            "  {:<8} {} ({})",
            item.tier.as_str(),
            item.topic.display_name(),
            item.artwork
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use butterfly_core::Topic;
    use butterfly_quiz::{MemoryStore, Tier};
    use std::io::Cursor;

    fn run_hub(badges: &BadgeBook<MemoryStore>, input: &str) -> (Option<Route>, String) {
        let mut out = Vec::new();
        let route = choose(badges, &mut Cursor::new(input.to_string()), &mut out).unwrap();
        (route, String::from_utf8(out).unwrap())
    }

    #[test]
    fn picking_a_number_opens_that_quiz() {
        let badges = BadgeBook::new(MemoryStore::new());
        let (route, text) = run_hub(&badges, "3\n");
        assert_eq!(route, Some(Route::Quiz(Topic::ExtremeWeather)));
        assert!(text.starts_with(HUB_TITLE));
    }

    #[test]
    fn earned_badges_decorate_entries() {
        let mut badges = BadgeBook::new(MemoryStore::new());
        badges.record(Topic::Deforestation, Tier::Gold).unwrap();
        let (_, text) = run_hub(&badges, "i\n\n");
        assert!(text.contains("1. The Deforestation Dilemma [gold]"));
        assert!(text.contains("Your badges:"));
    }

    #[test]
    fn out_of_range_number_reprompts() {
        let badges = BadgeBook::new(MemoryStore::new());
        let (route, text) = run_hub(&badges, "9\nc\n");
        assert_eq!(route, Some(Route::Chat));
        assert!(text.contains("Pick a number from 1 to 7."));
    }

    #[test]
    fn eof_leaves_the_hub() {
        let badges = BadgeBook::new(MemoryStore::new());
        assert_eq!(run_hub(&badges, "").0, None);
    }
}
