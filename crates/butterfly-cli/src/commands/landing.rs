//! Landing page, route listing and path dispatch

use super::{carbon, card, chat, globe, hub, quiz};
use anyhow::{Context, Result};
use butterfly_core::{AppConfig, Route};

pub const LANDING_TITLE: &str = "WELCOME TO BUTTERFLY EARTH";

pub fn run() -> Result<()> {
    println!("{}", LANDING_TITLE);
    println!();
    println!("  butterfly hub      choose a topic and earn badges");
    println!("  butterfly globe    watch the Earth turn");
    println!("  butterfly routes   list every screen");
    Ok(())
}

pub fn routes() -> Result<()> {
    for route in Route::all() {
        println!("{:<10} {}", route.path(), describe(route));
    }
    Ok(())
}

fn describe(route: Route) -> String {
    match route {
        Route::Landing => "Landing page".to_string(),
        Route::Hub => "Topic hub".to_string(),
        Route::Quiz(topic) => format!("{} quiz", topic.display_name()),
        Route::Briefing(topic) => format!("{} briefing", topic.display_name()),
        Route::Card => "Climate Champions flashcard".to_string(),
        Route::Globe => "Globe".to_string(),
        Route::Chat => "AI assistant".to_string(),
        Route::Carbon => "Carbon calculator".to_string(),
    }
}

/// Show whatever screen `path` names
pub fn open(config: &AppConfig, path: &str) -> Result<()> {
    let route = Route::parse(path).with_context(|| format!("Cannot open '{}'", path))?;
    log::debug!("Opening {}", route);
    match route {
        Route::Landing => run(),
        Route::Hub => hub::run(config),
        Route::Quiz(topic) => quiz::run(config, topic, None),
        Route::Briefing(topic) => quiz::briefing(config, topic, None),
        Route::Card => card::run(),
        Route::Globe => globe::run(config, None),
        Route::Chat => chat::run(config, None),
        Route::Carbon => carbon::interactive(),
    }
}
