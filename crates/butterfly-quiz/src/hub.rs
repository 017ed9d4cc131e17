//! Topic selection hub

use crate::badge::{BadgeBook, Tier};
use crate::store::KeyValueStore;
use butterfly_core::{Route, Topic};

pub const HUB_TITLE: &str = "Welcome to Butterfly Earth";
pub const HUB_SUBTITLE: &str = "Are you ready to learn how to save the Planet?";

/// One button on the hub
#[derive(Debug, Clone, PartialEq)]
pub struct HubEntry {
    pub topic: Topic,
    pub name: &'static str,
    pub image: &'static str,
    /// Earned tier, if any
    pub badge: Option<Tier>,
    /// Topic badge artwork, present only when a badge is earned
    pub badge_image: Option<String>,
    pub route: Route,
}

/// One row of the badge inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub topic: Topic,
    pub tier: Tier,
    pub artwork: &'static str,
}

/// Lists every topic, decorated with earned badges read from the book
pub struct TopicHub<'a, S: KeyValueStore> {
    badges: &'a BadgeBook<S>,
    inventory_open: bool,
}

impl<'a, S: KeyValueStore> TopicHub<'a, S> {
    pub fn new(badges: &'a BadgeBook<S>) -> Self {
        Self {
            badges,
            inventory_open: false,
        }
    }

    pub fn entries(&self) -> Vec<HubEntry> {
        let earned = self.badges.tiers();
        Topic::ALL
            .into_iter()
            .map(|topic| {
                let badge = earned.get(&topic).copied();
                HubEntry {
                    topic,
                    name: topic.display_name(),
                    image: topic.hub_image(),
                    badge,
                    badge_image: badge.map(|_| topic.badge_image()),
                    route: Route::Quiz(topic),
                }
            })
            .collect()
    }

    pub fn select(&self, topic: Topic) -> Route {
        Route::Quiz(topic)
    }

    pub fn chat_route(&self) -> Route {
        Route::Chat
    }

    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.inventory_open
    }

    pub fn inventory_open(&self) -> bool {
        self.inventory_open
    }

    /// Earned badges in hub order
    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.badges
            .tiers()
            .into_iter()
            .filter_map(|(topic, tier)| {
                tier.artwork().map(|artwork| InventoryItem {
                    topic,
                    tier,
                    artwork,
                })
            })
            .collect()
    }
}
