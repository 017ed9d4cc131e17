//! Badge tiers and the durable record of the best tier per topic

use crate::session::Completion;
use crate::store::KeyValueStore;
use butterfly_core::{Result, Topic};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Storage key under which the whole badge record lives
pub const BADGE_STORAGE_KEY: &str = "quizBadges";

/// Badge rank for a quiz attempt, ordered `None < Bronze < Silver < Gold`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    None,
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    pub fn rank(&self) -> u8 {
        match self {
            Tier::None => 0,
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::None => "none",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Tier::None),
            "bronze" => Some(Tier::Bronze),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            _ => None,
        }
    }

    /// Medal artwork shown on the completion screen and in the inventory
    pub fn artwork(&self) -> Option<&'static str> {
        match self {
            Tier::None => None,
            Tier::Bronze => Some("/assets/Bronze.jpg"),
            Tier::Silver => Some("/assets/Silver.jpg"),
            Tier::Gold => Some("/assets/Gold.jpg"),
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Tier::None => None,
            Tier::Bronze => Some("Good job! You have earned a Bronze Badge! 🥉"),
            Tier::Silver => Some("Great work! You have earned a Silver Badge! 🥈"),
            Tier::Gold => Some("Exceptional! You have earned a Gold Badge! 🏆"),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a final score to a tier.
///
/// Thresholds are absolute (4 gold, 3 silver, 2 bronze); `total` is accepted
/// for callers but does not scale them.
pub fn tier_for(score: usize, _total: usize) -> Tier {
    match score {
        s if s >= 4 => Tier::Gold,
        3 => Tier::Silver,
        2 => Tier::Bronze,
        _ => Tier::None,
    }
}

/// Best-ever tier per topic, kept in a [`KeyValueStore`].
///
/// The record is one JSON object under [`BADGE_STORAGE_KEY`] mapping topic
/// display name to tier string. Tiers are only ever upgraded.
pub struct BadgeBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BadgeBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Every earned tier, keyed by topic in hub order
    pub fn tiers(&self) -> BTreeMap<Topic, Tier> {
        self.read_raw()
            .into_iter()
            .filter_map(|(name, raw)| match parse_entry(&name, &raw) {
                Ok(entry) => Some(entry),
                Err(ignored) => {
                    log::debug!("Ignoring unknown badge entry {}", ignored);
                    None
                }
            })
            .filter(|(_, tier)| *tier != Tier::None)
            .collect()
    }

    pub fn tier(&self, topic: Topic) -> Tier {
        self.tiers().get(&topic).copied().unwrap_or_default()
    }

    /// Store `tier` for `topic` if it beats the stored one.
    ///
    /// Returns whether the record changed.
    pub fn record(&mut self, topic: Topic, tier: Tier) -> Result<bool> {
        if tier == Tier::None {
            return Ok(false);
        }

        let mut raw = self.read_raw();
        let name = topic.display_name();
        let stored = raw
            .get(name)
            .and_then(|t| Tier::parse(t))
            .unwrap_or_default();
        if tier <= stored {
            return Ok(false);
        }

        raw.insert(name.to_string(), tier.as_str().to_string());
        let encoded = serde_json::to_string(&raw)?;
        self.store.set(BADGE_STORAGE_KEY, &encoded)?;
        log::info!("Badge for '{}' upgraded {} -> {}", name, stored, tier);
        Ok(true)
    }

    pub fn record_completion(&mut self, completion: &Completion) -> Result<bool> {
        self.record(completion.topic, completion.tier)
    }

    fn read_raw(&self) -> BTreeMap<String, String> {
        let Some(encoded) = self.store.get(BADGE_STORAGE_KEY) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&encoded) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Badge record is corrupt, treating as empty: {}", e);
                BTreeMap::new()
            }
        }
    }
}

/// A stored `name = tier` pair, or the entry as written when either half is unknown
fn parse_entry(name: &str, raw: &str) -> std::result::Result<(Topic, Tier), String> {
    match (Topic::from_name(name), Tier::parse(raw)) {
        (Some(topic), Some(tier)) => Ok((topic, tier)),
        _ => Err(format!("{:?} = {:?}", name, raw)),
    }
}
