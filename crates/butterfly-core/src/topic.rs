//! The seven quiz topics and their static assets

use crate::error::{ButterflyError, Result};
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven fixed educational subjects, in hub order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Deforestation,
    ClimateCrisis,
    ExtremeWeather,
    Biodiversity,
    AirQuality,
    EconomicEcho,
    SocialDisplacement,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::Deforestation,
        Topic::ClimateCrisis,
        Topic::ExtremeWeather,
        Topic::Biodiversity,
        Topic::AirQuality,
        Topic::EconomicEcho,
        Topic::SocialDisplacement,
    ];

    /// Title shown on the hub button; also the key of the stored badge record
    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::Deforestation => "The Deforestation Dilemma",
            Topic::ClimateCrisis => "The Climate Crisis Conundrum",
            Topic::ExtremeWeather => "Extreme Weather Challenges",
            Topic::Biodiversity => "The Biodiversity Balance",
            Topic::AirQuality => "The Air Quality Quest",
            Topic::EconomicEcho => "The Economic Echo",
            Topic::SocialDisplacement => "Social Displacement",
        }
    }

    /// Lowercase path segment used by the question source (`<base>/<key>`)
    pub fn key(&self) -> &'static str {
        match self {
            Topic::Deforestation => "deforestation",
            Topic::ClimateCrisis => "climate",
            Topic::ExtremeWeather => "weather",
            Topic::Biodiversity => "biodiversity",
            Topic::AirQuality => "air",
            Topic::EconomicEcho => "economy",
            Topic::SocialDisplacement => "displacement",
        }
    }

    /// Position in hub order, starting at 1
    pub fn number(&self) -> usize {
        Topic::ALL.iter().position(|t| t == self).unwrap_or(0) + 1
    }

    pub fn quiz_path(&self) -> &'static str {
        match self {
            Topic::Deforestation => "/quiz",
            Topic::ClimateCrisis => "/quiz2",
            Topic::ExtremeWeather => "/quiz3",
            Topic::Biodiversity => "/quiz4",
            Topic::AirQuality => "/quiz5",
            Topic::EconomicEcho => "/quiz6",
            Topic::SocialDisplacement => "/quiz7",
        }
    }

    /// Background illustration of the hub button
    pub fn hub_image(&self) -> &'static str {
        match self {
            Topic::Deforestation => "/Buttons/DF.jpeg",
            Topic::ClimateCrisis => "/Buttons/CC.jpg",
            Topic::ExtremeWeather => "/Buttons/EWE.jpeg",
            Topic::Biodiversity => "/Buttons/BL.jpeg",
            Topic::AirQuality => "/Buttons/AP.jpeg",
            Topic::EconomicEcho => "/Buttons/EE.jpeg",
            Topic::SocialDisplacement => "/Buttons/SD.jpeg",
        }
    }

    /// Badge artwork: `/Badges/<display name without whitespace>.jpg`
    pub fn badge_image(&self) -> String {
        let compact: String = self
            .display_name()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("/Badges/{}.jpg", compact)
    }

    /// Looping video behind the quiz card
    pub fn background_video(&self) -> String {
        format!("/assets/{}.mp4", self.number())
    }

    /// Video that must be watched before the quiz unlocks, if the topic has one
    pub fn briefing_video(&self) -> Option<&'static str> {
        match self {
            Topic::Deforestation => Some("/assets/Deforestation.mp4"),
            _ => None,
        }
    }

    /// Solid color drawn in place of the illustration when it cannot be shown
    pub fn fallback_color(&self) -> Color {
        match self {
            Topic::Deforestation => Color::from_hex(0x2e7d32),
            Topic::ClimateCrisis => Color::from_hex(0xef6c00),
            Topic::ExtremeWeather => Color::from_hex(0x1565c0),
            Topic::Biodiversity => Color::from_hex(0x6a1b9a),
            Topic::AirQuality => Color::from_hex(0x90a4ae),
            Topic::EconomicEcho => Color::from_hex(0xf9a825),
            Topic::SocialDisplacement => Color::from_hex(0x8d6e63),
        }
    }

    pub fn from_key(key: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Resolve a display name or source key, ignoring case
    pub fn from_name(name: &str) -> Option<Topic> {
        let needle = name.trim();
        Topic::ALL.into_iter().find(|t| {
            t.key().eq_ignore_ascii_case(needle) || t.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Topic {
    type Err = ButterflyError;

    fn from_str(s: &str) -> Result<Self> {
        Topic::from_name(s).ok_or_else(|| ButterflyError::UnknownTopic(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seven_distinct_topics() {
        let keys: HashSet<_> = Topic::ALL.iter().map(|t| t.key()).collect();
        let paths: HashSet<_> = Topic::ALL.iter().map(|t| t.quiz_path()).collect();
        assert_eq!(keys.len(), 7);
        assert_eq!(paths.len(), 7);
    }

    #[test]
    fn test_keys_are_lowercase() {
        for topic in Topic::ALL {
            assert_eq!(topic.key(), topic.key().to_lowercase());
        }
    }

    #[test]
    fn test_from_name_accepts_key_or_title() {
        assert_eq!(Topic::from_name("AIR"), Some(Topic::AirQuality));
        assert_eq!(
            Topic::from_name("the deforestation dilemma"),
            Some(Topic::Deforestation)
        );
        assert_eq!(Topic::from_name("volcanoes"), None);
        assert!("volcanoes".parse::<Topic>().is_err());
    }

    #[test]
    fn test_badge_image_strips_spaces() {
        assert_eq!(
            Topic::EconomicEcho.badge_image(),
            "/Badges/TheEconomicEcho.jpg"
        );
    }

    #[test]
    fn test_numbering_follows_hub_order() {
        assert_eq!(Topic::Deforestation.number(), 1);
        assert_eq!(Topic::SocialDisplacement.number(), 7);
        assert_eq!(Topic::EconomicEcho.background_video(), "/assets/6.mp4");
    }

    #[test]
    fn test_only_deforestation_has_briefing() {
        let gated: Vec<_> = Topic::ALL
            .into_iter()
            .filter(|t| t.briefing_video().is_some())
            .collect();
        assert_eq!(gated, vec![Topic::Deforestation]);
    }
}
