//! Navigable screens

use crate::error::{ButterflyError, Result};
use crate::topic::Topic;
use std::fmt;

/// Every screen the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Hub,
    Quiz(Topic),
    /// Pre-quiz video gate
    Briefing(Topic),
    Card,
    Globe,
    Chat,
    Carbon,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Hub => "/game".to_string(),
            Route::Quiz(topic) => topic.quiz_path().to_string(),
            Route::Briefing(topic) => format!("/level{}", topic.number()),
            Route::Card => "/card".to_string(),
            Route::Globe => "/earth".to_string(),
            Route::Chat => "/chatbot".to_string(),
            Route::Carbon => "/carbon".to_string(),
        }
    }

    pub fn parse(path: &str) -> Result<Route> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        let fixed = match normalized {
            "" | "/" => Some(Route::Landing),
            "/game" => Some(Route::Hub),
            "/card" => Some(Route::Card),
            "/earth" => Some(Route::Globe),
            "/chatbot" => Some(Route::Chat),
            "/carbon" => Some(Route::Carbon),
            _ => None,
        };
        if let Some(route) = fixed {
            return Ok(route);
        }

        if let Some(topic) = Topic::ALL.into_iter().find(|t| t.quiz_path() == normalized) {
            return Ok(Route::Quiz(topic));
        }

        Topic::ALL
            .into_iter()
            .filter(|t| t.briefing_video().is_some())
            .find(|t| Route::Briefing(*t).path() == normalized)
            .map(Route::Briefing)
            .ok_or_else(|| ButterflyError::UnknownRoute(path.to_string()))
    }

    /// All routes the application exposes, in menu order
    pub fn all() -> Vec<Route> {
        let mut routes = vec![Route::Landing, Route::Hub];
        routes.extend(Topic::ALL.into_iter().map(Route::Quiz));
        routes.extend(
            Topic::ALL
                .into_iter()
                .filter(|t| t.briefing_video().is_some())
                .map(Route::Briefing),
        );
        routes.extend([Route::Card, Route::Globe, Route::Chat, Route::Carbon]);
        routes
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inverts_path_for_every_route() {
        for route in Route::all() {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_parse_tolerates_trailing_slash() {
        assert_eq!(Route::parse("/quiz3/").unwrap(), Route::Quiz(Topic::ExtremeWeather));
        assert_eq!(Route::parse("").unwrap(), Route::Landing);
    }

    #[test]
    fn test_unknown_route() {
        assert!(matches!(
            Route::parse("/quiz9"),
            Err(ButterflyError::UnknownRoute(_))
        ));
        // Only gated topics have a briefing screen
        assert!(Route::parse("/level2").is_err());
    }

    #[test]
    fn test_all_routes_cover_seven_quizzes() {
        let quizzes = Route::all()
            .into_iter()
            .filter(|r| matches!(r, Route::Quiz(_)))
            .count();
        assert_eq!(quizzes, 7);
    }
}
