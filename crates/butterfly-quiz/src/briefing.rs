//! Pre-quiz video gate

use butterfly_core::{Route, Topic};

pub const START_LABEL: &str = "Take the Quiz Now!";

/// Holds the quiz back until the briefing video has played to the end
#[derive(Debug, Clone)]
pub struct BriefingGate {
    topic: Topic,
    video: &'static str,
    video_ended: bool,
}

impl BriefingGate {
    /// `None` for topics without a briefing video
    pub fn new(topic: Topic) -> Option<Self> {
        topic.briefing_video().map(|video| Self {
            topic,
            video,
            video_ended: false,
        })
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn video(&self) -> &'static str {
        self.video
    }

    pub fn video_ended(&mut self) {
        self.video_ended = true;
    }

    pub fn can_start(&self) -> bool {
        self.video_ended
    }

    pub fn start_quiz(&self) -> Option<Route> {
        self.video_ended.then_some(Route::Quiz(self.topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_locked_until_video_ends() {
        let mut gate = BriefingGate::new(Topic::Deforestation).unwrap();
        assert_eq!(gate.video(), "/assets/Deforestation.mp4");
        assert_eq!(gate.start_quiz(), None);

        gate.video_ended();
        assert!(gate.can_start());
        assert_eq!(gate.start_quiz(), Some(Route::Quiz(Topic::Deforestation)));
    }

    #[test]
    fn test_no_gate_without_video() {
        assert!(BriefingGate::new(Topic::EconomicEcho).is_none());
    }
}
