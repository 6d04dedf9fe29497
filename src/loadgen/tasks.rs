/// Task definitions for the load test.
use crate::error::AppError;
use serde::Serialize;

/// Inclusive range for the randomized sentence suffix.
const SENTENCE_SUFFIX_MIN: u32 = 1;
const SENTENCE_SUFFIX_MAX: u32 = 1000;

/// A request behavior the load test can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// POST /api/v1/sentence with a randomized JSON payload
    PostSentence,
    /// GET /api/v1/random-delay with no body
    GetRandomDelay,
}

/// JSON payload for the sentence endpoint.
#[derive(Debug, Serialize)]
pub struct SentencePayload {
    pub text: String,
}

impl SentencePayload {
    /// Build a payload with a fresh random suffix in [1, 1000].
    pub fn random() -> Self {
        let suffix = fastrand::u32(SENTENCE_SUFFIX_MIN..=SENTENCE_SUFFIX_MAX);
        Self {
            text: format!("Test sentence {}", suffix),
        }
    }
}

impl TaskKind {
    /// All task kinds, in weight order.
    pub const ALL: [TaskKind; 2] = [TaskKind::PostSentence, TaskKind::GetRandomDelay];

    /// Relative selection weight. PostSentence is picked twice as often.
    pub fn weight(&self) -> u32 {
        match self {
            TaskKind::PostSentence => 2,
            TaskKind::GetRandomDelay => 1,
        }
    }

    /// Request path on the target service.
    pub fn path(&self) -> &'static str {
        match self {
            TaskKind::PostSentence => "/api/v1/sentence",
            TaskKind::GetRandomDelay => "/api/v1/random-delay",
        }
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::PostSentence => "post_sentence",
            TaskKind::GetRandomDelay => "get_random_delay",
        }
    }

    /// Serialized request body, if this task sends one.
    pub fn payload(&self) -> Result<Option<String>, AppError> {
        match self {
            TaskKind::PostSentence => {
                let body = serde_json::to_string(&SentencePayload::random())?;
                Ok(Some(body))
            }
            TaskKind::GetRandomDelay => Ok(None),
        }
    }

    /// Pick a task at random, respecting the 2:1 weighting.
    pub fn choose() -> TaskKind {
        let total: u32 = Self::ALL.iter().map(|t| t.weight()).sum();
        let mut draw = fastrand::u32(0..total);
        for task in Self::ALL {
            if draw < task.weight() {
                return task;
            }
            draw -= task.weight();
        }
        // Unreachable: draw is bounded by the weight sum.
        TaskKind::PostSentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn sentence_payload_is_valid_json_with_text_field() {
        for _ in 0..100 {
            let body = TaskKind::PostSentence
                .payload()
                .expect("serialization should succeed")
                .expect("post task has a body");
            let parsed: Value = serde_json::from_str(&body).expect("body must be valid JSON");
            let text = parsed["text"].as_str().expect("text field must be a string");
            assert!(text.starts_with("Test sentence "));
        }
    }

    #[test]
    fn sentence_suffix_stays_within_range() {
        for _ in 0..1000 {
            let payload = SentencePayload::random();
            let suffix: u32 = payload
                .text
                .strip_prefix("Test sentence ")
                .expect("payload must carry the fixed prefix")
                .parse()
                .expect("suffix must be an integer");
            assert!((1..=1000).contains(&suffix), "suffix {} out of range", suffix);
        }
    }

    #[test]
    fn get_task_has_no_payload() {
        assert!(TaskKind::GetRandomDelay.payload().unwrap().is_none());
    }

    #[test]
    fn task_paths_match_target_api() {
        assert_eq!(TaskKind::PostSentence.path(), "/api/v1/sentence");
        assert_eq!(TaskKind::GetRandomDelay.path(), "/api/v1/random-delay");
    }

    #[test]
    fn weighted_choice_approximates_two_to_one() {
        fastrand::seed(42);
        let draws = 30_000;
        let posts = (0..draws)
            .filter(|_| TaskKind::choose() == TaskKind::PostSentence)
            .count();
        let ratio = posts as f64 / draws as f64;
        assert!(
            (0.63..0.70).contains(&ratio),
            "expected roughly 2/3 post_sentence draws, got {:.3}",
            ratio
        );
    }

    #[test]
    fn weighted_choice_is_deterministic_under_seed() {
        fastrand::seed(7);
        let first: Vec<TaskKind> = (0..50).map(|_| TaskKind::choose()).collect();
        fastrand::seed(7);
        let second: Vec<TaskKind> = (0..50).map(|_| TaskKind::choose()).collect();
        assert_eq!(first, second);
    }
}
