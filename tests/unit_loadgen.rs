use obsbench::error::AppError;
use obsbench::http::client::{TargetClient, TaskResponse};
/// Unit tests for the load generation modules.
use obsbench::loadgen::config::LoadConfig;
use obsbench::loadgen::runner::Runner;
use obsbench::loadgen::tasks::{SentencePayload, TaskKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[test]
fn test_sentence_payload_shape() {
    let payload = SentencePayload::random();
    let json = serde_json::to_value(&payload).unwrap();
    let text = json["text"].as_str().unwrap();

    let suffix: u32 = text.strip_prefix("Test sentence ").unwrap().parse().unwrap();
    assert!((1..=1000).contains(&suffix));
}

#[test]
fn test_task_weights() {
    assert_eq!(TaskKind::PostSentence.weight(), 2);
    assert_eq!(TaskKind::GetRandomDelay.weight(), 1);
}

#[test]
fn test_wait_time_round_trip() {
    let wt = LoadConfig::parse_wait_time("1-3s").unwrap();
    assert_eq!((wt.min_ms, wt.max_ms), (1000, 3000));
    assert!(LoadConfig::parse_wait_time("1-3").is_err());
}

struct ScriptedClient {
    responses: Mutex<VecDeque<u16>>,
}

#[async_trait::async_trait]
impl TargetClient for ScriptedClient {
    async fn execute(&self, _task: &TaskKind) -> Result<TaskResponse, AppError> {
        let status = self
            .responses
            .lock()
            .expect("responses mutex poisoned")
            .pop_front()
            .unwrap_or(200);
        Ok(TaskResponse { status, body: None })
    }

    fn base_url(&self) -> &str {
        "http://scripted"
    }
}

#[tokio::test]
async fn test_end_to_end_classification() {
    let client = Arc::new(ScriptedClient {
        responses: Mutex::new(VecDeque::from(vec![200, 404, 200, 500, 302])),
    });

    let mut config = LoadConfig::new(2, 5);
    config.wait_time = None;

    let results = Runner::new(config)
        .run(client)
        .await
        .expect("run should complete");

    let successes = results.iter().filter(|r| r.success).count();
    assert_eq!(successes, 2, "only the two 200s classify as success");

    for result in &results {
        match result.status {
            Some(200) => assert!(result.success),
            Some(_) => assert!(!result.success),
            None => panic!("scripted client always returns a status"),
        }
    }
}
