/// HTTP client abstraction for the target demo service.
use crate::error::AppError;
use crate::loadgen::tasks::TaskKind;
use reqwest::Client;
use std::time::Duration;

/// Outcome of a single HTTP exchange with the target service.
///
/// Any response the server produced is data, including error statuses;
/// only transport failures surface as `AppError`. Classification of the
/// status code happens in the runner.
#[derive(Debug, Clone)]
pub struct TaskResponse {
    /// HTTP status code as returned by the server
    pub status: u16,
    /// Response body, when one was read
    pub body: Option<String>,
}

impl TaskResponse {
    /// Whether this response counts as a success (status exactly 200).
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Trait for clients that can execute load-test tasks.
#[async_trait::async_trait]
pub trait TargetClient: Send + Sync {
    /// Execute one task against the target and return the raw outcome.
    async fn execute(&self, task: &TaskKind) -> Result<TaskResponse, AppError>;

    /// Base URL of the target service.
    #[allow(dead_code)]
    fn base_url(&self) -> &str;
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the target service, e.g. "http://localhost:8080"
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Additional headers applied to every request
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            headers: Vec::new(),
        }
    }
}

/// reqwest-backed client for the demo service.
pub struct DemoAppClient {
    client: Client,
    config: ClientConfig,
}

impl DemoAppClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        if config.base_url.is_empty() {
            return Err(AppError::Config(
                "Target base URL is required. Specify one with --host.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn url_for(&self, task: &TaskKind) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            task.path()
        )
    }
}

#[async_trait::async_trait]
impl TargetClient for DemoAppClient {
    async fn execute(&self, task: &TaskKind) -> Result<TaskResponse, AppError> {
        let url = self.url_for(task);

        let mut req = match task {
            TaskKind::PostSentence => self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .body(task.payload()?.unwrap_or_default()),
            TaskKind::GetRandomDelay => self.client.get(&url),
        };

        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }

        tracing::debug!(task = task.name(), url = %url, "sending request");

        let response = req
            .send()
            .await
            .map_err(|e| AppError::Http(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.ok().filter(|b| !b.is_empty());

        Ok(TaskResponse { status, body })
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
