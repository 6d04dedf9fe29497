/// Load runner implementation.
use crate::error::AppError;
use crate::http::client::TargetClient;
use crate::loadgen::config::LoadConfig;
use crate::loadgen::tasks::TaskKind;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;

/// Result of a single task execution.
#[derive(Debug, Clone)]
pub struct RequestResult {
    /// Which task ran
    pub task: TaskKind,
    /// Success status (HTTP 200 exactly)
    pub success: bool,
    /// HTTP status code, when a response was received
    pub status: Option<u16>,
    /// Latency in milliseconds
    pub latency_ms: u64,
    /// Error message (transport failure or non-200 status)
    pub error: Option<String>,
}

/// Drives a fixed number of weighted task executions against the target.
pub struct Runner {
    config: LoadConfig,
}

impl Runner {
    /// Create a new runner.
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Run the load test.
    pub async fn run<C: TargetClient + 'static>(
        &self,
        client: Arc<C>,
    ) -> Result<Vec<RequestResult>, AppError> {
        self.run_with_progress(client, None).await
    }

    /// Run the load test with optional progress bar.
    pub async fn run_with_progress<C: TargetClient + 'static>(
        &self,
        client: Arc<C>,
        progress_bar: Option<Arc<indicatif::ProgressBar>>,
    ) -> Result<Vec<RequestResult>, AppError> {
        if let Some(seed) = self.config.seed {
            fastrand::seed(seed);
        }

        let mut handles = Vec::with_capacity(self.config.runs);
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.users));
        let completed = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let successful = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let failed = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let total_latency = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let start_time = Instant::now();

        for i in 0..self.config.runs {
            let permit = semaphore.clone().acquire_owned().await.map_err(|e| {
                AppError::Config(format!("Failed to acquire semaphore permit: {}", e))
            })?;

            // Selection happens on this thread so a seeded run is reproducible.
            let task = TaskKind::choose();
            tracing::debug!(run = i, task = task.name(), "launching task");

            let client = client.clone();
            let dry_run = self.config.dry_run;
            let progress = progress_bar.clone();
            let completed_clone = completed.clone();
            let successful_clone = successful.clone();
            let failed_clone = failed.clone();
            let total_latency_clone = total_latency.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = Self::execute_task(client, task, dry_run).await;

                let completed_count =
                    completed_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                if result.success {
                    successful_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    total_latency_clone
                        .fetch_add(result.latency_ms, std::sync::atomic::Ordering::Relaxed);
                } else {
                    failed_clone.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }

                if let Some(ref pb) = progress {
                    let success_count = successful_clone.load(std::sync::atomic::Ordering::Relaxed);
                    let fail_count = failed_clone.load(std::sync::atomic::Ordering::Relaxed);
                    let total_lat = total_latency_clone.load(std::sync::atomic::Ordering::Relaxed);
                    let avg_latency = if success_count > 0 {
                        total_lat / success_count as u64
                    } else {
                        0
                    };

                    let elapsed = start_time.elapsed().as_secs_f64();
                    let throughput = if elapsed > 0.0 {
                        completed_count as f64 / elapsed
                    } else {
                        0.0
                    };

                    pb.set_message(format!(
                        "Success: {} | Failed: {} | Avg Latency: {}ms | Throughput: {:.1} req/s",
                        success_count, fail_count, avg_latency, throughput
                    ));
                    pb.set_position(completed_count as u64);
                }

                result
            });

            handles.push(handle);

            // Simulated-user pacing between task launches.
            if let Some(ref wait_time) = self.config.wait_time {
                sleep(wait_time.sample()).await;
            }
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => results.push(RequestResult {
                    task: TaskKind::PostSentence,
                    success: false,
                    status: None,
                    latency_ms: 0,
                    error: Some(format!("Task join error: {}", e)),
                }),
            }
        }

        if let Some(ref pb) = progress_bar {
            pb.finish_with_message("Load test completed");
        }

        Ok(results)
    }

    /// Execute a single task. No retries: one request, one classified outcome.
    async fn execute_task<C: TargetClient>(
        client: Arc<C>,
        task: TaskKind,
        dry_run: bool,
    ) -> RequestResult {
        if dry_run {
            return RequestResult {
                task,
                success: true,
                status: None,
                latency_ms: 0,
                error: None,
            };
        }

        let start = Instant::now();

        match client.execute(&task).await {
            Ok(response) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let success = response.is_success();
                RequestResult {
                    task,
                    success,
                    status: Some(response.status),
                    latency_ms,
                    error: if success {
                        None
                    } else {
                        Some(format!(
                            "Got unexpected response code: {}",
                            response.status
                        ))
                    },
                }
            }
            Err(e) => RequestResult {
                task,
                success: false,
                status: None,
                latency_ms: start.elapsed().as_millis() as u64,
                error: Some(e.to_string()),
            },
        }
    }
}
