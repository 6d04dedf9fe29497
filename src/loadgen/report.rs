/// Aggregation and formatting of load test results.
use crate::error::AppError;
use crate::loadgen::runner::RequestResult;
use crate::loadgen::tasks::TaskKind;
use serde::Serialize;
use std::time::Duration;

/// Latency summary over successful requests, in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub average: f64,
    pub p50: u64,
    pub p95: u64,
}

/// Per-task execution counts.
#[derive(Debug, Clone, Serialize)]
pub struct TaskCounts {
    pub task: &'static str,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Aggregated view of a finished load test.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub total_requests: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub latency_ms: LatencySummary,
    pub throughput_rps: f64,
    pub tasks: Vec<TaskCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl LoadReport {
    /// Aggregate raw results into a report.
    pub fn from_results(results: &[RequestResult], elapsed: Duration) -> Self {
        let total_requests = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        let failed = total_requests.saturating_sub(successful);
        let success_rate = if total_requests > 0 {
            (successful as f64 / total_requests as f64) * 100.0
        } else {
            0.0
        };
        let failure_rate = if total_requests > 0 {
            100.0 - success_rate
        } else {
            0.0
        };

        let mut latencies: Vec<u64> = results
            .iter()
            .filter_map(|r| if r.success { Some(r.latency_ms) } else { None })
            .collect();
        latencies.sort_unstable();

        let average = if !latencies.is_empty() {
            latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
        } else {
            0.0
        };

        let p50 = if !latencies.is_empty() {
            latencies[latencies.len() / 2]
        } else {
            0
        };

        let p95 = if !latencies.is_empty() {
            let index = ((latencies.len() as f64) * 0.95).ceil() as usize;
            let index = index.clamp(0, latencies.len().saturating_sub(1));
            latencies[index]
        } else {
            0
        };

        let elapsed_secs = elapsed.as_secs_f64();
        let throughput_rps = if elapsed_secs > 0.0 {
            total_requests as f64 / elapsed_secs
        } else {
            0.0
        };

        let tasks = TaskKind::ALL
            .iter()
            .map(|kind| {
                let of_kind = results.iter().filter(|r| r.task == *kind);
                let total = of_kind.clone().count();
                let successful = of_kind.filter(|r| r.success).count();
                TaskCounts {
                    task: kind.name(),
                    total,
                    successful,
                    failed: total.saturating_sub(successful),
                }
            })
            .collect();

        let last_error = results
            .iter()
            .rev()
            .find(|r| !r.success)
            .and_then(|r| r.error.clone());

        Self {
            total_requests,
            successful,
            failed,
            success_rate,
            failure_rate,
            latency_ms: LatencySummary { average, p50, p95 },
            throughput_rps,
            tasks,
            last_error,
        }
    }

    /// Human-readable text rendering.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("\n=== Load Test Results ===\n");
        out.push_str(&format!("Total Requests: {}\n", self.total_requests));
        out.push_str(&format!(
            "Successful: {} ({:.1}%)\n",
            self.successful, self.success_rate
        ));
        out.push_str(&format!(
            "Failed: {} ({:.1}%)\n",
            self.failed, self.failure_rate
        ));
        out.push_str("\nLatency (ms):\n");
        out.push_str(&format!("  Average: {:.2}\n", self.latency_ms.average));
        out.push_str(&format!("  p50: {}\n", self.latency_ms.p50));
        out.push_str(&format!("  p95: {}\n", self.latency_ms.p95));
        out.push_str(&format!(
            "\nThroughput: {:.1} req/s\n",
            self.throughput_rps
        ));

        out.push_str("\nPer task:\n");
        for task in &self.tasks {
            out.push_str(&format!(
                "  {}: {} total, {} ok, {} failed\n",
                task.task, task.total, task.successful, task.failed
            ));
        }

        if let Some(ref err) = self.last_error {
            out.push_str(&format!("\nLast error: {}\n", err));
        }

        out
    }

    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(AppError::Json)
    }

    /// Single-row CSV rendering with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "total_requests,successful,failed,success_rate,avg_latency_ms,p50_latency_ms,p95_latency_ms,throughput_rps\n",
        );
        out.push_str(&format!(
            "{},{},{},{:.4},{:.2},{},{},{:.2}\n",
            self.total_requests,
            self.successful,
            self.failed,
            self.success_rate,
            self.latency_ms.average,
            self.latency_ms.p50,
            self.latency_ms.p95,
            self.throughput_rps
        ));
        out
    }
}
