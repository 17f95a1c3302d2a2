use serde::Serialize;
use std::time::Duration;

/// Order statistics over a set of analyze-call latencies.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyReport {
    pub total_calls: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl LatencyReport {
    pub fn from_latencies(latencies: &[Duration]) -> Self {
        if latencies.is_empty() {
            return Self::zero();
        }

        let mut times: Vec<f64> = latencies
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let len = times.len();

        Self {
            total_calls: len,
            mean_ms: times.iter().sum::<f64>() / len as f64,
            median_ms: times[len / 2],
            p90_ms: times[(len as f64 * 0.90) as usize],
            p99_ms: times[(len as f64 * 0.99) as usize],
            min_ms: times[0],
            max_ms: times[len - 1],
        }
    }

    fn zero() -> Self {
        Self {
            total_calls: 0,
            mean_ms: 0.0,
            median_ms: 0.0,
            p90_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        }
    }

    pub fn display(&self) {
        println!("\n=== LATENCY BENCHMARK RESULTS ===");
        println!("Calls measured: {}", self.total_calls);
        println!("\nLatency (ms):");
        println!("├─ mean:   {:.2}", self.mean_ms);
        println!("├─ median: {:.2}", self.median_ms);
        println!("├─ p90:    {:.2}", self.p90_ms);
        println!("├─ p99:    {:.2}", self.p99_ms);
        println!("├─ min:    {:.2}", self.min_ms);
        println!("└─ max:    {:.2}", self.max_ms);
    }
}
