use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vigil_core::{MetricsSnapshot, Result};

use crate::MetricSource;

/// Random-walk metric generator for demos and tests.
///
/// Every call nudges each metric by a bounded random step and clamps it:
/// percentages stay in `0..=100`, rates and load averages stay non-negative.
pub struct Simulator {
    id: String,
    rng: StdRng,
    current: MetricsSnapshot,
}

impl Simulator {
    /// `servers` controls how many entries `server_traffic` carries.
    pub fn new(id: impl Into<String>, seed: Option<u64>, servers: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let id = id.into();

        Self {
            current: MetricsSnapshot {
                timestamp: 0,
                source: id.clone(),
                cpu: 65.0,
                memory: 78.0,
                disk: 45.0,
                net_in: 12.5,
                net_out: 8.3,
                load_1m: 2.1,
                load_5m: 1.8,
                load_15m: 1.5,
                server_traffic: vec![10.0; servers],
            },
            id,
            rng,
        }
    }

    /// Uniform step in `[-half, half)`.
    fn step(&mut self, half: f64) -> f64 {
        self.rng.gen_range(-half..half)
    }
}

impl MetricSource for Simulator {
    fn id(&self) -> &str {
        &self.id
    }

    fn sample(&mut self, now_ms: i64) -> Result<MetricsSnapshot> {
        let cpu = self.current.cpu + self.step(5.0);
        let memory = self.current.memory + self.step(4.0);
        let disk = self.current.disk + self.step(1.0);
        let net_in = self.current.net_in + self.step(2.5);
        let net_out = self.current.net_out + self.step(2.0);
        let load_1m = self.current.load_1m + self.step(0.25);
        let load_5m = self.current.load_5m + self.step(0.15);
        let load_15m = self.current.load_15m + self.step(0.1);

        let mut traffic = std::mem::take(&mut self.current.server_traffic);
        for t in &mut traffic {
            // Keep a floor so the balance ratio stays defined.
            *t = (*t + self.rng.gen_range(-2.0..2.0)).max(0.1);
        }

        self.current = MetricsSnapshot {
            timestamp: now_ms,
            source: self.id.clone(),
            cpu: cpu.clamp(0.0, 100.0),
            memory: memory.clamp(0.0, 100.0),
            disk: disk.clamp(0.0, 100.0),
            net_in: net_in.max(0.0),
            net_out: net_out.max(0.0),
            load_1m: load_1m.max(0.0),
            load_5m: load_5m.max(0.0),
            load_15m: load_15m.max(0.0),
            server_traffic: traffic,
        };
        Ok(self.current.clone())
    }
}
