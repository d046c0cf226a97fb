use std::time::Instant;

use sysinfo::{Disks, Networks, System};
use vigil_core::{MetricsSnapshot, Result};

use crate::MetricSource;

const MIB: f64 = (1u64 << 20) as f64;

/// Real metrics of the machine the dashboard runs on.
pub struct SysinfoSource {
    id: String,
    sys: System,
    networks: Networks,
    last_refresh: Instant,
}

impl SysinfoSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sys: System::new_all(),
            networks: Networks::new_with_refreshed_list(),
            last_refresh: Instant::now(),
        }
    }
}

impl MetricSource for SysinfoSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn sample(&mut self, now_ms: i64) -> Result<MetricsSnapshot> {
        self.sys.refresh_all();
        self.networks.refresh(false); // false = keep existing interfaces list

        let elapsed = self.last_refresh.elapsed().as_secs_f64();
        self.last_refresh = Instant::now();
        // First tick after construction can be near-instant; avoid a huge rate.
        let elapsed = if elapsed < 0.1 { 1.0 } else { elapsed };

        // ── CPU ──────────────────────────────────────────────────────────────
        let cpus = self.sys.cpus();
        let cpu = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| f64::from(c.cpu_usage())).sum::<f64>() / cpus.len() as f64
        };

        // ── Memory ───────────────────────────────────────────────────────────
        let memory = percent(self.sys.used_memory(), self.sys.total_memory());

        // ── Disk ─────────────────────────────────────────────────────────────
        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .map(|d| percent(d.total_space().saturating_sub(d.available_space()), d.total_space()))
            .unwrap_or(0.0);

        // ── Network ──────────────────────────────────────────────────────────
        // `received()` / `transmitted()` are deltas since the last refresh.
        let raw_rx: u64 = self.networks.iter().map(|(_, d)| d.received()).sum();
        let raw_tx: u64 = self.networks.iter().map(|(_, d)| d.transmitted()).sum();

        let load = System::load_average();

        Ok(MetricsSnapshot {
            timestamp: now_ms,
            source: self.id.clone(),
            cpu,
            memory,
            disk,
            net_in: raw_rx as f64 / MIB / elapsed,
            net_out: raw_tx as f64 / MIB / elapsed,
            load_1m: load.one,
            load_5m: load.five,
            load_15m: load.fifteen,
            server_traffic: Vec::new(),
        })
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}
