use crate::state::MetricsSnapshot;

/// All messages (events) that can flow through the dashboard event loop.
///
/// Sources:
/// - Metric monitor task   → `Snapshot`
/// - Config watcher task   → `ConfigReloaded`
/// - Signal handler        → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Metric monitor ────────────────────────────────────────────────────────
    /// Fresh metrics snapshot from the background monitor task.
    Snapshot(MetricsSnapshot),

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,

    // ── User actions ──────────────────────────────────────────────────────────
    /// Drop every retained sample and start the history from scratch.
    ResetHistory,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}
