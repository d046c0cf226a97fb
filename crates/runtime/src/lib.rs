//! Wires the metric monitor, the per-metric histories and the text renderer
//! into one event loop.

pub mod context;
pub mod render;

pub use context::{DashboardContext, Gauge, SeriesView};

use std::path::PathBuf;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};
use vigil_config::{ConfigWatcher, SourceConfig, SourceKind, VigilConfig};
use vigil_core::{Message, MetricKind, Result};
use vigil_system::{spawn_monitor, MetricSource, Simulator, SysinfoSource};

/// Dashboard state plus the bookkeeping the event loop needs around it.
pub struct Dashboard {
    ctx: DashboardContext,
    config: VigilConfig,
    config_path: PathBuf,
    ticks: u32,
}

impl Dashboard {
    pub fn new(config: VigilConfig, config_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            ctx: DashboardContext::new(&config)?,
            config,
            config_path: config_path.into(),
            ticks: 0,
        })
    }

    pub fn context(&self) -> &DashboardContext {
        &self.ctx
    }

    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    /// Apply one message. Returns `false` once the loop should exit.
    pub fn update(&mut self, message: Message) -> bool {
        match message {
            Message::Snapshot(snapshot) => {
                let now_ms = snapshot.timestamp;
                let accepted = self.ctx.ingest(snapshot);
                debug!(ts = now_ms, accepted, "snapshot ingested");

                self.ticks = self.ticks.wrapping_add(1);
                let every = self.config.render.every_ticks;
                if every > 0 && self.ticks % every == 0 {
                    self.report(now_ms);
                }
            }
            Message::ConfigReloaded => match vigil_config::load(&self.config_path) {
                Ok(config) => {
                    self.ctx.apply_config(&config);
                    self.config = config;
                    info!("configuration reloaded");
                }
                Err(e) => warn!("config reload failed, keeping previous settings: {e}"),
            },
            Message::ResetHistory => self.ctx.reset(),
            Message::Shutdown => return false,
        }
        true
    }

    fn report(&self, now_ms: i64) {
        info!("\n{}", render::render_summary(&self.ctx, now_ms, &self.config.render));

        if self.config.render.json {
            for kind in MetricKind::ALL {
                match render::render_json(&self.ctx, kind, now_ms) {
                    Ok(line) => info!(target: "vigil::json", "{line}"),
                    Err(e) => warn!(metric = %kind, "cannot encode series view: {e}"),
                }
            }
        }
    }
}

/// Build the metric source selected in the config.
pub fn make_source(config: &SourceConfig) -> Box<dyn MetricSource> {
    match config.kind {
        SourceKind::System => Box::new(SysinfoSource::new(config.id.clone())),
        SourceKind::Simulated => {
            Box::new(Simulator::new(config.id.clone(), config.seed, config.servers))
        }
    }
}

/// Run the dashboard until Ctrl-C. `SIGUSR1` clears the history.
pub async fn run() -> Result<()> {
    let config_path = vigil_config::default_path();
    let config = vigil_config::load(&config_path)?;

    let mut dashboard = Dashboard::new(config.clone(), config_path.clone())?;
    let (monitor, mut snapshots) =
        spawn_monitor(make_source(&config.source), config.history.poll_interval());
    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);
    let mut reset_requests = signal(SignalKind::user_defined1())?;

    info!(
        capacity = config.history.capacity,
        window = %config.history.default_window,
        "dashboard running"
    );

    loop {
        let message = tokio::select! {
            Some(snapshot) = snapshots.recv() => Message::Snapshot(snapshot),
            Some(()) = reloads.recv() => Message::ConfigReloaded,
            Some(()) = reset_requests.recv() => Message::ResetHistory,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
            else => Message::Shutdown,
        };

        if !dashboard.update(message) {
            break;
        }
    }

    info!("shutting down");
    monitor.shutdown().await;
    Ok(())
}
