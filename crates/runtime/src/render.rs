//! Plain-text rendering of the dashboard, meant for log output.

use vigil_config::RenderConfig;
use vigil_core::{GaugeLevel, MetricKind};

use crate::context::{DashboardContext, Gauge, SeriesView};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One gauge line, e.g. `! cpu         72.0%`.
pub fn render_gauge(gauge: &Gauge) -> String {
    let marker = match gauge.level {
        GaugeLevel::Normal => ' ',
        GaugeLevel::Warning => '!',
        GaugeLevel::Critical => '#',
    };
    format!(
        "{marker} {:<8} {:>7.1}{}",
        gauge.metric.as_str(),
        gauge.value,
        gauge.metric.unit()
    )
}

/// Block-character sparkline of the last `width` chart points.
pub fn render_sparkline(view: &SeriesView, width: usize) -> String {
    let Some(scale) = view.scale else {
        return String::new();
    };
    let start = view.points.len().saturating_sub(width);
    view.points[start..]
        .iter()
        .map(|&(_, v)| {
            let idx = (scale.normalize(v) * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx.min(BARS.len() - 1)]
        })
        .collect()
}

/// Multi-line report: health, traffic balance, then one line per metric
/// with its gauge, window statistics and trend.
pub fn render_summary(ctx: &DashboardContext, now_ms: i64, config: &RenderConfig) -> String {
    let Some(health) = ctx.health() else {
        return "no data yet".to_string();
    };

    let mut out = format!("health: {health}");
    if let Some(lb) = ctx.load_balance() {
        let state = if lb.balanced { "balanced" } else { "skewed" };
        out.push_str(&format!(
            " | traffic ratio {:.1} ({state}, {} servers)",
            lb.ratio, lb.server_count
        ));
    }

    let window = ctx.window();
    for gauge in ctx.gauges() {
        let view = ctx.window_view(gauge.metric, window, now_ms);
        out.push('\n');
        out.push_str(&render_gauge(&gauge));
        if let Some(agg) = view.aggregate {
            out.push_str(&format!(
                "  [{window}: min {:.1} avg {:.1} max {:.1}]  {}",
                agg.min,
                agg.mean,
                agg.max,
                render_sparkline(&view, config.sparkline_width)
            ));
        }
    }
    out
}

/// JSON line for one metric's window view.
pub fn render_json(ctx: &DashboardContext, kind: MetricKind, now_ms: i64) -> serde_json::Result<String> {
    serde_json::to_string(&ctx.window_view(kind, ctx.window(), now_ms))
}
