use agro_config::DashConfig;
use agro_core::{Channel, Message, Result};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use crate::dashboard::{Dashboard, Refresh};
use crate::render;

/// Run the dashboard over events arriving on stdin until the feed ends,
/// a shutdown is requested, or Ctrl-C is pressed.
pub async fn run(config: DashConfig) -> Result<()> {
    run_with(&config, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

/// Drive a dashboard from any line-oriented event source and return its final state.
pub async fn run_with<R>(config: &DashConfig, reader: R) -> Result<Dashboard>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let mut dashboard = Dashboard::new(config);
    let mut rx = agro_feed::spawn_feed(reader, config.feed.buffer);

    info!("Waiting for events");
    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    break; // feed task finished
                };
                if let Some(refresh) = dashboard.apply(message) {
                    report(&dashboard, &refresh);
                    if refresh == Refresh::Shutdown {
                        break;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted; shutting down");
                dashboard.apply(Message::Shutdown);
                break;
            }
        }
    }

    Ok(dashboard)
}

/// Emit the readouts a refresh affects.
fn report(dashboard: &Dashboard, refresh: &Refresh) {
    match refresh {
        Refresh::Status => match dashboard.status() {
            s if s.is_connected() => info!(status = %s, "link"),
            s => warn!(status = %s, "link"),
        },
        Refresh::Gateway => info!(gateway = %dashboard.gateway(), "gateway"),
        Refresh::Location { node_id, lat, lon } => {
            let color = dashboard
                .nodes()
                .get(node_id)
                .map_or("", |n| n.color.as_str());
            info!(node = %node_id, color, "{}", render::popup(node_id, *lat, *lon));
        }
        Refresh::Sample { node_id } => {
            let averages = dashboard
                .averages()
                .into_iter()
                .map(|(c, readout)| format!("{}={readout}", c.key()))
                .collect::<Vec<_>>()
                .join(" ");
            let temperature = node_id
                .as_deref()
                .and_then(|id| dashboard.node_series(id))
                .and_then(|s| s.latest(Channel::Temperature.key()))
                .map(|(v, _)| render::cell(Some(v), 1));
            info!(
                node = node_id.as_deref().unwrap_or(render::EMPTY_CELL),
                at = %render::local_clock_time(dashboard.last_reading()),
                total = dashboard.table().total(),
                node_temperature = temperature.as_deref().unwrap_or(render::PLACEHOLDER),
                "reading; averages {averages}"
            );
        }
        Refresh::Initial { rows } => {
            let center = dashboard
                .nodes()
                .center()
                .map(|(lat, lon)| format!("{lat:.6},{lon:.6}"));
            info!(
                rows,
                gateway = %dashboard.gateway(),
                center = center.as_deref().unwrap_or(render::PLACEHOLDER),
                "initial data loaded"
            );
        }
        Refresh::Shutdown => info!("shutdown requested"),
    }
}
