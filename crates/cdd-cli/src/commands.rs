//! CLI command implementations

use anyhow::Result;
use cdd_config::GlobalConfig;
use cdd_provider::{ContainerRuntime, ContainerState, ContainerSummary};
use std::io::Write;

// Column widths
const NAME_WIDTH: usize = 26;
const IMAGE_WIDTH: usize = 26;
const STATE_WIDTH: usize = 11;
const STATUS_WIDTH: usize = 24;

/// Connect and run the interactive dashboard until the user quits
pub async fn dashboard(config: &GlobalConfig, socket: Option<&str>) -> Result<()> {
    let (dashboard, updates) = cdd_core::connect(config, socket).await?;
    let app = cdd_tui::App::new(dashboard, updates, config.ui.tick_rate());
    cdd_tui::run(app).await?;
    tracing::info!("Dashboard closed");
    Ok(())
}

/// Print every container once, as a table or as JSON
pub async fn list(runtime: &dyn ContainerRuntime, json: bool, out: &mut impl Write) -> Result<()> {
    let containers = runtime.list(true).await?;
    tracing::debug!("Listed {} containers", containers.len());

    if json {
        serde_json::to_writer_pretty(&mut *out, &containers)?;
        writeln!(out)?;
        return Ok(());
    }

    if containers.is_empty() {
        writeln!(out, "No containers found.")?;
        return Ok(());
    }

    write!(out, "{}", format_table(&containers))?;
    Ok(())
}

/// Render the snapshot as a fixed-width table
pub fn format_table(containers: &[ContainerSummary]) -> String {
    let mut table = format!(
        "  {:<NAME_WIDTH$} {:<IMAGE_WIDTH$} {:<STATE_WIDTH$} {:<STATUS_WIDTH$} PORTS\n",
        "NAME", "IMAGE", "STATE", "STATUS"
    );
    table.push_str(&"-".repeat(2 + NAME_WIDTH + IMAGE_WIDTH + STATE_WIDTH + STATUS_WIDTH + 9));
    table.push('\n');

    for container in containers {
        let symbol = match container.state {
            ContainerState::Running => "●",
            ContainerState::Paused | ContainerState::Restarting => "◐",
            _ => "○",
        };
        let line = format!(
            "{} {:<NAME_WIDTH$} {:<IMAGE_WIDTH$} {:<STATE_WIDTH$} {:<STATUS_WIDTH$} {}",
            symbol,
            truncate(&container.name, NAME_WIDTH),
            truncate(&container.image, IMAGE_WIDTH),
            container.state.to_string(),
            truncate(&container.status, STATUS_WIDTH),
            container.ports.join(", ")
        );
        table.push_str(line.trim_end());
        table.push('\n');
    }
    table
}

/// Shorten to `width` characters, marking the cut with "..."
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
