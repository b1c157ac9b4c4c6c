use anyhow::{Context, Result};

use crate::actions::Executor;
use crate::api::TrackerClient;
use crate::cache;
use crate::config::Config;
use crate::dispatch::{dispatch, Action};
use crate::menu::Menu;
use crate::selector::{tracker_actions, MenuRequest, Selector};

/// One hotkey press: fetch, show the menu, perform whatever was chosen.
pub async fn run_menu<S: Selector>(
    config: &Config,
    client: &TrackerClient,
    selector: &S,
) -> Result<Action> {
    let snapshot = client
        .snapshot()
        .await
        .context("Failed to fetch trackers")?;
    let issues = cache::read_issues_or_empty(&config.issue_cache);
    let menu = Menu::build(&snapshot, &issues, &config.glyphs);

    let request = MenuRequest {
        title: menu.title(),
        lines: menu.lines(),
        selected: menu.running_index,
        actions: tracker_actions(&config.bindings),
    };
    let outcome = selector.select(&request).context("Menu failed")?;
    tracing::debug!(row = %outcome.text.trim(), signal = ?outcome.signal, "menu closed");
    let action = dispatch(&outcome, &menu);

    Executor::new(config, client, selector)
        .execute(action.clone())
        .await?;
    Ok(action)
}

/// One-line status of the running tracker, or `None` when nothing runs.
pub async fn status_line(config: &Config, client: &TrackerClient) -> Result<Option<String>> {
    let current = client
        .current()
        .await
        .context("Failed to fetch running tracker")?;
    Ok(current.map(|tracker| {
        format!(
            "{} {} {}",
            config.glyphs.running,
            tracker.key,
            crate::menu::text::space_duration(&tracker.duration)
        )
    }))
}
