use anyhow::{Context, Result};
use std::io;

use crate::api::TrackerClient;
use crate::cache;
use crate::config::Config;
use crate::dispatch::Action;
use crate::menu::issue_choices;
use crate::selector::{MenuRequest, PromptRequest, SelectionSignal, Selector};

type Opener = fn(&str) -> io::Result<()>;

fn open_in_browser(url: &str) -> io::Result<()> {
    open::that(url)
}

/// Carries out an [`Action`]: at most one call against the tracker service, the cache,
/// or the desktop. Nothing is retried.
pub struct Executor<'a, S: Selector> {
    config: &'a Config,
    client: &'a TrackerClient,
    selector: &'a S,
    opener: Opener,
}

impl<'a, S: Selector> Executor<'a, S> {
    pub fn new(config: &'a Config, client: &'a TrackerClient, selector: &'a S) -> Self {
        Self {
            config,
            client,
            selector,
            opener: open_in_browser,
        }
    }

    #[cfg(test)]
    fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    pub async fn execute(&self, action: Action) -> Result<()> {
        tracing::info!(?action, "dispatching");

        match action {
            Action::Nothing => Ok(()),
            Action::AddNew => self.add_new().await,
            Action::RefreshIssues => refresh_issues(self.config),
            Action::Submit => self
                .client
                .submit()
                .await
                .context("Failed to submit trackers"),
            Action::Pause => self.client.pause().await.context("Failed to pause tracker"),
            Action::Start(key) => self
                .client
                .start(&key)
                .await
                .with_context(|| format!("Failed to start {key}")),
            Action::Delete(key) => self
                .client
                .delete_tracker(&key)
                .await
                .with_context(|| format!("Failed to delete {key}")),
            Action::EditDescription { key, current } => self.edit_description(&key, &current).await,
            Action::Open(key) => self.open_issue(&key),
        }
    }

    async fn add_new(&self) -> Result<()> {
        let issues = match cache::read_issues(&self.config.issue_cache) {
            Ok(issues) => issues,
            Err(e) => {
                tracing::warn!(error = %e, "no issues to pick from");
                return Ok(());
            }
        };
        let choices = issue_choices(&issues);
        if choices.is_empty() {
            tracing::warn!("issue cache is empty, refresh issues first");
            return Ok(());
        }

        let request = MenuRequest {
            title: "add tracker".to_string(),
            lines: choices.iter().map(|(_, line)| line.clone()).collect(),
            selected: None,
            actions: Vec::new(),
        };
        let outcome = self
            .selector
            .select(&request)
            .context("Issue picker failed")?;

        if outcome.signal != SelectionSignal::DefaultAccept {
            return Ok(());
        }
        let Some((key, _)) = outcome.index.and_then(|i| choices.get(i)) else {
            return Ok(());
        };

        self.client
            .create(key)
            .await
            .with_context(|| format!("Failed to create tracker for {key}"))
    }

    async fn edit_description(&self, key: &str, current: &str) -> Result<()> {
        let request = PromptRequest {
            title: format!("{key} description"),
            initial: current.to_string(),
        };
        let Some(text) = self
            .selector
            .prompt(&request)
            .context("Description prompt failed")?
        else {
            return Ok(());
        };

        self.client
            .set_description(key, text.trim())
            .await
            .with_context(|| format!("Failed to set description of {key}"))
    }

    fn open_issue(&self, key: &str) -> Result<()> {
        let Some(url) = self.config.issue_url(key) else {
            tracing::warn!(%key, "browse_url is not configured, cannot open issue");
            return Ok(());
        };
        (self.opener)(&url).with_context(|| format!("Failed to open {url}"))
    }
}

/// Run the export command and swap in the fresh cache.
pub fn refresh_issues(config: &Config) -> Result<()> {
    let count = cache::refresh(&config.export_command, &config.issue_cache)
        .context("Failed to refresh issues")?;
    tracing::info!(count, "issues refreshed");
    Ok(())
}
