//! Menu rows: trackers joined with cached issues, followed by the fixed action rows.

pub mod text;

use crate::api::{Issue, IssueMap, Snapshot, Tracker};
use crate::config::Glyphs;
use text::{pad_left, pad_right, single_line, space_duration, truncate_to_width};

pub const SUMMARY_WIDTH: usize = 30;
const ICON_WIDTH: usize = 2;
const KEY_WIDTH: usize = 12;
const DURATION_WIDTH: usize = 12;
const COLUMN_GAP: &str = " ";

/// Fixed action rows appended after the trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    AddNew,
    RefreshIssues,
    SubmitTrackers,
}

impl Sentinel {
    pub const ALL: [Sentinel; 3] = [
        Sentinel::AddNew,
        Sentinel::RefreshIssues,
        Sentinel::SubmitTrackers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sentinel::AddNew => "add new",
            Sentinel::RefreshIssues => "refresh issues",
            Sentinel::SubmitTrackers => "submit trackers",
        }
    }
}

/// What a row stands for. Dispatch reads this, never the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Tracker {
        key: String,
        running: bool,
        description: Option<String>,
    },
    Sentinel(Sentinel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub kind: RowKind,
    pub icon: String,
    pub key: String,
    pub summary: String,
    pub duration: String,
}

impl MenuRow {
    fn tracker(tracker: &Tracker, issue: Option<&Issue>, glyphs: &Glyphs) -> Self {
        let icon = if tracker.running {
            &glyphs.running
        } else {
            &glyphs.paused
        };
        let summary = issue
            .map(|issue| truncate_to_width(&single_line(&issue.summary), SUMMARY_WIDTH))
            .unwrap_or_default();

        Self {
            kind: RowKind::Tracker {
                key: tracker.key.clone(),
                running: tracker.running,
                description: tracker.description.clone(),
            },
            icon: icon.clone(),
            key: tracker.key.clone(),
            summary,
            duration: space_duration(&tracker.duration),
        }
    }

    fn sentinel(sentinel: Sentinel) -> Self {
        Self {
            kind: RowKind::Sentinel(sentinel),
            icon: String::new(),
            key: String::new(),
            summary: String::new(),
            duration: String::new(),
        }
    }

    /// The fixed-width line shown in the launcher.
    pub fn render(&self) -> String {
        match &self.kind {
            RowKind::Sentinel(sentinel) => format!(
                "{}{}{}",
                pad_right("", ICON_WIDTH),
                COLUMN_GAP,
                sentinel.label()
            ),
            RowKind::Tracker { .. } => [
                pad_right(&self.icon, ICON_WIDTH),
                pad_right(&self.key, KEY_WIDTH),
                pad_right(&self.summary, SUMMARY_WIDTH),
                pad_left(&self.duration, DURATION_WIDTH),
            ]
            .join(COLUMN_GAP),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub rows: Vec<MenuRow>,
    /// Row of the running tracker; `None` when nothing runs.
    pub running_index: Option<usize>,
    pub total_duration: String,
}

impl Menu {
    pub fn build(snapshot: &Snapshot, issues: &IssueMap, glyphs: &Glyphs) -> Self {
        let mut rows: Vec<MenuRow> = snapshot
            .trackers
            .iter()
            .map(|tracker| MenuRow::tracker(tracker, issues.get(&tracker.key), glyphs))
            .collect();
        rows.extend(Sentinel::ALL.into_iter().map(MenuRow::sentinel));

        Self {
            rows,
            running_index: running_index(&snapshot.trackers),
            total_duration: space_duration(&snapshot.total_duration),
        }
    }

    pub fn title(&self) -> String {
        if self.total_duration.is_empty() {
            "trackers".to_string()
        } else {
            format!("trackers ({})", self.total_duration)
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(MenuRow::render).collect()
    }

    pub fn row(&self, index: usize) -> Option<&MenuRow> {
        self.rows.get(index)
    }
}

/// Position of the first running tracker. The service keeps at most one running.
pub fn running_index(trackers: &[Tracker]) -> Option<usize> {
    trackers.iter().position(|t| t.running)
}

/// Rows for the "add new" picker: cached issues in key order.
pub fn issue_choices(issues: &IssueMap) -> Vec<(String, String)> {
    issues
        .values()
        .map(|issue| {
            let line = format!(
                "{}{}{}",
                pad_right(&issue.key, KEY_WIDTH),
                COLUMN_GAP,
                single_line(&issue.summary)
            );
            (issue.key.clone(), line)
        })
        .collect()
}
