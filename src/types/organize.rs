use serde::{Deserialize, Serialize};

/// Whether an organize run is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeReport {
    /// The new top-level folder, or `None` when nothing was collected.
    pub root_id: Option<String>,
    pub links_collected: usize,
    pub year_folders: Vec<String>,
    pub season_folders: Vec<String>,
    pub month_folders: Vec<String>,
    pub folders_removed: usize,
}

impl OrganizeReport {
    /// True when the run found no links and left the tree untouched.
    pub fn is_skipped(&self) -> bool {
        self.root_id.is_none()
    }
}

/// How the most recent run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Completed(OrganizeReport),
    Failed { error: String },
}
