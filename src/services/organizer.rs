//! Recursive organizer for Chronomarks.
//!
//! Collects every link filed in a folder under the bookmarks bar, sorts them
//! by date added, and rebuilds them under a fresh "Bookmarks" folder split by
//! year. Busy years are split again by season and busy seasons by month. The
//! old folders are removed once every link has moved out of them.

use std::sync::{Arc, Mutex};

use futures::future::try_join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::managers::bookmark_tree::BookmarkTree;
use crate::services::materializer::materialize;
use crate::services::partitioner::{date_key, partition};
use crate::types::bookmark::{BookmarkNode, CreateDetails};
use crate::types::bucket::Granularity;
use crate::types::errors::{OrganizeError, StorageError};
use crate::types::organize::{OrganizeReport, RunOutcome, RunState};

/// A year folder holding at least this many links is split by season.
pub const SEASON_SPLIT_THRESHOLD: usize = 20;
/// A season folder holding at least this many links is split by month.
pub const MONTH_SPLIT_THRESHOLD: usize = 30;
/// Title of the folder a run rebuilds the bar under.
pub const ROOT_FOLDER_TITLE: &str = "Bookmarks";

/// Season and month folder ids created while refining one year.
type Refined = (Vec<String>, Vec<String>);

/// Runs the organize flow against a bookmark tree, one run at a time.
pub struct Organizer {
    tree: Arc<dyn BookmarkTree>,
    state: Arc<Mutex<RunState>>,
    last_outcome: Mutex<Option<RunOutcome>>,
}

/// Marks the organizer running for its lifetime and resets it to idle on drop,
/// whether the run returned, failed, or unwound. Owned so it can travel into a
/// spawned task.
struct RunGuard {
    state: Arc<Mutex<RunState>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = RunState::Idle;
    }
}

impl Organizer {
    pub fn new(tree: Arc<dyn BookmarkTree>) -> Self {
        Self {
            tree,
            state: Arc::new(Mutex::new(RunState::Idle)),
            last_outcome: Mutex::new(None),
        }
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Outcome of the most recent finished run, if any.
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Flips Idle -> Running, refusing when a run is already in flight.
    fn begin(&self) -> Result<RunGuard, OrganizeError> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *state == RunState::Running {
            return Err(OrganizeError::AlreadyRunning);
        }
        *state = RunState::Running;
        Ok(RunGuard {
            state: Arc::clone(&self.state),
        })
    }

    /// Performs one full organize run.
    ///
    /// # Errors
    /// `AlreadyRunning` when another run holds the organizer. Any storage fault
    /// aborts the run and leaves the tree partially migrated.
    pub async fn run(&self) -> Result<OrganizeReport, OrganizeError> {
        let guard = self.begin()?;
        self.run_guarded(guard).await
    }

    /// Claims the organizer and spawns the run on the tokio runtime.
    ///
    /// The organizer is already `Running` when this returns, so a second
    /// `start` or `run` issued right after is refused.
    ///
    /// # Errors
    /// `AlreadyRunning` when another run holds the organizer.
    pub fn start(self: &Arc<Self>) -> Result<JoinHandle<Result<OrganizeReport, OrganizeError>>, OrganizeError> {
        let guard = self.begin()?;
        let organizer = Arc::clone(self);
        Ok(tokio::spawn(async move { organizer.run_guarded(guard).await }))
    }

    async fn run_guarded(&self, _guard: RunGuard) -> Result<OrganizeReport, OrganizeError> {
        info!("organize run started");

        let result = self.organize().await;

        let outcome = match &result {
            Ok(report) => {
                info!(
                    links = report.links_collected,
                    years = report.year_folders.len(),
                    seasons = report.season_folders.len(),
                    months = report.month_folders.len(),
                    removed = report.folders_removed,
                    "organize run finished"
                );
                RunOutcome::Completed(report.clone())
            }
            Err(e) => {
                error!(error = %e, "organize run aborted");
                RunOutcome::Failed { error: e.to_string() }
            }
        };
        *self
            .last_outcome
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(outcome);

        result
    }

    async fn organize(&self) -> Result<OrganizeReport, OrganizeError> {
        let tree = self.tree.get_tree().await?;
        let bar = tree
            .children
            .as_ref()
            .and_then(|roots| roots.first())
            .filter(|node| !node.is_link())
            .ok_or(OrganizeError::MissingBookmarksBar)?;

        let mut links = collect_links(bar);
        if links.is_empty() {
            info!(bar = %bar.id, "no filed links under the bookmarks bar, nothing to organize");
            return Ok(OrganizeReport::default());
        }
        links.sort_by_key(date_key);

        let root = self
            .tree
            .create(CreateDetails::folder(&bar.id, ROOT_FOLDER_TITLE, None))
            .await?;

        let years = partition(Granularity::Year, &links);
        let year_folders = materialize(self.tree.as_ref(), &root.id, &years).await?;
        debug!(root = %root.id, years = year_folders.len(), "links regrouped by year");

        let (folders_removed, (season_folders, month_folders)) = tokio::try_join!(
            self.clean_up(&bar.id, &root.id),
            self.refine_years(&year_folders),
        )?;

        Ok(OrganizeReport {
            root_id: Some(root.id),
            links_collected: links.len(),
            year_folders,
            season_folders,
            month_folders,
            folders_removed,
        })
    }

    /// Removes every folder directly under the bar except the new root.
    /// Bare links on the bar are left alone.
    async fn clean_up(&self, bar_id: &str, root_id: &str) -> Result<usize, StorageError> {
        let children = self.tree.get_children(bar_id).await?;
        let stale: Vec<&BookmarkNode> = children
            .iter()
            .filter(|node| node.id != root_id && !node.is_link())
            .collect();

        try_join_all(stale.iter().map(|node| self.tree.remove_tree(&node.id))).await?;
        debug!(removed = stale.len(), "old folders removed");
        Ok(stale.len())
    }

    async fn refine_years(&self, year_folders: &[String]) -> Result<Refined, StorageError> {
        let refined = try_join_all(year_folders.iter().map(|id| self.refine_year(id))).await?;

        let mut seasons = Vec::new();
        let mut months = Vec::new();
        for (s, m) in refined {
            seasons.extend(s);
            months.extend(m);
        }
        Ok((seasons, months))
    }

    /// Splits a year folder by season when it is busy enough, then refines each season.
    async fn refine_year(&self, year_id: &str) -> Result<Refined, StorageError> {
        let children = self.tree.get_children(year_id).await?;
        if children.len() < SEASON_SPLIT_THRESHOLD {
            return Ok((Vec::new(), Vec::new()));
        }

        let seasons = partition(Granularity::Season, &children);
        let season_folders = materialize(self.tree.as_ref(), year_id, &seasons).await?;
        debug!(year = year_id, links = children.len(), seasons = season_folders.len(), "year split by season");

        let months = try_join_all(season_folders.iter().map(|id| self.refine_season(id))).await?;
        Ok((season_folders, months.into_iter().flatten().collect()))
    }

    /// Splits a season folder by month when it is busy enough. Months are the finest level.
    async fn refine_season(&self, season_id: &str) -> Result<Vec<String>, StorageError> {
        let children = self.tree.get_children(season_id).await?;
        if children.len() < MONTH_SPLIT_THRESHOLD {
            return Ok(Vec::new());
        }

        let months = partition(Granularity::Month, &children);
        let month_folders = materialize(self.tree.as_ref(), season_id, &months).await?;
        debug!(season = season_id, links = children.len(), months = month_folders.len(), "season split by month");
        Ok(month_folders)
    }
}

/// Every link inside the bar's folders, at any depth, in tree order.
/// Links sitting directly on the bar are not collected.
pub fn collect_links(bar: &BookmarkNode) -> Vec<BookmarkNode> {
    let mut links = Vec::new();
    for child in bar.children.iter().flatten() {
        if !child.is_link() {
            collect_nested(child, &mut links);
        }
    }
    links
}

fn collect_nested(folder: &BookmarkNode, links: &mut Vec<BookmarkNode>) {
    for child in folder.children.iter().flatten() {
        if child.is_link() {
            links.push(BookmarkNode {
                children: None,
                ..child.clone()
            });
        } else {
            collect_nested(child, links);
        }
    }
}
