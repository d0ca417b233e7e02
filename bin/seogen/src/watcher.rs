//! Debounced regeneration scheduling.
//!
//! [`UpdateScheduler`] owns the watcher state and is driven by three inputs:
//! filesystem changes, deadline expiry and update completion. It never
//! touches the filesystem itself, so the debounce rules are testable with
//! plain [`Instant`]s.

use std::{
    path::{Component, Path, PathBuf},
    time::{Duration, Instant},
};

use notify::{Event, EventKind, event::ModifyKind};

/// Watcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Nothing to do.
    Idle,
    /// A change was seen; regenerate once `deadline` passes without further changes.
    PendingUpdate { deadline: Instant },
    /// Generation is running. `rerun` records changes seen in the meantime.
    Updating { rerun: bool },
}

/// Debounce state machine: `Idle → PendingUpdate → Updating → Idle`.
#[derive(Debug)]
pub struct UpdateScheduler {
    state: WatchState,
    debounce: Duration,
}

impl UpdateScheduler {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: WatchState::Idle,
            debounce,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Record a relevant change, restarting the debounce window.
    pub fn on_change(&mut self, now: Instant) {
        self.state = match self.state {
            WatchState::Idle | WatchState::PendingUpdate { .. } => WatchState::PendingUpdate {
                deadline: now + self.debounce,
            },
            WatchState::Updating { .. } => WatchState::Updating { rerun: true },
        };
    }

    /// Deadline of the pending update, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            WatchState::PendingUpdate { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Whether the pending update should run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Enter `Updating`. Returns `false` when an update is already running.
    pub fn begin_update(&mut self) -> bool {
        if matches!(self.state, WatchState::Updating { .. }) {
            tracing::info!("update already in progress, skipping");
            return false;
        }
        self.state = WatchState::Updating { rerun: false };
        true
    }

    /// Leave `Updating`. Changes seen during the update start a new debounce window.
    pub fn finish_update(&mut self, now: Instant) {
        self.state = match self.state {
            WatchState::Updating { rerun: true } => WatchState::PendingUpdate {
                deadline: now + self.debounce,
            },
            _ => WatchState::Idle,
        };
    }

    /// Drop any pending update. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let pending = matches!(self.state, WatchState::PendingUpdate { .. });
        self.state = WatchState::Idle;
        pending
    }
}

/// Decides which filesystem events trigger regeneration.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    extensions: Vec<String>,
    files: Vec<PathBuf>,
}

impl ChangeFilter {
    /// Accept paths with one of `extensions` (with or without the leading dot).
    #[must_use]
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            files: Vec::new(),
        }
    }

    /// Also accept any change to this specific file.
    ///
    /// Backends may report canonical absolute paths, so an existing file is
    /// matched by its canonical path as well as by its configured path
    /// without leading `.` and `..` components.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            self.files.push(canonical);
        }
        let trimmed: PathBuf = path
            .components()
            .skip_while(|c| matches!(c, Component::CurDir | Component::ParentDir))
            .collect();
        if !trimmed.as_os_str().is_empty() {
            self.files.push(trimmed);
        }
        self
    }

    /// Event kinds that can change generated output.
    pub fn is_relevant_kind(kind: &EventKind) -> bool {
        matches!(
            kind,
            EventKind::Create(_)
                | EventKind::Remove(_)
                | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
        )
    }

    /// Whether a changed path is one we care about.
    pub fn matches_path(&self, path: &Path) -> bool {
        if self.files.iter().any(|file| path.ends_with(file)) {
            return true;
        }
        path.extension().is_some_and(|ext| {
            self.extensions
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
    }

    /// First relevant path of an event, or `None` if the event should be ignored.
    pub fn relevant_path<'a>(&self, event: &'a Event) -> Option<&'a Path> {
        if !Self::is_relevant_kind(&event.kind) {
            return None;
        }
        event
            .paths
            .iter()
            .map(PathBuf::as_path)
            .find(|path| self.matches_path(path))
    }
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};

    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(2000);

    /// Feed change timestamps (ms offsets) through the scheduler, running
    /// every update that falls due, and count the updates.
    fn simulate(changes_ms: &[u64]) -> usize {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);
        let mut updates = 0;

        let end = changes_ms.iter().max().copied().unwrap_or(0) + 10 * DEBOUNCE.as_millis() as u64;
        let mut pending = changes_ms.iter().peekable();
        for tick in (0..=end).step_by(100) {
            let now = start + Duration::from_millis(tick);
            while pending.next_if(|&&at| at <= tick).is_some() {
                scheduler.on_change(now);
            }
            if scheduler.is_due(now) {
                assert!(scheduler.begin_update());
                updates += 1;
                scheduler.finish_update(now);
            }
        }
        updates
    }

    #[test]
    fn test_burst_triggers_one_update() {
        assert_eq!(simulate(&[0, 100, 300, 900, 1500]), 1);
    }

    #[test]
    fn test_spaced_changes_trigger_each() {
        assert_eq!(simulate(&[0, 5000, 10000]), 3);
    }

    #[test]
    fn test_change_restarts_deadline() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);

        scheduler.on_change(start);
        scheduler.on_change(start + Duration::from_millis(1500));

        assert!(!scheduler.is_due(start + Duration::from_millis(2500)));
        assert!(scheduler.is_due(start + Duration::from_millis(3500)));
        assert_eq!(
            scheduler.deadline(),
            Some(start + Duration::from_millis(3500))
        );
    }

    #[test]
    fn test_overlapping_update_is_rejected() {
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);
        assert!(scheduler.begin_update());
        assert!(!scheduler.begin_update());
        assert_eq!(scheduler.state(), WatchState::Updating { rerun: false });
    }

    #[test]
    fn test_change_during_update_is_coalesced() {
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);

        assert!(scheduler.begin_update());
        scheduler.on_change(start);
        scheduler.on_change(start + Duration::from_millis(10));
        assert!(scheduler.deadline().is_none());

        let finished = start + Duration::from_millis(50);
        scheduler.finish_update(finished);
        assert_eq!(
            scheduler.state(),
            WatchState::PendingUpdate {
                deadline: finished + DEBOUNCE
            }
        );
    }

    #[test]
    fn test_update_without_changes_returns_to_idle() {
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);
        assert!(scheduler.begin_update());
        scheduler.finish_update(Instant::now());
        assert_eq!(scheduler.state(), WatchState::Idle);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = UpdateScheduler::new(DEBOUNCE);
        assert!(!scheduler.cancel());

        scheduler.on_change(Instant::now());
        assert!(scheduler.cancel());
        assert_eq!(scheduler.state(), WatchState::Idle);
        assert!(scheduler.deadline().is_none());
    }

    fn filter() -> ChangeFilter {
        let extensions = vec!["json".to_string(), ".md".to_string(), "html".to_string()];
        ChangeFilter::new(&extensions).with_file("./boards-config.json")
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_filter_extensions() {
        let filter = filter();
        assert!(filter.matches_path(Path::new("/site/boards/rust/intro/meta.json")));
        assert!(filter.matches_path(Path::new("/site/boards/rust/intro/README.md")));
        assert!(filter.matches_path(Path::new("/site/boards/rust/intro/index.HTML")));
        assert!(!filter.matches_path(Path::new("/site/boards/rust/intro/cover.png")));
        assert!(!filter.matches_path(Path::new("/site/boards/rust/intro/.index.html.swp")));
    }

    #[test]
    fn test_filter_board_config_file() {
        let filter = ChangeFilter::new(&["md".to_string()]).with_file("boards-config.json");
        assert!(filter.matches_path(Path::new("/site/boards-config.json")));
        assert!(!filter.matches_path(Path::new("/site/other.json")));
    }

    #[test]
    fn test_filter_board_config_outside_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_file = dir.path().join("boards-config.json");
        std::fs::write(&config_file, "{}").unwrap();
        std::fs::create_dir_all(dir.path().join("site")).unwrap();

        let configured = dir.path().join("site/../boards-config.json");
        let filter = ChangeFilter::new(&["md".to_string()]).with_file(&configured);

        let reported = config_file.canonicalize().unwrap();
        assert!(filter.matches_path(&reported));
        assert!(!filter.matches_path(&dir.path().join("site/other.json")));
    }

    #[test]
    fn test_filter_parent_relative_board_config() {
        let filter = ChangeFilter::new(&["md".to_string()]).with_file("../content/boards-config.json");
        assert!(filter.matches_path(Path::new("/srv/content/boards-config.json")));
        assert!(!filter.matches_path(Path::new("/srv/other/boards-config.json")));
    }

    #[test]
    fn test_filter_event_kinds() {
        let filter = filter();
        let path = "/site/boards/rust/intro/meta.json";

        let created = event(EventKind::Create(CreateKind::File), path);
        assert_eq!(filter.relevant_path(&created), Some(Path::new(path)));

        let written = event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path);
        assert!(filter.relevant_path(&written).is_some());

        let touched = event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)),
            path,
        );
        assert!(filter.relevant_path(&touched).is_none());

        let read = event(EventKind::Access(AccessKind::Any), path);
        assert!(filter.relevant_path(&read).is_none());
    }
}
