//! Action log: most-recent-first record of every logged mutation.
//!
//! Entries are prepended and never edited. An optional retention bound drops
//! the oldest entries once exceeded.

use std::collections::VecDeque;
use std::collections::vec_deque;
use std::num::NonZeroUsize;

use homepanel_domain::action_log::{ActionLogEntry, Actor, LogTarget};
use homepanel_domain::id::DeviceId;
use homepanel_domain::time::Timestamp;

/// Ordered, append-only log. Index `0` is the most recent entry.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    max_entries: Option<NonZeroUsize>,
}

impl ActionLog {
    /// An unbounded log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log keeping at most `max_entries` entries when set.
    #[must_use]
    pub fn with_retention(max_entries: Option<NonZeroUsize>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    #[must_use]
    pub fn max_entries(&self) -> Option<NonZeroUsize> {
        self.max_entries
    }

    /// Prepend an entry, dropping the oldest beyond the retention bound.
    pub fn record(&mut self, entry: ActionLogEntry) {
        self.entries.push_front(entry);
        if let Some(max) = self.max_entries {
            self.entries.truncate(max.get());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&ActionLogEntry> {
        self.entries.front()
    }

    /// Entry at `index`, `0` being the most recent.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActionLogEntry> {
        self.entries.get(index)
    }

    /// All entries, most recent first.
    pub fn iter(&self) -> vec_deque::Iter<'_, ActionLogEntry> {
        self.entries.iter()
    }

    /// A read-only, lazily evaluated view over matching entries.
    #[must_use]
    pub fn query(&self, filter: LogFilter) -> LogQuery<'_> {
        LogQuery { log: self, filter }
    }
}

/// Predicate over log entries. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    target: Option<LogTarget>,
    since: Option<Timestamp>,
    actor: Option<Actor>,
}

impl LogFilter {
    /// Matches every entry.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Entries about a single device.
    #[must_use]
    pub fn device(id: DeviceId) -> Self {
        Self {
            target: Some(LogTarget::Device(id)),
            ..Self::default()
        }
    }

    /// Scene summary entries.
    #[must_use]
    pub fn scenes() -> Self {
        Self {
            target: Some(LogTarget::Scene),
            ..Self::default()
        }
    }

    /// Restrict to entries recorded at or after `ts`.
    #[must_use]
    pub fn since(mut self, ts: Timestamp) -> Self {
        self.since = Some(ts);
        self
    }

    /// Restrict to entries performed by `actor`.
    #[must_use]
    pub fn actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub fn matches(&self, entry: &ActionLogEntry) -> bool {
        self.target.as_ref().is_none_or(|t| *t == entry.target)
            && self.since.is_none_or(|ts| entry.timestamp >= ts)
            && self.actor.as_ref().is_none_or(|a| *a == entry.actor)
    }
}

/// Result of [`ActionLog::query`].
///
/// Nothing is evaluated until iterated, and the query can be iterated again
/// from the start any number of times.
#[derive(Debug, Clone)]
pub struct LogQuery<'a> {
    log: &'a ActionLog,
    filter: LogFilter,
}

impl<'a> LogQuery<'a> {
    /// Start a fresh pass over matching entries, most recent first.
    #[must_use]
    pub fn iter(&self) -> LogIter<'a> {
        LogIter {
            inner: self.log.entries.iter(),
            filter: self.filter.clone(),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }
}

impl<'a> IntoIterator for LogQuery<'a> {
    type Item = &'a ActionLogEntry;
    type IntoIter = LogIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        LogIter {
            inner: self.log.entries.iter(),
            filter: self.filter,
        }
    }
}

impl<'a> IntoIterator for &LogQuery<'a> {
    type Item = &'a ActionLogEntry;
    type IntoIter = LogIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`LogQuery`].
#[derive(Debug, Clone)]
pub struct LogIter<'a> {
    inner: vec_deque::Iter<'a, ActionLogEntry>,
    filter: LogFilter,
}

impl<'a> Iterator for LogIter<'a> {
    type Item = &'a ActionLogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.inner.find(|entry| filter.matches(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn light1() -> DeviceId {
        DeviceId::new("light1").unwrap()
    }

    fn entry(target: impl Into<LogTarget>, action: &str, ts: Timestamp) -> ActionLogEntry {
        ActionLogEntry::builder()
            .target(target)
            .action(action)
            .timestamp(ts)
            .build()
    }

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 12, 32).unwrap()
    }

    #[test]
    fn should_prepend_entries() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "first", start()));
        log.record(entry(light1(), "second", start()));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).unwrap().action, "second");
        assert_eq!(log.get(1).unwrap().action, "first");
        assert_eq!(log.latest().unwrap().action, "second");
    }

    #[test]
    fn should_drop_oldest_entries_beyond_retention() {
        let mut log = ActionLog::with_retention(NonZeroUsize::new(2));
        for action in ["a", "b", "c"] {
            log.record(entry(light1(), action, start()));
        }

        let actions: Vec<_> = log.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, ["c", "b"]);
    }

    #[test]
    fn should_filter_by_device() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "Set to ON", start()));
        log.record(entry(LogTarget::Scene, "Activated Home Scene", start()));
        log.record(entry(DeviceId::new("door1").unwrap(), "Set to UNLOCKED", start()));

        let query = log.query(LogFilter::device(light1()));
        let actions: Vec<_> = query.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, ["Set to ON"]);
    }

    #[test]
    fn should_filter_scene_entries() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "Set to ON", start()));
        log.record(entry(LogTarget::Scene, "Activated Home Scene", start()));

        assert_eq!(log.query(LogFilter::scenes()).into_iter().count(), 1);
    }

    #[test]
    fn should_combine_since_and_actor_criteria() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "old", start()));
        log.record(entry(light1(), "new", start() + Duration::seconds(10)));
        log.record(
            ActionLogEntry::builder()
                .target(light1())
                .action("by scheduler")
                .actor(Actor::new("Scheduler"))
                .timestamp(start() + Duration::seconds(20))
                .build(),
        );

        let filter = LogFilter::device(light1())
            .since(start() + Duration::seconds(5))
            .actor(Actor::default());
        let actions: Vec<_> = log
            .query(filter)
            .into_iter()
            .map(|e| e.action.as_str())
            .collect();
        assert_eq!(actions, ["new"]);
    }

    #[test]
    fn should_restart_query_from_the_beginning() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "a", start()));
        log.record(entry(light1(), "b", start()));

        let query = log.query(LogFilter::all());
        let mut first = query.iter();
        assert_eq!(first.next().unwrap().action, "b");

        let second: Vec<_> = (&query).into_iter().map(|e| e.action.as_str()).collect();
        assert_eq!(second, ["b", "a"]);
    }

    #[test]
    fn should_not_mutate_log_when_querying() {
        let mut log = ActionLog::new();
        log.record(entry(light1(), "a", start()));
        let _ = log.query(LogFilter::scenes()).iter().count();
        assert_eq!(log.len(), 1);
    }
}
