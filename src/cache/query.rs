//! Key-addressed cache of fetched pair collections.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use parking_lot::RwLock;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{Category, PairId, TokenPair};
use crate::source::PairPage;

/// Request descriptor a cached result is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// Accumulated pages of one category column.
    Column(Category),
    /// A single pair fetched for the detail view.
    Pair(PairId),
}

/// Data stored under a [`QueryKey`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    /// Pages in fetch order.
    Pages(Vec<PairPage>),
    /// A single pair lookup; `None` records that the pair does not exist.
    Pair(Option<TokenPair>),
}

impl QueryData {
    /// Every pair held by this entry, in stored order.
    pub fn pairs(&self) -> Box<dyn Iterator<Item = &TokenPair> + '_> {
        match self {
            QueryData::Pages(pages) => Box::new(pages.iter().flat_map(|p| p.pairs.iter())),
            QueryData::Pair(pair) => Box::new(pair.iter()),
        }
    }

    fn pairs_mut(&mut self) -> Box<dyn Iterator<Item = &mut TokenPair> + '_> {
        match self {
            QueryData::Pages(pages) => {
                Box::new(pages.iter_mut().flat_map(|p| p.pairs.iter_mut()))
            }
            QueryData::Pair(pair) => Box::new(pair.iter_mut()),
        }
    }

    /// Pages, if this entry holds a column.
    #[must_use]
    pub fn pages(&self) -> Option<&[PairPage]> {
        match self {
            QueryData::Pages(pages) => Some(pages),
            QueryData::Pair(_) => None,
        }
    }
}

/// What a read of one key observes.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// No data and no fetch in flight. The caller decides whether to fetch.
    Absent,
    /// No data yet; a fetch is in flight.
    Loading,
    /// Data is present. `fetching` is set while a further fetch is in flight.
    Ready { data: QueryData, fetching: bool },
    /// The last fetch failed.
    Failed {
        error: String,
        data: Option<QueryData>,
    },
}

impl QueryState {
    /// The cached data, whatever the fetch status.
    #[must_use]
    pub fn data(&self) -> Option<&QueryData> {
        match self {
            QueryState::Ready { data, .. } => Some(data),
            QueryState::Failed { data, .. } => data.as_ref(),
            QueryState::Absent | QueryState::Loading => None,
        }
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        matches!(
            self,
            QueryState::Loading | QueryState::Ready { fetching: true, .. }
        )
    }
}

/// Staleness and garbage-collection policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Entries untouched for this long are dropped by [`QueryCache::prune_idle`].
    #[serde(default = "default_gc_time_secs")]
    pub gc_time_secs: u64,
    /// Age after which data counts as stale. Unset means never stale.
    #[serde(default)]
    pub stale_time_secs: Option<u64>,
}

const fn default_gc_time_secs() -> u64 {
    15 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            gc_time_secs: default_gc_time_secs(),
            stale_time_secs: None,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_time_secs)
    }

    #[must_use]
    pub fn stale_time(&self) -> Option<Duration> {
        self.stale_time_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FetchStatus {
    Idle,
    Fetching,
    Failed(String),
}

#[derive(Debug)]
struct QueryEntry {
    data: Option<QueryData>,
    status: FetchStatus,
    /// Last time the data was written.
    updated_at: Option<Instant>,
    /// Last time the entry was read or written.
    touched_at: Instant,
}

impl QueryEntry {
    fn empty() -> Self {
        Self {
            data: None,
            status: FetchStatus::Idle,
            updated_at: None,
            touched_at: Instant::now(),
        }
    }

    fn state(&self) -> QueryState {
        match (&self.status, &self.data) {
            (FetchStatus::Failed(error), data) => QueryState::Failed {
                error: error.clone(),
                data: data.clone(),
            },
            (FetchStatus::Fetching, None) => QueryState::Loading,
            (FetchStatus::Idle, None) => QueryState::Absent,
            (status, Some(data)) => QueryState::Ready {
                data: data.clone(),
                fetching: *status == FetchStatus::Fetching,
            },
        }
    }
}

/// Thread-safe query cache with optional change notifications.
///
/// Point updates rewrite stored data in place: they never invalidate an entry
/// and never trigger a refetch.
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, QueryEntry>>,
    config: CacheConfig,
    tx: Option<broadcast::Sender<QueryKey>>,
}

impl QueryCache {
    /// Create a new cache without notifications.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            tx: None,
        }
    }

    /// Create a new cache that broadcasts the key of every change.
    #[must_use]
    pub fn with_notifications(
        config: CacheConfig,
        capacity: usize,
    ) -> (Self, broadcast::Receiver<QueryKey>) {
        let (tx, rx) = broadcast::channel(capacity);
        let cache = Self {
            entries: RwLock::new(HashMap::new()),
            config,
            tx: Some(tx),
        };
        (cache, rx)
    }

    /// Subscribe to change notifications.
    ///
    /// Returns `None` if the cache was created without notifications.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<QueryKey>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }

    fn notify(&self, key: &QueryKey) {
        // No receivers is fine.
        if let Some(ref tx) = self.tx {
            let _ = tx.send(key.clone());
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Read the state stored under `key`.
    pub fn get(&self, key: &QueryKey) -> QueryState {
        let mut entries = self.entries.write();
        match entries.get_mut(key) {
            Some(entry) => {
                entry.touched_at = Instant::now();
                entry.state()
            }
            None => QueryState::Absent,
        }
    }

    /// Mark a fetch for `key` as in flight.
    ///
    /// Returns `false` without changing anything if one already is.
    pub fn begin_fetch(&self, key: &QueryKey) -> bool {
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(key.clone()).or_insert_with(QueryEntry::empty);
            if entry.status == FetchStatus::Fetching {
                return false;
            }
            entry.status = FetchStatus::Fetching;
            entry.touched_at = Instant::now();
        }
        self.notify(key);
        true
    }

    /// Store the result of a fetch and clear the in-flight mark.
    pub fn complete_fetch(&self, key: &QueryKey, data: QueryData) {
        self.write(key, data, FetchStatus::Idle);
    }

    /// Store the result of a fetch computed from the current data, under one
    /// write lock, and clear the in-flight mark.
    ///
    /// Point updates that land while the fetch was awaited are preserved
    /// because `f` sees the data as it is at completion time.
    pub fn complete_fetch_with<F>(&self, key: &QueryKey, f: F)
    where
        F: FnOnce(Option<QueryData>) -> QueryData,
    {
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(key.clone()).or_insert_with(QueryEntry::empty);
            let now = Instant::now();
            entry.data = Some(f(entry.data.take()));
            entry.status = FetchStatus::Idle;
            entry.updated_at = Some(now);
            entry.touched_at = now;
        }
        self.notify(key);
    }

    /// Record a failed fetch. Existing data is kept.
    pub fn fail_fetch(&self, key: &QueryKey, error: impl Into<String>) {
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(key.clone()).or_insert_with(QueryEntry::empty);
            entry.status = FetchStatus::Failed(error.into());
            entry.touched_at = Instant::now();
        }
        self.notify(key);
    }

    /// Clear an in-flight mark without storing anything.
    ///
    /// Used when a fetch completes for a consumer that no longer exists.
    pub fn abandon_fetch(&self, key: &QueryKey) {
        let mut entries = self.entries.write();
        let remove = match entries.get_mut(key) {
            Some(entry) if entry.status == FetchStatus::Fetching => {
                entry.status = FetchStatus::Idle;
                entry.data.is_none()
            }
            _ => false,
        };
        if remove {
            entries.remove(key);
        }
    }

    /// Replace the data under `key`.
    pub fn set_data(&self, key: &QueryKey, data: QueryData) {
        let status = self
            .entries
            .read()
            .get(key)
            .map_or(FetchStatus::Idle, |e| e.status.clone());
        self.write(key, data, status);
    }

    fn write(&self, key: &QueryKey, data: QueryData, status: FetchStatus) {
        {
            let mut entries = self.entries.write();
            let entry = entries.entry(key.clone()).or_insert_with(QueryEntry::empty);
            let now = Instant::now();
            entry.data = Some(data);
            entry.status = status;
            entry.updated_at = Some(now);
            entry.touched_at = now;
        }
        self.notify(key);
    }

    /// Transform the data under `key` in place.
    ///
    /// Returns `false` if there is no data to transform.
    pub fn update_data<F>(&self, key: &QueryKey, f: F) -> bool
    where
        F: FnOnce(&mut QueryData),
    {
        {
            let mut entries = self.entries.write();
            let Some(data) = entries.get_mut(key).and_then(|e| e.data.as_mut()) else {
                return false;
            };
            f(data);
        }
        self.notify(key);
        true
    }

    /// Apply `f` to every cached copy of pair `id`, across all entries.
    ///
    /// Returns the number of copies rewritten.
    pub fn update_pair<F>(&self, id: &PairId, mut f: F) -> usize
    where
        F: FnMut(&mut TokenPair),
    {
        let mut touched_keys = Vec::new();
        let mut copies = 0;
        {
            let mut entries = self.entries.write();
            for (key, entry) in entries.iter_mut() {
                let Some(data) = entry.data.as_mut() else {
                    continue;
                };
                let mut hit = false;
                for pair in data.pairs_mut().filter(|p| p.id == *id) {
                    f(pair);
                    copies += 1;
                    hit = true;
                }
                if hit {
                    touched_keys.push(key.clone());
                }
            }
        }
        for key in &touched_keys {
            self.notify(key);
        }
        copies
    }

    /// Current cached copy of pair `id`, if any entry holds it.
    ///
    /// Column entries are searched before single-pair entries.
    #[must_use]
    pub fn pair(&self, id: &PairId) -> Option<TokenPair> {
        let entries = self.entries.read();
        let mut keys: Vec<&QueryKey> = entries.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| entries[k].data.as_ref())
            .find_map(|data| data.pairs().find(|p| p.id == *id).cloned())
    }

    /// Every distinct cached pair, deduplicated by id.
    ///
    /// Keys are walked in order (columns by category, then single pairs) and
    /// the first copy of each id wins, so the result is deterministic.
    #[must_use]
    pub fn pairs_snapshot(&self) -> Vec<TokenPair> {
        let entries = self.entries.read();
        let ordered: BTreeMap<&QueryKey, &QueryEntry> = entries.iter().collect();
        let mut seen = HashSet::new();
        ordered
            .values()
            .filter_map(|e| e.data.as_ref())
            .flat_map(|data| data.pairs())
            .filter(|p| seen.insert(p.id.clone()))
            .cloned()
            .collect()
    }

    /// Whether the data under `key` is older than the stale time.
    ///
    /// Missing data is stale; with no stale time configured, present data
    /// never is.
    #[must_use]
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.read();
        let Some(updated_at) = entries.get(key).and_then(|e| e.updated_at) else {
            return true;
        };
        self.config
            .stale_time()
            .is_some_and(|stale| updated_at.elapsed() >= stale)
    }

    /// Drop entries idle for longer than the gc time. In-flight entries are
    /// kept. Returns count removed.
    pub fn prune_idle(&self) -> usize {
        let gc_time = self.config.gc_time();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.status == FetchStatus::Fetching || e.touched_at.elapsed() < gc_time);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Pruned idle cache entries");
        }
        removed
    }

    /// Remove an entry.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
