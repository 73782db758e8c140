//! In-process ledger substrate with optimistic concurrency control.
//!
//! Each [`Invocation`] works on a snapshot of the committed state taken at
//! [`MemoryLedger::begin`]. Reads and scanned ranges are recorded; writes are
//! buffered. [`Invocation::commit`] rejects the whole write set if any key it
//! read, or any key inside a range it scanned, was committed by another
//! invocation after the snapshot. Otherwise every write applies at once.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};
use paysettle_shared::LedgerConfig;
use tracing::debug;
use uuid::Uuid;

use super::error::GatewayError;
use super::key::prefix_range;
use super::{Entry, LedgerGateway, StateIter, create_composite_key};

/// Committed ledger state shared by all invocations.
#[derive(Debug, Default)]
struct LedgerState {
    /// Live values.
    values: BTreeMap<String, Vec<u8>>,
    /// Version of the last commit that touched each key, deletions included.
    versions: BTreeMap<String, u64>,
    /// Version of the last commit.
    version: u64,
    /// Timestamp handed to the most recent invocation.
    last_timestamp: Option<DateTime<Utc>>,
}

/// In-memory ledger substrate.
#[derive(Debug)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    max_scan_results: usize,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    /// Creates an empty ledger with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&LedgerConfig::default())
    }

    /// Creates an empty ledger with the given limits.
    #[must_use]
    pub fn with_config(config: &LedgerConfig) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            max_scan_results: config.max_scan_results,
        }
    }

    /// Opens an invocation stamped with the current time.
    ///
    /// Timestamps are strictly increasing across invocations of one ledger,
    /// even when the wall clock does not advance between calls.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the last timestamp handed out has no successor.
    pub fn begin(&self) -> Result<Invocation<'_>, GatewayError> {
        let mut state = self.lock()?;
        let now = Utc::now();
        let timestamp = match state.last_timestamp {
            Some(last) if now <= last => last
                .checked_add_signed(TimeDelta::nanoseconds(1))
                .ok_or_else(|| GatewayError::unavailable("invocation clock exhausted"))?,
            _ => now,
        };
        Ok(self.open(&mut state, timestamp))
    }

    /// Opens an invocation stamped with `timestamp`.
    pub fn begin_at(&self, timestamp: DateTime<Utc>) -> Result<Invocation<'_>, GatewayError> {
        let mut state = self.lock()?;
        Ok(self.open(&mut state, timestamp))
    }

    /// Runs `f` in a fresh invocation; commits on `Ok`, discards on `Err`.
    pub fn invoke<T, E>(
        &self,
        f: impl FnOnce(&mut Invocation<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<GatewayError>,
    {
        let tx = self.begin()?;
        Self::run(tx, f)
    }

    /// Like [`invoke`](Self::invoke), with an explicit invocation time.
    pub fn invoke_at<T, E>(
        &self,
        timestamp: DateTime<Utc>,
        f: impl FnOnce(&mut Invocation<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<GatewayError>,
    {
        let tx = self.begin_at(timestamp)?;
        Self::run(tx, f)
    }

    /// Reads the committed value of `key`, outside any invocation.
    pub fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    /// Number of live committed keys.
    pub fn len(&self) -> Result<usize, GatewayError> {
        Ok(self.lock()?.values.len())
    }

    /// Returns true if nothing has been committed, or everything was deleted.
    pub fn is_empty(&self) -> Result<bool, GatewayError> {
        Ok(self.lock()?.values.is_empty())
    }

    fn run<T, E>(
        mut tx: Invocation<'_>,
        f: impl FnOnce(&mut Invocation<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<GatewayError>,
    {
        match f(&mut tx) {
            Ok(out) => {
                tx.commit()?;
                Ok(out)
            }
            Err(err) => {
                debug!(tx_id = %tx.tx_id, writes = tx.writes.len(), "invocation discarded");
                Err(err)
            }
        }
    }

    fn open(&self, state: &mut LedgerState, timestamp: DateTime<Utc>) -> Invocation<'_> {
        state.last_timestamp = Some(state.last_timestamp.map_or(timestamp, |t| t.max(timestamp)));
        Invocation {
            ledger: self,
            snapshot: state.values.clone(),
            snapshot_version: state.version,
            tx_id: Uuid::now_v7().to_string(),
            timestamp,
            reads: RefCell::new(BTreeSet::new()),
            ranges: RefCell::new(Vec::new()),
            writes: BTreeMap::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, GatewayError> {
        self.state
            .lock()
            .map_err(|_| GatewayError::unavailable("ledger state lock poisoned"))
    }
}

/// One invocation's read-write view of a [`MemoryLedger`].
#[derive(Debug)]
pub struct Invocation<'l> {
    ledger: &'l MemoryLedger,
    snapshot: BTreeMap<String, Vec<u8>>,
    snapshot_version: u64,
    tx_id: String,
    timestamp: DateTime<Utc>,
    reads: RefCell<BTreeSet<String>>,
    ranges: RefCell<Vec<(String, String)>>,
    /// `None` marks a delete.
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl Invocation<'_> {
    /// Validates the read set and applies the write set atomically.
    ///
    /// Returns the committed version.
    pub fn commit(self) -> Result<u64, GatewayError> {
        let mut state = self.ledger.lock()?;

        if let Some(key) = self.first_conflict(&state) {
            debug!(tx_id = %self.tx_id, key = ?key, "commit rejected");
            return Err(GatewayError::conflict(key));
        }

        if self.writes.is_empty() {
            return Ok(state.version);
        }

        state.version += 1;
        let version = state.version;
        for (key, value) in self.writes {
            state.versions.insert(key.clone(), version);
            match value {
                Some(bytes) => {
                    state.values.insert(key, bytes);
                }
                None => {
                    state.values.remove(&key);
                }
            }
        }
        debug!(tx_id = %self.tx_id, version, "invocation committed");
        Ok(version)
    }

    fn first_conflict(&self, state: &LedgerState) -> Option<String> {
        let changed = |version: &u64| *version > self.snapshot_version;

        for key in self.reads.borrow().iter() {
            if state.versions.get(key).is_some_and(changed) {
                return Some(key.clone());
            }
        }
        for (start, end) in self.ranges.borrow().iter() {
            if let Some((key, _)) = state
                .versions
                .range::<str, _>(range_bounds(start, end))
                .find(|&(_, v)| changed(v))
            {
                return Some(key.clone());
            }
        }
        None
    }

    fn merged_range(&self, start: &str, end: &str) -> Result<Vec<Entry>, GatewayError> {
        if !end.is_empty() && end <= start {
            return Ok(Vec::new());
        }
        self.ranges
            .borrow_mut()
            .push((start.to_string(), end.to_string()));

        let bounds = range_bounds(start, end);
        let mut merged: BTreeMap<&str, &[u8]> = self
            .snapshot
            .range::<str, _>(bounds)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        for (key, value) in self.writes.range::<str, _>(bounds) {
            match value {
                Some(bytes) => {
                    merged.insert(key.as_str(), bytes.as_slice());
                }
                None => {
                    merged.remove(key.as_str());
                }
            }
        }

        if merged.len() > self.ledger.max_scan_results {
            return Err(GatewayError::unavailable(format!(
                "scan returned {} entries, limit is {}",
                merged.len(),
                self.ledger.max_scan_results
            )));
        }

        Ok(merged
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect())
    }
}

fn range_bounds<'a>(start: &'a str, end: &'a str) -> (Bound<&'a str>, Bound<&'a str>) {
    let upper = if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end)
    };
    (Bound::Included(start), upper)
}

fn check_key(key: &str) -> Result<(), GatewayError> {
    if key.is_empty() {
        return Err(GatewayError::invalid_key("key is empty"));
    }
    Ok(())
}

impl LedgerGateway for Invocation<'_> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        check_key(key)?;
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        self.reads.borrow_mut().insert(key.to_string());
        Ok(self.snapshot.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), GatewayError> {
        check_key(key)?;
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), GatewayError> {
        check_key(key)?;
        self.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn scan_range(&self, start: &str, end: &str) -> Result<StateIter<'_>, GatewayError> {
        let entries = self.merged_range(start, end)?;
        debug!(tx_id = %self.tx_id, count = entries.len(), "range scan");
        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn scan_by_prefix(
        &self,
        namespace: &str,
        attributes: &[&str],
    ) -> Result<StateIter<'_>, GatewayError> {
        let prefix = create_composite_key(namespace, attributes)?;
        let (start, end) = prefix_range(&prefix);
        let entries = self.merged_range(&start, &end)?;
        debug!(tx_id = %self.tx_id, namespace, count = entries.len(), "prefix scan");
        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }
}
