//! Prefix scans over a namespace.
//!
//! Keys sort bytewise, so every key starting with a prefix `p` sits in one
//! contiguous run beginning at the first key `>= p`. A scan seeks there and
//! stops at the first key that no longer starts with `p`; no later key can
//! match again.

use hearth_core::Category;
use redb::Range;
use tracing::warn;

use crate::error::{StateError, StateResult};
use crate::key::{self, Timestamp};
use crate::store::Store;

/// A raw key/value pair read from a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// An entry whose key suffix decoded to a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub timestamp: Timestamp,
    pub key: String,
    pub value: String,
}

/// Forward-only iterator over a namespace, in key order.
///
/// Holds a read snapshot until dropped. Not restartable: call
/// [`Store::scan_from`] again to re-seek.
pub struct ScanIter {
    namespace: Category,
    range: Range<'static, &'static str, &'static str>,
    failed: bool,
}

impl ScanIter {
    pub(crate) fn new(namespace: Category, range: Range<'static, &'static str, &'static str>) -> Self {
        ScanIter {
            namespace,
            range,
            failed: false,
        }
    }

    pub fn namespace(&self) -> Category {
        self.namespace
    }
}

impl Iterator for ScanIter {
    type Item = StateResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.range.next()?;
        match item {
            Ok((key, value)) => Some(Ok(Entry {
                key: key.value().to_string(),
                value: value.value().to_string(),
            })),
            Err(e) => {
                // A storage error ends the scan; the caller sees it once.
                self.failed = true;
                Some(Err(StateError::StoreUnavailable {
                    op: "scan",
                    reason: e.to_string(),
                }))
            }
        }
    }
}

/// Entries of one prefix, optionally cut off at an exclusive upper key.
pub struct PrefixScan {
    inner: ScanIter,
    prefix: String,
    end: Option<String>,
    done: bool,
}

impl PrefixScan {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Drain the scan into timestamped records.
    ///
    /// Keys whose suffix is not exactly one timestamp are logged and
    /// skipped. Storage errors abort. Records come back in chronological
    /// order; the key layout already guarantees it, and the sort below only
    /// runs if that guarantee was broken.
    pub fn into_records(self) -> StateResult<Vec<Record>> {
        let prefix_len = self.prefix.len();
        let namespace = self.inner.namespace();
        let mut records = Vec::new();
        for entry in self {
            let Entry { key, value } = entry?;
            match key::decode_suffix(&key, prefix_len) {
                Ok(timestamp) => records.push(Record {
                    timestamp,
                    key,
                    value,
                }),
                Err(e) => warn!(%namespace, error = %e, "skipping record"),
            }
        }
        if !records.is_sorted_by_key(|r| r.timestamp) {
            warn!(%namespace, "prefix scan out of chronological order; re-sorting");
            records.sort_by_key(|r| r.timestamp);
        }
        Ok(records)
    }
}

impl Iterator for PrefixScan {
    type Item = StateResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(entry)) => {
                let past_end = self.end.as_deref().is_some_and(|end| entry.key.as_str() >= end);
                if !entry.key.starts_with(&self.prefix) || past_end {
                    self.done = true;
                    return None;
                }
                Some(Ok(entry))
            }
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl Store {
    /// Every entry of `namespace` whose key starts with `prefix`, in key
    /// order. No match is an empty scan, not an error.
    pub fn scan_by_prefix(&self, namespace: Category, prefix: &str) -> StateResult<PrefixScan> {
        Ok(PrefixScan {
            inner: self.scan_from(namespace, prefix)?,
            prefix: prefix.to_string(),
            end: None,
            done: false,
        })
    }

    /// Like [`scan_by_prefix`](Self::scan_by_prefix), decoded and sorted by
    /// timestamp.
    pub fn scan_by_prefix_ordered(
        &self,
        namespace: Category,
        prefix: &str,
    ) -> StateResult<Vec<Record>> {
        self.scan_by_prefix(namespace, prefix)?.into_records()
    }

    /// Entries of `prefix` with timestamps in `[from, to)`. Either bound may
    /// be open.
    pub fn scan_range(
        &self,
        namespace: Category,
        prefix: &str,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> StateResult<PrefixScan> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(StateError::InvalidKeyComponent(format!(
                    "time range starts at {from} after it ends at {to}"
                )));
            }
        }
        let start = match from {
            Some(from) => format!("{prefix}{from}"),
            None => prefix.to_string(),
        };
        Ok(PrefixScan {
            inner: self.scan_from(namespace, &start)?,
            prefix: prefix.to_string(),
            end: to.map(|to| format!("{prefix}{to}")),
            done: false,
        })
    }
}
