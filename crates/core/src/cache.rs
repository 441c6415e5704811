// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Layered response cache: an in-process memory tier over a persisted
//! file tier.
//!
//! The memory tier is checked first; a miss falls through to one JSON
//! file per category under the profile's cache directory. Reads never
//! touch the network and always return immediately with a freshness tag.
//! File writes are atomic (tempfile then rename) so a crash mid-write or
//! a concurrent reader can never observe a torn entry. A corrupted file
//! is logged and treated as absent; the next successful `put` overwrites
//! it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Memory-tier entries never outlive this many seconds, regardless of
/// the category's file-tier TTL.
const MEMORY_TTL_CAP_SECS: u64 = 300;

/// Cached data categories, one persisted file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fronters,
    Members,
    CustomFronts,
    Switches,
}

impl Category {
    /// All categories, for iteration in `entry_info` and `clear_all`.
    pub const ALL: [Category; 4] = [
        Category::Fronters,
        Category::Members,
        Category::CustomFronts,
        Category::Switches,
    ];

    /// File stem and display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fronters => "fronters",
            Category::Members => "members",
            Category::CustomFronts => "custom_fronts",
            Category::Switches => "switches",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fronters" => Ok(Category::Fronters),
            "members" => Ok(Category::Members),
            "custom_fronts" => Ok(Category::CustomFronts),
            "switches" => Ok(Category::Switches),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// How current a cache answer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Within the category's TTL.
    Fresh,
    /// Past TTL; returned only to callers that accept staleness.
    Stale,
    /// No usable entry.
    Absent,
}

/// Per-category TTLs for the file tier, in seconds. Zero disables the
/// category: it reports absent once evicted from memory, forcing a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtls {
    pub fronters_secs: u64,
    pub members_secs: u64,
    pub custom_fronts_secs: u64,
    pub switches_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        CacheTtls {
            fronters_secs: 300,
            members_secs: 3600,
            custom_fronts_secs: 3600,
            switches_secs: 1800,
        }
    }
}

impl CacheTtls {
    pub fn for_category(&self, category: Category) -> u64 {
        match category {
            Category::Fronters => self.fronters_secs,
            Category::Members => self.members_secs,
            Category::CustomFronts => self.custom_fronts_secs,
            Category::Switches => self.switches_secs,
        }
    }
}

/// Result of a cache read: the payload (if any) plus its freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub payload: Option<Value>,
    pub freshness: Freshness,
}

impl Lookup {
    fn absent() -> Self {
        Lookup {
            payload: None,
            freshness: Freshness::Absent,
        }
    }
}

/// On-disk and in-memory entry shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    data: Value,
    fetched_at: DateTime<Utc>,
    ttl_secs: u64,
}

impl StoredEntry {
    fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.fetched_at).num_seconds()).unwrap_or(0)
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age_secs(now) >= self.ttl_secs
    }
}

/// Metadata about one persisted entry, for cache inspection.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub category: Category,
    pub age_secs: u64,
    pub ttl_secs: u64,
    pub expired: bool,
    pub in_memory: bool,
    pub file_size: u64,
}

/// The layered cache store for one profile.
pub struct CacheStore {
    dir: PathBuf,
    ttls: CacheTtls,
    memory: Mutex<HashMap<Category, StoredEntry>>,
}

impl CacheStore {
    /// Open (creating if needed) the cache directory for a profile.
    pub fn open(dir: &Path, ttls: CacheTtls) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(CacheStore {
            dir: dir.to_path_buf(),
            ttls,
            memory: Mutex::new(HashMap::new()),
        })
    }

    fn file_path(&self, category: Category) -> PathBuf {
        self.dir.join(format!("{}.json", category.as_str()))
    }

    /// Read an entry. Never performs network I/O; returns immediately
    /// with the payload (possibly stale) and a freshness tag.
    pub fn get(&self, category: Category) -> Lookup {
        self.get_at(category, Utc::now())
    }

    fn get_at(&self, category: Category, now: DateTime<Utc>) -> Lookup {
        // Memory tier first.
        if let Ok(mut memory) = self.memory.lock() {
            if let Some(entry) = memory.get(&category) {
                if !entry.is_expired(now) {
                    return Lookup {
                        payload: Some(entry.data.clone()),
                        freshness: Freshness::Fresh,
                    };
                }
                memory.remove(&category);
            }
        }

        // File tier.
        let Some(entry) = self.load_file(category) else {
            return Lookup::absent();
        };

        // A zero TTL marks the category disabled; never offer it stale.
        if entry.ttl_secs == 0 {
            return Lookup::absent();
        }

        if entry.is_expired(now) {
            return Lookup {
                payload: Some(entry.data),
                freshness: Freshness::Stale,
            };
        }

        // Promote to the memory tier. The original fetch time is kept
        // so the entry still turns stale at its real TTL; the cap only
        // bounds how long this memory copy may keep answering.
        let payload = entry.data.clone();
        let age = entry.age_secs(now);
        if let Ok(mut memory) = self.memory.lock() {
            memory.insert(
                category,
                StoredEntry {
                    data: entry.data,
                    fetched_at: entry.fetched_at,
                    ttl_secs: entry
                        .ttl_secs
                        .min(age.saturating_add(MEMORY_TTL_CAP_SECS)),
                },
            );
        }

        Lookup {
            payload: Some(payload),
            freshness: Freshness::Fresh,
        }
    }

    /// Store a payload in both tiers with the category's configured TTL.
    pub fn put(&self, category: Category, payload: Value) -> Result<()> {
        let now = Utc::now();
        let ttl_secs = self.ttls.for_category(category);

        let entry = StoredEntry {
            data: payload,
            fetched_at: now,
            ttl_secs,
        };
        self.write_file(category, &entry)?;

        if let Ok(mut memory) = self.memory.lock() {
            memory.insert(
                category,
                StoredEntry {
                    ttl_secs: ttl_secs.min(MEMORY_TTL_CAP_SECS),
                    ..entry
                },
            );
        }
        Ok(())
    }

    /// Drop both tiers for a category. Missing files are not an error.
    pub fn invalidate(&self, category: Category) {
        if let Ok(mut memory) = self.memory.lock() {
            memory.remove(&category);
        }
        let _ = fs::remove_file(self.file_path(category));
    }

    /// Drop everything in both tiers.
    pub fn clear_all(&self) {
        if let Ok(mut memory) = self.memory.lock() {
            memory.clear();
        }
        for category in Category::ALL {
            let _ = fs::remove_file(self.file_path(category));
        }
    }

    /// When the persisted entry for a category was fetched, if readable.
    pub fn fetched_at(&self, category: Category) -> Option<DateTime<Utc>> {
        self.load_file(category).map(|e| e.fetched_at)
    }

    /// Metadata for every persisted entry, for `sp cache info`.
    pub fn entry_info(&self) -> Vec<EntryInfo> {
        let now = Utc::now();
        let mut infos = Vec::new();
        for category in Category::ALL {
            let path = self.file_path(category);
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            let Some(entry) = self.load_file(category) else {
                continue;
            };
            let in_memory = self
                .memory
                .lock()
                .map(|m| m.contains_key(&category))
                .unwrap_or(false);
            infos.push(EntryInfo {
                category,
                age_secs: entry.age_secs(now),
                ttl_secs: entry.ttl_secs,
                expired: entry.is_expired(now),
                in_memory,
                file_size: meta.len(),
            });
        }
        infos
    }

    fn load_file(&self, category: Category) -> Option<StoredEntry> {
        let path = self.file_path(category);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("unreadable cache file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(entry) => Some(entry),
            Err(e) => {
                // Corrupt entries self-heal: the next put overwrites them.
                tracing::warn!("corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_file(&self, category: Category, entry: &StoredEntry) -> Result<()> {
        let path = self.file_path(category);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::CacheWrite(format!("tempfile: {}", e)))?;
        serde_json::to_writer(&mut tmp, entry)?;
        tmp.flush()?;
        tmp.persist(&path)
            .map_err(|e| Error::CacheWrite(format!("persist {}: {}", path.display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
