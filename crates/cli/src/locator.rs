// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client locator: three-tier data lookup for one CLI invocation.
//!
//! Every query walks the same ladder: the profile's daemon over IPC
//! (instant, freshest), then the local cache (fast, possibly stale),
//! then a direct REST call (slow, repopulates the cache). Each tier
//! failure falls through to the next; the caller always gets an answer
//! or a single error after all tiers failed. A stale cache entry that
//! the caller did not accept up front is still kept as a last resort
//! when the direct call fails too.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use sp_api::RestClient;
use sp_core::cache::{CacheStore, Category, Freshness as CacheFreshness};
use sp_core::models::{CustomFront, FronterSet, Member, Switch};
use sp_core::ProfileConfig;
use sp_ipc::{DaemonRequest, DaemonResponse};

use crate::daemon::client::DaemonClient;
use crate::daemon::lifecycle;
use crate::error::{Error, Result};

/// Which tier answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Daemon,
    Cache,
    Remote,
}

/// Trustworthiness of the returned data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// From the daemon with a live push connection.
    Live,
    /// From the daemon while its push connection is down.
    Degraded,
    /// From the cache within TTL, or straight from the service.
    Fresh,
    /// From the cache past TTL.
    Stale,
}

impl Freshness {
    /// Whether output should carry a staleness indicator.
    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Degraded | Freshness::Stale)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Live => "live",
            Freshness::Degraded => "degraded",
            Freshness::Fresh => "fresh",
            Freshness::Stale => "stale",
        }
    }
}

impl From<sp_ipc::Freshness> for Freshness {
    fn from(f: sp_ipc::Freshness) -> Self {
        match f {
            sp_ipc::Freshness::Live => Freshness::Live,
            sp_ipc::Freshness::Degraded => Freshness::Degraded,
        }
    }
}

/// A query answer tagged with where it came from and how fresh it is.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub source: Source,
    pub freshness: Freshness,
}

/// Per-query tier selection.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Try the daemon tier.
    pub use_daemon: bool,
    /// Try the cache tier.
    pub use_cache: bool,
    /// Return stale cache data immediately instead of refetching.
    pub accept_stale: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            use_daemon: true,
            use_cache: true,
            accept_stale: false,
        }
    }
}

impl QueryOptions {
    /// Skip daemon and cache, go straight to the service.
    pub fn direct() -> Self {
        QueryOptions {
            use_daemon: false,
            use_cache: false,
            accept_stale: false,
        }
    }
}

/// One profile's view of the world: config, cache, and daemon endpoint.
pub struct Locator {
    profile: String,
    config: ProfileConfig,
    state_dir: PathBuf,
    cache: CacheStore,
}

impl Locator {
    /// Open the locator for a profile, loading its config and cache.
    pub fn open(profile: &str) -> Result<Self> {
        let config = ProfileConfig::load(&sp_core::paths::config_file(profile))?;
        let cache = CacheStore::open(&sp_core::paths::cache_dir(profile), config.cache.ttls())?;
        Ok(Locator {
            profile: profile.to_string(),
            state_dir: sp_core::paths::state_dir(profile),
            config,
            cache,
        })
    }

    #[cfg(test)]
    fn with_paths(
        profile: &str,
        config: ProfileConfig,
        state_dir: PathBuf,
        cache_dir: &Path,
    ) -> Result<Self> {
        let cache = CacheStore::open(cache_dir, config.cache.ttls())?;
        Ok(Locator {
            profile: profile.to_string(),
            config,
            state_dir,
            cache,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Who is fronting right now.
    pub fn fronters(&self, opts: QueryOptions) -> Result<Sourced<FronterSet>> {
        self.query(
            Category::Fronters,
            opts,
            DaemonRequest::GetFronters,
            |response| match response {
                DaemonResponse::Fronters { set, freshness } => Some((set, freshness)),
                _ => None,
            },
            |rest| async move {
                let entries = rest.get_fronters().await?;
                Ok(FronterSet::from_live_entries(entries, Utc::now()))
            },
        )
    }

    /// The member directory.
    pub fn members(&self, opts: QueryOptions) -> Result<Sourced<Vec<Member>>> {
        self.query(
            Category::Members,
            opts,
            DaemonRequest::GetMembers,
            |response| match response {
                DaemonResponse::Members { members, freshness } => Some((members, freshness)),
                _ => None,
            },
            |rest| async move { rest.get_members().await },
        )
    }

    /// The custom fronts.
    pub fn custom_fronts(&self, opts: QueryOptions) -> Result<Sourced<Vec<CustomFront>>> {
        self.query(
            Category::CustomFronts,
            opts,
            DaemonRequest::GetCustomFronts,
            |response| match response {
                DaemonResponse::CustomFronts {
                    custom_fronts,
                    freshness,
                } => Some((custom_fronts, freshness)),
                _ => None,
            },
            |rest| async move { rest.get_custom_fronts().await },
        )
    }

    /// Register a switch directly with the service. Writes always go
    /// remote; the daemon learns about them through the push channel.
    pub fn register_switch(&self, switch: &Switch) -> Result<()> {
        let rest = self.rest_client()?;
        let runtime = self.runtime()?;
        runtime.block_on(rest.register_switch(switch))?;

        // The fronter cache is now wrong; drop it and remember the switch.
        self.cache.invalidate(Category::Fronters);
        match serde_json::to_value(switch) {
            Ok(value) => {
                if let Err(e) = self.cache.put(Category::Switches, value) {
                    debug!("failed to cache switch payload: {}", e);
                }
            }
            Err(e) => debug!("failed to serialize switch payload: {}", e),
        }
        Ok(())
    }

    fn query<T, E, F, Fut>(
        &self,
        category: Category,
        opts: QueryOptions,
        request: DaemonRequest,
        extract: E,
        fetch: F,
    ) -> Result<Sourced<T>>
    where
        T: Serialize + DeserializeOwned,
        E: FnOnce(DaemonResponse) -> Option<(T, sp_ipc::Freshness)>,
        F: FnOnce(RestClient) -> Fut,
        Fut: Future<Output = sp_api::Result<T>>,
    {
        // Tier 1: the daemon.
        if opts.use_daemon {
            match self.ask_daemon(&request) {
                Ok(response) => {
                    if let Some((data, freshness)) = extract(response) {
                        return Ok(Sourced {
                            data,
                            source: Source::Daemon,
                            freshness: freshness.into(),
                        });
                    }
                    debug!("unexpected daemon response for {}, falling back", category);
                }
                Err(e) => {
                    debug!("daemon unreachable: {}", e);
                    if self.config.auto_start_daemon {
                        // Fire and forget; this invocation continues down
                        // the fallback ladder without waiting.
                        lifecycle::spawn_background(&self.profile, &self.state_dir);
                    }
                }
            }
        }

        // Tier 2: the cache.
        let mut stale_fallback: Option<T> = None;
        if opts.use_cache {
            let lookup = self.cache.get(category);
            if let Some(payload) = lookup.payload {
                match serde_json::from_value::<T>(payload) {
                    Ok(data) => match lookup.freshness {
                        CacheFreshness::Fresh => {
                            return Ok(Sourced {
                                data,
                                source: Source::Cache,
                                freshness: Freshness::Fresh,
                            });
                        }
                        CacheFreshness::Stale if opts.accept_stale => {
                            return Ok(Sourced {
                                data,
                                source: Source::Cache,
                                freshness: Freshness::Stale,
                            });
                        }
                        CacheFreshness::Stale => stale_fallback = Some(data),
                        CacheFreshness::Absent => {}
                    },
                    Err(e) => warn!("cached {} payload unusable: {}", category, e),
                }
            }
        }

        // Tier 3: the service itself.
        let remote = self
            .rest_client()
            .and_then(|rest| Ok(self.runtime()?.block_on(fetch(rest))?));
        match remote {
            Ok(data) => {
                match serde_json::to_value(&data) {
                    Ok(value) => {
                        if let Err(e) = self.cache.put(category, value) {
                            debug!("failed to repopulate {} cache: {}", category, e);
                        }
                    }
                    Err(e) => debug!("failed to serialize {} for cache: {}", category, e),
                }
                Ok(Sourced {
                    data,
                    source: Source::Remote,
                    freshness: Freshness::Fresh,
                })
            }
            Err(e) => {
                // Expired cache data beats no data.
                if let Some(data) = stale_fallback {
                    warn!("service unreachable, serving stale {}: {}", category, e);
                    return Ok(Sourced {
                        data,
                        source: Source::Cache,
                        freshness: Freshness::Stale,
                    });
                }
                Err(Error::NoData {
                    what: category.as_str(),
                    detail: e.to_string(),
                })
            }
        }
    }

    fn ask_daemon(&self, request: &DaemonRequest) -> Result<DaemonResponse> {
        let socket = lifecycle::socket_path(&self.state_dir);
        let timeout = Duration::from_millis(self.config.daemon_timeout_ms);
        let mut client = DaemonClient::connect(&socket, timeout)?;
        client.request(request)
    }

    fn rest_client(&self) -> Result<RestClient> {
        Ok(RestClient::new(
            &self.config.api_url,
            &self.config.token,
            Duration::from_secs(self.config.api_timeout_secs),
        )?)
    }

    fn runtime(&self) -> Result<tokio::runtime::Runtime> {
        Ok(tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?)
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
