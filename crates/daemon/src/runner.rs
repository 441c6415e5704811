// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon main loop.
//!
//! Startup order matters: flock, pid file, socket bind, READY on stdout,
//! then the initial bulk load and the background connection task. IPC is
//! served from the moment READY is printed; every accepted connection
//! gets its own task so a slow or dead client never blocks the loop or
//! other clients.

use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sp_api::{PushTransport, RestClient};
use sp_core::cache::{CacheStore, Category};
use sp_core::models::{CustomFront, FronterSet, Member};
use sp_core::protocol::{UpdateMessage, KEEPALIVE_INTERVAL_SECS, KEEPALIVE_TEXT};
use sp_core::ProfileConfig;
use sp_ipc::{framing_async, DaemonRequest, DaemonResponse, DaemonStatus, Freshness};

use crate::connection::{ConnectionConfig, ConnectionEvent, ConnectionManager};
use crate::error::{Error, Result};
use crate::state::DaemonState;
use crate::status::{SharedStatus, STATE_DEGRADED};

/// Runtime filenames within the profile state directory.
pub const SOCKET_NAME: &str = "daemon.sock";
pub const PID_NAME: &str = "daemon.pid";
pub const LOCK_NAME: &str = "daemon.lock";
pub const LAST_ERROR_NAME: &str = "last_error";

/// Per-request I/O budget for IPC clients.
const IPC_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// No frame (not even a pong) for this long means the connection died
/// without a close: two missed keepalives plus a grace period.
const DEAD_CONNECTION_SECS: u64 = 2 * KEEPALIVE_INTERVAL_SECS + 5;

/// Context shared with spawned IPC handler tasks.
struct IpcContext {
    state: Arc<RwLock<DaemonState>>,
    status: Arc<SharedStatus>,
    shutdown: CancellationToken,
    started: Instant,
    pid: u32,
}

/// Run the daemon until shutdown. Blocks on the push connection and IPC.
pub async fn run(profile: &str, state_dir: &Path, config: &ProfileConfig) -> Result<()> {
    fs::create_dir_all(state_dir)?;

    let lock_file = acquire_lock(&state_dir.join(LOCK_NAME))?;
    let pid = std::process::id();
    let pid_path = state_dir.join(PID_NAME);
    fs::write(&pid_path, pid.to_string())?;

    // A fresh run invalidates any recorded failure from the last one.
    let last_error_path = state_dir.join(LAST_ERROR_NAME);
    let _ = fs::remove_file(&last_error_path);

    let socket_path = state_dir.join(SOCKET_NAME);
    let _ = fs::remove_file(&socket_path);
    let listener = UnixListener::bind(&socket_path)?;

    // Signal ready early so lifecycle start can ping us immediately.
    println!("READY");
    let _ = std::io::stdout().flush();
    info!("spd starting, profile={}, pid={}", profile, pid);

    let cache = Arc::new(CacheStore::open(
        &sp_core::paths::cache_dir(profile),
        config.cache.ttls(),
    )?);

    let rest = match RestClient::new(
        &config.api_url,
        &config.token,
        Duration::from_secs(config.api_timeout_secs),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            let reason = e.to_string();
            write_last_error(&last_error_path, &reason);
            cleanup(&pid_path, &socket_path);
            drop(lock_file);
            return Err(Error::Api(e));
        }
    };

    let status = Arc::new(SharedStatus::new());
    let state = Arc::new(RwLock::new(DaemonState::new()));

    // Bulk load before accepting push traffic so early IPC queries have
    // data even when the service is unreachable.
    initial_load(&rest, &cache, &state).await;

    let (manager, mut connection_rx) = ConnectionManager::new(
        ConnectionConfig {
            url: config.socket_url.clone(),
            token: config.token.clone(),
            initial_delay_secs: config.reconnect_initial_secs,
            max_delay_secs: config.reconnect_max_secs,
        },
        Arc::clone(&status),
    );
    manager.spawn_connect_task();

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(IpcContext {
        state: Arc::clone(&state),
        status: Arc::clone(&status),
        shutdown: shutdown.clone(),
        started: Instant::now(),
        pid,
    });

    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    let mut transport: Option<Box<dyn PushTransport>> = None;
    let mut last_rx = Instant::now();
    let mut last_ping = Instant::now();
    let mut stop_error: Option<Error> = None;

    loop {
        let connected = transport.is_some();
        let keepalive_remaining = remaining(last_ping, KEEPALIVE_INTERVAL_SECS);
        let dead_remaining = remaining(last_rx, DEAD_CONNECTION_SECS);

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested");
                break;
            }

            _ = sigterm.recv() => {
                info!("SIGTERM received");
                break;
            }

            // IPC stays responsive no matter what the connection does.
            result = listener.accept() => {
                if let Ok((stream, _)) = result {
                    let ctx = Arc::clone(&ctx);
                    tokio::spawn(async move {
                        handle_client(stream, ctx).await;
                    });
                }
            }

            Some(event) = connection_rx.recv() => {
                match event {
                    ConnectionEvent::Connected(t) => {
                        transport = Some(t);
                        last_rx = Instant::now();
                        last_ping = Instant::now();
                        // Catch up on anything pushed while we were away.
                        spawn_refresh(&rest, &cache, &state);
                    }
                    ConnectionEvent::AuthRejected(reason) => {
                        status.record_stop(&reason);
                        write_last_error(&last_error_path, &reason);
                        stop_error = Some(Error::AuthRejected(reason));
                        break;
                    }
                }
            }

            result = async {
                match transport.as_mut() {
                    Some(t) => t.recv_text().await,
                    None => std::future::pending().await,
                }
            }, if connected => {
                match result {
                    Ok(Some(text)) => {
                        last_rx = Instant::now();
                        handle_push_text(&text, &state, &cache).await;
                    }
                    Ok(None) | Err(_) => {
                        warn!("push connection lost");
                        connection_lost(&mut transport, &status, &manager);
                    }
                }
            }

            _ = tokio::time::sleep(keepalive_remaining), if connected => {
                last_ping = Instant::now();
                let send_failed = match transport.as_mut() {
                    Some(t) => t.send_text(KEEPALIVE_TEXT.to_string()).await.is_err(),
                    None => false,
                };
                if send_failed {
                    warn!("keepalive send failed");
                    connection_lost(&mut transport, &status, &manager);
                }
            }

            _ = tokio::time::sleep(dead_remaining), if connected => {
                warn!("no push traffic for {}s, dropping connection", DEAD_CONNECTION_SECS);
                if let Some(mut t) = transport.take() {
                    let _ = t.disconnect().await;
                }
                connection_lost(&mut transport, &status, &manager);
            }
        }
    }

    manager.cancel();
    if let Some(mut t) = transport.take() {
        let _ = t.disconnect().await;
    }
    cleanup(&pid_path, &socket_path);
    drop(lock_file);
    info!("spd stopped");

    match stop_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Time left until `interval_secs` after `since`, zero when overdue.
fn remaining(since: Instant, interval_secs: u64) -> Duration {
    Duration::from_secs(interval_secs).saturating_sub(since.elapsed())
}

/// Load every collection from REST, falling back to the persisted cache
/// per collection. Failures degrade, never abort.
///
/// The state lock is taken only after all fetches finish, so IPC reads
/// keep getting answered while a slow remote is being waited on.
async fn initial_load(
    rest: &Arc<RestClient>,
    cache: &Arc<CacheStore>,
    state: &Arc<RwLock<DaemonState>>,
) {
    let now = Utc::now();

    let members = match rest.get_members().await {
        Ok(members) => {
            cache_put(cache, Category::Members, &members);
            Some(members)
        }
        Err(e) => {
            warn!("member load failed, using cache: {}", e);
            cache_read::<Vec<Member>>(cache, Category::Members)
        }
    };

    let custom_fronts = match rest.get_custom_fronts().await {
        Ok(fronts) => {
            cache_put(cache, Category::CustomFronts, &fronts);
            Some(fronts)
        }
        Err(e) => {
            warn!("custom front load failed, using cache: {}", e);
            cache_read::<Vec<CustomFront>>(cache, Category::CustomFronts)
        }
    };

    let mut fetched_fronters = false;
    let fronters = match rest.get_fronters().await {
        Ok(entries) => {
            fetched_fronters = true;
            Some(entries)
        }
        Err(e) => {
            warn!("fronter load failed, using cache: {}", e);
            cache_read::<FronterSet>(cache, Category::Fronters).map(|set| set.fronters)
        }
    };

    let mut guard = state.write().await;
    if let Some(members) = members {
        guard.seed_members(members);
    }
    if let Some(fronts) = custom_fronts {
        guard.seed_custom_fronts(fronts);
    }
    if let Some(entries) = fronters {
        guard.seed_fronters(entries, now);
    }
    if fetched_fronters {
        cache_put(cache, Category::Fronters, &guard.fronter_set());
    }

    info!(
        members = guard.member_count(),
        custom_fronts = guard.custom_front_count(),
        fronters = guard.fronter_count(),
        "initial load complete"
    );
}

/// Re-run the bulk load in the background after a reconnect.
fn spawn_refresh(
    rest: &Arc<RestClient>,
    cache: &Arc<CacheStore>,
    state: &Arc<RwLock<DaemonState>>,
) {
    let rest = Arc::clone(rest);
    let cache = Arc::clone(cache);
    let state = Arc::clone(state);
    tokio::spawn(async move {
        initial_load(&rest, &cache, &state).await;
    });
}

/// Parse and apply one push frame, writing changed collections through
/// to the file cache. Non-update frames (auth echoes, pong noise) and
/// malformed JSON are ignored.
async fn handle_push_text(
    text: &str,
    state: &Arc<RwLock<DaemonState>>,
    cache: &Arc<CacheStore>,
) {
    let message: UpdateMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(_) => {
            debug!("ignoring non-JSON push frame");
            return;
        }
    };
    let events = message.into_events(Utc::now());
    if events.is_empty() {
        return;
    }

    let mut guard = state.write().await;
    let mut front_changed = false;
    let mut members_changed = false;
    let mut custom_changed = false;
    for event in &events {
        match guard.apply_event(event) {
            Some(sp_core::protocol::PushTarget::FrontHistory) => front_changed = true,
            Some(sp_core::protocol::PushTarget::Members) => members_changed = true,
            Some(sp_core::protocol::PushTarget::CustomFronts) => custom_changed = true,
            None => {}
        }
    }

    if front_changed {
        cache_put(cache, Category::Fronters, &guard.fronter_set());
    }
    if members_changed {
        cache_put(cache, Category::Members, &guard.members());
    }
    if custom_changed {
        cache_put(cache, Category::CustomFronts, &guard.custom_fronts());
    }
}

fn cache_put<T: serde::Serialize>(cache: &CacheStore, category: Category, data: &T) {
    match serde_json::to_value(data) {
        Ok(value) => {
            if let Err(e) = cache.put(category, value) {
                warn!("cache write for {} failed: {}", category, e);
            }
        }
        Err(e) => warn!("cache serialize for {} failed: {}", category, e),
    }
}

fn cache_read<T: serde::de::DeserializeOwned>(
    cache: &CacheStore,
    category: Category,
) -> Option<T> {
    let payload = cache.get(category).payload?;
    match serde_json::from_value(payload) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("cached {} payload unusable: {}", category, e);
            None
        }
    }
}

fn connection_lost(
    transport: &mut Option<Box<dyn PushTransport>>,
    status: &Arc<SharedStatus>,
    manager: &ConnectionManager,
) {
    *transport = None;
    status.set(STATE_DEGRADED);
    manager.spawn_connect_task();
}

/// Serve one IPC client: one request, one response, then done.
async fn handle_client(mut stream: UnixStream, ctx: Arc<IpcContext>) {
    let request: DaemonRequest =
        match tokio::time::timeout(IPC_IO_TIMEOUT, framing_async::read_message(&mut stream)).await
        {
            Ok(Ok(request)) => request,
            Ok(Err(e)) => {
                debug!("ipc read failed: {}", e);
                return;
            }
            Err(_) => {
                debug!("ipc client read timed out");
                return;
            }
        };

    let response = build_response(request, &ctx).await;
    let should_shutdown = matches!(response, DaemonResponse::ShuttingDown);

    if tokio::time::timeout(
        IPC_IO_TIMEOUT,
        framing_async::write_message(&mut stream, &response),
    )
    .await
    .is_err()
    {
        debug!("ipc client write timed out");
    }

    // Acknowledge before stopping so the client sees the response.
    if should_shutdown {
        ctx.shutdown.cancel();
    }
}

async fn build_response(request: DaemonRequest, ctx: &IpcContext) -> DaemonResponse {
    let freshness = if ctx.status.is_live() {
        Freshness::Live
    } else {
        Freshness::Degraded
    };

    match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Status => {
            let state = ctx.state.read().await;
            DaemonResponse::Status(DaemonStatus {
                pid: ctx.pid,
                uptime_secs: ctx.started.elapsed().as_secs(),
                connection: ctx.status.status_string(),
                reconnect_attempt: ctx.status.attempt(),
                last_push: state.last_push,
                fronter_count: state.fronter_count(),
                member_count: state.member_count(),
                custom_front_count: state.custom_front_count(),
                update_count: state.update_count,
            })
        }
        DaemonRequest::GetFronters => {
            let state = ctx.state.read().await;
            DaemonResponse::Fronters {
                set: state.fronter_set(),
                freshness,
            }
        }
        DaemonRequest::GetMembers => {
            let state = ctx.state.read().await;
            DaemonResponse::Members {
                members: state.members(),
                freshness,
            }
        }
        DaemonRequest::GetCustomFronts => {
            let state = ctx.state.read().await;
            DaemonResponse::CustomFronts {
                custom_fronts: state.custom_fronts(),
                freshness,
            }
        }
        DaemonRequest::Shutdown => DaemonResponse::ShuttingDown,
    }
}

/// Record why the daemon stopped for post-mortem status queries.
fn write_last_error(path: &Path, reason: &str) {
    if let Err(e) = fs::write(path, reason) {
        warn!("failed to write {}: {}", path.display(), e);
    }
}

fn acquire_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive().map_err(|_| Error::AlreadyRunning)?;
    Ok(file)
}

fn cleanup(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
