//! Session store: bearer token + absolute expiry, mirrored to durable storage so
//! a restart keeps the session until it naturally expires.

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::profiles::config_dir;

/// Epoch-millisecond time source.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub fn set(&self, now_ms: i64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.0.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// An authenticated session. Token and expiry only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "access_token")]
    pub token: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

impl Credentials {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms <= self.expires_at
    }
}

/// Durable backing for the session (the browser's localStorage).
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Option<Credentials>;
    fn save(&self, creds: &Credentials) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage(Mutex<Option<Credentials>>);

impl MemorySessionStorage {
    pub fn with(creds: Credentials) -> Self {
        Self(Mutex::new(Some(creds)))
    }

    pub fn peek(&self) -> Option<Credentials> {
        self.0.lock().ok().and_then(|g| g.clone())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Option<Credentials> {
        self.peek()
    }

    fn save(&self, creds: &Credentials) -> std::io::Result<()> {
        if let Ok(mut g) = self.0.lock() {
            *g = Some(creds.clone());
        }
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        if let Ok(mut g) = self.0.lock() {
            *g = None;
        }
        Ok(())
    }
}

/// One JSON file per backend origin: `{ "access_token": .., "expires_at": .. }`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$XDG_CONFIG_HOME/launerdash/sessions/<host>_<port>.json`
    pub fn for_origin(base: &Url) -> Self {
        Self::new(
            config_dir()
                .join("sessions")
                .join(format!("{}.json", origin_key(base))),
        )
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Option<Credentials> {
        let s = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&s) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, creds: &Credentials) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(creds)?;
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        // Owner-only: the file holds a bearer token
        #[cfg(unix)]
        opts.mode(0o600);
        let mut file = opts.open(&self.path)?;
        // An older file keeps its mode on reopen
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(&data)
    }

    fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

fn origin_key(base: &Url) -> String {
    let host = base.host_str().unwrap_or("local");
    let port = base.port_or_known_default().unwrap_or(0);
    format!("{host}_{port}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '.' { c } else { '-' })
        .collect()
}

/// Holds the current session. Shared by the gateway and the route guard.
pub struct SessionStore {
    current: Mutex<Option<Credentials>>,
    storage: Box<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Empty store; durable storage is left as is until the first write.
    pub fn anonymous(storage: Box<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            current: Mutex::new(None),
            storage,
            clock,
        }
    }

    /// Store seeded from durable storage (a reload keeps the session).
    pub fn restore(storage: Box<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        let restored = storage.load();
        if let Some(c) = &restored {
            debug!(expires_at = c.expires_at, "restored persisted session");
        }
        Self {
            current: Mutex::new(restored),
            storage,
            clock,
        }
    }

    /// Store `token`, valid for `ttl` from now, and persist it.
    pub fn set_session(&self, token: impl Into<String>, ttl: Duration) -> Credentials {
        let creds = Credentials {
            token: token.into(),
            expires_at: self.clock.now_ms() + ttl.as_millis() as i64,
        };
        if let Err(e) = self.storage.save(&creds) {
            warn!(error = %e, "failed to persist session");
        }
        *self.lock() = Some(creds.clone());
        info!(expires_at = creds.expires_at, "session established");
        creds
    }

    pub fn is_valid(&self) -> bool {
        self.valid_token().is_some()
    }

    /// Token of a currently valid session. Check and read happen under one lock.
    pub fn valid_token(&self) -> Option<String> {
        let now = self.clock.now_ms();
        self.lock()
            .as_ref()
            .filter(|c| c.is_valid_at(now))
            .map(|c| c.token.clone())
    }

    pub fn current(&self) -> Option<Credentials> {
        self.lock().clone()
    }

    /// Milliseconds until expiry; `None` when anonymous or already expired.
    pub fn remaining_ms(&self) -> Option<i64> {
        let now = self.clock.now_ms();
        self.lock()
            .as_ref()
            .map(|c| c.expires_at - now)
            .filter(|left| *left >= 0)
    }

    /// Drop the session from memory and storage. Idempotent.
    pub fn clear(&self) {
        let had = self.lock().take().is_some();
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to remove persisted session");
        }
        if had {
            info!("session cleared");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Credentials>> {
        // A poisoned lock still holds a consistent Option.
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.lock().is_some())
            .finish()
    }
}
