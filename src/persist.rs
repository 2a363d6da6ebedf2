//! Session persistence.
//!
//! Persistence is an optimization for session continuity: nothing in the
//! window manager depends on a save succeeding. Saves go through a
//! [`PersistWriter`], a background thread fed over a channel, so the
//! synchronous state update never waits on storage and store failures end
//! up in the log instead of in the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::window::{Layout, WindowInstance};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("session store i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed session data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Everything needed to bring a desktop back: remembered layouts plus the
/// open windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub layouts: BTreeMap<String, Layout>,
    #[serde(default)]
    pub windows: Vec<WindowInstance>,
}

/// Storage for sessions keyed by a user or session identifier.
pub trait SessionStore: Send {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>, PersistError>;
    fn save(&self, key: &str, session: &PersistedSession) -> Result<(), PersistError>;
}

/// One pretty-printed JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>, PersistError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PersistError::Io { path, source }),
        };
        let session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    fn save(&self, key: &str, session: &PersistedSession) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let body = serde_json::to_string_pretty(session)?;
        // write-then-rename keeps a crash from leaving half a file behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistError::Io { path, source })
    }
}

/// Map user-supplied keys onto safe file names.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '@' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // never produce `.` or `..` path components
    if cleaned.chars().all(|c| c == '.') {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<BTreeMap<String, PersistedSession>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<PersistedSession> {
        let sessions = self.sessions.lock().unwrap_or_else(|err| err.into_inner());
        sessions.get(key).cloned()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>, PersistError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, session: &PersistedSession) -> Result<(), PersistError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|err| err.into_inner());
        sessions.insert(key.to_string(), session.clone());
        Ok(())
    }
}

enum WriterMessage {
    Save {
        key: String,
        session: PersistedSession,
    },
    Flush(Sender<()>),
}

/// Fire-and-forget session writer running on its own thread.
pub struct PersistWriter {
    tx: Option<Sender<WriterMessage>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWriter {
    pub fn spawn<S: SessionStore + 'static>(store: S) -> Self {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || write_loop(store, rx));
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue a save. Never blocks and never fails; if the writer thread is
    /// gone the session is dropped with a warning.
    pub fn submit(&self, key: &str, session: PersistedSession) {
        let Some(tx) = &self.tx else {
            return;
        };
        let message = WriterMessage::Save {
            key: key.to_string(),
            session,
        };
        if tx.send(message).is_err() {
            tracing::warn!(key, "session writer stopped; dropping save");
        }
    }

    /// Block until every save queued so far has been attempted.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(WriterMessage::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for PersistWriter {
    fn drop(&mut self) {
        // closing the channel ends the loop once pending saves are written
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn write_loop<S: SessionStore>(store: S, rx: Receiver<WriterMessage>) {
    let mut pending: BTreeMap<String, PersistedSession> = BTreeMap::new();
    while let Ok(message) = rx.recv() {
        let mut acks = Vec::new();
        enqueue(message, &mut pending, &mut acks);
        // coalesce a burst of saves (e.g. a drag) down to the latest per key
        while let Ok(message) = rx.try_recv() {
            enqueue(message, &mut pending, &mut acks);
        }
        for (key, session) in std::mem::take(&mut pending) {
            match store.save(&key, &session) {
                Ok(()) => {
                    tracing::debug!(key = %key, windows = session.windows.len(), "saved session")
                }
                Err(err) => tracing::warn!(key = %key, error = %err, "failed to save session"),
            }
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
}

fn enqueue(
    message: WriterMessage,
    pending: &mut BTreeMap<String, PersistedSession>,
    acks: &mut Vec<Sender<()>>,
) {
    match message {
        WriterMessage::Save { key, session } => {
            pending.insert(key, session);
        }
        WriterMessage::Flush(ack) => acks.push(ack),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<PersistedSession>, PersistError> {
            Err(PersistError::Unavailable("offline".into()))
        }

        fn save(&self, _key: &str, _session: &PersistedSession) -> Result<(), PersistError> {
            Err(PersistError::Unavailable("offline".into()))
        }
    }

    fn session_with_layout(x: i32) -> PersistedSession {
        let mut session = PersistedSession::default();
        session.layouts.insert(
            "notes".into(),
            Layout {
                x,
                y: 60,
                width: 640,
                height: 480,
                maximized: false,
            },
        );
        session
    }

    #[test]
    fn sanitize_key_replaces_path_characters() {
        assert_eq!(sanitize_key("user@example.com"), "user@example.com");
        assert_eq!(sanitize_key("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_key(".."), "_..");
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("sessions"));
        assert_eq!(store.load("alice").unwrap(), None);
        let session = session_with_layout(40);
        store.save("alice", &session).unwrap();
        assert_eq!(store.load("alice").unwrap(), Some(session));
        assert!(store.path_for("alice").exists());
    }

    #[test]
    fn file_store_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path_for("bob"), "{ not json").unwrap();
        assert!(matches!(store.load("bob"), Err(PersistError::Json(_))));
    }

    #[test]
    fn writer_keeps_latest_save() {
        let store = MemoryStore::new();
        let writer = PersistWriter::spawn(store.clone());
        for x in 0..20 {
            writer.submit("alice", session_with_layout(x));
        }
        writer.flush();
        assert_eq!(store.get("alice"), Some(session_with_layout(19)));
    }

    #[test]
    fn writer_survives_store_failures() {
        let writer = PersistWriter::spawn(BrokenStore);
        writer.submit("alice", session_with_layout(1));
        writer.flush();
        writer.submit("alice", session_with_layout(2));
        writer.flush();
    }
}
