//! File-backed session store.
//!
//! Each session lives in `<saves>/<id>.json`. Writes go to a temporary file
//! that is synced and then renamed over the record, so a reader only ever sees
//! a complete record.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tm_core::{Session, SessionId};

use crate::error::{StoreError, StoreResult};

const RECORD_EXTENSION: &str = "json";

/// Directory of persisted sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_error("creating", &dir))?;
        Ok(Self { dir })
    }

    /// The saves directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a brand-new session.
    ///
    /// If a record already uses the session's id, a fresh id is drawn until
    /// it is unique.
    pub fn create(&self, session: &mut Session) -> StoreResult<()> {
        while self.record_path(session.id())?.exists() {
            tracing::warn!(id = %session.id(), "session id collision, regenerating");
            session.regenerate_id();
        }
        self.save(session)
    }

    /// Stamp the session as played now and replace its record.
    pub fn save(&self, session: &mut Session) -> StoreResult<()> {
        session.touch();
        let path = self.record_path(session.id())?;
        let json = serde_json::to_string_pretty(session)?;
        write_atomic(&path, json.as_bytes())?;
        tracing::debug!(id = %session.id(), turn = session.turn_count(), "session saved");
        Ok(())
    }

    /// Load a session. Absent and unreadable records both yield `None`.
    pub fn load(&self, id: &SessionId) -> Option<Session> {
        let path = self.record_path(id).ok()?;
        read_record(&path)
    }

    /// All readable sessions, most recently played first.
    ///
    /// Records that fail to parse are skipped.
    pub fn list_all(&self) -> StoreResult<Vec<Session>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    action: "listing",
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut sessions: Vec<Session> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == RECORD_EXTENSION))
            .filter_map(|p| read_record(&p))
            .collect();

        sessions.sort_by(|a, b| b.last_played_at.cmp(&a.last_played_at));
        Ok(sessions)
    }

    /// Remove a session's record. Returns whether one existed.
    pub fn delete(&self, id: &SessionId) -> StoreResult<bool> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(%id, "session deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                action: "deleting",
                path,
                source,
            }),
        }
    }

    fn record_path(&self, id: &SessionId) -> StoreResult<PathBuf> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(raw.to_string()));
        }
        Ok(self.dir.join(format!("{raw}.{RECORD_EXTENSION}")))
    }
}

/// Read one record. The file stem is the session id: a record without an id
/// takes it, and a record claiming another id is skipped.
fn read_record(path: &Path) -> Option<Session> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable session record");
            return None;
        }
    };
    let stem = path.file_stem()?.to_str()?;

    let mut record: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping corrupt session record");
            return None;
        }
    };
    let Some(fields) = record.as_object_mut() else {
        tracing::warn!(path = %path.display(), "skipping session record that is not an object");
        return None;
    };
    match fields.get("id") {
        None => {
            fields.insert("id".to_string(), serde_json::Value::from(stem));
        }
        Some(id) if id.as_str() == Some(stem) => {}
        Some(id) => {
            tracing::warn!(path = %path.display(), %id, "skipping session record with mismatched id");
            return None;
        }
    }

    match serde_json::from_value(record) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping corrupt session record");
            None
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("json.tmp");
    let mut file = File::create(&tmp).map_err(io_error("writing", &tmp))?;
    file.write_all(bytes).map_err(io_error("writing", &tmp))?;
    file.sync_all().map_err(io_error("syncing", &tmp))?;
    drop(file);
    fs::rename(&tmp, path).map_err(io_error("replacing", path))?;
    Ok(())
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io {
        action,
        path,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;
    use tm_core::Narrative;

    fn store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("saves")).unwrap();
        (dir, store)
    }

    fn session(name: &str) -> Session {
        Session::new(name, Narrative::fallback(), "WOPR")
    }

    #[test]
    fn create_then_load() {
        let (_dir, store) = store();
        let mut s = session("first");
        store.create(&mut s).unwrap();
        let loaded = store.load(s.id()).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn save_round_trip_advances_last_played() {
        let (_dir, store) = store();
        let mut s = session("rt");
        store.create(&mut s).unwrap();

        s.advance_turn();
        s.record_turn("ls", "README.TXT\n[CLUE_DISCOVERED: c1]");
        s.discover_clue("c1");
        s.change_directory("/home");
        let before = s.last_played_at;
        let expected = s.clone();

        store.save(&mut s).unwrap();
        let loaded = store.load(s.id()).unwrap();
        assert!(loaded.last_played_at >= before);

        let mut normalized = loaded.clone();
        normalized.last_played_at = expected.last_played_at;
        assert_eq!(normalized, expected);
    }

    #[test]
    fn load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load(&SessionId::new("deadbeef")).is_none());
    }

    #[test]
    fn load_corrupt_is_none() {
        let (_dir, store) = store();
        fs::write(store.dir().join("badbad00.json"), "{ not json").unwrap();
        assert!(store.load(&SessionId::new("badbad00")).is_none());
    }

    #[test]
    fn record_without_id_keeps_its_file_id() {
        let (_dir, store) = store();
        fs::write(
            store.dir().join("abcd1234.json"),
            r#"{"name": "old", "turnCount": 0}"#,
        )
        .unwrap();

        let id = SessionId::new("abcd1234");
        let first = store.load(&id).unwrap();
        let second = store.load(&id).unwrap();
        assert_eq!(first.id(), &id);
        assert_eq!(second.id(), &id);
        assert_eq!(first.name, "old");

        // saving after a resume replaces the same record
        let mut resumed = first;
        store.save(&mut resumed).unwrap();
        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), &id);
    }

    #[test]
    fn record_with_foreign_id_is_skipped() {
        let (_dir, store) = store();
        let s = session("stray");
        let json = serde_json::to_string(&s).unwrap();
        fs::write(store.dir().join("abcd1234.json"), json).unwrap();

        assert!(store.load(&SessionId::new("abcd1234")).is_none());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn load_rejects_path_like_ids() {
        let (_dir, store) = store();
        assert!(store.load(&SessionId::new("../config")).is_none());
        assert!(matches!(
            store.delete(&SessionId::new("a/b")),
            Err(StoreError::InvalidId(_))
        ));
    }

    #[test]
    fn list_orders_newest_first_and_skips_corrupt() {
        let (_dir, store) = store();
        let now = Utc::now();
        for (i, name) in ["old", "newest", "middle"].iter().enumerate() {
            let mut s = session(name);
            store.create(&mut s).unwrap();
            // rewrite with a controlled timestamp
            s.last_played_at = now
                - match i {
                    0 => Duration::hours(5),
                    1 => Duration::minutes(1),
                    _ => Duration::hours(1),
                };
            let json = serde_json::to_string_pretty(&s).unwrap();
            fs::write(store.dir().join(format!("{}.json", s.id())), json).unwrap();
        }
        fs::write(store.dir().join("corrupt1.json"), r#"{"turnCount": "many"}"#).unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let (_dir, store) = store();
        fs::remove_dir_all(store.dir()).unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn create_regenerates_colliding_id() {
        let (_dir, store) = store();
        let mut a = session("a");
        store.create(&mut a).unwrap();

        // a second session forced onto the same id
        let other = session("b");
        let json = serde_json::to_string(&other)
            .unwrap()
            .replacen(other.id().as_str(), a.id().as_str(), 1);
        let mut b: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(b.id(), a.id());

        store.create(&mut b).unwrap();
        assert_ne!(b.id(), a.id());
        assert_eq!(store.list_all().unwrap().len(), 2);
        assert_eq!(store.load(a.id()).unwrap().name, "a");
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = store();
        let mut s = session("gone");
        store.create(&mut s).unwrap();
        assert!(store.delete(s.id()).unwrap());
        assert!(!store.delete(s.id()).unwrap());
        assert!(store.load(s.id()).is_none());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (_dir, store) = store();
        let mut s = session("clean");
        store.create(&mut s).unwrap();
        store.save(&mut s).unwrap();
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
