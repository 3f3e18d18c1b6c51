//! Session state: one uploaded document, its index, and the Q&A transcript
//!
//! A session owns at most one indexed document at a time; uploading again
//! rebuilds the index from scratch and discards the transcript.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::retrieval::VectorIndex;
use crate::types::{AnswerRecord, Document};

/// A parsed, chunked and embedded document with its search index
#[derive(Debug)]
pub struct IndexedDocument {
    /// Document metadata
    pub document: Document,
    /// The session-owned vector index
    pub index: VectorIndex,
}

/// Per-session state
pub struct Session {
    /// Session ID
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Access-gate flag; sessions start locked when a password is configured
    unlocked: RwLock<bool>,
    /// The current document and index, if one has been uploaded
    document: RwLock<Option<Arc<IndexedDocument>>>,
    /// Ordered Q&A history across ask batches
    transcript: RwLock<Vec<AnswerRecord>>,
}

impl Session {
    fn new(unlocked: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            unlocked: RwLock::new(unlocked),
            document: RwLock::new(None),
            transcript: RwLock::new(Vec::new()),
        }
    }

    /// Whether the session has passed the access gate
    pub fn is_unlocked(&self) -> bool {
        *self.unlocked.read()
    }

    /// Error out unless the gate has been passed
    pub fn ensure_unlocked(&self) -> Result<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(Error::Locked)
        }
    }

    /// Replace the session's document and index; the previous index and
    /// transcript are discarded.
    pub fn set_document(&self, indexed: IndexedDocument) {
        *self.document.write() = Some(Arc::new(indexed));
        self.transcript.write().clear();
    }

    /// The current indexed document, if any
    pub fn indexed_document(&self) -> Option<Arc<IndexedDocument>> {
        self.document.read().clone()
    }

    /// Append a batch of answer records to the transcript
    pub fn append_records(&self, records: &[AnswerRecord]) {
        self.transcript.write().extend_from_slice(records);
    }

    /// Snapshot of the full transcript
    pub fn transcript(&self) -> Vec<AnswerRecord> {
        self.transcript.read().clone()
    }
}

/// Registry of live sessions, plus the configured gate secret
pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<Session>>,
    password: Option<String>,
}

impl SessionStore {
    /// Create a store. When `password` is set, new sessions start locked.
    pub fn new(password: Option<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            password,
        }
    }

    /// Whether the access gate is active
    pub fn gated(&self) -> bool {
        self.password.is_some()
    }

    /// Create a new session
    pub fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(!self.gated()));
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Look up a session by ID
    pub fn get(&self, id: &Uuid) -> Result<Arc<Session>> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Attempt to unlock a session with the shared secret.
    ///
    /// Exact string equality, nothing else: no normalization, no lockout,
    /// no expiry. A wrong password leaves the flag untouched.
    pub fn unlock(&self, id: &Uuid, password: &str) -> Result<()> {
        let session = self.get(id)?;

        match self.password.as_deref() {
            None => Ok(()), // no gate configured
            Some(expected) if expected == password => {
                *session.unlocked.write() = true;
                Ok(())
            }
            Some(_) => Err(Error::InvalidPassword),
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::response::{AnswerOutcome, AnswerRecord};

    fn record(ordinal: usize, question: &str) -> AnswerRecord {
        AnswerRecord {
            ordinal,
            question: question.to_string(),
            outcome: AnswerOutcome::Answered("ok".to_string()),
        }
    }

    fn indexed() -> IndexedDocument {
        IndexedDocument {
            document: Document::new(
                "plan.pdf".to_string(),
                "stored.pdf".to_string(),
                "hash".to_string(),
                42,
            ),
            index: VectorIndex::new(),
        }
    }

    #[test]
    fn ungated_sessions_start_unlocked() {
        let store = SessionStore::new(None);
        let session = store.create();
        assert!(session.is_unlocked());
        assert!(session.ensure_unlocked().is_ok());
    }

    #[test]
    fn gated_sessions_require_the_exact_secret() {
        let store = SessionStore::new(Some("euroclimat2024".to_string()));
        let session = store.create();
        assert!(!session.is_unlocked());
        assert!(matches!(session.ensure_unlocked(), Err(Error::Locked)));

        // Near misses all fail and leave the session locked.
        for wrong in ["EUROCLIMAT2024", "euroclimat2024 ", " euroclimat2024", "euroclimat202", ""] {
            assert!(matches!(
                store.unlock(&session.id, wrong),
                Err(Error::InvalidPassword)
            ));
            assert!(!session.is_unlocked());
        }

        store.unlock(&session.id, "euroclimat2024").unwrap();
        assert!(session.is_unlocked());
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = SessionStore::new(None);
        let id = Uuid::new_v4();
        assert!(matches!(store.get(&id), Err(Error::SessionNotFound(_))));
        assert!(matches!(
            store.unlock(&id, "whatever"),
            Err(Error::SessionNotFound(_))
        ));
    }

    #[test]
    fn upload_replaces_document_and_clears_transcript() {
        let store = SessionStore::new(None);
        let session = store.create();
        assert!(session.indexed_document().is_none());

        session.set_document(indexed());
        session.append_records(&[record(1, "q1"), record(2, "q2")]);
        assert_eq!(session.transcript().len(), 2);

        let first_id = session.indexed_document().unwrap().document.id;
        session.set_document(indexed());
        assert_ne!(session.indexed_document().unwrap().document.id, first_id);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn transcript_preserves_append_order() {
        let store = SessionStore::new(None);
        let session = store.create();
        session.set_document(indexed());
        session.append_records(&[record(1, "a")]);
        session.append_records(&[record(2, "b"), record(3, "c")]);

        let transcript = session.transcript();
        let questions: Vec<_> = transcript.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["a", "b", "c"]);
    }
}
