//! Bounded, newest-first collection of sessions with an active pointer.
//!
//! The collection is never empty and never holds more than
//! [`MAX_SESSIONS`] sessions. It is pure in-memory state; persistence is the
//! application layer's concern.

use super::entities::{Message, Session};
use crate::core::error::DomainError;

/// Maximum number of sessions kept. The oldest are evicted on overflow.
pub const MAX_SESSIONS: usize = 10;

/// Ordered set of sessions, newest first, plus the id of the active one.
#[derive(Debug, Clone)]
pub struct SessionCollection {
    sessions: Vec<Session>,
    active_id: String,
}

impl SessionCollection {
    /// A collection holding a single fresh session.
    pub fn new() -> Self {
        let session = Session::new();
        Self {
            active_id: session.id().to_string(),
            sessions: vec![session],
        }
    }

    /// Build from restored sessions (newest first).
    ///
    /// Extra sessions beyond [`MAX_SESSIONS`] are dropped from the tail; an
    /// empty list yields a single fresh session. The newest session is active.
    pub fn from_sessions(mut sessions: Vec<Session>) -> Self {
        if sessions.is_empty() {
            return Self::new();
        }
        sessions.truncate(MAX_SESSIONS);
        Self {
            active_id: sessions[0].id().to_string(),
            sessions,
        }
    }

    /// Parse a persisted record: a JSON array of sessions, newest first.
    pub fn parse_record(record: &str) -> Result<Vec<Session>, DomainError> {
        serde_json::from_str(record).map_err(|e| DomainError::InvalidRecord(e.to_string()))
    }

    /// Serialize all sessions into the persisted record shape.
    pub fn to_record(&self) -> Result<String, DomainError> {
        serde_json::to_string(&self.sessions).map_err(|e| DomainError::InvalidRecord(e.to_string()))
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Always false: the collection holds at least one session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id() == id)
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Session {
        self.get(&self.active_id).unwrap_or(&self.sessions[0])
    }

    /// Insert a fresh session at the front, evict past the bound, make it
    /// active, and return its id.
    pub fn create(&mut self) -> String {
        let session = Session::new();
        let id = session.id().to_string();
        self.sessions.insert(0, session);
        self.sessions.truncate(MAX_SESSIONS);
        self.active_id = id.clone();
        id
    }

    /// Point the active session at `id`.
    ///
    /// An unknown id falls back to the newest session. Returns the id that is
    /// active afterwards.
    pub fn switch_active(&mut self, id: &str) -> &str {
        self.active_id = match self.get(id) {
            Some(session) => session.id().to_string(),
            None => self.sessions[0].id().to_string(),
        };
        &self.active_id
    }

    /// Remove a session. Returns false if `id` is unknown.
    ///
    /// When the active session is removed, the session now occupying its
    /// slot becomes active, or the nearest predecessor when it was the last
    /// one. Removing the only session replaces it with a fresh one.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.sessions.remove(index);

        if self.sessions.is_empty() {
            let session = Session::new();
            self.active_id = session.id().to_string();
            self.sessions.push(session);
            return true;
        }

        if self.active_id == id {
            let next = index.min(self.sessions.len() - 1);
            self.active_id = self.sessions[next].id().to_string();
        }
        true
    }

    /// Replace a session's messages and thread id.
    pub fn update_messages(
        &mut self,
        id: &str,
        messages: Vec<Message>,
        thread_id: Option<String>,
    ) -> Result<(), DomainError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| DomainError::SessionNotFound(id.to_string()))?;
        session.update_messages(messages, thread_id);
        Ok(())
    }
}

impl Default for SessionCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::title::DEFAULT_SESSION_TITLE;

    fn ids(collection: &SessionCollection) -> Vec<String> {
        collection
            .sessions()
            .iter()
            .map(|s| s.id().to_string())
            .collect()
    }

    #[test]
    fn new_collection_has_one_active_session() {
        let collection = SessionCollection::new();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.active().id(), collection.active_id());
        assert_eq!(collection.active().title(), DEFAULT_SESSION_TITLE);
    }

    #[test]
    fn create_inserts_newest_first_up_to_bound() {
        let mut collection = SessionCollection::new();
        let first = collection.active_id().to_string();
        let mut created = vec![first];

        for n in 2..=MAX_SESSIONS {
            let id = collection.create();
            created.push(id.clone());
            assert_eq!(collection.len(), n);
            assert_eq!(collection.active_id(), id);
            assert_eq!(collection.sessions()[0].id(), id);
        }

        created.reverse();
        assert_eq!(ids(&collection), created);
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest() {
        let mut collection = SessionCollection::new();
        let oldest = collection.active_id().to_string();
        for _ in 1..MAX_SESSIONS {
            collection.create();
        }
        let before = ids(&collection);
        assert_eq!(before.len(), MAX_SESSIONS);

        let newest = collection.create();

        assert_eq!(collection.len(), MAX_SESSIONS);
        assert!(collection.get(&oldest).is_none());
        let mut expected = vec![newest];
        expected.extend(before[..MAX_SESSIONS - 1].iter().cloned());
        assert_eq!(ids(&collection), expected);
    }

    #[test]
    fn closing_last_session_synthesizes_a_fresh_one() {
        let mut collection = SessionCollection::new();
        let only = collection.active_id().to_string();

        assert!(collection.close(&only));

        assert_eq!(collection.len(), 1);
        assert_ne!(collection.active_id(), only);
        assert!(collection.active().messages().is_empty());
    }

    #[test]
    fn closing_active_selects_same_slot() {
        let mut collection = SessionCollection::new();
        let c = collection.active_id().to_string();
        let b = collection.create();
        let a = collection.create();
        // order: a, b, c
        collection.switch_active(&b);

        collection.close(&b);

        assert_eq!(ids(&collection), vec![a, c.clone()]);
        assert_eq!(collection.active_id(), c);
    }

    #[test]
    fn closing_active_tail_selects_predecessor() {
        let mut collection = SessionCollection::new();
        let c = collection.active_id().to_string();
        let b = collection.create();
        collection.create();
        collection.switch_active(&c);

        collection.close(&c);

        assert_eq!(collection.active_id(), b);
    }

    #[test]
    fn closing_inactive_keeps_active() {
        let mut collection = SessionCollection::new();
        let c = collection.active_id().to_string();
        let a = collection.create();

        collection.close(&c);

        assert_eq!(collection.active_id(), a);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn closing_unknown_is_a_no_op() {
        let mut collection = SessionCollection::new();
        let active = collection.active_id().to_string();
        assert!(!collection.close("missing"));
        assert_eq!(collection.active_id(), active);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn switch_to_unknown_falls_back_to_newest() {
        let mut collection = SessionCollection::new();
        let older = collection.active_id().to_string();
        let newest = collection.create();
        collection.switch_active(&older);
        assert_eq!(collection.active_id(), older);

        let now_active = collection.switch_active("missing").to_string();

        assert_eq!(now_active, newest);
    }

    #[test]
    fn update_messages_on_unknown_session_fails() {
        let mut collection = SessionCollection::new();
        let err = collection
            .update_messages("missing", vec![Message::user("Hi")], None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn record_round_trip_preserves_everything() {
        let mut collection = SessionCollection::new();
        let first = collection.active_id().to_string();
        collection
            .update_messages(
                &first,
                vec![Message::user("Hello"), Message::assistant("Hi there")],
                Some("t1".to_string()),
            )
            .unwrap();
        collection.create();

        let record = collection.to_record().unwrap();
        let restored = SessionCollection::parse_record(&record).unwrap();

        assert_eq!(restored, collection.sessions().to_vec());
    }

    #[test]
    fn parse_record_rejects_garbage() {
        assert!(SessionCollection::parse_record("not json").is_err());
        assert!(SessionCollection::parse_record("{\"id\": 1}").is_err());
    }

    #[test]
    fn from_sessions_truncates_and_activates_newest() {
        let sessions: Vec<Session> = (0..MAX_SESSIONS + 3).map(|_| Session::new()).collect();
        let newest = sessions[0].id().to_string();

        let collection = SessionCollection::from_sessions(sessions);

        assert_eq!(collection.len(), MAX_SESSIONS);
        assert_eq!(collection.active_id(), newest);
    }

    #[test]
    fn from_empty_sessions_creates_one() {
        let collection = SessionCollection::from_sessions(Vec::new());
        assert_eq!(collection.len(), 1);
    }
}
