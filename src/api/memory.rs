//! In-memory [`UserBackend`] that behaves like the REST service.
//!
//! Ids are assigned sequentially, records are kept in insertion order (the
//! order the real list endpoint returns them), and missing ids produce a 404
//! the way the server does. `set_failing(true)` makes every call fail with a
//! 500, which is how tests exercise the failure paths.

use std::sync::{Mutex, MutexGuard};

use super::UserBackend;
use crate::error::{Result, SyncError};
use crate::model::{UserDraft, UserRecord};

#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<UserRecord>,
    next_id: i64,
    failing: bool,
    calls: usize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records; new ids continue after the largest one.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        Self {
            state: Mutex::new(State {
                users,
                next_id,
                ..State::default()
            }),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Server-side view, in server order.
    pub fn users(&self) -> Vec<UserRecord> {
        self.lock().users.clone()
    }

    /// Number of requests received, failed ones included.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// Simulate another client editing a record behind our back.
    pub fn set_user(&self, user: UserRecord) {
        let mut state = self.lock();
        match state.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => state.users.push(user),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls += 1;
        if state.failing {
            return Err(SyncError::status(500, "backend unavailable"));
        }
        Ok(state)
    }
}

fn not_found() -> SyncError {
    SyncError::status(404, "User not found")
}

impl UserBackend for InMemoryBackend {
    fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.begin()?.users.clone())
    }

    fn get_user(&self, id: i64) -> Result<UserRecord> {
        let state = self.begin()?;
        state.users.iter().find(|u| u.id == id).cloned().ok_or_else(not_found)
    }

    fn create_user(&self, draft: &UserDraft) -> Result<UserRecord> {
        let mut state = self.begin()?;
        state.next_id += 1;
        let user = UserRecord {
            id: state.next_id,
            name: draft.name.clone(),
            email: draft.email.clone(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    fn update_user(&self, id: i64, draft: &UserDraft) -> Result<UserRecord> {
        let mut state = self.begin()?;
        let user = state.users.iter_mut().find(|u| u.id == id).ok_or_else(not_found)?;
        user.name = draft.name.clone();
        user.email = draft.email.clone();
        Ok(user.clone())
    }

    fn delete_user(&self, id: i64) -> Result<()> {
        let mut state = self.begin()?;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_continue_after_seed() {
        let backend = InMemoryBackend::with_users(vec![UserRecord {
            id: 6,
            name: "x".into(),
            email: "x@x".into(),
        }]);
        let created = backend.create_user(&UserDraft::new("A", "a@x.com")).unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(backend.users().len(), 2);
    }

    #[test]
    fn missing_ids_are_404() {
        let backend = InMemoryBackend::new();
        let err = backend.delete_user(3).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        let err = backend.update_user(3, &UserDraft::default()).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(backend.calls(), 2);
    }

    #[test]
    fn failing_rejects_everything() {
        let backend = InMemoryBackend::new();
        backend.set_failing(true);
        assert!(backend.list_users().is_err());
        assert!(backend.create_user(&UserDraft::new("A", "a")).is_err());
        backend.set_failing(false);
        assert!(backend.users().is_empty());
    }
}
