//! Client-side mirror of the backend's user collection.
//!
//! Every action is split in two halves:
//! - [`execute`] performs one call against a [`UserBackend`] and captures the
//!   result as a [`SyncOutcome`]. It touches no local state and can run on any
//!   thread.
//! - [`UserListSynchronizer::apply`] reconciles a completed outcome into the
//!   collection and returns the [`Notice`] to show the user.
//!
//! The collection only ever changes on a successful outcome; a failure leaves
//! it exactly as it was. Newly created records go first, everything else
//! keeps its position.
//!
pub mod dispatch;

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::api::UserBackend;
use crate::error::{Result, SyncError};
use crate::model::{UserDraft, UserRecord};

/// One request against the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncRequest {
    Load,
    Create(UserDraft),
    Update { id: i64, draft: UserDraft },
    Delete { id: i64 },
    Refresh { id: i64 },
}

impl SyncRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Refresh { .. } => "refresh",
        }
    }
}

/// The completed result of a [`SyncRequest`].
#[derive(Debug)]
pub enum SyncOutcome {
    Loaded(Result<Vec<UserRecord>>),
    Created(Result<UserRecord>),
    Updated { id: i64, result: Result<UserRecord> },
    Deleted { id: i64, result: Result<()> },
    Refreshed { id: i64, result: Result<UserRecord> },
}

impl SyncOutcome {
    /// Failed outcome for `request` without contacting the backend.
    pub fn failed(request: &SyncRequest, error: SyncError) -> Self {
        match request {
            SyncRequest::Load => Self::Loaded(Err(error)),
            SyncRequest::Create(_) => Self::Created(Err(error)),
            SyncRequest::Update { id, .. } => Self::Updated { id: *id, result: Err(error) },
            SyncRequest::Delete { id } => Self::Deleted { id: *id, result: Err(error) },
            SyncRequest::Refresh { id } => Self::Refreshed { id: *id, result: Err(error) },
        }
    }
}

/// Which form a successful outcome clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Transient user-facing notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Failure, message: message.into() }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

/// What applying an outcome means for the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Notification to surface, if any. Load never produces one.
    pub notice: Option<Notice>,
    /// Form whose inputs should be cleared.
    pub clear_form: Option<FormKind>,
    /// Set for load outcomes: whether the fetch succeeded.
    pub loaded: Option<bool>,
}

/// Run one request against the backend.
pub fn execute(backend: &dyn UserBackend, request: SyncRequest) -> SyncOutcome {
    match request {
        SyncRequest::Load => SyncOutcome::Loaded(backend.list_users()),
        SyncRequest::Create(draft) => SyncOutcome::Created(backend.create_user(&draft)),
        SyncRequest::Update { id, draft } => SyncOutcome::Updated {
            id,
            result: backend.update_user(id, &draft),
        },
        SyncRequest::Delete { id } => SyncOutcome::Deleted {
            id,
            result: backend.delete_user(id),
        },
        SyncRequest::Refresh { id } => SyncOutcome::Refreshed {
            id,
            result: backend.get_user(id),
        },
    }
}

/// Owns the local collection; newest first.
#[derive(Clone, Debug, Default)]
pub struct UserListSynchronizer {
    users: Vec<UserRecord>,
}

impl UserListSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    /// Reconcile one completed request into the collection.
    pub fn apply(&mut self, outcome: SyncOutcome) -> Applied {
        match outcome {
            SyncOutcome::Loaded(Ok(users)) => {
                self.replace_all(users);
                info!(count = self.users.len(), "loaded users");
                Applied { loaded: Some(true), ..Applied::default() }
            }
            SyncOutcome::Loaded(Err(e)) => {
                warn!(error = %e, "error fetching users");
                Applied { loaded: Some(false), ..Applied::default() }
            }
            SyncOutcome::Created(Ok(user)) => {
                info!(id = user.id, "created user");
                self.users.retain(|u| u.id != user.id);
                self.users.insert(0, user);
                Applied {
                    notice: Some(Notice::success("User created successfully!")),
                    clear_form: Some(FormKind::Create),
                    loaded: None,
                }
            }
            SyncOutcome::Created(Err(e)) => failed("creating", None, e),
            SyncOutcome::Updated { id, result: Ok(user) } => {
                info!(id, "updated user");
                self.replace_in_place(user);
                Applied {
                    notice: Some(Notice::success("User updated successfully!")),
                    clear_form: Some(FormKind::Update),
                    loaded: None,
                }
            }
            SyncOutcome::Updated { id, result: Err(e) } => failed("updating", Some(id), e),
            SyncOutcome::Deleted { id, result: Ok(()) } => {
                info!(id, "deleted user");
                self.users.retain(|u| u.id != id);
                Applied {
                    notice: Some(Notice::success("User deleted successfully!")),
                    ..Applied::default()
                }
            }
            SyncOutcome::Deleted { id, result: Err(e) } => failed("deleting", Some(id), e),
            SyncOutcome::Refreshed { id, result: Ok(user) } => {
                info!(id, "refreshed user");
                self.replace_in_place(user);
                Applied {
                    notice: Some(Notice::success("User refreshed")),
                    ..Applied::default()
                }
            }
            SyncOutcome::Refreshed { id, result: Err(e) } => failed("refreshing", Some(id), e),
        }
    }

    /// Blocking round trip: execute against `backend`, then apply.
    pub fn run(&mut self, backend: &dyn UserBackend, request: SyncRequest) -> Applied {
        debug!(request = request.label(), "running request");
        self.apply(execute(backend, request))
    }

    pub fn load(&mut self, backend: &dyn UserBackend) -> Applied {
        self.run(backend, SyncRequest::Load)
    }

    pub fn create(&mut self, backend: &dyn UserBackend, name: &str, email: &str) -> Applied {
        self.run(backend, SyncRequest::Create(UserDraft::new(name, email)))
    }

    pub fn update(&mut self, backend: &dyn UserBackend, id: i64, name: &str, email: &str) -> Applied {
        self.run(backend, SyncRequest::Update { id, draft: UserDraft::new(name, email) })
    }

    pub fn delete(&mut self, backend: &dyn UserBackend, id: i64) -> Applied {
        self.run(backend, SyncRequest::Delete { id })
    }

    pub fn refresh(&mut self, backend: &dyn UserBackend, id: i64) -> Applied {
        self.run(backend, SyncRequest::Refresh { id })
    }

    /// Server order is oldest first; show the newest first and drop
    /// duplicate ids so lookups stay unambiguous.
    fn replace_all(&mut self, mut users: Vec<UserRecord>) {
        users.reverse();
        let mut seen = HashSet::with_capacity(users.len());
        users.retain(|u| seen.insert(u.id));
        self.users = users;
    }

    fn replace_in_place(&mut self, user: UserRecord) {
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
            *slot = user;
        }
    }
}

fn failed(action: &str, id: Option<i64>, e: SyncError) -> Applied {
    match id {
        Some(id) => warn!(id, error = %e, "error {action} user"),
        None => warn!(error = %e, "error {action} user"),
    }
    Applied {
        notice: Some(Notice::failure(format!("Error {action} user: {e}"))),
        ..Applied::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::InMemoryBackend;

    fn user(id: i64, name: &str) -> UserRecord {
        UserRecord { id, name: name.to_string(), email: format!("{name}@x.com") }
    }

    fn ids(s: &UserListSynchronizer) -> Vec<i64> {
        s.users().iter().map(|u| u.id).collect()
    }

    #[test]
    fn load_reverses_server_order() {
        let backend = InMemoryBackend::with_users(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        let mut s = UserListSynchronizer::new();
        let applied = s.load(&backend);
        assert_eq!(applied.loaded, Some(true));
        assert_eq!(applied.notice, None);
        assert_eq!(ids(&s), vec![3, 2, 1]);
    }

    #[test]
    fn load_failure_keeps_collection() {
        let backend = InMemoryBackend::with_users(vec![user(1, "a")]);
        let mut s = UserListSynchronizer::new();
        s.load(&backend);
        backend.set_failing(true);
        let applied = s.load(&backend);
        assert_eq!(applied.loaded, Some(false));
        assert_eq!(ids(&s), vec![1]);
    }

    #[test]
    fn load_drops_duplicate_ids() {
        let mut s = UserListSynchronizer::new();
        s.apply(SyncOutcome::Loaded(Ok(vec![user(1, "old"), user(2, "b"), user(1, "new")])));
        assert_eq!(ids(&s), vec![1, 2]);
        assert_eq!(s.get(1).map(|u| u.name.as_str()), Some("new"));
    }

    #[test]
    fn create_prepends_and_clears_form() {
        let backend = InMemoryBackend::with_users(vec![user(1, "a")]);
        let mut s = UserListSynchronizer::new();
        s.load(&backend);
        let applied = s.create(&backend, "B", "b@x.com");
        assert_eq!(applied.clear_form, Some(FormKind::Create));
        assert_eq!(applied.notice.map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(ids(&s), vec![2, 1]);
    }

    #[test]
    fn create_with_known_id_replaces_stale_entry() {
        let mut s = UserListSynchronizer::new();
        s.apply(SyncOutcome::Loaded(Ok(vec![user(1, "a"), user(2, "b")])));
        s.apply(SyncOutcome::Created(Ok(user(1, "again"))));
        assert_eq!(ids(&s), vec![1, 2]);
        assert_eq!(s.get(1).map(|u| u.name.as_str()), Some("again"));
    }

    #[test]
    fn update_of_unknown_local_id_changes_nothing() {
        let mut s = UserListSynchronizer::new();
        s.apply(SyncOutcome::Loaded(Ok(vec![user(1, "a")])));
        let applied = s.apply(SyncOutcome::Updated { id: 9, result: Ok(user(9, "z")) });
        assert_eq!(applied.clear_form, Some(FormKind::Update));
        assert_eq!(s.users(), &[user(1, "a")]);
    }

    #[test]
    fn refresh_picks_up_remote_edit_in_place() {
        let backend = InMemoryBackend::with_users(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        let mut s = UserListSynchronizer::new();
        s.load(&backend);
        backend.set_user(user(2, "edited"));
        s.refresh(&backend, 2);
        assert_eq!(ids(&s), vec![3, 2, 1]);
        assert_eq!(s.get(2).map(|u| u.name.as_str()), Some("edited"));

        let before = s.users().to_vec();
        let applied = s.refresh(&backend, 99);
        assert!(applied.notice.unwrap().is_failure());
        assert_eq!(s.users(), before.as_slice());
    }

    #[test]
    fn failure_notice_carries_reason() {
        let backend = InMemoryBackend::new();
        let mut s = UserListSynchronizer::new();
        let applied = s.delete(&backend, 5);
        let notice = applied.notice.unwrap();
        assert!(notice.is_failure());
        assert!(notice.message.contains("404"), "{}", notice.message);
        assert_eq!(applied.clear_form, None);
    }
}
