//! Backend seam: the REST endpoints the synchronizer talks to.
//!
//! [`UserBackend`] is implemented by [`http::HttpBackend`] for the real
//! service and by [`memory::InMemoryBackend`] for tests.
//!
pub mod http;
pub mod memory;

use crate::error::Result;
use crate::model::{UserDraft, UserRecord};

/// Fallback when `USERDESK_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Backend label baked in at build time (`USERDESK_BACKEND=rust cargo build`).
pub const BACKEND_NAME: &str = match option_env!("USERDESK_BACKEND") {
    Some(name) => name,
    None => "go",
};

/// The CRUD operations of `/api/{backend}/users`.
///
/// Calls block; the dispatcher runs each one on its own worker thread.
pub trait UserBackend: Send + Sync {
    fn list_users(&self) -> Result<Vec<UserRecord>>;
    fn get_user(&self, id: i64) -> Result<UserRecord>;
    fn create_user(&self, draft: &UserDraft) -> Result<UserRecord>;
    fn update_user(&self, id: i64, draft: &UserDraft) -> Result<UserRecord>;
    fn delete_user(&self, id: i64) -> Result<()>;
}

/// Where the backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub backend: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, backend: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            backend: backend.into(),
        }
    }

    /// `{base}/api/{backend}/users`
    pub fn users_url(&self) -> String {
        format!("{}/api/{}/users", self.base_url, self.backend)
    }

    /// `{base}/api/{backend}/users/{id}`
    pub fn user_url(&self, id: i64) -> String {
        format!("{}/{}", self.users_url(), id)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, BACKEND_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_backend_and_id() {
        let cfg = ApiConfig::new("http://api.local:9000/", "go");
        assert_eq!(cfg.base_url, "http://api.local:9000");
        assert_eq!(cfg.users_url(), "http://api.local:9000/api/go/users");
        assert_eq!(cfg.user_url(42), "http://api.local:9000/api/go/users/42");
    }

    #[test]
    fn default_points_at_localhost() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_API_URL);
        assert_eq!(cfg.backend, BACKEND_NAME);
    }
}
