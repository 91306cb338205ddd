//! HTTP implementation of [`UserBackend`] on top of `reqwest::blocking`.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiConfig, UserBackend};
use crate::error::{Result, SyncError};
use crate::model::{UserDraft, UserRecord};

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(SyncError::status(status.as_u16(), body))
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl UserBackend for HttpBackend {
    fn list_users(&self) -> Result<Vec<UserRecord>> {
        let url = self.config.users_url();
        debug!(%url, "GET users");
        // An empty table may come back as `null`
        let users: Option<Vec<UserRecord>> = self.send_json(self.client.get(&url))?;
        Ok(users.unwrap_or_default())
    }

    fn get_user(&self, id: i64) -> Result<UserRecord> {
        let url = self.config.user_url(id);
        debug!(%url, "GET user");
        self.send_json(self.client.get(&url))
    }

    fn create_user(&self, draft: &UserDraft) -> Result<UserRecord> {
        let url = self.config.users_url();
        debug!(%url, "POST user");
        self.send_json(self.client.post(&url).json(draft))
    }

    fn update_user(&self, id: i64, draft: &UserDraft) -> Result<UserRecord> {
        let url = self.config.user_url(id);
        debug!(%url, "PUT user");
        self.send_json(self.client.put(&url).json(draft))
    }

    fn delete_user(&self, id: i64) -> Result<()> {
        let url = self.config.user_url(id);
        debug!(%url, "DELETE user");
        self.send(self.client.delete(&url))?;
        Ok(())
    }
}
