use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, ErrorBody, TaskApi};
use crate::models::{
    Credential, LoginRequest, LoginResponse, NewTask, Session, Task, TaskChanges, User,
};

/// `TaskApi` over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder.bearer_auth(credential.as_str())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        debug!(url = %resp.url(), %status, "task api response");
        if status.is_success() {
            return Ok(resp);
        }

        let detail = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized { detail },
            StatusCode::NOT_FOUND => ApiError::NotFound { detail },
            other => ApiError::Status {
                status: other.as_u16(),
                detail,
            },
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(builder).await?.json::<T>().await?)
    }
}

#[async_trait]
impl TaskApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let req = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });
        let resp: LoginResponse = self.json(req).await?;
        Ok(resp.into())
    }

    async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let req = self
            .client
            .post(self.url("/auth/register"))
            .json(&LoginRequest { email, password });
        self.json(req).await
    }

    async fn current_user(&self, credential: &Credential) -> Result<User, ApiError> {
        let req = self.authed(self.client.get(self.url("/auth/me")), credential);
        self.json(req).await
    }

    async fn list_tasks(&self, credential: &Credential) -> Result<Vec<Task>, ApiError> {
        let req = self.authed(self.client.get(self.url("/todos/")), credential);
        self.json(req).await
    }

    async fn get_task(&self, credential: &Credential, id: &str) -> Result<Task, ApiError> {
        let req = self.authed(
            self.client.get(self.url(&format!("/todos/{id}"))),
            credential,
        );
        self.json(req).await
    }

    async fn create_task(
        &self,
        credential: &Credential,
        task: &NewTask,
    ) -> Result<Task, ApiError> {
        let req = self.authed(self.client.post(self.url("/todos/")), credential);
        self.json(req.json(task)).await
    }

    async fn update_task(
        &self,
        credential: &Credential,
        id: &str,
        changes: &TaskChanges,
    ) -> Result<Task, ApiError> {
        let req = self.authed(
            self.client.put(self.url(&format!("/todos/{id}"))),
            credential,
        );
        self.json(req.json(changes)).await
    }

    async fn delete_task(&self, credential: &Credential, id: &str) -> Result<(), ApiError> {
        let req = self.authed(
            self.client.delete(self.url(&format!("/todos/{id}"))),
            credential,
        );
        self.send(req).await?;
        Ok(())
    }
}
