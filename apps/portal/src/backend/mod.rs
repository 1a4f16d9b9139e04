//! Backend Client: the single point of entry for all calls to the HR backend API.
//!
//! ARCHITECTURAL RULE: no other module talks to the backend directly. Persistence,
//! token verification and validation all live behind this client.
//!
//! Only idempotent reads are retried. Mutations are sent exactly once so a slow
//! backend can never produce a duplicate migration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::resolver::{Credentials, SessionResolver};
use crate::auth::session::{Role, Session, SessionUser};
use crate::recruitment::models::{
    EmployeeFields, EmployeeId, EmployeeRecord, RecruitmentRecord,
};
use crate::recruitment::service::{EmployeeDirectory, RecruitmentService, ServiceError};
use crate::recruitment::status::RecruitmentStatus;

const MAX_READ_RETRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    id: String,
    name: String,
    role: String,
}

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: RecruitmentStatus,
}

#[derive(Debug, Deserialize)]
struct MigrationResponse {
    employee_id: EmployeeId,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    service_token: Option<String>,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        service_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match bearer.or(self.service_token.as_deref()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET with retry on 429, 5xx and transport errors, exponential backoff.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<T, ServiceError> {
        let mut last_error: Option<ServiceError> = None;

        for attempt in 0..MAX_READ_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 200ms, 400ms
                let delay = Duration::from_millis(200 * (1 << (attempt - 1)));
                warn!(
                    "Backend GET {path} attempt {attempt} failed, retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.request(Method::GET, path, bearer).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(transport_error(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(rejection(response).await);
                continue;
            }

            let response = check_status(response, path).await?;
            return response
                .json::<T>()
                .await
                .map_err(|e| ServiceError::Decode(e.to_string()));
        }

        Err(last_error.unwrap_or(ServiceError::Timeout))
    }

    /// Sends a mutating request once. No retries.
    async fn send_once(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<Response, ServiceError> {
        let response = builder.send().await.map_err(transport_error)?;
        check_status(response, path).await
    }
}

async fn check_status(response: Response, path: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ServiceError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        return Err(rejection(response).await);
    }
    Ok(response)
}

async fn rejection(response: Response) -> ServiceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ServiceError::Rejected {
        status,
        message: error_message(&body),
    }
}

/// Extracts `message` from a JSON error body, or returns the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<BackendErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(e.to_string())
    }
}

/// Unknown roles fail closed: the caller is treated as signed out.
fn session_from_me(me: MeResponse) -> Session {
    match me.role.parse::<Role>() {
        Ok(role) => Session::signed_in(SessionUser {
            id: me.id,
            name: me.name,
            role,
        }),
        Err(e) => {
            warn!("Rejecting session for user {}: {e}", me.id);
            Session::anonymous()
        }
    }
}

#[async_trait]
impl RecruitmentService for BackendClient {
    async fn list(&self) -> Result<Vec<RecruitmentRecord>, ServiceError> {
        self.get_json("/recruitments", None).await
    }

    async fn get(&self, id: Uuid) -> Result<RecruitmentRecord, ServiceError> {
        self.get_json(&format!("/recruitments/{id}"), None).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: RecruitmentStatus,
    ) -> Result<(), ServiceError> {
        let path = format!("/recruitments/{id}/status");
        let builder = self
            .request(Method::PATCH, &path, None)
            .json(&StatusUpdate { status });
        self.send_once(builder, &path).await?;
        debug!("Backend accepted status {status} for recruitment {id}");
        Ok(())
    }

    async fn migrate_to_employee(
        &self,
        id: Uuid,
        fields: &EmployeeFields,
    ) -> Result<EmployeeId, ServiceError> {
        let path = format!("/recruitments/{id}/migrate");
        let builder = self.request(Method::POST, &path, None).json(fields);
        let response = self.send_once(builder, &path).await?;
        let body: MigrationResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(body.employee_id)
    }

    async fn delete_recruitment_record(&self, id: Uuid) -> Result<(), ServiceError> {
        let path = format!("/recruitments/{id}");
        let builder = self.request(Method::DELETE, &path, None);
        self.send_once(builder, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for BackendClient {
    async fn get_employee(&self, id: EmployeeId) -> Result<EmployeeRecord, ServiceError> {
        self.get_json(&format!("/employees/{id}"), None).await
    }
}

#[async_trait]
impl SessionResolver for BackendClient {
    async fn resolve(&self, credentials: Option<Credentials>) -> Session {
        let Some(credentials) = credentials else {
            return Session::anonymous();
        };
        match self
            .get_json::<MeResponse>("/auth/me", Some(&credentials.token))
            .await
        {
            Ok(me) => session_from_me(me),
            Err(ServiceError::Rejected { status: 401, .. }) | Err(ServiceError::NotFound(_)) => {
                Session::anonymous()
            }
            Err(e) => {
                warn!("Session resolution failed, treating caller as signed out: {e}");
                Session::anonymous()
            }
        }
    }
}
