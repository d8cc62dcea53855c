//! REST client for the occupancy meter backend.
//!
//! One method per endpoint, each returning `Result<_, ApiError>` so callers
//! decide what to surface. Status-code handling follows the backend's
//! observed behavior: create answers 201 (409 on a name conflict), delete
//! answers 201 where no-content semantics would be expected (any 2xx is
//! accepted), status answers 204.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::types::{Camera, HistoryResponse, NewCamera, StatusAction, StatusRequest};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("a camera named \"{name}\" is already registered")]
    Conflict { name: String },
    #[error("server error ({0})")]
    UnexpectedStatus(StatusCode),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /camera` — the full directory, in server order.
    pub async fn list_cameras(&self) -> Result<Vec<Camera>, ApiError> {
        let url = self.endpoint("/camera");
        debug!(%url, "fetching camera list");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::UnexpectedStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// `POST /camera/new` — register a camera. 409 means the name is taken.
    pub async fn create_camera(&self, camera: &NewCamera) -> Result<(), ApiError> {
        let url = self.endpoint("/camera/new");
        debug!(%url, name = %camera.name, "creating camera");
        let response = self.http.post(&url).json(camera).send().await?;
        match response.status() {
            StatusCode::CREATED => Ok(()),
            StatusCode::CONFLICT => Err(ApiError::Conflict {
                name: camera.name.clone(),
            }),
            status => Err(ApiError::UnexpectedStatus(status)),
        }
    }

    /// `DELETE /camera/{name}`.
    pub async fn delete_camera(&self, name: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/camera/{name}"));
        debug!(%url, "deleting camera");
        let response = self.http.delete(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::UnexpectedStatus(response.status()))
        }
    }

    /// `POST /camera/{name}/status` — request a connect or disconnect.
    pub async fn set_status(&self, name: &str, action: StatusAction) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/camera/{name}/status"));
        debug!(%url, ?action, "changing camera status");
        let response = self
            .http
            .post(&url)
            .json(&StatusRequest { action })
            .send()
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(ApiError::UnexpectedStatus(status)),
        }
    }

    /// `GET /history/{id}?amount=&offset=` — one page of samples plus the
    /// camera's current online state.
    pub async fn fetch_history(
        &self,
        camera: &str,
        amount: usize,
        offset: usize,
    ) -> Result<HistoryResponse, ApiError> {
        let url = self.endpoint(&format!("/history/{camera}"));
        debug!(%url, amount, offset, "fetching history page");
        let response = self
            .http
            .get(&url)
            .query(&[("amount", amount), ("offset", offset)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::UnexpectedStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let api = client("http://localhost:8080/");
        assert_eq!(api.endpoint("/camera"), "http://localhost:8080/camera");

        let api = client("http://localhost:8080");
        assert_eq!(
            api.endpoint("/camera/front-door/status"),
            "http://localhost:8080/camera/front-door/status"
        );
    }

    #[test]
    fn conflict_error_names_the_camera() {
        let err = ApiError::Conflict {
            name: "lobby".into(),
        };
        assert_eq!(
            err.to_string(),
            "a camera named \"lobby\" is already registered"
        );
    }

    #[test]
    fn unexpected_status_mentions_the_code() {
        let err = ApiError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("500"));
    }
}
