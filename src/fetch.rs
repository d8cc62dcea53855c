//! Bridges API calls onto the dashboard's event channel.
//!
//! Every network operation runs as a spawned task and reports back as a
//! single [`ApiEvent`]. The draw loop drains the channel between frames, so
//! no screen ever blocks on a response, and results carry enough identity
//! (camera name, request sequence number) for the receiver to drop whatever
//! no longer applies.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::{ApiClient, ApiError};
use crate::mock::MockApi;
use crate::pager::HistoryRequest;
use crate::types::{Camera, HistoryResponse, NewCamera, StatusAction};

/// Completion of one API operation.
#[derive(Debug)]
pub enum ApiEvent {
    Cameras(Result<Vec<Camera>, ApiError>),
    Created(Result<(), ApiError>),
    Deleted {
        name: String,
        result: Result<(), ApiError>,
    },
    StatusSet {
        name: String,
        result: Result<(), ApiError>,
    },
    HistoryPage {
        seq: u64,
        result: Result<HistoryResponse, ApiError>,
    },
}

/// The backend the dashboard talks to: the live REST service, or the
/// in-process demo backend.
#[derive(Clone)]
pub enum ApiHandle {
    Live(Arc<ApiClient>),
    Demo(Arc<MockApi>),
}

impl ApiHandle {
    async fn list_cameras(&self) -> Result<Vec<Camera>, ApiError> {
        match self {
            ApiHandle::Live(api) => api.list_cameras().await,
            ApiHandle::Demo(api) => api.list_cameras().await,
        }
    }

    async fn create_camera(&self, camera: &NewCamera) -> Result<(), ApiError> {
        match self {
            ApiHandle::Live(api) => api.create_camera(camera).await,
            ApiHandle::Demo(api) => api.create_camera(camera).await,
        }
    }

    async fn delete_camera(&self, name: &str) -> Result<(), ApiError> {
        match self {
            ApiHandle::Live(api) => api.delete_camera(name).await,
            ApiHandle::Demo(api) => api.delete_camera(name).await,
        }
    }

    async fn set_status(&self, name: &str, action: StatusAction) -> Result<(), ApiError> {
        match self {
            ApiHandle::Live(api) => api.set_status(name, action).await,
            ApiHandle::Demo(api) => api.set_status(name, action).await,
        }
    }

    async fn fetch_history(
        &self,
        camera: &str,
        amount: usize,
        offset: usize,
    ) -> Result<HistoryResponse, ApiError> {
        match self {
            ApiHandle::Live(api) => api.fetch_history(camera, amount, offset).await,
            ApiHandle::Demo(api) => api.fetch_history(camera, amount, offset).await,
        }
    }
}

// The send results are ignored on purpose: a closed channel only happens
// during shutdown, when the completion has nowhere left to go.

pub fn spawn_camera_list(api: &ApiHandle, tx: &UnboundedSender<ApiEvent>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(ApiEvent::Cameras(api.list_cameras().await));
    });
}

pub fn spawn_create(api: &ApiHandle, tx: &UnboundedSender<ApiEvent>, camera: NewCamera) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(ApiEvent::Created(api.create_camera(&camera).await));
    });
}

pub fn spawn_delete(api: &ApiHandle, tx: &UnboundedSender<ApiEvent>, name: String) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api.delete_camera(&name).await;
        let _ = tx.send(ApiEvent::Deleted { name, result });
    });
}

pub fn spawn_set_status(
    api: &ApiHandle,
    tx: &UnboundedSender<ApiEvent>,
    name: String,
    action: StatusAction,
) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api.set_status(&name, action).await;
        let _ = tx.send(ApiEvent::StatusSet { name, result });
    });
}

pub fn spawn_history(
    api: &ApiHandle,
    tx: &UnboundedSender<ApiEvent>,
    camera: String,
    request: HistoryRequest,
) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = api
            .fetch_history(&camera, request.amount, request.offset)
            .await;
        let _ = tx.send(ApiEvent::HistoryPage {
            seq: request.seq,
            result,
        });
    });
}
