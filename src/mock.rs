//! In-process backend for demo mode.
//!
//! Serves the same operations as the live REST backend from memory, with a
//! little artificial latency, so the dashboard can be exercised without a
//! server. History pages are generated deterministically per camera name.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::api::ApiError;
use crate::types::{Camera, HistoryResponse, HistorySample, NewCamera, StatusAction};

const LATENCY: Duration = Duration::from_millis(120);

// Fixed reference instant so generated pages are stable across fetches.
const BASE_TIME_MS: i64 = 1_700_000_000_000;
const SAMPLE_INTERVAL_MS: i64 = 300_000;
const TOTAL_SAMPLES: usize = 137;

pub struct MockApi {
    cameras: Mutex<Vec<Camera>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::with_cameras(vec![
            seed_camera("entrance-hall", "10.0.10.11", true),
            seed_camera("cafeteria", "10.0.10.12", true),
            seed_camera("lecture-room-2", "10.0.10.13", false),
        ])
    }

    pub fn with_cameras(cameras: Vec<Camera>) -> Self {
        Self {
            cameras: Mutex::new(cameras),
        }
    }

    pub async fn list_cameras(&self) -> Result<Vec<Camera>, ApiError> {
        tokio::time::sleep(LATENCY).await;
        Ok(self.cameras.lock().await.clone())
    }

    pub async fn create_camera(&self, camera: &NewCamera) -> Result<(), ApiError> {
        tokio::time::sleep(LATENCY).await;
        let mut cameras = self.cameras.lock().await;
        if cameras.iter().any(|c| c.name == camera.name) {
            return Err(ApiError::Conflict {
                name: camera.name.clone(),
            });
        }
        cameras.push(Camera {
            name: camera.name.clone(),
            cam_ip: camera.cam_ip.clone(),
            vps_ip: camera.vps_ip.clone(),
            is_online: false,
        });
        Ok(())
    }

    pub async fn delete_camera(&self, name: &str) -> Result<(), ApiError> {
        tokio::time::sleep(LATENCY).await;
        let mut cameras = self.cameras.lock().await;
        let before = cameras.len();
        cameras.retain(|c| c.name != name);
        if cameras.len() == before {
            return Err(ApiError::UnexpectedStatus(StatusCode::NOT_FOUND));
        }
        Ok(())
    }

    pub async fn set_status(&self, name: &str, action: StatusAction) -> Result<(), ApiError> {
        tokio::time::sleep(LATENCY).await;
        let mut cameras = self.cameras.lock().await;
        match cameras.iter_mut().find(|c| c.name == name) {
            Some(camera) => {
                camera.is_online = matches!(action, StatusAction::Connect);
                Ok(())
            }
            None => Err(ApiError::UnexpectedStatus(StatusCode::NOT_FOUND)),
        }
    }

    pub async fn fetch_history(
        &self,
        camera: &str,
        amount: usize,
        offset: usize,
    ) -> Result<HistoryResponse, ApiError> {
        tokio::time::sleep(LATENCY).await;
        let cameras = self.cameras.lock().await;
        let Some(found) = cameras.iter().find(|c| c.name == camera) else {
            return Err(ApiError::UnexpectedStatus(StatusCode::NOT_FOUND));
        };

        Ok(HistoryResponse {
            status: found.is_online,
            history: generate_page(camera, amount, offset),
        })
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_camera(name: &str, cam_ip: &str, is_online: bool) -> Camera {
    Camera {
        name: name.to_string(),
        cam_ip: cam_ip.to_string(),
        vps_ip: "10.0.0.1".to_string(),
        is_online,
    }
}

/// One page of a camera's fixed pseudo-random series, newest first, in the
/// same `amount`/`offset` window the real backend serves. Offsets past the
/// end produce an empty page, matching the live behavior for out-of-range
/// page indexes.
fn generate_page(camera: &str, amount: usize, offset: usize) -> Vec<HistorySample> {
    let mut rng = StdRng::seed_from_u64(name_seed(camera));
    let mut level: i64 = rng.gen_range(5..25);

    let mut series = Vec::with_capacity(TOTAL_SAMPLES);
    for i in 0..TOTAL_SAMPLES {
        level = (level + rng.gen_range(-4..=4)).clamp(0, 40);
        series.push(HistorySample {
            time: BASE_TIME_MS - (i as i64) * SAMPLE_INTERVAL_MS,
            amount: level as u64,
        });
    }

    series.into_iter().skip(offset).take(amount).collect()
}

fn name_seed(name: &str) -> u64 {
    // FNV-1a keeps the series stable across runs and platforms.
    name.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
