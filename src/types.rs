use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// A registered occupancy meter. `name` is the primary key and is used
/// directly in request paths, so the backend requires it to be URL-safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub name: String,
    pub cam_ip: String,
    pub vps_ip: String,
    pub is_online: bool,
}

/// Request body for `POST /camera/new`. Field order matches the backend's
/// documented contract; the IPs are passed through unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCamera {
    pub name: String,
    pub vps_ip: String,
    pub cam_ip: String,
}

/// One (timestamp, occupancy count) observation.
///
/// `time` is milliseconds since the Unix epoch. That unit is part of the
/// wire contract with `GET /history/{id}` and is converted to a local
/// date-time in exactly one place, [`HistorySample::timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySample {
    pub time: i64,
    pub amount: u64,
}

impl HistorySample {
    /// Local wall-clock time of this sample, or `None` when `time` is
    /// outside the representable range.
    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.time).single()
    }
}

/// Response body of `GET /history/{id}`. `status` reports the camera's
/// current online state alongside the requested page of samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub status: bool,
    pub history: Vec<HistorySample>,
}

/// Connection state transition requested via `POST /camera/{name}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Connect,
    Disconnect,
}

impl StatusAction {
    /// The action that moves a camera out of its reported state.
    pub fn toggle_for(camera: &Camera) -> Self {
        if camera.is_online {
            StatusAction::Disconnect
        } else {
            StatusAction::Connect
        }
    }

    pub fn in_flight_label(&self) -> &'static str {
        match self {
            StatusAction::Connect => "connecting…",
            StatusAction::Disconnect => "disconnecting…",
        }
    }
}

/// Request body for the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub action: StatusAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_wire_format_round_trips() {
        let json = r#"{"name":"lobby","cam_ip":"10.0.0.4","vps_ip":"10.0.0.1","is_online":true}"#;
        let camera: Camera = serde_json::from_str(json).unwrap();
        assert_eq!(camera.name, "lobby");
        assert!(camera.is_online);

        let back = serde_json::to_string(&camera).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn status_action_serializes_lowercase() {
        let body = StatusRequest {
            action: StatusAction::Connect,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"action":"connect"}"#
        );

        let body = StatusRequest {
            action: StatusAction::Disconnect,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"action":"disconnect"}"#
        );
    }

    #[test]
    fn toggle_targets_the_opposite_state() {
        let mut camera = Camera {
            name: "hall".into(),
            cam_ip: "10.0.0.7".into(),
            vps_ip: "10.0.0.1".into(),
            is_online: true,
        };
        assert_eq!(StatusAction::toggle_for(&camera), StatusAction::Disconnect);
        camera.is_online = false;
        assert_eq!(StatusAction::toggle_for(&camera), StatusAction::Connect);
    }

    #[test]
    fn history_response_parses_documented_shape() {
        let json = r#"{"status":false,"history":[{"time":100,"amount":3},{"time":50,"amount":1}]}"#;
        let resp: HistoryResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.status);
        assert_eq!(resp.history.len(), 2);
        assert_eq!(resp.history[0], HistorySample { time: 100, amount: 3 });
    }

    #[test]
    fn timestamp_is_interpreted_as_epoch_milliseconds() {
        let sample = HistorySample {
            time: 1_700_000_000_000,
            amount: 2,
        };
        let dt = sample.timestamp().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn out_of_range_timestamp_is_none() {
        let sample = HistorySample {
            time: i64::MAX,
            amount: 0,
        };
        assert!(sample.timestamp().is_none());
    }
}
