//! Dashboard state and event handling.
//!
//! Three screens: the camera list, the registration form, and one camera's
//! history. Each screen owns its state exclusively; the only writers are
//! the key handler and [`App::apply_event`], both called from the draw
//! loop. Navigation is an explicit screen swap performed right here, never
//! reached through some shared router handle.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::fetch::{
    spawn_camera_list, spawn_create, spawn_delete, spawn_history, spawn_set_status, ApiEvent,
    ApiHandle,
};
use crate::pager::HistoryPager;
use crate::types::{Camera, HistorySample, NewCamera, StatusAction};

pub struct ListScreen {
    pub cameras: Vec<Camera>,
    pub selected: usize,
    pub loading: bool,
    pub alert: Option<String>,
    /// Camera currently switching state, with the requested action. While
    /// set, further toggles are ignored and the row shows a transitional
    /// badge instead of its last reported state.
    pub pending_status: Option<(String, StatusAction)>,
    pub pending_delete: Option<String>,
}

impl ListScreen {
    fn new() -> Self {
        Self {
            cameras: Vec::new(),
            selected: 0,
            loading: true,
            alert: None,
            pending_status: None,
            pending_delete: None,
        }
    }

    pub fn selected_camera(&self) -> Option<&Camera> {
        self.cameras.get(self.selected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    CamIp,
    VpsIp,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Camera name",
            Field::CamIp => "Camera IP",
            Field::VpsIp => "VPS IP",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Name => Field::CamIp,
            Field::CamIp => Field::VpsIp,
            Field::VpsIp => Field::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Name => Field::VpsIp,
            Field::CamIp => Field::Name,
            Field::VpsIp => Field::CamIp,
        }
    }
}

pub struct CreateScreen {
    pub name: String,
    pub cam_ip: String,
    pub vps_ip: String,
    pub focus: Field,
    pub sending: bool,
    pub alert: Option<String>,
}

impl CreateScreen {
    fn new() -> Self {
        Self {
            name: String::new(),
            cam_ip: String::new(),
            vps_ip: String::new(),
            focus: Field::Name,
            sending: false,
            alert: None,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::CamIp => &self.cam_ip,
            Field::VpsIp => &self.vps_ip,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::CamIp => &mut self.cam_ip,
            Field::VpsIp => &mut self.vps_ip,
        }
    }
}

pub struct HistoryScreen {
    pub camera: String,
    pub pager: HistoryPager,
    /// Online state as reported by the latest applied history response.
    pub online: Option<bool>,
    pub samples: Vec<HistorySample>,
    pub loading: bool,
    pub alert: Option<String>,
}

pub enum Screen {
    List(ListScreen),
    Create(CreateScreen),
    History(HistoryScreen),
}

pub struct App {
    pub screen: Screen,
    api: ApiHandle,
    tx: UnboundedSender<ApiEvent>,
    default_page_size: usize,
}

impl App {
    /// Starts on the camera list with its first fetch already in flight.
    pub fn new(api: ApiHandle, tx: UnboundedSender<ApiEvent>, default_page_size: usize) -> Self {
        let app = Self {
            screen: Screen::List(ListScreen::new()),
            api,
            tx,
            default_page_size,
        };
        spawn_camera_list(&app.api, &app.tx);
        app
    }

    /// Handles one key press. Returns true when the dashboard should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match &mut self.screen {
            Screen::List(_) => self.handle_list_key(key),
            Screen::Create(_) => self.handle_create_key(key),
            Screen::History(_) => self.handle_history_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        let Screen::List(list) = &mut self.screen else {
            return false;
        };

        if list.loading {
            // The list blocks on its fetch; only leaving is allowed.
            return matches!(key.code, KeyCode::Char('q'));
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                list.selected = list.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if list.selected + 1 < list.cameras.len() {
                    list.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(camera) = list.selected_camera() {
                    let name = camera.name.clone();
                    let online = camera.is_online;
                    self.open_history(name, Some(online));
                }
            }
            KeyCode::Char('a') => {
                self.screen = Screen::Create(CreateScreen::new());
            }
            KeyCode::Char('r') => {
                list.loading = true;
                list.alert = None;
                spawn_camera_list(&self.api, &self.tx);
            }
            KeyCode::Char('d') => {
                if list.pending_delete.is_none() {
                    if let Some(camera) = list.selected_camera() {
                        let name = camera.name.clone();
                        list.pending_delete = Some(name.clone());
                        list.alert = None;
                        spawn_delete(&self.api, &self.tx, name);
                    }
                }
            }
            KeyCode::Char('t') => {
                if list.pending_status.is_none() {
                    if let Some(camera) = list.selected_camera() {
                        let action = StatusAction::toggle_for(camera);
                        let name = camera.name.clone();
                        list.pending_status = Some((name.clone(), action));
                        list.alert = None;
                        spawn_set_status(&self.api, &self.tx, name, action);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn handle_create_key(&mut self, key: KeyEvent) -> bool {
        let Screen::Create(form) = &mut self.screen else {
            return false;
        };

        if form.sending {
            // Inputs and submit are disabled while the request is out.
            return false;
        }

        match key.code {
            KeyCode::Esc => self.go_to_list(),
            KeyCode::Tab => form.focus = form.focus.next(),
            KeyCode::BackTab => form.focus = form.focus.prev(),
            KeyCode::Enter => {
                form.sending = true;
                form.alert = None;
                let camera = NewCamera {
                    name: form.name.clone(),
                    vps_ip: form.vps_ip.clone(),
                    cam_ip: form.cam_ip.clone(),
                };
                spawn_create(&self.api, &self.tx, camera);
            }
            KeyCode::Backspace => {
                form.field_mut(form.focus).pop();
            }
            KeyCode::Char(c) => {
                form.field_mut(form.focus).push(c);
            }
            _ => {}
        }
        false
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> bool {
        let Screen::History(history) = &mut self.screen else {
            return false;
        };

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.go_to_list(),
            KeyCode::Left => {
                if history.pager.page_index() > 0 {
                    history.pager.prev_page();
                    Self::refetch_history(history, &self.api, &self.tx);
                }
            }
            KeyCode::Right => {
                history.pager.next_page();
                Self::refetch_history(history, &self.api, &self.tx);
            }
            KeyCode::Home => {
                if history.pager.page_index() > 0 {
                    history.pager.first_page();
                    Self::refetch_history(history, &self.api, &self.tx);
                }
            }
            KeyCode::Char('s') => {
                history.pager.cycle_page_size();
                Self::refetch_history(history, &self.api, &self.tx);
            }
            KeyCode::Char('r') => {
                Self::refetch_history(history, &self.api, &self.tx);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let window = history.pager.window();
                let slot = (c as usize) - ('1' as usize);
                if let Some(&page) = window.get(slot) {
                    if page != history.pager.page_index() {
                        history.pager.set_page_index(page);
                        Self::refetch_history(history, &self.api, &self.tx);
                    }
                }
            }
            _ => {}
        }
        false
    }

    /// Applies one completed API operation to whatever screen still wants
    /// it. Results for a screen the user has left, or for an overtaken
    /// history request, are dropped here.
    pub fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Cameras(result) => {
                let Screen::List(list) = &mut self.screen else {
                    debug!("camera list response dropped, list screen not active");
                    return;
                };
                list.loading = false;
                match result {
                    Ok(cameras) => {
                        list.selected = list.selected.min(cameras.len().saturating_sub(1));
                        list.cameras = cameras;
                        list.alert = None;
                    }
                    Err(err) => {
                        warn!(%err, "camera list fetch failed");
                        list.alert = Some(err.to_string());
                    }
                }
            }
            ApiEvent::Created(result) => {
                let Screen::Create(form) = &mut self.screen else {
                    debug!("create response dropped, form not active");
                    return;
                };
                match result {
                    Ok(()) => {
                        info!(name = %form.name, "camera registered");
                        self.go_to_list();
                    }
                    Err(err) => {
                        warn!(%err, "camera creation failed");
                        form.sending = false;
                        form.alert = Some(err.to_string());
                    }
                }
            }
            ApiEvent::Deleted { name, result } => {
                let Screen::List(list) = &mut self.screen else {
                    debug!(%name, "delete response dropped, list screen not active");
                    return;
                };
                if list.pending_delete.as_deref() != Some(name.as_str()) {
                    debug!(%name, "delete response dropped, no longer pending");
                    return;
                }
                list.pending_delete = None;
                match result {
                    Ok(()) => {
                        info!(%name, "camera deleted");
                        list.loading = true;
                        spawn_camera_list(&self.api, &self.tx);
                    }
                    Err(err) => {
                        warn!(%name, %err, "camera deletion failed");
                        list.alert = Some(err.to_string());
                    }
                }
            }
            ApiEvent::StatusSet { name, result } => {
                let Screen::List(list) = &mut self.screen else {
                    debug!(%name, "status response dropped, list screen not active");
                    return;
                };
                if list
                    .pending_status
                    .as_ref()
                    .map(|(pending, _)| pending.as_str())
                    != Some(name.as_str())
                {
                    debug!(%name, "status response dropped, no longer pending");
                    return;
                }
                list.pending_status = None;
                match result {
                    Ok(()) => {
                        info!(%name, "camera status changed");
                        list.loading = true;
                        spawn_camera_list(&self.api, &self.tx);
                    }
                    Err(err) => {
                        // The row never showed the new state, so the prior
                        // display simply stands.
                        warn!(%name, %err, "status change failed");
                        list.alert = Some(err.to_string());
                    }
                }
            }
            ApiEvent::HistoryPage { seq, result } => {
                let Screen::History(history) = &mut self.screen else {
                    debug!(seq, "history response dropped, history screen not active");
                    return;
                };
                if !history.pager.is_current(seq) {
                    debug!(seq, "stale history response discarded");
                    return;
                }
                history.loading = false;
                match result {
                    Ok(response) => {
                        history.online = Some(response.status);
                        history.samples = response.history;
                        history.alert = None;
                    }
                    Err(err) => {
                        warn!(camera = %history.camera, %err, "history fetch failed");
                        history.alert = Some(err.to_string());
                    }
                }
            }
        }
    }

    fn open_history(&mut self, camera: String, online: Option<bool>) {
        info!(%camera, "opening history");
        let mut history = HistoryScreen {
            camera,
            pager: HistoryPager::new(self.default_page_size),
            online,
            samples: Vec::new(),
            loading: false,
            alert: None,
        };
        Self::refetch_history(&mut history, &self.api, &self.tx);
        self.screen = Screen::History(history);
    }

    fn go_to_list(&mut self) {
        info!("returning to camera list");
        self.screen = Screen::List(ListScreen::new());
        spawn_camera_list(&self.api, &self.tx);
    }

    fn refetch_history(
        history: &mut HistoryScreen,
        api: &ApiHandle,
        tx: &UnboundedSender<ApiEvent>,
    ) {
        history.loading = true;
        let request = history.pager.next_request();
        debug!(
            camera = %history.camera,
            seq = request.seq,
            amount = request.amount,
            offset = request.offset,
            "issuing history fetch"
        );
        spawn_history(api, tx, history.camera.clone(), request);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;
    use crate::api::ApiError;
    use crate::fetch::ApiEvent;
    use crate::mock::MockApi;
    use crate::types::HistoryResponse;

    fn camera(name: &str, online: bool) -> Camera {
        Camera {
            name: name.to_string(),
            cam_ip: "10.0.0.2".to_string(),
            vps_ip: "10.0.0.1".to_string(),
            is_online: online,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn app_with_cameras(
        cameras: Vec<Camera>,
    ) -> (App, UnboundedReceiver<ApiEvent>) {
        let api = ApiHandle::Demo(Arc::new(MockApi::with_cameras(cameras)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(api, tx, 10);
        let event = rx.recv().await.expect("initial list fetch");
        app.apply_event(event);
        (app, rx)
    }

    fn list_names(app: &App) -> Vec<String> {
        match &app.screen {
            Screen::List(list) => list.cameras.iter().map(|c| c.name.clone()).collect(),
            _ => panic!("not on the list screen"),
        }
    }

    #[test]
    fn conflicting_create_stays_on_form_and_list_is_unchanged() {
        tokio_test::block_on(async {
            let (mut app, mut rx) =
                app_with_cameras(vec![camera("lobby", true), camera("cafeteria", false)]).await;

            app.handle_key(key(KeyCode::Char('a')));
            for c in "lobby".chars() {
                app.handle_key(key(KeyCode::Char(c)));
            }
            app.handle_key(key(KeyCode::Enter));

            let event = rx.recv().await.unwrap();
            app.apply_event(event);

            match &app.screen {
                Screen::Create(form) => {
                    assert!(!form.sending);
                    let alert = form.alert.as_deref().unwrap();
                    assert!(alert.contains("lobby"), "alert was {alert:?}");
                }
                _ => panic!("conflict must keep the form open"),
            }

            // Leaving the form re-fetches; the directory must not have
            // grown a duplicate.
            app.handle_key(key(KeyCode::Esc));
            let event = rx.recv().await.unwrap();
            app.apply_event(event);
            assert_eq!(list_names(&app), vec!["lobby", "cafeteria"]);
        });
    }

    #[test]
    fn delete_removes_exactly_the_selected_camera() {
        tokio_test::block_on(async {
            let (mut app, mut rx) = app_with_cameras(vec![
                camera("a", false),
                camera("b", false),
                camera("c", true),
            ])
            .await;

            app.handle_key(key(KeyCode::Down));
            app.handle_key(key(KeyCode::Char('d')));

            let event = rx.recv().await.unwrap();
            app.apply_event(event);
            let event = rx.recv().await.unwrap();
            app.apply_event(event);

            assert_eq!(list_names(&app), vec!["a", "c"]);
        });
    }

    #[test]
    fn failed_delete_surfaces_error_and_keeps_list() {
        tokio_test::block_on(async {
            let (mut app, _rx) = app_with_cameras(vec![camera("a", false)]).await;

            if let Screen::List(list) = &mut app.screen {
                list.pending_delete = Some("a".to_string());
            }
            app.apply_event(ApiEvent::Deleted {
                name: "a".to_string(),
                result: Err(ApiError::UnexpectedStatus(
                    StatusCode::INTERNAL_SERVER_ERROR,
                )),
            });

            match &app.screen {
                Screen::List(list) => {
                    assert!(list.pending_delete.is_none());
                    assert!(!list.loading, "failed delete must not trigger a reload");
                    assert_eq!(list.cameras.len(), 1);
                    assert!(list.alert.as_deref().unwrap().contains("500"));
                }
                _ => panic!("expected list screen"),
            }
        });
    }

    #[test]
    fn toggle_is_single_flight_until_resolution() {
        tokio_test::block_on(async {
            let (mut app, mut rx) = app_with_cameras(vec![camera("a", true)]).await;

            app.handle_key(key(KeyCode::Char('t')));
            app.handle_key(key(KeyCode::Char('t')));

            match &app.screen {
                Screen::List(list) => {
                    let (name, action) = list.pending_status.as_ref().unwrap();
                    assert_eq!(name, "a");
                    assert_eq!(*action, StatusAction::Disconnect);
                }
                _ => panic!("expected list screen"),
            }

            // Exactly one request went out; its completion clears the
            // pending marker and reloads the list with the new state.
            let event = rx.recv().await.unwrap();
            app.apply_event(event);
            let event = rx.recv().await.unwrap();
            app.apply_event(event);

            match &app.screen {
                Screen::List(list) => {
                    assert!(list.pending_status.is_none());
                    assert!(!list.cameras[0].is_online);
                    assert!(rx.try_recv().is_err(), "second toggle must not fetch");
                }
                _ => panic!("expected list screen"),
            }
        });
    }

    #[test]
    fn failed_toggle_reverts_to_prior_display() {
        tokio_test::block_on(async {
            let (mut app, _rx) = app_with_cameras(vec![camera("a", true)]).await;

            if let Screen::List(list) = &mut app.screen {
                list.pending_status = Some(("a".to_string(), StatusAction::Disconnect));
            }
            app.apply_event(ApiEvent::StatusSet {
                name: "a".to_string(),
                result: Err(ApiError::UnexpectedStatus(StatusCode::BAD_GATEWAY)),
            });

            match &app.screen {
                Screen::List(list) => {
                    assert!(list.pending_status.is_none());
                    assert!(list.cameras[0].is_online, "display reverts to reported state");
                    assert!(list.alert.is_some());
                }
                _ => panic!("expected list screen"),
            }
        });
    }

    #[test]
    fn stale_history_response_never_overwrites_newer_state() {
        tokio_test::block_on(async {
            let api = ApiHandle::Demo(Arc::new(MockApi::new()));
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut app = App::new(api, tx, 10);

            let mut pager = HistoryPager::new(10);
            let old = pager.next_request();
            let new = pager.next_request();
            app.screen = Screen::History(HistoryScreen {
                camera: "entrance-hall".to_string(),
                pager,
                online: None,
                samples: Vec::new(),
                loading: true,
                alert: None,
            });

            let newer_page = HistoryResponse {
                status: true,
                history: vec![HistorySample { time: 200, amount: 9 }],
            };
            let older_page = HistoryResponse {
                status: false,
                history: vec![HistorySample { time: 100, amount: 1 }],
            };

            // Newest-first arrival: the late old response is discarded.
            app.apply_event(ApiEvent::HistoryPage {
                seq: new.seq,
                result: Ok(newer_page.clone()),
            });
            app.apply_event(ApiEvent::HistoryPage {
                seq: old.seq,
                result: Ok(older_page.clone()),
            });

            match &app.screen {
                Screen::History(history) => {
                    assert_eq!(history.samples, newer_page.history);
                    assert_eq!(history.online, Some(true));
                    assert!(!history.loading);
                }
                _ => panic!("expected history screen"),
            }

            // Oldest-first arrival: the old response is equally stale.
            if let Screen::History(history) = &mut app.screen {
                history.samples.clear();
                history.loading = true;
            }
            app.apply_event(ApiEvent::HistoryPage {
                seq: old.seq,
                result: Ok(older_page),
            });
            match &app.screen {
                Screen::History(history) => {
                    assert!(history.samples.is_empty(), "stale page applied");
                    assert!(history.loading, "stale page must not clear loading");
                }
                _ => panic!("expected history screen"),
            }
            app.apply_event(ApiEvent::HistoryPage {
                seq: new.seq,
                result: Ok(newer_page.clone()),
            });
            match &app.screen {
                Screen::History(history) => {
                    assert_eq!(history.samples, newer_page.history);
                    assert!(!history.loading);
                }
                _ => panic!("expected history screen"),
            }
        });
    }

    #[test]
    fn history_response_for_departed_screen_is_dropped() {
        tokio_test::block_on(async {
            let (mut app, _rx) = app_with_cameras(vec![camera("a", true)]).await;

            app.apply_event(ApiEvent::HistoryPage {
                seq: 1,
                result: Ok(HistoryResponse {
                    status: true,
                    history: vec![HistorySample { time: 1, amount: 1 }],
                }),
            });

            assert!(matches!(app.screen, Screen::List(_)));
        });
    }

    #[test]
    fn page_keys_drive_the_pager_and_refetch() {
        tokio_test::block_on(async {
            let (mut app, mut rx) = app_with_cameras(vec![camera("entrance-hall", true)]).await;

            app.handle_key(key(KeyCode::Enter));
            assert!(matches!(app.screen, Screen::History(_)));

            app.handle_key(key(KeyCode::Right));
            app.handle_key(key(KeyCode::Right));
            app.handle_key(key(KeyCode::Left));
            if let Screen::History(history) = &app.screen {
                assert_eq!(history.pager.page_index(), 1);
                assert!(history.loading);
            }

            // Only the latest of the queued responses may land.
            loop {
                match tokio::time::timeout(std::time::Duration::from_millis(500), rx.recv()).await
                {
                    Ok(Some(event)) => {
                        app.apply_event(event);
                        if let Screen::History(history) = &app.screen {
                            if !history.loading {
                                break;
                            }
                        }
                    }
                    _ => break,
                }
            }

            if let Screen::History(history) = &app.screen {
                assert!(!history.loading);
                assert_eq!(history.samples.len(), 10);
            } else {
                panic!("expected history screen");
            }
        });
    }

    #[test]
    fn quit_keys() {
        tokio_test::block_on(async {
            let (mut app, _rx) = app_with_cameras(vec![camera("a", true)]).await;
            assert!(!app.handle_key(key(KeyCode::Char('x'))));
            assert!(app.handle_key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            )));
            assert!(app.handle_key(key(KeyCode::Char('q'))));
        });
    }
}
