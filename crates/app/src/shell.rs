//! Headless application shell.
//!
//! [`App`] plays the role of the browser plus router: it owns history, the
//! handoff table and the per-entry view state, and asks the session store and
//! the navigation guard what may be shown on every [`App::render`].

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use forsee_auth::{
    AuthError, DemoAuthenticator, FileStore, Role, RoleGate, SessionConfig, SessionState,
    SessionStore, StorageError, User,
};
use forsee_navigation::{
    GuardDecision, HandoffTable, LOGIN_PATH, Location, NavigateOptions, Navigator, Route, guard,
};
use forsee_prediction::{
    DeviceRegistry, MonitoringOutcome, OutputView, PredictionPayload, SensorForm, catalog,
    profile_or_default,
};

use crate::config::AppConfig;
use crate::flow::PredictionFlow;
use crate::notice::Notice;
use crate::screen::{CatalogEntry, Frame, Screen};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("current view has no sensor inputs")]
    NotOnInputView,

    #[error("current view shows no prediction results")]
    NoResults,

    #[error("sign in to use this view")]
    NotAuthorized,

    #[error("choose a role before continuing")]
    RoleSelectionRequired,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Sensor form of the input view currently on screen.
#[derive(Debug)]
struct InputState {
    slug: String,
    form: SensorForm,
}

#[derive(Debug)]
pub struct App {
    session: SessionStore,
    navigator: Navigator,
    handoffs: HandoffTable<PredictionPayload>,
    devices: DeviceRegistry,
    role_gate: RoleGate,
    notices: Vec<Notice>,
    flow: PredictionFlow,
    /// Results consumed from the handoff, kept for the life of the entry.
    results: Option<OutputView>,
    input: Option<InputState>,
}

impl App {
    /// Start at `/` with an already-constructed session store.
    pub fn new(session: SessionStore, flow: PredictionFlow) -> Self {
        Self {
            session,
            navigator: Navigator::new("/"),
            handoffs: HandoffTable::new(),
            devices: DeviceRegistry::new(),
            role_gate: RoleGate::new(),
            notices: Vec::new(),
            flow,
            results: None,
            input: None,
        }
    }

    /// Open the file-backed store named by `config` and hydrate the session.
    ///
    /// A storage file that is not valid JSON is discarded and recreated.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store = match FileStore::open(&config.storage_path) {
            Ok(store) => store,
            Err(err @ StorageError::Parse { .. }) => {
                tracing::warn!(
                    path = %config.storage_path.display(),
                    error = %err,
                    "discarding unreadable storage file"
                );
                std::fs::remove_file(&config.storage_path).map_err(StorageError::from)?;
                FileStore::open(&config.storage_path)?
            }
            Err(err) => return Err(err.into()),
        };

        let session = SessionStore::open(
            Arc::new(store),
            Arc::new(DemoAuthenticator::new()),
            SessionConfig {
                auth_latency: config.auth_latency,
            },
        );
        let flow = PredictionFlow {
            handshake_delay: config.handshake_delay,
            thinking_delay: config.thinking_delay,
        };
        Ok(Self::new(session, flow))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Handoffs attached but not yet consumed.
    pub fn pending_handoffs(&self) -> usize {
        self.handoffs.len()
    }

    /// Resolve the current location into a frame.
    ///
    /// Guard redirects are applied to history (replacing the guarded entry)
    /// before the frame is built. Queued notices are drained into the frame.
    pub fn render(&mut self) -> Frame {
        let state = self.session.snapshot();

        let decision = guard(&state, self.navigator.current());
        let screen = match decision {
            GuardDecision::Loading => Screen::Loading,
            GuardDecision::Redirect(redirect) => {
                self.go(&redirect.to, NavigateOptions::replace().with_from(redirect.from));
                self.screen_for(&state)
            }
            GuardDecision::Render => self.screen_for(&state),
        };

        let location = self.navigator.current();
        Frame {
            path: location.path.clone(),
            nav_visible: !location.route().hides_nav(),
            screen,
            role_gate: self.role_gate.view(&state),
            notices: std::mem::take(&mut self.notices),
        }
    }

    /// Push `path` onto history.
    pub fn open(&mut self, path: &str) {
        self.go(path, NavigateOptions::default());
    }

    pub fn back(&mut self) -> bool {
        let moved = self.navigator.back();
        if moved {
            self.reset_entry_state();
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.navigator.forward();
        if moved {
            self.reset_entry_state();
        }
        moved
    }

    /// Same path, transition-scoped state gone: results fall back to demo.
    pub fn reload(&mut self) {
        self.navigator.reload();
        self.reset_entry_state();
    }

    /// Sign in and resume at the location the guard interrupted, if any.
    pub async fn sign_in(&mut self, email: &str, credential: &str) -> Result<User, AppError> {
        let resume = self.navigator.current().resume_target().to_string();
        let result = self.session.sign_in(email, credential).await;
        self.settle_auth(result, &resume)
    }

    /// Create an account and land on the home view.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        credential: &str,
    ) -> Result<User, AppError> {
        let result = self.session.sign_up(name, email, credential).await;
        self.settle_auth(result, "/")
    }

    pub async fn sign_in_with_federated_provider(&mut self) -> Result<User, AppError> {
        let resume = self.navigator.current().resume_target().to_string();
        let result = self.session.sign_in_with_federated_provider().await;
        self.settle_auth(result, &resume)
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.role_gate = RoleGate::new();
        self.go(LOGIN_PATH, NavigateOptions::default());
    }

    pub fn select_role(&mut self, role: Role) {
        self.role_gate.select(role);
    }

    pub fn confirm_role(&mut self) -> Option<Role> {
        self.role_gate.confirm(&self.session)
    }

    /// Edit one sensor value on the input view.
    pub fn set_sensor(&mut self, sensor_id: &str, value: &str) -> Result<(), AppError> {
        self.input_slug().ok_or(AppError::NotOnInputView)?;
        self.require_interactive()?;
        let input = self.mount_input().ok_or(AppError::NotOnInputView)?;
        input.form.set(sensor_id, value);
        Ok(())
    }

    /// Run the prediction for the input view on screen and move to the
    /// results view with the payload attached to that transition.
    pub async fn run_prediction(&mut self) -> Result<(), AppError> {
        self.input_slug().ok_or(AppError::NotOnInputView)?;
        self.require_interactive()?;
        let (slug, form) = {
            let input = self.mount_input().ok_or(AppError::NotOnInputView)?;
            (input.slug.clone(), input.form.clone())
        };
        let profile = profile_or_default(&slug);

        let payload = self.flow.run(&slug, profile, &form).await;
        tracing::info!(
            system = %slug,
            health_index = payload.result.health_index,
            risk = %payload.result.risk_level,
            "prediction complete"
        );

        let transition = self.handoffs.attach(payload);
        self.go(
            "/output-preview",
            NavigateOptions::default().with_transition(transition),
        );
        Ok(())
    }

    /// "Add to monitoring" on the results view.
    pub fn add_to_monitoring(&mut self) -> Result<MonitoringOutcome, AppError> {
        if !self.on_results() {
            return Err(AppError::NoResults);
        }
        self.require_interactive()?;
        self.mount_results();
        let view = self.results.as_ref().ok_or(AppError::NoResults)?;
        let outcome = view.add_to_monitoring(&mut self.devices, Utc::now());

        match &outcome {
            MonitoringOutcome::Skipped { notice } => {
                self.notices.push(Notice::info("Demo Mode", notice.clone()));
            }
            MonitoringOutcome::Registered { device, redirect } => {
                self.notices.push(Notice::success(
                    "Added to monitoring",
                    format!("{} is now on your dashboard.", device.name),
                ));
                let redirect = redirect.clone();
                self.open(&redirect);
            }
        }
        Ok(outcome)
    }

    /// Actions on a view need the same access the guard grants for rendering
    /// it, and nothing under an open role gate responds.
    fn require_interactive(&self) -> Result<(), AppError> {
        let state = self.session.snapshot();
        if guard(&state, self.navigator.current()) != GuardDecision::Render {
            tracing::debug!(path = %self.navigator.current().path, "action refused by guard");
            return Err(AppError::NotAuthorized);
        }
        if RoleGate::is_visible(&state) {
            tracing::debug!("action refused while role gate is open");
            return Err(AppError::RoleSelectionRequired);
        }
        Ok(())
    }

    fn settle_auth(
        &mut self,
        result: Result<User, AuthError>,
        next: &str,
    ) -> Result<User, AppError> {
        match result {
            Ok(user) => {
                self.go(next, NavigateOptions::replace());
                Ok(user)
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    fn go(&mut self, path: &str, options: NavigateOptions) {
        self.navigator.navigate(path, options);
        self.reset_entry_state();
    }

    /// Per-entry view state does not survive leaving the entry. Handoffs for
    /// any transition other than the current one can never be consumed.
    fn reset_entry_state(&mut self) {
        self.results = None;
        self.input = None;
        self.handoffs
            .retain_only(self.navigator.current().transition);
    }

    fn input_slug(&self) -> Option<String> {
        match self.navigator.current().route() {
            Route::SystemDetail { slug } => Some(slug),
            Route::LegacyAsset { slug } => Some(slug.to_string()),
            _ => None,
        }
    }

    fn mount_input(&mut self) -> Option<&mut InputState> {
        let slug = self.input_slug()?;
        if self.input.as_ref().is_none_or(|input| input.slug != slug) {
            let form = SensorForm::for_profile(profile_or_default(&slug));
            self.input = Some(InputState { slug, form });
        }
        self.input.as_mut()
    }

    fn on_results(&self) -> bool {
        matches!(
            self.navigator.current().route(),
            Route::OutputPreview | Route::SystemPrediction { .. }
        )
    }

    /// Take the handoff once per entry; later renders reuse the view.
    fn mount_results(&mut self) {
        if !self.on_results() || self.results.is_some() {
            return;
        }
        let transition = self.navigator.current().transition;
        let payload = transition.and_then(|id| self.handoffs.take(id));
        self.results = Some(OutputView::from_handoff(payload));
    }

    fn screen_for(&mut self, state: &SessionState) -> Screen {
        let location = self.navigator.current();
        match location.route() {
            Route::Login => Screen::Login {
                resume_to: location.resume_target().to_string(),
            },
            Route::Signup => Screen::Signup,
            Route::Legal => Screen::Legal,
            Route::Home => Screen::Home {
                greeting: match &state.user {
                    Some(user) => format!("Welcome back, {}", user.name),
                    None => "Welcome".to_string(),
                },
            },
            Route::Systems => Screen::Catalog {
                systems: catalog()
                    .iter()
                    .map(|p| CatalogEntry {
                        slug: p.id,
                        title: p.title,
                        description: p.description,
                        href: format!("/system/{}", p.id),
                    })
                    .collect(),
            },
            Route::SystemDetail { .. } | Route::LegacyAsset { .. } => {
                let path = location.path.clone();
                match self.mount_input() {
                    Some(input) => Screen::SystemInput {
                        profile: profile_or_default(&input.slug),
                        slug: input.slug.clone(),
                        values: input.form.to_map(),
                    },
                    None => Screen::NotFound { path },
                }
            }
            Route::OutputPreview | Route::SystemPrediction { .. } => {
                self.mount_results();
                let view = self.results.clone().unwrap_or_else(OutputView::demo);
                Screen::Results {
                    disclosure: view.disclosure(),
                    view,
                }
            }
            Route::Dashboard => Screen::Dashboard {
                devices: self.devices.devices().to_vec(),
            },
            Route::Chatbot => Screen::Chatbot,
            Route::Pricing => Screen::Pricing,
            Route::NotFound { path } => Screen::NotFound { path },
        }
    }
}

#[cfg(test)]
mod tests {
    use forsee_auth::{KeyValueStore, MemoryStore, ROLE_KEY, USER_KEY};

    use super::*;

    fn app_with(storage: Arc<MemoryStore>) -> App {
        let session = SessionStore::open(
            storage,
            Arc::new(DemoAuthenticator::new()),
            SessionConfig {
                auth_latency: std::time::Duration::ZERO,
            },
        );
        App::new(session, PredictionFlow::instant())
    }

    fn app() -> App {
        app_with(Arc::new(MemoryStore::new()))
    }

    /// Signed in with a committed role, so the role gate is closed.
    async fn engineer_app() -> App {
        let mut app = app();
        app.sign_in("ada@forsee.ai", "pw").await.unwrap();
        app.select_role(Role::Engineer);
        app.confirm_role();
        app
    }

    #[test]
    fn guarded_entry_is_replaced_by_login() {
        let mut app = app();
        app.open("/pricing");

        let frame = app.render();

        assert_eq!(frame.path, LOGIN_PATH);
        assert_eq!(
            frame.screen,
            Screen::Login {
                resume_to: "/pricing".into()
            }
        );
        assert!(!frame.nav_visible);
        // The guarded entry was replaced, so back lands on the first entry.
        assert!(app.back());
        assert!(!app.back());
    }

    #[test]
    fn public_routes_render_without_a_session() {
        let mut app = app();
        app.open("/legal");
        let frame = app.render();
        assert_eq!(frame.screen, Screen::Legal);
        assert!(frame.nav_visible);
        assert!(frame.role_gate.is_none());
    }

    #[tokio::test]
    async fn role_gate_overlays_until_confirmed() {
        let mut app = app();
        app.sign_in("ada@forsee.ai", "pw").await.unwrap();

        let frame = app.render();
        let gate = frame.role_gate.expect("gate open for roleless user");
        assert_eq!(gate.greeting, "Welcome, ada");
        assert!(!gate.confirm_enabled);
        assert_eq!(app.confirm_role(), None);

        app.select_role(Role::Engineer);
        assert_eq!(app.confirm_role(), Some(Role::Engineer));
        assert!(app.render().role_gate.is_none());
        assert_eq!(app.session().role(), Some(Role::Engineer));
    }

    #[tokio::test]
    async fn failed_federated_sign_in_surfaces_a_notice() {
        let session = SessionStore::open(
            Arc::new(MemoryStore::new()),
            Arc::new(DemoAuthenticator::with_federated_outage()),
            SessionConfig {
                auth_latency: std::time::Duration::ZERO,
            },
        );
        let mut app = App::new(session, PredictionFlow::instant());
        app.open(LOGIN_PATH);

        let err = app.sign_in_with_federated_provider().await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::FederatedAuthFailed(_))));

        let frame = app.render();
        assert_eq!(frame.path, LOGIN_PATH);
        assert_eq!(frame.notices.len(), 1);
        assert_eq!(frame.notices[0].level, crate::NoticeLevel::Error);
        // Drained once shown.
        assert!(app.render().notices.is_empty());
    }

    #[tokio::test]
    async fn sign_up_lands_on_home() {
        let mut app = app();
        app.open("/signup");
        app.sign_up("Grace", "grace@forsee.ai", "pw").await.unwrap();
        let frame = app.render();
        assert_eq!(frame.path, "/");
        assert_eq!(
            frame.screen,
            Screen::Home {
                greeting: "Welcome back, Grace".into()
            }
        );
    }

    #[tokio::test]
    async fn sensor_edits_require_an_input_view() {
        let mut app = engineer_app().await;
        app.open("/dashboard");
        assert!(matches!(
            app.set_sensor("oilTemp", "10"),
            Err(AppError::NotOnInputView)
        ));

        app.open("/system/power-transformers");
        app.set_sensor("oilTemp", "10").unwrap();
        match app.render().screen {
            Screen::SystemInput { values, slug, .. } => {
                assert_eq!(slug, "power-transformers");
                assert_eq!(values.get("oilTemp").map(String::as_str), Some("10"));
            }
            other => panic!("expected input view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn legacy_alias_renders_the_input_view() {
        let mut app = engineer_app().await;
        app.open("/bridges");
        match app.render().screen {
            Screen::SystemInput { slug, profile, .. } => {
                assert_eq!(slug, "bridges");
                assert_eq!(profile.id, "bridges");
            }
            other => panic!("expected input view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn results_survive_rerender_but_not_reload() {
        let mut app = engineer_app().await;
        app.open("/system/servers");
        app.run_prediction().await.unwrap();
        assert_eq!(app.pending_handoffs(), 1);

        let first = app.render();
        assert_eq!(app.pending_handoffs(), 0);
        let second = app.render();
        assert_eq!(first.screen, second.screen);
        match &second.screen {
            Screen::Results { view, disclosure } => {
                assert!(!view.is_demo);
                assert_eq!(view.system_info.id, "servers");
                assert!(disclosure.is_none());
            }
            other => panic!("expected results, got {other:?}"),
        }

        app.reload();
        match app.render().screen {
            Screen::Results { view, disclosure } => {
                assert!(view.is_demo);
                assert!(disclosure.is_some());
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn returning_to_results_through_history_shows_demo() {
        let mut app = engineer_app().await;
        app.open("/system/servers");
        app.run_prediction().await.unwrap();
        app.render();

        assert!(app.back());
        assert_eq!(app.location().path, "/system/servers");
        assert!(app.forward());
        match app.render().screen {
            Screen::Results { view, .. } => assert!(view.is_demo),
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn leaving_before_mount_discards_the_handoff() {
        let mut app = engineer_app().await;
        app.open("/system/servers");
        app.run_prediction().await.unwrap();
        app.open("/pricing");
        assert_eq!(app.pending_handoffs(), 0);
    }

    #[tokio::test]
    async fn adding_live_results_registers_a_device() {
        let mut app = engineer_app().await;
        app.open("/system/hvac-systems");
        app.run_prediction().await.unwrap();

        let outcome = app.add_to_monitoring().unwrap();
        assert!(matches!(outcome, MonitoringOutcome::Registered { .. }));
        let frame = app.render();
        assert_eq!(frame.path, "/dashboard");
        match frame.screen {
            Screen::Dashboard { devices } => {
                assert_eq!(devices.len(), 1);
                assert!(devices[0].id.starts_with("hvac-systems-"));
            }
            other => panic!("expected dashboard, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn adding_demo_results_only_explains() {
        let mut app = engineer_app().await;
        app.open("/output-preview");

        let outcome = app.add_to_monitoring().unwrap();
        assert!(matches!(outcome, MonitoringOutcome::Skipped { .. }));
        assert!(app.devices().is_empty());

        let frame = app.render();
        assert_eq!(frame.path, "/output-preview");
        assert_eq!(frame.notices[0].level, crate::NoticeLevel::Info);
    }

    #[tokio::test]
    async fn unknown_slug_keeps_its_own_id() {
        let mut app = engineer_app().await;
        app.open("/system/gas-compressor");
        app.run_prediction().await.unwrap();

        match app.render().screen {
            Screen::Results { view, .. } => {
                assert_eq!(view.system_info.id, "gas-compressor");
                assert_eq!(view.system_info.name, "Wind Turbine");
            }
            other => panic!("expected results, got {other:?}"),
        }
        match app.add_to_monitoring().unwrap() {
            MonitoringOutcome::Registered { device, .. } => {
                assert!(device.id.starts_with("gas-compressor-"));
            }
            other => panic!("expected registration, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signed_out_actions_are_refused() {
        let mut app = app();
        app.open("/system/servers");
        assert!(matches!(
            app.set_sensor("cpuTemp", "99"),
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            app.run_prediction().await,
            Err(AppError::NotAuthorized)
        ));
        assert_eq!(app.pending_handoffs(), 0);

        app.open("/output-preview");
        assert!(matches!(
            app.add_to_monitoring(),
            Err(AppError::NotAuthorized)
        ));
        assert!(app.devices().is_empty());
    }

    #[tokio::test]
    async fn open_role_gate_makes_the_view_inert() {
        let mut app = app();
        app.sign_in("ada@forsee.ai", "pw").await.unwrap();
        app.open("/system/servers");

        assert!(matches!(
            app.set_sensor("cpuTemp", "99"),
            Err(AppError::RoleSelectionRequired)
        ));
        assert!(matches!(
            app.run_prediction().await,
            Err(AppError::RoleSelectionRequired)
        ));
        assert_eq!(app.location().path, "/system/servers");

        app.open("/output-preview");
        assert!(matches!(
            app.add_to_monitoring(),
            Err(AppError::RoleSelectionRequired)
        ));

        app.select_role(Role::Admin);
        assert_eq!(app.confirm_role(), Some(Role::Admin));
        assert!(app.add_to_monitoring().is_ok());
    }

    #[tokio::test]
    async fn confirm_cannot_replace_a_committed_role() {
        let mut app = engineer_app().await;
        app.select_role(Role::Admin);
        assert_eq!(app.confirm_role(), None);
        assert_eq!(app.session().role(), Some(Role::Engineer));
    }

    #[test]
    fn add_to_monitoring_needs_a_results_view() {
        let mut app = app();
        assert!(matches!(app.add_to_monitoring(), Err(AppError::NoResults)));
    }

    #[tokio::test]
    async fn sign_out_clears_storage_and_returns_to_login() {
        let storage = Arc::new(MemoryStore::new());
        let mut app = app_with(storage.clone());
        app.sign_in("ada@forsee.ai", "pw").await.unwrap();
        app.select_role(Role::Viewer);
        app.confirm_role();
        assert!(storage.get(USER_KEY).unwrap().is_some());

        app.sign_out();

        assert!(storage.get(USER_KEY).unwrap().is_none());
        assert!(storage.get(ROLE_KEY).unwrap().is_none());
        assert_eq!(app.render().path, LOGIN_PATH);
    }
}
