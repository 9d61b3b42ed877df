use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use log::{error, info};
use thiserror::Error;

use crate::config::FormConfig;
use crate::lead::{ContactTime, Field, FieldErrors, LeadForm, LeadPayload, Objective};
use crate::phone::format_whatsapp;
use crate::redirect::{Navigator, RedirectTimer, Scheduler};

pub const SUBMIT_ERROR_MESSAGE: &str =
    "Erro ao processar sua inscrição. Por favor, tente novamente.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not encode lead: {0}")]
    Build(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("webhook answered with status {0}")]
    Status(u16),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormStatus {
    /// `error` is the banner left by a failed delivery.
    Editing { error: Option<String> },
    Submitting,
    Success,
}

impl Default for FormStatus {
    fn default() -> Self {
        FormStatus::Editing { error: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    Nome(String),
    Whatsapp(String),
    Email(String),
    Objetivo(Option<Objective>),
    Horario(Option<ContactTime>),
    LgpdConsent(bool),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadFormState {
    form: LeadForm,
    errors: FieldErrors,
    status: FormStatus,
}

impl LeadFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn banner(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Applies one keystroke/selection and clears that field's error.
    /// Ignored once the lead has gone through.
    pub fn update(&mut self, update: FieldUpdate) {
        if self.status == FormStatus::Success {
            return;
        }
        let field = match update {
            FieldUpdate::Nome(value) => {
                self.form.nome = value;
                Field::Nome
            }
            FieldUpdate::Whatsapp(value) => {
                self.form.whatsapp = format_whatsapp(&value);
                Field::Whatsapp
            }
            FieldUpdate::Email(value) => {
                self.form.email = value;
                return;
            }
            FieldUpdate::Objetivo(value) => {
                self.form.objetivo = value;
                Field::Objetivo
            }
            FieldUpdate::Horario(value) => {
                self.form.horario = value;
                Field::Horario
            }
            FieldUpdate::LgpdConsent(value) => {
                self.form.lgpd_consent = value;
                Field::LgpdConsent
            }
        };
        self.errors.clear(field);
    }

    /// Editing -> Submitting. Returns the payload to deliver, or `None`
    /// when validation failed or a submission is already in flight.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Option<LeadPayload> {
        if !matches!(self.status, FormStatus::Editing { .. }) {
            return None;
        }
        self.status = FormStatus::Editing { error: None };

        match self.form.to_payload(now) {
            Ok(payload) => {
                self.errors = FieldErrors::default();
                self.status = FormStatus::Submitting;
                Some(payload)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Submitting -> Success or back to Editing with the banner. Field
    /// values are untouched either way. Returns true on entering Success.
    pub fn finish(&mut self, result: Result<(), SubmitError>) -> bool {
        if self.status != FormStatus::Submitting {
            return false;
        }
        match result {
            Ok(()) => {
                self.status = FormStatus::Success;
                true
            }
            Err(e) => {
                error!("Erro ao enviar formulário: {}", e);
                self.status = FormStatus::Editing {
                    error: Some(SUBMIT_ERROR_MESSAGE.to_string()),
                };
                false
            }
        }
    }

    /// Settles a delivery result. Entering Success starts the redirect to
    /// the invite link; the caller owns the timer and dropping it cancels
    /// the navigation.
    pub fn on_delivered<S, N>(
        &mut self,
        result: Result<(), SubmitError>,
        scheduler: &S,
        navigator: N,
        config: &FormConfig,
    ) -> Option<RedirectTimer<S::Handle>>
    where
        S: Scheduler,
        N: Navigator + 'static,
    {
        if !self.finish(result) {
            return None;
        }
        info!("lead accepted, scheduling redirect");
        Some(RedirectTimer::start(
            scheduler,
            navigator,
            config.invite_link.clone(),
            config.redirect_delay_ms,
        ))
    }
}

/// Outbound POST of a lead as JSON.
#[allow(async_fn_in_trait)]
pub trait Webhook {
    async fn post_json(&self, url: &str, payload: &LeadPayload) -> Result<(), SubmitError>;
}

pub struct GlooWebhook;

impl Webhook for GlooWebhook {
    async fn post_json(&self, url: &str, payload: &LeadPayload) -> Result<(), SubmitError> {
        // .json() also sets Content-Type: application/json
        let request = Request::post(url)
            .json(payload)
            .map_err(|e| SubmitError::Build(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        if response.ok() {
            Ok(())
        } else {
            Err(SubmitError::Status(response.status()))
        }
    }
}

pub struct SubmissionController<W> {
    config: FormConfig,
    webhook: W,
}

impl<W: Webhook> SubmissionController<W> {
    pub fn new(config: FormConfig, webhook: W) -> Self {
        Self { config, webhook }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Single attempt, no retry. Without a webhook this is a no-op success.
    pub async fn deliver(&self, payload: &LeadPayload) -> Result<(), SubmitError> {
        let Some(url) = self.config.webhook_url.as_deref() else {
            info!("no webhook configured, skipping lead delivery");
            return Ok(());
        };
        self.webhook.post_json(url, payload).await?;
        info!("lead delivered to webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use futures::executor::block_on;

    use super::*;
    use crate::redirect::testing::{ManualScheduler, RecordingNavigator};

    const HOOK: &str = "https://hooks.example.com/lead";

    struct FakeWebhook {
        status: u16,
        calls: RefCell<Vec<(String, serde_json::Value)>>,
    }

    impl FakeWebhook {
        fn answering(status: u16) -> Self {
            Self { status, calls: RefCell::new(Vec::new()) }
        }
    }

    impl Webhook for &FakeWebhook {
        async fn post_json(&self, url: &str, payload: &LeadPayload) -> Result<(), SubmitError> {
            let body = serde_json::to_value(payload).map_err(|e| SubmitError::Build(e.to_string()))?;
            self.calls.borrow_mut().push((url.to_string(), body));
            if (200..300).contains(&self.status) {
                Ok(())
            } else {
                Err(SubmitError::Status(self.status))
            }
        }
    }

    struct UnreachableWebhook {
        hit: Cell<bool>,
    }

    impl Webhook for &UnreachableWebhook {
        async fn post_json(&self, _: &str, _: &LeadPayload) -> Result<(), SubmitError> {
            self.hit.set(true);
            Err(SubmitError::Network("offline".to_string()))
        }
    }

    fn ana(state: &mut LeadFormState) {
        state.update(FieldUpdate::Nome("Ana Silva".to_string()));
        state.update(FieldUpdate::Whatsapp("11987654321".to_string()));
        state.update(FieldUpdate::Objetivo(Some(Objective::Emagrecer)));
        state.update(FieldUpdate::Horario(Some(ContactTime::Manha)));
        state.update(FieldUpdate::LgpdConsent(true));
    }

    fn config(webhook: Option<&str>) -> FormConfig {
        FormConfig::new(webhook, Some("https://chat.whatsapp.com/abc"))
    }

    #[test]
    fn successful_webhook_reaches_success_and_schedules_redirect() {
        let hook = FakeWebhook::answering(200);
        let controller = SubmissionController::new(config(Some(HOOK)), &hook);
        let mut state = LeadFormState::new();
        ana(&mut state);
        assert_eq!(state.form().whatsapp, "(11) 98765-4321");

        let payload = state.begin_submit(Utc::now()).expect("valid form");
        assert_eq!(*state.status(), FormStatus::Submitting);

        let scheduler = ManualScheduler::default();
        let navigator = RecordingNavigator::default();
        let redirect = state.on_delivered(
            block_on(controller.deliver(&payload)),
            &scheduler,
            navigator.clone(),
            controller.config(),
        );
        assert!(redirect.is_some());
        assert_eq!(*state.status(), FormStatus::Success);
        assert_eq!(scheduler.delays(), vec![2_000]);
        assert!(navigator.visited.borrow().is_empty());

        let calls = hook.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (url, body) = &calls[0];
        assert_eq!(url, HOOK);
        assert_eq!(body["nome"], "Ana Silva");
        assert_eq!(body["whatsapp"], "11987654321");
        assert_eq!(body["email"], serde_json::Value::Null);
        assert_eq!(body["objetivo"], "emagrecer");
        assert_eq!(body["horario"], "manha");
        assert_eq!(body["lgpdConsent"], true);
        assert!(body["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));
        drop(calls);

        scheduler.run_pending();
        assert_eq!(*navigator.visited.borrow(), vec!["https://chat.whatsapp.com/abc".to_string()]);
    }

    #[test]
    fn error_status_keeps_values_and_shows_banner() {
        let hook = FakeWebhook::answering(500);
        let controller = SubmissionController::new(config(Some(HOOK)), &hook);
        let mut state = LeadFormState::new();
        ana(&mut state);
        let before = state.form().clone();

        let payload = state.begin_submit(Utc::now()).expect("valid form");
        let entered = state.finish(block_on(controller.deliver(&payload)));

        assert!(!entered);
        assert_eq!(state.banner(), Some(SUBMIT_ERROR_MESSAGE));
        assert_eq!(*state.form(), before);
        assert!(state.errors().is_empty());
        assert_eq!(hook.calls.borrow().len(), 1);
    }

    #[test]
    fn retry_after_failure_clears_banner_and_tries_again() {
        let hook = FakeWebhook::answering(503);
        let controller = SubmissionController::new(config(Some(HOOK)), &hook);
        let mut state = LeadFormState::new();
        ana(&mut state);

        let payload = state.begin_submit(Utc::now()).expect("valid form");
        state.finish(block_on(controller.deliver(&payload)));
        assert!(state.banner().is_some());

        let payload = state.begin_submit(Utc::now()).expect("still valid");
        assert_eq!(state.banner(), None);
        state.finish(block_on(controller.deliver(&payload)));
        assert_eq!(hook.calls.borrow().len(), 2);
    }

    #[test]
    fn no_webhook_succeeds_without_network() {
        let hook = UnreachableWebhook { hit: Cell::new(false) };
        let controller = SubmissionController::new(config(None), &hook);
        let mut state = LeadFormState::new();
        ana(&mut state);

        let payload = state.begin_submit(Utc::now()).expect("valid form");
        assert!(state.finish(block_on(controller.deliver(&payload))));
        assert_eq!(*state.status(), FormStatus::Success);
        assert!(!hook.hit.get());
    }

    #[test]
    fn network_failure_is_a_generic_error() {
        let hook = UnreachableWebhook { hit: Cell::new(false) };
        let controller = SubmissionController::new(config(Some(HOOK)), &hook);
        let mut state = LeadFormState::new();
        ana(&mut state);

        let payload = state.begin_submit(Utc::now()).expect("valid form");
        state.finish(block_on(controller.deliver(&payload)));
        assert!(hook.hit.get());
        assert_eq!(state.banner(), Some(SUBMIT_ERROR_MESSAGE));
    }

    #[test]
    fn missing_consent_blocks_submission() {
        let mut state = LeadFormState::new();
        ana(&mut state);
        state.update(FieldUpdate::LgpdConsent(false));

        assert!(state.begin_submit(Utc::now()).is_none());
        assert_eq!(state.status(), &FormStatus::Editing { error: None });
        assert_eq!(state.errors().fields().collect::<Vec<_>>(), vec![Field::LgpdConsent]);
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut state = LeadFormState::new();
        assert!(state.begin_submit(Utc::now()).is_none());
        assert_eq!(state.errors().fields().count(), 5);

        state.update(FieldUpdate::Nome("A".to_string()));
        assert!(state.errors().get(Field::Nome).is_none());
        assert_eq!(state.errors().fields().count(), 4);

        state.update(FieldUpdate::Email("a@b.c".to_string()));
        assert_eq!(state.errors().fields().count(), 4);
    }

    #[test]
    fn no_second_submission_while_in_flight() {
        let mut state = LeadFormState::new();
        ana(&mut state);
        assert!(state.begin_submit(Utc::now()).is_some());
        assert!(state.begin_submit(Utc::now()).is_none());
        assert_eq!(*state.status(), FormStatus::Submitting);
    }

    #[test]
    fn success_is_terminal() {
        let mut state = LeadFormState::new();
        ana(&mut state);
        state.begin_submit(Utc::now());
        state.finish(Ok(()));

        state.update(FieldUpdate::Nome("Outra".to_string()));
        assert_eq!(state.form().nome, "Ana Silva");
        assert!(state.begin_submit(Utc::now()).is_none());
        assert!(!state.finish(Err(SubmitError::Status(500))));
        assert_eq!(*state.status(), FormStatus::Success);
    }

    #[test]
    fn failed_delivery_schedules_no_redirect() {
        let cfg = config(Some(HOOK));
        let scheduler = ManualScheduler::default();
        let navigator = RecordingNavigator::default();
        let mut state = LeadFormState::new();
        ana(&mut state);
        state.begin_submit(Utc::now());

        let redirect =
            state.on_delivered(Err(SubmitError::Status(500)), &scheduler, navigator.clone(), &cfg);
        assert!(redirect.is_none());
        assert!(scheduler.delays().is_empty());
        assert_eq!(state.banner(), Some(SUBMIT_ERROR_MESSAGE));

        // a second result for the same attempt is stray
        let redirect = state.on_delivered(Ok(()), &scheduler, navigator.clone(), &cfg);
        assert!(redirect.is_none());
        assert!(scheduler.delays().is_empty());
        scheduler.run_pending();
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn teardown_before_delay_cancels_redirect() {
        let cfg = config(None);
        let scheduler = ManualScheduler::default();
        let navigator = RecordingNavigator::default();
        let mut state = LeadFormState::new();
        ana(&mut state);
        state.begin_submit(Utc::now());

        let mut redirect = state.on_delivered(Ok(()), &scheduler, navigator.clone(), &cfg);
        assert_eq!(scheduler.delays(), vec![2_000]);

        if let Some(timer) = redirect.take() {
            timer.cancel();
        }
        scheduler.run_pending();
        assert!(navigator.visited.borrow().is_empty());
        assert_eq!(*state.status(), FormStatus::Success);
    }

    #[test]
    fn stray_result_without_submission_is_ignored() {
        let mut state = LeadFormState::new();
        assert!(!state.finish(Ok(())));
        assert_eq!(*state.status(), FormStatus::default());
    }
}
