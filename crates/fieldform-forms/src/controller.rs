//! The form controller.
//!
//! A [`FormController`] drives one form session through its states:
//!
//! ```text
//! Loading ──fetch ok──▶ Ready ──submit──▶ Submitting ──▶ Ready
//!    │                   ▲  │
//!    └──fetch err──▶ Error  └── change / reset
//! ```
//!
//! It owns the descriptor list, the ruleset and defaults derived from it,
//! and the [`FormSession`]. Descriptor changes rebuild the ruleset and
//! defaults; field changes re-run that field's rule. Submit outcomes are
//! published on a [`Signal`] of [`Notification`]s.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::Instrument;

use fieldform_core::logging::session_span;
use fieldform_core::{ContactPolicy, FormError, FormResult, Settings};
use fieldform_signals::Signal;
use fieldform_store::{FieldDescriptor, FieldStore, FieldValue};

use crate::bound_field::{bind_fields, BoundField};
use crate::defaults::{derive_defaults, ValueMap};
use crate::schema::Schema;
use crate::session::FormSession;
use crate::validation::{full_clean, merge_values};
use crate::visibility::{contact_visible, visible_fields};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Descriptors have been requested.
    Loading,
    /// Descriptors are loaded and the session accepts edits.
    Ready,
    /// A replace call is in flight.
    Submitting,
    /// Descriptors could not be loaded. Blocks the session until reloaded.
    Error(String),
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Submitting => write!(f, "submitting"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// The form was saved.
    Success,
    /// Saving failed.
    Error,
}

/// A human-readable event for a toast or alert surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to display.
    pub message: String,
}

/// Holds a session in `Submitting` and returns it to `Ready` when dropped,
/// whether the replace finished or its future was cancelled.
struct SubmittingGuard<'a> {
    state: &'a mut FormState,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(state: &'a mut FormState) -> Self {
        *state = FormState::Submitting;
        Self { state }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        *self.state = FormState::Ready;
    }
}

/// Orchestrates one form session against a descriptor store.
pub struct FormController {
    id: String,
    span: tracing::Span,
    store: Arc<dyn FieldStore>,
    contact_policy: ContactPolicy,
    state: FormState,
    descriptors: Vec<FieldDescriptor>,
    schema: Schema,
    defaults: ValueMap,
    session: FormSession,
    notifications: Arc<Signal<Notification>>,
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("descriptors", &self.descriptors.len())
            .field("contact_policy", &self.contact_policy)
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Creates a controller in the `Loading` state. Nothing is fetched until
    /// [`load`](Self::load) is awaited.
    pub fn new(store: Arc<dyn FieldStore>, settings: &Settings) -> Self {
        let id = format!("session-{}", NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            span: session_span(&id),
            id,
            store,
            contact_policy: settings.contact_policy,
            state: FormState::Loading,
            descriptors: Vec::new(),
            schema: Schema::default(),
            defaults: ValueMap::new(),
            session: FormSession::default(),
            notifications: Arc::new(Signal::new()),
        }
    }

    /// Overrides the contact policy taken from the settings.
    #[must_use]
    pub const fn with_contact_policy(mut self, policy: ContactPolicy) -> Self {
        self.contact_policy = policy;
        self
    }

    /// Fetches the descriptor list and starts a fresh session from it.
    ///
    /// On failure the controller enters [`FormState::Error`] and the fetch
    /// error is returned.
    pub async fn load(&mut self) -> FormResult<()> {
        if self.state == FormState::Submitting {
            return Err(FormError::SubmitInProgress);
        }
        self.state = FormState::Loading;
        match self.store.fetch().instrument(self.span.clone()).await {
            Ok(fields) => {
                tracing::info!(parent: &self.span, count = fields.len(), "descriptors loaded");
                self.apply_descriptors(fields);
                self.session = FormSession::new(self.defaults.clone());
                self.state = FormState::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::error!(parent: &self.span, error = %err, "cannot load form");
                self.state = FormState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Records a user edit of `name` and re-validates that field.
    pub fn change(&mut self, name: &str, value: impl Into<FieldValue>) -> FormResult<()> {
        self.ensure_ready()?;
        let rule = self
            .schema
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let value = value.into();
        let errors = rule.clean(Some(&value)).err().unwrap_or_default();
        tracing::debug!(parent: &self.span, field = name, valid = errors.is_empty(), "field changed");
        self.session.record_change(name, value);
        self.session.set_field_errors(name, errors);
        Ok(())
    }

    /// Validates the whole form and, if valid, replaces the stored list.
    ///
    /// Invalid input returns [`FormError::Validation`] without calling the
    /// store. A failed replace returns [`FormError::Submit`] and publishes
    /// an error notification; the live values are kept either way. If the
    /// returned future is dropped while the replace is pending, the session
    /// is left `Ready` with its edits intact.
    pub async fn submit(&mut self) -> FormResult<()> {
        self.ensure_ready()?;
        let cleaned = match full_clean(&self.schema, self.session.values(), self.contact_policy) {
            Ok(cleaned) => cleaned,
            Err(err) => {
                tracing::info!(
                    parent: &self.span,
                    errors = err.error_count(),
                    "submit blocked by validation"
                );
                self.session.replace_errors(err.field_errors.clone());
                return Err(FormError::Validation(err));
            }
        };
        self.session.replace_errors(HashMap::new());

        let merged = merge_values(&self.descriptors, &cleaned);
        let result = {
            let _submitting = SubmittingGuard::enter(&mut self.state);
            self.store
                .replace(merged.clone())
                .instrument(self.span.clone())
                .await
        };

        let outcome = match result {
            Ok(()) => {
                tracing::info!(parent: &self.span, "form saved");
                self.store.invalidate().await;
                self.refresh(merged).await;
                self.notify(NotificationLevel::Success, "Form saved successfully");
                Ok(())
            }
            Err(err) => {
                let err = match err {
                    FormError::Submit(_) => err,
                    other => FormError::Submit(other.to_string()),
                };
                tracing::error!(parent: &self.span, error = %err, "form save failed");
                self.notify(NotificationLevel::Error, err.to_string());
                Err(err)
            }
        };
        outcome
    }

    /// Restores the live values to the defaults and zeroes the counters.
    pub fn reset(&mut self) -> FormResult<()> {
        self.ensure_ready()?;
        tracing::debug!(parent: &self.span, "form reset");
        self.session.reset(self.defaults.clone());
        Ok(())
    }

    /// Returns the visible fields bound to the session, ordered for layout.
    pub fn rendered_fields(&self) -> Vec<BoundField> {
        bind_fields(&self.descriptors, &self.session)
    }

    /// Returns the names of the visible fields.
    pub fn visible_fields(&self) -> Vec<String> {
        visible_fields(&self.descriptors, self.session.values())
    }

    /// Returns `true` if the synthetic `contact` field is shown.
    pub fn contact_visible(&self) -> bool {
        contact_visible(self.session.values())
    }

    /// Returns `true` if a submit may start now.
    pub fn can_submit(&self) -> bool {
        self.state == FormState::Ready
    }

    /// Returns the current state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Returns the session id used in log spans.
    pub fn session_id(&self) -> &str {
        &self.id
    }

    /// Returns the loaded descriptor list.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Returns the current ruleset.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the derived defaults.
    pub const fn defaults(&self) -> &ValueMap {
        &self.defaults
    }

    /// Returns the live session state.
    pub const fn session(&self) -> &FormSession {
        &self.session
    }

    /// Returns the signal submit outcomes are published on.
    pub fn notifications(&self) -> Arc<Signal<Notification>> {
        Arc::clone(&self.notifications)
    }

    fn ensure_ready(&self) -> FormResult<()> {
        match self.state {
            FormState::Ready => Ok(()),
            FormState::Submitting => Err(FormError::SubmitInProgress),
            FormState::Loading | FormState::Error(_) => Err(FormError::NotReady),
        }
    }

    fn apply_descriptors(&mut self, fields: Vec<FieldDescriptor>) {
        self.schema = Schema::build(&fields);
        self.defaults = derive_defaults(&fields);
        self.descriptors = fields;
    }

    /// Re-reads descriptors after a save, keeping live values. Falls back to
    /// the list just written if the re-read fails.
    async fn refresh(&mut self, written: Vec<FieldDescriptor>) {
        let fields = match self.store.fetch().instrument(self.span.clone()).await {
            Ok(fields) => fields,
            Err(err) => {
                tracing::warn!(parent: &self.span, error = %err, "refetch after save failed");
                written
            }
        };
        self.apply_descriptors(fields);
        self.session.fill_missing(&self.defaults);
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.send(&Notification {
            level,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldform_signals::Recorder;
    use fieldform_store::{seed_fields, InMemoryFieldStore};

    async fn ready(store: &InMemoryFieldStore) -> FormController {
        let mut controller = FormController::new(Arc::new(store.clone()), &Settings::default());
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_load_enters_ready() {
        let store = InMemoryFieldStore::seeded();
        let controller = ready(&store).await;
        assert_eq!(controller.state(), &FormState::Ready);
        assert_eq!(controller.descriptors().len(), 5);
        assert_eq!(controller.session().values(), controller.defaults());
        assert!(controller.can_submit());
    }

    #[tokio::test]
    async fn test_operations_before_load_are_not_ready() {
        let mut controller =
            FormController::new(Arc::new(InMemoryFieldStore::seeded()), &Settings::default());
        assert!(matches!(controller.change("age", 3_i64), Err(FormError::NotReady)));
        assert!(matches!(controller.reset(), Err(FormError::NotReady)));
        assert!(matches!(controller.submit().await, Err(FormError::NotReady)));
    }

    #[tokio::test]
    async fn test_change_counts_and_validates() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        controller.change("age", "abc").unwrap();
        assert_eq!(
            controller.session().errors_for("age"),
            ["Age must be a number".to_string()]
        );
        controller.change("age", "18").unwrap();
        assert!(controller.session().errors_for("age").is_empty());
        assert_eq!(controller.session().interactions("age"), 2);
    }

    #[tokio::test]
    async fn test_change_unknown_field() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        let err = controller.change("nope", "x").unwrap_err();
        assert!(matches!(err, FormError::UnknownField(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_contact_visibility_follows_age() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        assert!(!controller.contact_visible());
        controller.change("age", 19_i64).unwrap();
        assert!(controller.contact_visible());
        assert!(controller.visible_fields().iter().any(|n| n == "contact"));
        controller.change("age", 18_i64).unwrap();
        assert!(!controller.contact_visible());
    }

    #[tokio::test]
    async fn test_submit_success_notifies_and_persists() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        let recorder = Recorder::attach(&controller.notifications(), "toast");

        controller.change("email", "user@example.com").unwrap();
        controller.change("contact", "555-123-4567").unwrap();
        controller.submit().await.unwrap();

        assert_eq!(store.replace_count(), 1);
        let saved = store.snapshot().await;
        assert_eq!(saved[1].value, Some(FieldValue::from("user@example.com")));
        assert!(saved.iter().all(|f| f.name != "contact"));
        assert_eq!(
            recorder.drain(),
            vec![Notification {
                level: NotificationLevel::Success,
                message: "Form saved successfully".to_string()
            }]
        );
        assert_eq!(controller.state(), &FormState::Ready);
        // Refetched after the save.
        assert_eq!(store.fetch_count(), 2);
        assert_eq!(controller.session().value("email"), Some(&FieldValue::from("user@example.com")));
    }

    #[tokio::test]
    async fn test_hidden_contact_blocks_under_default_policy() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        controller.change("email", "user@example.com").unwrap();
        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, FormError::Validation(ref v) if v.field_errors.contains_key("contact")));
        assert_eq!(store.replace_count(), 0);
    }

    #[tokio::test]
    async fn test_hidden_contact_skipped_with_when_visible() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store)
            .await
            .with_contact_policy(ContactPolicy::WhenVisible);
        controller.change("email", "user@example.com").unwrap();
        controller.submit().await.unwrap();
        assert_eq!(store.replace_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        controller.change("username", "").unwrap();
        controller.change("age", 40_i64).unwrap();
        controller.reset().unwrap();
        assert_eq!(controller.session().values(), controller.defaults());
        assert_eq!(controller.session().total_interactions(), 0);
        assert!(!controller.session().has_errors());
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_rendered_fields_carry_session_state() {
        let store = InMemoryFieldStore::seeded();
        let mut controller = ready(&store).await;
        controller.change("username", " ").unwrap();
        let fields = controller.rendered_fields();
        let username = fields.iter().find(|f| f.name == "username").unwrap();
        assert_eq!(username.errors, vec!["Username is required".to_string()]);
        assert_eq!(username.interactions, 1);
        assert_eq!(seed_fields().len(), fields.len());
    }

    #[test]
    fn test_form_state_display() {
        assert_eq!(FormState::Ready.to_string(), "ready");
        assert_eq!(FormState::Error("down".into()).to_string(), "error: down");
    }
}
