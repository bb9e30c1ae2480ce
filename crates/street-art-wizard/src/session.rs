/*
[INPUT]:  Front-end commands, gateway handles, session options
[OUTPUT]: Async driver that executes controller effects and feeds results back
[POS]:    Runtime layer - single owner of the WizardController
[UPDATE]: When effects change or new background work is introduced
*/

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use street_art_adapter::{AdapterError, BlobStoreGateway, PersistenceGateway};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::draft::{ArtistIdentity, Field, FileAttachment};
use crate::submission::{SubmissionError, SubmissionReport, SubmissionSaga, SubmissionTargets};
use crate::wizard::{Effect, WizardController, WizardError, WizardTiming};

/// Tunables for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub timing: WizardTiming,
    pub targets: SubmissionTargets,
    pub identity_debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timing: WizardTiming::default(),
            targets: SubmissionTargets::default(),
            identity_debounce: Duration::from_millis(300),
        }
    }
}

/// Completion posted by a background task
#[derive(Debug)]
pub enum SessionEvent {
    IdentityChecked {
        ticket: u64,
        result: std::result::Result<bool, AdapterError>,
    },
    TransitionDue {
        ticket: u64,
    },
    SubmissionFinished {
        result: std::result::Result<SubmissionReport, SubmissionError>,
    },
    ResetDue {
        ticket: u64,
    },
}

/// Owns the controller and runs its effects on the tokio runtime.
///
/// Background tasks never touch the controller; they post a
/// [`SessionEvent`] that is applied by [`handle_event`](Self::handle_event).
pub struct WizardSession {
    controller: WizardController,
    persistence: Arc<dyn PersistenceGateway>,
    saga: SubmissionSaga,
    identity_debounce: Duration,
    identity_cancel: Option<CancellationToken>,
    shutdown: CancellationToken,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    last_report: Option<SubmissionReport>,
    last_error: Option<String>,
    closed: bool,
}

impl WizardSession {
    pub fn new(
        persistence: Arc<dyn PersistenceGateway>,
        blobs: Arc<dyn BlobStoreGateway>,
        options: SessionOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let saga = SubmissionSaga::new(persistence.clone(), blobs, options.targets);
        Self {
            controller: WizardController::new(options.timing),
            persistence,
            saga,
            identity_debounce: options.identity_debounce,
            identity_cancel: None,
            shutdown: CancellationToken::new(),
            events_tx,
            events_rx,
            last_report: None,
            last_error: None,
            closed: false,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn last_report(&self) -> Option<&SubmissionReport> {
        self.last_report.as_ref()
    }

    /// Most recent submission failure, cleared by the next submit
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn accept_terms(&mut self) {
        self.controller.accept_terms();
    }

    /// End the session without unlocking the form
    pub fn decline_terms(&mut self) {
        info!("terms declined, closing session");
        self.close();
    }

    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> std::result::Result<(), WizardError> {
        let effects = self.controller.set_text(field, value)?;
        self.execute(effects);
        Ok(())
    }

    pub fn attach_file(&mut self, field: Field, attachment: FileAttachment) -> std::result::Result<(), WizardError> {
        self.controller.attach_file(field, attachment)
    }

    /// Inspect `path` on disk and attach it to `field`
    pub async fn attach_path(&mut self, field: Field, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let attachment = FileAttachment::open(path)
            .await
            .with_context(|| format!("attach {} to {field}", path.display()))?;
        self.controller.attach_file(field, attachment)?;
        Ok(())
    }

    pub fn remove_file(&mut self, field: Field) -> std::result::Result<Option<FileAttachment>, WizardError> {
        self.controller.remove_file(field)
    }

    pub fn next(&mut self) -> std::result::Result<(), WizardError> {
        let effects = self.controller.request_next()?;
        self.execute(effects);
        Ok(())
    }

    pub fn back(&mut self) -> std::result::Result<(), WizardError> {
        let effects = self.controller.request_back()?;
        self.execute(effects);
        Ok(())
    }

    pub fn submit(&mut self) -> std::result::Result<(), WizardError> {
        let effects = self.controller.submit()?;
        if !effects.is_empty() {
            self.last_report = None;
            self.last_error = None;
        }
        self.execute(effects);
        Ok(())
    }

    /// Stop every background task; later events are never delivered
    pub fn close(&mut self) {
        self.closed = true;
        self.shutdown.cancel();
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    /// Wait for one completion and apply it
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply every completion already queued, without waiting
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::IdentityChecked { ticket, result } => match result {
                Ok(found) => {
                    if self.controller.apply_identity_result(ticket, found) {
                        debug!(ticket, found, "artist lookup applied");
                    }
                }
                Err(err) => {
                    warn!(ticket, error = %err, "artist lookup failed");
                }
            },
            SessionEvent::TransitionDue { ticket } => {
                self.controller.complete_transition(ticket);
            }
            SessionEvent::SubmissionFinished { result } => match result {
                Ok(report) => {
                    let failed_uploads = [&report.artist_image, &report.artwork_image]
                        .iter()
                        .filter(|outcome| outcome.is_failed())
                        .count();
                    info!(failed_uploads, "submission succeeded");
                    self.last_report = Some(report);
                    let effects = self.controller.finish_submission(true);
                    self.execute(effects);
                }
                Err(err) => {
                    error!(error = %err, "submission failed, draft kept for retry");
                    self.last_error = Some(err.to_string());
                    self.controller.finish_submission(false);
                }
            },
            SessionEvent::ResetDue { ticket } => {
                let effects = self.controller.complete_reset(ticket);
                self.execute(effects);
            }
        }
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleTransition { ticket, delay } => {
                    self.schedule(delay, SessionEvent::TransitionDue { ticket });
                }
                Effect::ScheduleReset { ticket, delay } => {
                    self.schedule(delay, SessionEvent::ResetDue { ticket });
                }
                Effect::CancelIdentityCheck => self.cancel_identity_check(),
                Effect::CheckIdentity { ticket, identity } => {
                    self.cancel_identity_check();
                    let token = self.shutdown.child_token();
                    self.identity_cancel = Some(token.clone());

                    let persistence = self.persistence.clone();
                    let table = self.saga.targets().table.clone();
                    let debounce = self.identity_debounce;
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let lookup = async {
                            tokio::time::sleep(debounce).await;
                            persistence
                                .query(&table, &ArtistIdentity::COLUMNS, &identity.to_filters())
                                .await
                        };
                        tokio::select! {
                            _ = token.cancelled() => {
                                debug!(ticket, "artist lookup cancelled");
                            }
                            result = lookup => {
                                let result = result.map(|rows| !rows.is_empty());
                                let _ = tx.send(SessionEvent::IdentityChecked { ticket, result });
                            }
                        }
                    });
                }
                Effect::Submit(request) => {
                    let saga = self.saga.clone();
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = saga.run(request).await;
                        let _ = tx.send(SessionEvent::SubmissionFinished { result });
                    });
                }
            }
        }
    }

    fn schedule(&self, delay: Duration, event: SessionEvent) {
        let token = self.shutdown.child_token();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(event);
                }
            }
        });
    }

    fn cancel_identity_check(&mut self) {
        if let Some(token) = self.identity_cancel.take() {
            token.cancel();
        }
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
