/*
[INPUT]:  User commands (edits, navigation, submit) and async completions
[OUTPUT]: Wizard state plus effects for the session to execute
[POS]:    Core logic - step state machine with identity short-circuit
[UPDATE]: When navigation rules, gating, or effect contracts change
*/

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::draft::{ArtistIdentity, Field, FileAttachment, SubmissionDraft};
use crate::submission::SubmissionRequest;
use crate::validation::{FieldErrors, Step, validate};

/// Delays applied by the session when executing effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardTiming {
    pub transition_delay: Duration,
    pub reset_delay: Duration,
}

impl Default for WizardTiming {
    fn default() -> Self {
        Self {
            transition_delay: Duration::from_millis(500),
            reset_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Step change waiting for its scheduled completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub ticket: u64,
    pub direction: Direction,
    pub target: Step,
}

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call `complete_transition(ticket)` after `delay`
    ScheduleTransition { ticket: u64, delay: Duration },
    /// Look up the identity pair; answer with `apply_identity_result(ticket, ..)`
    CheckIdentity { ticket: u64, identity: ArtistIdentity },
    /// Drop any identity lookup still in flight
    CancelIdentityCheck,
    /// Run the upload-then-insert saga; answer with `finish_submission`
    Submit(SubmissionRequest),
    /// Call `complete_reset(ticket)` after `delay`
    ScheduleReset { ticket: u64, delay: Duration },
}

/// Commands the controller refused; state is unchanged when returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("terms must be accepted first")]
    TermsNotAccepted,

    #[error("a step transition is already in progress")]
    TransitionPending,

    #[error("submission is in progress")]
    SubmissionInProgress,

    #[error("no step {direction:?} of {from}")]
    NoSuchStep { from: Step, direction: Direction },

    #[error("{0} is not a text field")]
    NotTextField(Field),

    #[error("{0} is not a file field")]
    NotFileField(Field),

    #[error("submit is only available on the last step (currently on {0})")]
    NotOnFinalStep(Step),
}

/// Four-step submission wizard.
///
/// All mutation goes through this type. Asynchronous work is described by
/// the returned [`Effect`]s and fed back through the `complete_*` and
/// `apply_*` methods together with the ticket it was issued with; answers
/// carrying an outdated ticket are ignored.
#[derive(Debug, Clone)]
pub struct WizardController {
    timing: WizardTiming,
    step: Step,
    draft: SubmissionDraft,
    errors: FieldErrors,
    artist_exists: bool,
    submitting: bool,
    submitted: bool,
    terms_accepted: bool,
    pending_transition: Option<PendingTransition>,
    pending_reset: Option<u64>,
    identity_ticket: u64,
    ticket_seq: u64,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(WizardTiming::default())
    }
}

impl WizardController {
    pub fn new(timing: WizardTiming) -> Self {
        Self {
            timing,
            step: Step::Identity,
            draft: SubmissionDraft::default(),
            errors: FieldErrors::new(),
            artist_exists: false,
            submitting: false,
            submitted: false,
            terms_accepted: false,
            pending_transition: None,
            pending_reset: None,
            identity_ticket: 0,
            ticket_seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn artist_exists(&self) -> bool {
        self.artist_exists
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.pending_transition
    }

    pub fn timing(&self) -> WizardTiming {
        self.timing
    }

    /// Steps actually visited for the current identity state
    pub fn visible_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|step| !(self.artist_exists && *step == Step::ArtistProfile))
            .collect()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Unlock the form. Repeated calls are harmless.
    pub fn accept_terms(&mut self) {
        if !self.terms_accepted {
            info!("terms accepted");
        }
        self.terms_accepted = true;
    }

    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> Result<Vec<Effect>, WizardError> {
        self.ensure_editable()?;
        let value = value.into();
        let slot = self
            .draft
            .text_mut(field)
            .ok_or(WizardError::NotTextField(field))?;
        if *slot == value {
            return Ok(Vec::new());
        }
        *slot = value;
        self.errors.remove(&field);

        if field.is_identity() {
            return Ok(vec![self.identity_effect()]);
        }
        Ok(Vec::new())
    }

    pub fn attach_file(&mut self, field: Field, attachment: FileAttachment) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let slot = self
            .draft
            .attachment_slot(field)
            .ok_or(WizardError::NotFileField(field))?;
        debug!(field = %field, file = attachment.file_name(), "file attached");
        *slot = Some(attachment);
        self.errors.remove(&field);
        Ok(())
    }

    /// Clear an attachment, returning the handle that was held
    pub fn remove_file(&mut self, field: Field) -> Result<Option<FileAttachment>, WizardError> {
        self.ensure_editable()?;
        let slot = self
            .draft
            .attachment_slot(field)
            .ok_or(WizardError::NotFileField(field))?;
        Ok(slot.take())
    }

    /// Validate the current step and schedule a move forward.
    ///
    /// Missing fields are recorded in [`errors`](Self::errors) and no effect
    /// is returned.
    pub fn request_next(&mut self) -> Result<Vec<Effect>, WizardError> {
        self.ensure_navigable()?;
        let target = self
            .step
            .next(self.artist_exists)
            .ok_or(WizardError::NoSuchStep {
                from: self.step,
                direction: Direction::Forward,
            })?;

        let errors = validate(self.step, &self.draft);
        if !errors.is_empty() {
            debug!(step = self.step.number(), missing = errors.len(), "step blocked by validation");
            self.errors = errors;
            return Ok(Vec::new());
        }

        self.errors.clear();
        Ok(vec![self.schedule_transition(Direction::Forward, target)])
    }

    pub fn request_back(&mut self) -> Result<Vec<Effect>, WizardError> {
        self.ensure_navigable()?;
        let target = self
            .step
            .previous(self.artist_exists)
            .ok_or(WizardError::NoSuchStep {
                from: self.step,
                direction: Direction::Backward,
            })?;
        Ok(vec![self.schedule_transition(Direction::Backward, target)])
    }

    /// Validate the last step and hand a snapshot of the draft to the saga
    pub fn submit(&mut self) -> Result<Vec<Effect>, WizardError> {
        self.ensure_navigable()?;
        if self.step != Step::Listing {
            return Err(WizardError::NotOnFinalStep(self.step));
        }

        let errors = validate(Step::Listing, &self.draft);
        if !errors.is_empty() {
            debug!(missing = errors.len(), "submit blocked by validation");
            self.errors = errors;
            return Ok(Vec::new());
        }

        self.errors.clear();
        self.submitting = true;
        info!(artist = %self.draft.artist_name, "submission started");
        Ok(vec![Effect::Submit(SubmissionRequest::new(self.draft.clone()))])
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Apply a scheduled transition. Returns false for a stale ticket.
    pub fn complete_transition(&mut self, ticket: u64) -> bool {
        match self.pending_transition {
            Some(pending) if pending.ticket == ticket => {
                debug!(from = self.step.number(), to = pending.target.number(), "step changed");
                self.step = pending.target;
                self.pending_transition = None;
                true
            }
            _ => false,
        }
    }

    /// Apply an identity lookup answer. Returns false for a stale ticket.
    pub fn apply_identity_result(&mut self, ticket: u64, found: bool) -> bool {
        if ticket != self.identity_ticket {
            debug!(ticket, current = self.identity_ticket, "stale identity answer dropped");
            return false;
        }

        self.artist_exists = found;
        if found && !self.submitting && !self.submitted {
            info!("returning artist, skipping profile step");
            self.step = Step::Artwork;
            self.pending_transition = None;
            self.errors.clear();
        }
        true
    }

    /// Record the saga outcome. Success schedules the draft reset.
    pub fn finish_submission(&mut self, succeeded: bool) -> Vec<Effect> {
        if !self.submitting {
            return Vec::new();
        }
        self.submitting = false;
        if !succeeded {
            return Vec::new();
        }

        self.submitted = true;
        let ticket = self.next_ticket();
        self.pending_reset = Some(ticket);
        vec![Effect::ScheduleReset {
            ticket,
            delay: self.timing.reset_delay,
        }]
    }

    /// Clear the form after a successful submission
    pub fn complete_reset(&mut self, ticket: u64) -> Vec<Effect> {
        if self.pending_reset != Some(ticket) {
            return Vec::new();
        }

        self.draft = SubmissionDraft::default();
        self.step = Step::Identity;
        self.errors.clear();
        self.artist_exists = false;
        self.submitted = false;
        self.pending_transition = None;
        self.pending_reset = None;
        self.identity_ticket = self.next_ticket();
        info!("form reset after submission");
        vec![Effect::CancelIdentityCheck]
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if !self.terms_accepted {
            return Err(WizardError::TermsNotAccepted);
        }
        if self.submitting || self.submitted {
            return Err(WizardError::SubmissionInProgress);
        }
        Ok(())
    }

    fn ensure_navigable(&self) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if self.pending_transition.is_some() {
            return Err(WizardError::TransitionPending);
        }
        Ok(())
    }

    fn next_ticket(&mut self) -> u64 {
        self.ticket_seq += 1;
        self.ticket_seq
    }

    fn identity_effect(&mut self) -> Effect {
        self.identity_ticket = self.next_ticket();
        match self.draft.identity() {
            Some(identity) => Effect::CheckIdentity {
                ticket: self.identity_ticket,
                identity,
            },
            None => Effect::CancelIdentityCheck,
        }
    }

    fn schedule_transition(&mut self, direction: Direction, target: Step) -> Effect {
        let ticket = self.next_ticket();
        self.pending_transition = Some(PendingTransition {
            ticket,
            direction,
            target,
        });
        Effect::ScheduleTransition {
            ticket,
            delay: self.timing.transition_delay,
        }
    }
}
