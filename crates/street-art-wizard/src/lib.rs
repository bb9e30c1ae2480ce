/*
[INPUT]:  Public API exports for street-art-wizard crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod draft;
pub mod session;
pub mod submission;
pub mod validation;
pub mod wizard;

// Re-export main types for convenience
pub use config::WizardConfig;
pub use draft::{ArtistIdentity, AttachmentError, Field, FieldKind, FileAttachment, SubmissionDraft};
pub use session::{SessionEvent, SessionOptions, WizardSession};
pub use submission::{
    SubmissionError, SubmissionRecord, SubmissionReport, SubmissionRequest, SubmissionSaga,
    SubmissionTargets, UploadOutcome,
};
pub use validation::{FieldErrors, Step, validate};
pub use wizard::{Direction, Effect, PendingTransition, WizardController, WizardError, WizardTiming};
