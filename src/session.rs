//! Session state for a single edit workflow.
//!
//! The session owns the loaded original, the last result, the request
//! lifecycle phase and the last error message, and is mutated only through
//! the transitions defined here. A presentation shell dispatches user
//! events into it and re-renders from its accessors.

use crate::edit::{EditRequest, EditedImage, ImageEditor};
use crate::encode::SourceImage;
use crate::error::{EditError, Result};

/// Canned instructions a presentation shell can offer.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Make my photo look formal. Change my wear to corporate suit",
    "Turn this into a pencil sketch",
    "Add a cyberpunk neon background",
    "Make it look like a vintage 1950s photo",
];

/// Lifecycle phase of the current edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// No request underway; ready to submit.
    #[default]
    Idle,
    /// A request is in flight; submitting is disabled.
    InProgress,
    /// The last request produced an edited image.
    Succeeded,
    /// The last request failed; the error message is set.
    Failed,
}

/// Proof that a submit began against a specific loaded image.
///
/// [`Session::resolve`] compares its epoch against the session's current
/// one, so a response arriving after the image was replaced is discarded
/// instead of overwriting newer state.
#[derive(Debug, Clone, Copy)]
pub struct SubmitTicket {
    epoch: u64,
}

/// State for one user's edit workflow.
#[derive(Debug, Default)]
pub struct Session {
    phase: RequestPhase,
    source: Option<SourceImage>,
    result: Option<EditedImage>,
    error: Option<String>,
    prompt: String,
    image_epoch: u64,
}

impl Session {
    /// Creates an empty session in the Idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// The loaded original image, if any.
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The last generated result, if any.
    pub fn result(&self) -> Option<&EditedImage> {
        self.result.as_ref()
    }

    /// The last failure message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The current prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Loads a new original image.
    ///
    /// Replaces any previous image wholesale (dropping its preview handle),
    /// clears the result, error and prompt, and returns the phase to Idle.
    /// Any in-flight request is orphaned: its eventual outcome no longer
    /// matches the session epoch and will be discarded.
    pub fn load_image(&mut self, image: SourceImage) {
        self.source = Some(image);
        self.result = None;
        self.error = None;
        self.prompt.clear();
        self.phase = RequestPhase::Idle;
        self.image_epoch += 1;
    }

    /// Sets the prompt text.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// True when a submit would be accepted; a shell uses this to enable
    /// its triggering control.
    pub fn can_submit(&self) -> bool {
        self.phase != RequestPhase::InProgress
            && self.source.is_some()
            && !self.prompt.trim().is_empty()
    }

    /// Begins a request: validates the (image, prompt) pair and moves to
    /// InProgress, clearing any previous error.
    ///
    /// On validation failure the phase is left untouched and the failure
    /// message is recorded for display.
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, EditRequest)> {
        if self.phase == RequestPhase::InProgress {
            return Err(EditError::Validation(
                "A request is already in progress.".into(),
            ));
        }

        self.error = None;

        let Some(source) = &self.source else {
            return self.reject("Please upload a valid image file.");
        };
        if self.prompt.trim().is_empty() {
            return self.reject("Please enter a prompt.");
        }

        self.phase = RequestPhase::InProgress;
        let ticket = SubmitTicket {
            epoch: self.image_epoch,
        };
        Ok((ticket, EditRequest::from_source(self.prompt.trim(), source)))
    }

    fn reject<T>(&mut self, message: &str) -> Result<T> {
        self.error = Some(message.to_string());
        Err(EditError::Validation(message.to_string()))
    }

    /// Applies a finished request's outcome.
    ///
    /// The outcome is discarded if the image it was issued against has
    /// since been replaced or cleared.
    pub fn resolve(&mut self, ticket: SubmitTicket, outcome: Result<EditedImage>) {
        if ticket.epoch != self.image_epoch {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.image_epoch,
                "discarding stale edit response"
            );
            return;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = RequestPhase::Succeeded;
            }
            Err(e) => {
                self.error = Some(e.message());
                self.phase = RequestPhase::Failed;
            }
        }
    }

    /// Runs one full submit cycle against the given editor and returns the
    /// resulting phase.
    pub async fn submit<E: ImageEditor + ?Sized>(&mut self, editor: &E) -> RequestPhase {
        let (ticket, request) = match self.begin_submit() {
            Ok(pair) => pair,
            Err(_) => return self.phase,
        };

        let outcome = editor.edit(&request).await;
        self.resolve(ticket, outcome);
        self.phase
    }

    /// Returns the session to its initial state: no image, no result, no
    /// error, empty prompt, Idle.
    pub fn reset(&mut self) {
        self.source = None;
        self.result = None;
        self.error = None;
        self.prompt.clear();
        self.phase = RequestPhase::Idle;
        self.image_epoch += 1;
    }
}
