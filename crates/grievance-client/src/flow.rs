// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The portal form flow.
//!
//! ```text
//! Locked --unlock(ok)--> Form --submit(ok)--> Submitted --reset--> Form
//! ```
//!
//! A wrong passphrase keeps the portal locked with an error that the next
//! keystroke clears. A failed submission stays on the form with the fields
//! intact and an inline message.

use grievance_core::{GrievanceError, GrievanceRecord, GrievanceRequest};
use thiserror::Error;
use tracing::{debug, warn};

use crate::choice::Choice;
use crate::locate::DeviceLocator;
use crate::submit::Submitter;

pub const LOCKED_MESSAGE: &str = "Oops! That's not the secret code. Try again, my love!";
pub const INCOMPLETE_MESSAGE: &str = "Please fill out both Title and What's bothering you?";

/// Where the portal currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Locked { error: Option<String> },
    Form,
    Submitted,
}

/// Form contents. Cleared after every successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    pub mood: Choice,
    pub severity: Choice,
}

impl FormFields {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("{}", LOCKED_MESSAGE)]
    WrongPassphrase,

    #[error("{}", INCOMPLETE_MESSAGE)]
    Incomplete,

    #[error("Oh no! Something went wrong. Please try again. ({0})")]
    Submission(String),

    /// The event does not apply to the current stage.
    #[error("not available while {0}")]
    InvalidStage(&'static str),
}

/// UI-agnostic form flow driven by front-end events.
pub struct Portal {
    passphrase: String,
    stage: Stage,
    fields: FormFields,
    message: Option<String>,
    submitter: Box<dyn Submitter>,
    locator: Box<dyn DeviceLocator>,
}

impl Portal {
    pub fn new(
        passphrase: impl Into<String>,
        submitter: Box<dyn Submitter>,
        locator: Box<dyn DeviceLocator>,
    ) -> Self {
        Self {
            passphrase: passphrase.into(),
            stage: Stage::Locked { error: None },
            fields: FormFields::default(),
            message: None,
            submitter,
            locator,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Editable fields, only while the form is showing.
    pub fn fields_mut(&mut self) -> Option<&mut FormFields> {
        match self.stage {
            Stage::Form => Some(&mut self.fields),
            _ => None,
        }
    }

    /// Inline message shown on the form, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Typing into the passphrase box clears a previous error.
    pub fn keystroke(&mut self) {
        if let Stage::Locked { error } = &mut self.stage {
            *error = None;
        }
    }

    /// Exact comparison against the configured passphrase.
    pub fn unlock(&mut self, attempt: &str) -> Result<(), FlowError> {
        if !matches!(self.stage, Stage::Locked { .. }) {
            return Err(FlowError::InvalidStage(self.stage_name()));
        }
        if attempt == self.passphrase {
            self.stage = Stage::Form;
            Ok(())
        } else {
            self.stage = Stage::Locked {
                error: Some(LOCKED_MESSAGE.to_string()),
            };
            Err(FlowError::WrongPassphrase)
        }
    }

    /// Validate locally, attach the device position when available, and send.
    pub async fn submit(&mut self) -> Result<GrievanceRecord, FlowError> {
        if self.stage != Stage::Form {
            return Err(FlowError::InvalidStage(self.stage_name()));
        }
        if !self.fields.is_complete() {
            return Err(self.fail(FlowError::Incomplete));
        }

        let mut request = GrievanceRequest {
            title: Some(self.fields.title.clone()),
            description: Some(self.fields.description.clone()),
            mood: self.fields.mood.value(),
            severity: self.fields.severity.value(),
            latitude: None,
            longitude: None,
        };
        match self.locator.current_position().await {
            Some(position) => {
                request.latitude = Some(position.latitude.to_string());
                request.longitude = Some(position.longitude.to_string());
            }
            None => debug!("device position unavailable, submitting without coordinates"),
        }

        match self.submitter.submit(&request).await {
            Ok(record) => {
                self.fields = FormFields::default();
                self.message = None;
                self.stage = Stage::Submitted;
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "grievance submission failed");
                Err(self.fail(FlowError::Submission(failure_reason(e))))
            }
        }
    }

    /// Back from the confirmation screen to an empty form.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        if self.stage != Stage::Submitted {
            return Err(FlowError::InvalidStage(self.stage_name()));
        }
        self.stage = Stage::Form;
        Ok(())
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        self.message = Some(error.to_string());
        error
    }

    fn stage_name(&self) -> &'static str {
        match self.stage {
            Stage::Locked { .. } => "locked",
            Stage::Form => "on the form",
            Stage::Submitted => "submitted",
        }
    }
}

fn failure_reason(error: GrievanceError) -> String {
    match error {
        GrievanceError::Transport { message, .. } => message,
        other => other.to_string(),
    }
}
