use serde::Serialize;

/// Lifecycle shared by every auth form: `idle -> submitting -> succeeded | failed`.
/// A failed form drops back to idle as soon as a field is edited.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

impl FormPhase {
    /// Enter `Submitting`. Returns false if a submission is already in
    /// flight or the form has already succeeded.
    pub fn begin(&mut self) -> bool {
        match self {
            FormPhase::Idle | FormPhase::Failed { .. } => {
                *self = FormPhase::Submitting;
                true
            }
            FormPhase::Submitting | FormPhase::Succeeded => false,
        }
    }

    pub fn succeed(&mut self) {
        *self = FormPhase::Succeeded;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = FormPhase::Failed { message: message.into() };
    }

    pub fn edited(&mut self) {
        if matches!(self, FormPhase::Failed { .. }) {
            *self = FormPhase::Idle;
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FormPhase::Failed { message } => Some(message),
            _ => None,
        }
    }
}
