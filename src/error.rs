use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while loading a workflow definition.
///
/// These are configuration errors, never caused by a user. Treat them as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParse(String),

    #[error("Malformed workflow definition: {detail}")]
    MalformedDefinition { detail: String },
}

impl DefinitionError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        DefinitionError::MalformedDefinition {
            detail: detail.into(),
        }
    }
}

/// Recoverable, user-facing errors raised when answering or advancing a step.
/// The state is never changed when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    RequiredFieldMissing { field: String },

    #[error("Field '{field}' allows at most {limit} selections")]
    SelectionLimitExceeded { field: String, limit: usize },

    #[error("Field '{field}' expects a {expected} value")]
    TypeMismatch { field: String, expected: String },

    #[error("'{value}' is not an option of field '{field}'")]
    UnknownOption { field: String, value: String },

    #[error("Field '{field}' does not satisfy {rule}")]
    ConstraintViolated { field: String, rule: String },

    #[error("No step collects field '{0}'")]
    UnknownField(String),

    #[error("Step '{0}' is not part of this workflow")]
    UnknownStep(String),
}

/// Recoverable errors raised by explicit navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Step '{step_id}' has not been visited in this session")]
    UnvisitedStep { step_id: String },

    #[error("Step '{0}' is not part of this workflow")]
    UnknownStep(String),
}

/// Errors raised by the submission assembler. Field lists are complete, not fail-fast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("The workflow has not reached its terminal step")]
    WorkflowIncomplete,

    #[error(
        "Submission failed validation (missing: [{}], invalid: [{}])",
        missing_fields.join(", "),
        invalid_fields.join(", ")
    )]
    ValidationFailed {
        missing_fields: Vec<String>,
        invalid_fields: Vec<String>,
    },

    /// A branch answer was changed after its step was passed, so the
    /// recorded path is no longer the one the answers lead to.
    #[error("The answer to step '{step_id}' no longer leads along the visited path")]
    StalePath { step_id: String },
}

/// Errors raised by the booking quote calculator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Deposit {deposit} exceeds the subtotal {subtotal}")]
    DepositExceedsSubtotal { subtotal: Decimal, deposit: Decimal },

    #[error("Selected option '{id}' is not offered for this service")]
    UnknownOption { id: String },
}

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors that can occur when converting a custom user format into a `RawWorkflow`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Any error produced by applying an [`Operation`](crate::engine::Operation) to a state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Errors raised while reading or replaying an operation script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Parse(String),

    #[error("Operation #{index} ({operation}) failed: {source}")]
    OperationFailed {
        index: usize,
        operation: String,
        #[source]
        source: WorkflowError,
    },
}
