// Loading
pub use crate::catalog::Catalog;
pub use crate::loader::Loader;
pub use crate::workflow::{
    Answer, ChoiceOption, FieldType, IntoWorkflow, RawWorkflow, StepDefinition, WorkflowDefinition,
};

// Running a session
pub use crate::engine::{Operation, WorkflowEngine, WorkflowState};
pub use crate::script::Script;
pub use crate::submission::SubmissionPayload;

// Booking quotes
pub use crate::config::QuotePolicy;
pub use crate::quote::{BookingQuote, ServiceOption, compute_quote};

// Error types
pub use crate::error::{
    DefinitionError, NavigationError, QuoteError, SubmissionError, ValidationError, WorkflowError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
