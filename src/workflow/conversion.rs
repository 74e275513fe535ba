use super::raw::RawWorkflow;
use crate::error::ConversionError;

/// A trait for custom data models that can be converted into a stepflow `RawWorkflow`.
///
/// Implement it on your own configuration structs when your wizard schema is not
/// the JSON shape stepflow reads natively. The result still goes through the
/// [`Loader`](crate::loader::Loader), so conversion only has to translate, not validate.
///
/// # Example
///
/// ```rust,no_run
/// use stepflow::prelude::*;
/// use stepflow::error::ConversionError;
/// use stepflow::workflow::{RawConstraints, RawField, RawNextStep, RawStep};
///
/// struct Question { key: String, prompt: String }
/// struct Survey { questions: Vec<Question> }
///
/// impl IntoWorkflow for Survey {
///     fn into_workflow(self) -> std::result::Result<RawWorkflow, ConversionError> {
///         let count = self.questions.len();
///         let keys: Vec<String> = self.questions.iter().map(|q| q.key.clone()).collect();
///         let steps = self
///             .questions
///             .into_iter()
///             .enumerate()
///             .map(|(i, q)| RawStep {
///                 id: q.key.clone(),
///                 title: Some(q.prompt),
///                 description: None,
///                 field: RawField {
///                     name: q.key,
///                     field_type: "text".to_string(),
///                     label: None,
///                     options: None,
///                     options_from: None,
///                     required: true,
///                     max_selections: None,
///                     required_keys: vec![],
///                     constraints: RawConstraints::default(),
///                 },
///                 next_step: RawNextStep::Fixed(if i + 1 < count {
///                     keys[i + 1].clone()
///                 } else {
///                     "complete".to_string()
///                 }),
///             })
///             .collect();
///         Ok(RawWorkflow { name: "survey".to_string(), entry_step_id: None, steps })
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a stepflow-compatible raw workflow.
    fn into_workflow(self) -> Result<RawWorkflow, ConversionError>;
}

impl IntoWorkflow for RawWorkflow {
    fn into_workflow(self) -> Result<RawWorkflow, ConversionError> {
        Ok(self)
    }
}
