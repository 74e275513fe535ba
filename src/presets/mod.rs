//! Built-in workflows for the marketplace wizards.
//!
//! Each preset is plain JSON run through the same [`Loader`] as user
//! definitions, so a preset that fails to load is reported like any other
//! malformed definition.

use crate::catalog::Catalog;
use crate::error::DefinitionError;
use crate::loader::Loader;
use crate::quote::{self, ServiceOption};
use crate::workflow::{RawWorkflow, WorkflowDefinition};

const CATALOG_JSON: &str = include_str!("catalog.json");
const CLIENT_SIGNUP_JSON: &str = include_str!("client_signup.json");
const PROFESSIONAL_ONBOARDING_JSON: &str = include_str!("professional_onboarding.json");
const SERVICE_BOOKING_JSON: &str = include_str!("service_booking.json");
const PROVIDER_WIZARD_JSON: &str = include_str!("provider_wizard.json");

/// Catalog list holding the add-ons of the service being booked.
pub const SERVICE_OPTIONS_LIST: &str = "service_options";

/// Field of the booking workflow that collects the selected add-on ids.
pub const ADD_ONS_FIELD: &str = "add_ons";

/// Reference lists shared by the presets: service categories, equipment,
/// localities, professions, availability, pricing tiers, travel radius and
/// referral sources.
pub fn catalog() -> Result<Catalog, DefinitionError> {
    Catalog::from_json(CATALOG_JSON)
}

/// Client account signup with budget and location branches.
pub fn client_signup() -> Result<WorkflowDefinition, DefinitionError> {
    load_preset(CLIENT_SIGNUP_JSON, catalog()?)
}

/// Professional onboarding. Freelancers describe their experience, studios
/// and agencies their business and optional studio address.
pub fn professional_onboarding() -> Result<WorkflowDefinition, DefinitionError> {
    load_preset(PROFESSIONAL_ONBOARDING_JSON, catalog()?)
}

/// The short schema-driven provider wizard (`q1` role branch, fallback `q3`).
pub fn provider_wizard() -> Result<WorkflowDefinition, DefinitionError> {
    load_preset(PROVIDER_WIZARD_JSON, catalog()?)
}

/// Booking flow for one service. Its add-ons become the options of the
/// `add_ons` step, preselected where flagged default. A service without
/// add-ons skips that step.
pub fn service_booking(options: &[ServiceOption]) -> Result<WorkflowDefinition, DefinitionError> {
    let mut raw = RawWorkflow::from_json(SERVICE_BOOKING_JSON)?;
    if options.is_empty() {
        raw.steps.retain(|step| step.field.name != ADD_ONS_FIELD);
    }

    let catalog =
        Catalog::new().with_list(SERVICE_OPTIONS_LIST, quote::choice_options(options));
    Loader::builder(raw).with_catalog(catalog).build().load()
}

fn load_preset(json: &str, catalog: Catalog) -> Result<WorkflowDefinition, DefinitionError> {
    let raw = RawWorkflow::from_json(json)?;
    Loader::builder(raw).with_catalog(catalog).build().load()
}
