use itertools::Itertools;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::QuotePolicy;
use crate::error::QuoteError;
use crate::workflow::ChoiceOption;

/// A paid add-on offered with a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: String,
    #[serde(alias = "option_name", alias = "optionName")]
    pub name: String,
    #[serde(alias = "extraCost")]
    pub extra_cost: Decimal,
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl ServiceOption {
    pub fn new(id: &str, name: &str, extra_cost: Decimal) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            extra_cost,
            is_default: false,
            description: None,
        }
    }

    pub fn preselected(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Price breakdown of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingQuote {
    pub base_price: Decimal,
    pub selected_option_ids: Vec<String>,
    pub subtotal: Decimal,
    pub deposit: Decimal,
    pub remaining: Decimal,
    pub escrow_hold: Decimal,
}

/// Computes the price breakdown for `base_price` plus the selected add-ons.
///
/// A selected id is counted once even if repeated. Escrow is rounded to two
/// decimal places, midpoint away from zero.
pub fn compute_quote<I, S>(
    base_price: Decimal,
    options: &[ServiceOption],
    selected_option_ids: I,
    policy: &QuotePolicy,
) -> Result<BookingQuote, QuoteError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let selected: Vec<String> = selected_option_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .unique()
        .collect();

    let mut subtotal = base_price;
    for id in &selected {
        let option = options
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| QuoteError::UnknownOption { id: id.clone() })?;
        subtotal += option.extra_cost;
    }

    if subtotal < policy.deposit {
        return Err(QuoteError::DepositExceedsSubtotal {
            subtotal,
            deposit: policy.deposit,
        });
    }

    let remaining = subtotal - policy.deposit;
    let escrow_hold = (remaining * policy.escrow_fraction)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    tracing::debug!(
        subtotal = %subtotal,
        remaining = %remaining,
        escrow_hold = %escrow_hold,
        "quote computed"
    );

    Ok(BookingQuote {
        base_price,
        selected_option_ids: selected,
        subtotal,
        deposit: policy.deposit,
        remaining,
        escrow_hold,
    })
}

/// Ids of the options preselected when a booking opens.
pub fn default_selection(options: &[ServiceOption]) -> Vec<String> {
    options
        .iter()
        .filter(|o| o.is_default)
        .map(|o| o.id.clone())
        .collect()
}

/// The add-ons as choice options, so a booking step can offer them.
pub fn choice_options(options: &[ServiceOption]) -> Vec<ChoiceOption> {
    options
        .iter()
        .map(|o| ChoiceOption {
            value: o.id.clone(),
            label: o.name.clone(),
            default: o.is_default,
        })
        .collect()
}
