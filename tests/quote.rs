//! Booking quote and quote policy tests.
mod common;
use common::*;
use rust_decimal_macros::dec;
use stepflow::prelude::*;
use stepflow::quote::default_selection;

#[cfg(test)]
mod quote_tests {
    use super::*;

    #[test]
    fn test_quote_arithmetic() {
        let options = vec![ServiceOption::new("a", "Printed album", dec!(500)).preselected()];
        let quote = compute_quote(dec!(5000), &options, ["a"], &QuotePolicy::default())
            .expect("Quote should compute");

        assert_eq!(quote.subtotal, dec!(5500));
        assert_eq!(quote.deposit, dec!(999));
        assert_eq!(quote.remaining, dec!(4501));
        assert_eq!(quote.escrow_hold, dec!(1125.25));
        assert_eq!(quote.selected_option_ids, vec!["a".to_string()]);
    }

    #[test]
    fn test_no_add_ons() {
        let policy = QuotePolicy::default();
        let quote =
            compute_quote(dec!(5000), &booking_options(), Vec::<String>::new(), &policy).unwrap();
        assert_eq!(quote.subtotal, dec!(5000));
        assert_eq!(quote.remaining, dec!(4001));
        assert_eq!(quote.escrow_hold, dec!(1000.25));
    }

    #[test]
    fn test_deposit_exceeding_subtotal_is_rejected() {
        let err = compute_quote(dec!(400), &booking_options(), ["a"], &QuotePolicy::default())
            .unwrap_err();
        assert_eq!(
            err,
            QuoteError::DepositExceedsSubtotal {
                subtotal: dec!(900),
                deposit: dec!(999),
            }
        );

        // Exactly covering the deposit is fine and holds nothing.
        let quote = compute_quote(dec!(499), &booking_options(), ["a"], &QuotePolicy::default())
            .unwrap();
        assert_eq!(quote.remaining, dec!(0));
        assert_eq!(quote.escrow_hold, dec!(0));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let policy = QuotePolicy::default();
        let err = compute_quote(dec!(5000), &booking_options(), ["a", "helicopter"], &policy)
            .unwrap_err();
        assert_eq!(
            err,
            QuoteError::UnknownOption {
                id: "helicopter".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_selection_counts_once() {
        let quote = compute_quote(
            dec!(5000),
            &booking_options(),
            ["drone", "drone", "a"],
            &QuotePolicy::default(),
        )
        .unwrap();
        assert_eq!(quote.subtotal, dec!(7000));
        assert_eq!(
            quote.selected_option_ids,
            vec!["drone".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn test_custom_policy_and_rounding() {
        let policy = QuotePolicy::new(dec!(1000), dec!(0.333)).unwrap();
        let quote = compute_quote(dec!(2001), &[], Vec::<&str>::new(), &policy).unwrap();
        // 1001 * 0.333 = 333.333
        assert_eq!(quote.escrow_hold, dec!(333.33));

        let policy = QuotePolicy::new(dec!(0), dec!(0.5)).unwrap();
        let quote = compute_quote(dec!(0.05), &[], Vec::<&str>::new(), &policy).unwrap();
        // 0.025 rounds away from zero
        assert_eq!(quote.escrow_hold, dec!(0.03));
    }

    #[test]
    fn test_policy_from_json() {
        let policy = QuotePolicy::from_json(r#"{ "deposit": 1500, "escrowFraction": "0.1" }"#).unwrap();
        assert_eq!(policy.deposit, dec!(1500));
        assert_eq!(policy.escrow_fraction, dec!(0.1));

        let quote = compute_quote(dec!(2500), &[], Vec::<&str>::new(), &policy).unwrap();
        assert_eq!(quote.escrow_hold, dec!(100));
    }

    #[test]
    fn test_default_selection() {
        assert_eq!(default_selection(&booking_options()), vec!["a".to_string()]);
    }

    #[test]
    fn test_quote_from_booking_session() {
        let options = booking_options();
        let definition = stepflow::presets::service_booking(&options).unwrap();
        let engine = WorkflowEngine::new(definition);

        let mut state = engine.start();
        state = engine.toggle_selection(&state, "add_ons", "drone").unwrap();
        state = engine.advance(&state).unwrap();
        state = engine.set_answer(&state, "event_date", "2025-02-14").unwrap();
        state = engine.advance(&state).unwrap();
        state = engine.set_answer(&state, "time_slot", "10:00-14:00").unwrap();
        state = engine.advance(&state).unwrap();
        state = engine.advance(&state).unwrap();
        assert!(state.is_terminal());

        let payload = engine.assemble(&state).unwrap();
        let selected = payload.get("add_ons").and_then(Answer::as_list).unwrap();
        assert_eq!(selected, ["a".to_string(), "drone".to_string()]);

        let quote = compute_quote(dec!(5000), &options, selected, &QuotePolicy::default()).unwrap();
        assert_eq!(quote.subtotal, dec!(7000));
        assert_eq!(quote.remaining, dec!(6001));
        assert_eq!(quote.escrow_hold, dec!(1500.25));
    }
}
