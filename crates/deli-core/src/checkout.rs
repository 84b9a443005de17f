//! # Checkout / Payment Flow
//!
//! Orchestrates the sequence from "Checkout" tap to a completed
//! transaction: payment-method selection, cash tendering with change, or
//! card confirmation against an external terminal.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Idle ──checkout(cart non-empty)──► SelectingPayment ──cancel──► Idle  │
//! │                                        │         │                      │
//! │                              cash      │         │      card            │
//! │                                        ▼         ▼                      │
//! │                                 CashTender     CardConfirm              │
//! │                                 (digits +      ("collected?")           │
//! │                                  presets)          │    │               │
//! │                                     │              │    └─ No ──► back  │
//! │                    insufficient ◄── │ submit       │ Yes    to payment  │
//! │                    (reject in       ▼              ▼                    │
//! │                     place)      confirm ──────► complete()              │
//! │                                     │               │                   │
//! │                                     ▼               ▼                   │
//! │                                  Change           Done                  │
//! │                            (cart kept until    (cart cleared            │
//! │                             "Next Transaction")  immediately)           │
//! │                                     │               │                   │
//! │                                     └──────► Idle ◄─┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is pure: completing a transaction is an *effect request*
//! (`Ok(Some(method))`) that the register session executes against the
//! store, reporting back success or failure. An in-flight completion gates
//! duplicate submission.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;

/// Tender entry ceiling; digits past $999,999.99 are keying errors.
const MAX_TENDER_CENTS: i64 = 99_999_999;

// =============================================================================
// State
// =============================================================================

/// Where the checkout flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Ringing up items; no checkout in progress.
    Idle,
    /// Payment-method selection screen.
    SelectingPayment,
    /// Cash tender entry; `confirming` is the "tendered $X, correct?"
    /// prompt after a sufficient submit.
    CashTender {
        cash_given_cents: i64,
        confirming: bool,
    },
    /// Card total on screen; waiting for "did you collect payment?".
    CardConfirm,
    /// Cash change screen. The cart is deliberately still intact so the
    /// change amount and receipt stay inspectable.
    Change {
        cash_given_cents: i64,
        change_cents: i64,
    },
    /// Card success screen; cart already cleared.
    Done,
}

impl CheckoutState {
    fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::SelectingPayment => "payment selection",
            CheckoutState::CashTender { .. } => "cash tender",
            CheckoutState::CardConfirm => "card confirmation",
            CheckoutState::Change { .. } => "change",
            CheckoutState::Done => "done",
        }
    }
}

// =============================================================================
// Flow
// =============================================================================

/// The checkout flow state machine.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    state: CheckoutState,
    in_flight: Option<PaymentMethod>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// Creates an idle flow.
    pub fn new() -> Self {
        CheckoutFlow {
            state: CheckoutState::Idle,
            in_flight: None,
        }
    }

    /// Current state, for rendering.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Whether a completion call is in flight (duplicate-submit gate).
    pub fn processing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Cash currently tendered, when on the tender or change screen.
    pub fn cash_given_cents(&self) -> Option<i64> {
        match self.state {
            CheckoutState::CashTender {
                cash_given_cents, ..
            }
            | CheckoutState::Change {
                cash_given_cents, ..
            } => Some(cash_given_cents),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Entry & method selection
    // -------------------------------------------------------------------------

    /// Starts checkout. An empty cart is a no-op with a message and no
    /// transition.
    pub fn begin(&mut self, cart_is_empty: bool) -> CoreResult<()> {
        self.require(CheckoutState::Idle == self.state, "start checkout")?;
        if cart_is_empty {
            return Err(CoreError::EmptyCart);
        }
        self.state = CheckoutState::SelectingPayment;
        Ok(())
    }

    /// Backs out of payment selection; discards no cart state.
    pub fn cancel(&mut self) -> CoreResult<()> {
        self.require(
            matches!(self.state, CheckoutState::SelectingPayment),
            "cancel checkout",
        )?;
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// Chooses cash: opens tender entry.
    pub fn select_cash(&mut self) -> CoreResult<()> {
        self.require(
            matches!(self.state, CheckoutState::SelectingPayment),
            "select cash",
        )?;
        self.state = CheckoutState::CashTender {
            cash_given_cents: 0,
            confirming: false,
        };
        Ok(())
    }

    /// Chooses card: shows the card total for manual terminal entry.
    pub fn select_card(&mut self) -> CoreResult<()> {
        self.require(
            matches!(self.state, CheckoutState::SelectingPayment),
            "select card",
        )?;
        self.state = CheckoutState::CardConfirm;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Cash tendering
    // -------------------------------------------------------------------------

    /// Appends one digit to the tendered amount (integer-cent entry:
    /// "2", "0", "0", "0" keys in $20.00).
    pub fn tender_digit(&mut self, digit: u8) -> CoreResult<()> {
        let cash = self.tender_entry("enter tender digits")?;
        let next = *cash * 10 + digit.min(9) as i64;
        if next <= MAX_TENDER_CENTS {
            *cash = next;
        }
        Ok(())
    }

    /// Adds a quick-preset amount ($1, $5, $20, ... buttons accumulate).
    pub fn tender_preset(&mut self, cents: i64) -> CoreResult<()> {
        let cash = self.tender_entry("add a preset amount")?;
        *cash = (*cash + cents.max(0)).min(MAX_TENDER_CENTS);
        Ok(())
    }

    /// Clears the tendered amount back to zero.
    pub fn tender_clear(&mut self) -> CoreResult<()> {
        let cash = self.tender_entry("clear the tender")?;
        *cash = 0;
        Ok(())
    }

    /// Submits the tendered amount against the cash total.
    ///
    /// Insufficient cash is rejected in place: the machine stays on the
    /// tender screen with the amount intact and no transition happens.
    pub fn submit_tender(&mut self, cash_total_cents: i64) -> CoreResult<()> {
        match &mut self.state {
            CheckoutState::CashTender {
                cash_given_cents,
                confirming,
            } if !*confirming => {
                if *cash_given_cents < cash_total_cents {
                    return Err(CoreError::InsufficientTender {
                        given_cents: *cash_given_cents,
                        required_cents: cash_total_cents,
                    });
                }
                *confirming = true;
                Ok(())
            }
            _ => Err(self.wrong_state("submit the tender")),
        }
    }

    /// Answers the "tendered $X, correct?" prompt.
    ///
    /// Confirming requests transaction completion (`Ok(Some(Cash))`) unless
    /// one is already in flight; declining returns to tender entry without
    /// losing the entered amount.
    pub fn confirm_cash(&mut self, confirm: bool) -> CoreResult<Option<PaymentMethod>> {
        match &mut self.state {
            CheckoutState::CashTender { confirming, .. } if *confirming => {
                if !confirm {
                    *confirming = false;
                    return Ok(None);
                }
                if self.in_flight.is_some() {
                    return Ok(None);
                }
                self.in_flight = Some(PaymentMethod::Cash);
                Ok(Some(PaymentMethod::Cash))
            }
            _ => Err(self.wrong_state("confirm the tender")),
        }
    }

    // -------------------------------------------------------------------------
    // Card confirmation
    // -------------------------------------------------------------------------

    /// Answers "did you collect payment?" on the card screen. "No" simply
    /// returns to payment selection; nothing was captured.
    pub fn confirm_card(&mut self, collected: bool) -> CoreResult<Option<PaymentMethod>> {
        self.require(
            matches!(self.state, CheckoutState::CardConfirm),
            "confirm card collection",
        )?;

        if !collected {
            self.state = CheckoutState::SelectingPayment;
            return Ok(None);
        }
        if self.in_flight.is_some() {
            return Ok(None);
        }
        self.in_flight = Some(PaymentMethod::Card);
        Ok(Some(PaymentMethod::Card))
    }

    // -------------------------------------------------------------------------
    // Completion callbacks
    // -------------------------------------------------------------------------

    /// The completion call persisted the transaction.
    ///
    /// Cash advances to the change screen with exact integer-cent change;
    /// card advances to the success screen (the session clears the cart).
    pub fn completion_succeeded(&mut self, cash_total_cents: i64) {
        match self.in_flight.take() {
            Some(PaymentMethod::Cash) => {
                let cash_given_cents = self.cash_given_cents().unwrap_or(0);
                let change =
                    Money::from_cents(cash_given_cents) - Money::from_cents(cash_total_cents);
                self.state = CheckoutState::Change {
                    cash_given_cents,
                    change_cents: change.cents(),
                };
            }
            Some(PaymentMethod::Card) => {
                self.state = CheckoutState::Done;
            }
            None => {}
        }
    }

    /// The completion call failed. State does not advance; the operator may
    /// retry from exactly where they were.
    pub fn completion_failed(&mut self) {
        self.in_flight = None;
    }

    /// "Next Transaction" dismisses the change screen; the session clears
    /// the cart at this moment, not before.
    pub fn next_transaction(&mut self) -> CoreResult<()> {
        self.require(
            matches!(self.state, CheckoutState::Change { .. }),
            "start the next transaction",
        )?;
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// Dismisses the card success screen.
    pub fn acknowledge_done(&mut self) -> CoreResult<()> {
        self.require(matches!(self.state, CheckoutState::Done), "dismiss")?;
        self.state = CheckoutState::Idle;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn tender_entry(&mut self, action: &'static str) -> CoreResult<&mut i64> {
        // Resolve the rejection label before borrowing mutably; the Ok arm's
        // borrow flows out of the match.
        let state = match &self.state {
            CheckoutState::CashTender {
                confirming: true, ..
            } => "tender confirmation",
            other => other.name(),
        };
        match &mut self.state {
            CheckoutState::CashTender {
                cash_given_cents,
                confirming: false,
            } => Ok(cash_given_cents),
            _ => Err(CoreError::InvalidCheckoutAction { action, state }),
        }
    }

    fn require(&self, ok: bool, action: &'static str) -> CoreResult<()> {
        if ok {
            Ok(())
        } else {
            Err(self.wrong_state(action))
        }
    }

    fn wrong_state(&self, action: &'static str) -> CoreError {
        CoreError::InvalidCheckoutAction {
            action,
            state: self.state.name(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at_tender() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new();
        flow.begin(false).unwrap();
        flow.select_cash().unwrap();
        flow
    }

    #[test]
    fn test_empty_cart_checkout_is_rejected() {
        let mut flow = CheckoutFlow::new();
        assert!(matches!(flow.begin(true), Err(CoreError::EmptyCart)));
        assert_eq!(*flow.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_cash_happy_path_with_exact_change() {
        let mut flow = at_tender();

        // Key in $20.00 digit by digit
        for d in [2, 0, 0, 0] {
            flow.tender_digit(d).unwrap();
        }
        assert_eq!(flow.cash_given_cents(), Some(2000));

        // Total is $12.37; change must be exactly $7.63
        flow.submit_tender(1237).unwrap();
        assert_eq!(flow.confirm_cash(true).unwrap(), Some(PaymentMethod::Cash));

        flow.completion_succeeded(1237);
        assert_eq!(
            *flow.state(),
            CheckoutState::Change {
                cash_given_cents: 2000,
                change_cents: 763,
            }
        );

        flow.next_transaction().unwrap();
        assert_eq!(*flow.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_insufficient_cash_rejected_in_place() {
        let mut flow = at_tender();
        flow.tender_preset(999).unwrap();

        let err = flow.submit_tender(1000).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientTender {
                given_cents: 999,
                required_cents: 1000
            }
        ));

        // Still on the tender screen, amount intact, nothing in flight.
        assert_eq!(flow.cash_given_cents(), Some(999));
        assert!(!flow.processing());
        assert!(matches!(
            flow.state(),
            CheckoutState::CashTender {
                confirming: false,
                ..
            }
        ));
    }

    #[test]
    fn test_declining_confirmation_keeps_tender() {
        let mut flow = at_tender();
        flow.tender_preset(2000).unwrap();
        flow.submit_tender(1500).unwrap();

        assert_eq!(flow.confirm_cash(false).unwrap(), None);
        assert_eq!(flow.cash_given_cents(), Some(2000));
        assert!(matches!(
            flow.state(),
            CheckoutState::CashTender {
                confirming: false,
                ..
            }
        ));
    }

    #[test]
    fn test_presets_accumulate() {
        let mut flow = at_tender();
        flow.tender_preset(2000).unwrap();
        flow.tender_preset(500).unwrap();
        assert_eq!(flow.cash_given_cents(), Some(2500));

        flow.tender_clear().unwrap();
        assert_eq!(flow.cash_given_cents(), Some(0));
    }

    #[test]
    fn test_duplicate_submission_is_gated() {
        let mut flow = at_tender();
        flow.tender_preset(2000).unwrap();
        flow.submit_tender(1000).unwrap();

        assert_eq!(flow.confirm_cash(true).unwrap(), Some(PaymentMethod::Cash));
        // Double-tap while the completion call is in flight: ignored.
        assert_eq!(flow.confirm_cash(true).unwrap(), None);
        assert!(flow.processing());
    }

    #[test]
    fn test_completion_failure_allows_retry() {
        let mut flow = at_tender();
        flow.tender_preset(2000).unwrap();
        flow.submit_tender(1000).unwrap();
        flow.confirm_cash(true).unwrap();

        flow.completion_failed();
        assert!(!flow.processing());

        // The confirmation prompt is still up; retry fires again.
        assert_eq!(flow.confirm_cash(true).unwrap(), Some(PaymentMethod::Cash));
    }

    #[test]
    fn test_card_flow() {
        let mut flow = CheckoutFlow::new();
        flow.begin(false).unwrap();
        flow.select_card().unwrap();

        // "No" returns to payment selection, nothing captured.
        assert_eq!(flow.confirm_card(false).unwrap(), None);
        assert_eq!(*flow.state(), CheckoutState::SelectingPayment);

        flow.select_card().unwrap();
        assert_eq!(flow.confirm_card(true).unwrap(), Some(PaymentMethod::Card));
        flow.completion_succeeded(0);
        assert_eq!(*flow.state(), CheckoutState::Done);

        flow.acknowledge_done().unwrap();
        assert_eq!(*flow.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_cancel_from_payment_selection() {
        let mut flow = CheckoutFlow::new();
        flow.begin(false).unwrap();
        flow.cancel().unwrap();
        assert_eq!(*flow.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_tender_digits_rejected_outside_tender_screen() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.tender_digit(5).is_err());

        flow.begin(false).unwrap();
        assert!(flow.tender_digit(5).is_err());
    }
}
