//! Checkout
//!
//! Validates customer and shipping input and, on success, drains the cart
//! into the order ledger. Side effects are strictly ordered: the ledger
//! append happens before the cart clear, so an interruption between the two
//! can only duplicate an order snapshot, never lose one.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{cart::Cart, history::ActionHistory, orders::OrderLedger};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"^\+?[0-9][0-9 \-]{6,17}$"));
static CARD_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{13,19}$"));
static CVV_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{3,4}$"));

#[expect(clippy::expect_used, reason = "patterns are compile-time constants")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid pattern literal")
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field the failure belongs to.
    pub field: &'static str,

    /// User-facing reason.
    pub reason: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            reason: "this field is required".to_string(),
        }
    }

    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors signalled by the checkout orchestrator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout was attempted with zero cart lines.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// One or more form fields failed validation.
    #[error("checkout form validation failed on {} field(s)", .0.len())]
    ValidationFailed(SmallVec<[FieldError; 4]>),

    /// The operation is not valid in the current checkout state.
    #[error("checkout is in state {found:?}, expected {expected}")]
    InvalidState {
        /// State the operation requires.
        expected: &'static str,
        /// State the checkout was actually in.
        found: CheckoutState,
    },
}

/// Customer contact details.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

/// Shipping address details.
#[derive(Debug, Clone, Default)]
pub struct ShippingDetails {
    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub zip: String,

    /// Country
    pub country: String,
}

/// Card payment details. Optional on the form.
#[derive(Debug, Clone)]
pub struct CardDetails {
    /// Card number, digits only.
    pub number: String,

    /// Card verification value.
    pub cvv: String,

    /// Expiry month, 1 through 12.
    pub expiry_month: u32,

    /// Expiry year, four digits.
    pub expiry_year: i32,
}

/// The checkout form as submitted.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    /// Customer contact details.
    pub customer: CustomerDetails,

    /// Shipping address details.
    pub shipping: ShippingDetails,

    /// Card details, when paying by card.
    pub card: Option<CardDetails>,
}

impl CheckoutForm {
    /// Validate every field, collecting all failures.
    #[must_use]
    pub fn validate(&self, now: DateTime<Utc>) -> SmallVec<[FieldError; 4]> {
        let mut errors = SmallVec::new();

        let required = [
            ("firstName", &self.customer.first_name),
            ("lastName", &self.customer.last_name),
            ("email", &self.customer.email),
            ("phone", &self.customer.phone),
            ("address", &self.shipping.address),
            ("city", &self.shipping.city),
            ("zip", &self.shipping.zip),
            ("country", &self.shipping.country),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field));
            }
        }

        let email = self.customer.email.trim();
        if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
            errors.push(FieldError::invalid("email", "enter a valid email address"));
        }

        let phone = self.customer.phone.trim();
        if !phone.is_empty() && !PHONE_PATTERN.is_match(phone) {
            errors.push(FieldError::invalid("phone", "enter a valid phone number"));
        }

        if let Some(card) = &self.card {
            validate_card(card, now, &mut errors);
        }

        errors
    }
}

fn validate_card(card: &CardDetails, now: DateTime<Utc>, errors: &mut SmallVec<[FieldError; 4]>) {
    if !CARD_NUMBER_PATTERN.is_match(card.number.trim()) {
        errors.push(FieldError::invalid(
            "cardNumber",
            "enter a valid card number",
        ));
    }

    if !CVV_PATTERN.is_match(card.cvv.trim()) {
        errors.push(FieldError::invalid("cvv", "enter a valid security code"));
    }

    if !(1..=12).contains(&card.expiry_month) {
        errors.push(FieldError::invalid("expiry", "enter a valid expiry month"));
    } else if (card.expiry_year, card.expiry_month) < (now.year(), now.month()) {
        errors.push(FieldError::invalid("expiry", "card has expired"));
    }
}

/// Checkout state machine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// No checkout in progress.
    #[default]
    Idle,

    /// Cart contents under review, form not yet accepted.
    Reviewing,

    /// Form submitted, validation and order placement in flight.
    Submitting,

    /// Order placed; cart and history have been cleared.
    Completed,
}

/// Checkout Orchestrator
///
/// Walks `Idle → Reviewing → Submitting → Completed`, falling back to
/// `Reviewing` when validation fails.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    /// Create an orchestrator in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state machine position.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Move from `Idle` to `Reviewing`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines; the
    /// state stays `Idle`.
    pub fn begin(&mut self, cart: &Cart<'_>) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Reviewing;
        Ok(())
    }

    /// Submit the form: validate, and on success snapshot the cart into the
    /// ledger, then clear the cart and the action history.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidState`]: `begin` has not been called.
    /// - [`CheckoutError::ValidationFailed`]: one or more fields failed;
    ///   the state returns to `Reviewing` and the cart is untouched.
    pub fn submit<'a>(
        &mut self,
        form: &CheckoutForm,
        cart: &mut Cart<'a>,
        history: &mut ActionHistory<'a>,
        ledger: &mut OrderLedger<'a>,
    ) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::Reviewing {
            return Err(CheckoutError::InvalidState {
                expected: "Reviewing",
                found: self.state,
            });
        }

        self.state = CheckoutState::Submitting;

        let now = Utc::now();
        let errors = form.validate(now);
        if !errors.is_empty() {
            self.state = CheckoutState::Reviewing;
            return Err(CheckoutError::ValidationFailed(errors));
        }

        // Ledger append happens-before cart clear: an interruption between
        // the two can duplicate an order, never lose one.
        ledger.add_order(cart, now);
        cart.clear();
        history.clear();

        self.state = CheckoutState::Completed;
        info!("checkout completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PHP};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::products::ProductKey;

    use super::*;

    fn key() -> ProductKey {
        let mut map: SlotMap<ProductKey, ()> = SlotMap::with_key();
        map.insert(())
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            customer: CustomerDetails {
                first_name: "Maria".to_string(),
                last_name: "Santos".to_string(),
                email: "maria@example.com".to_string(),
                phone: "+63 917 555 0199".to_string(),
            },
            shipping: ShippingDetails {
                address: "12 Sampaguita St".to_string(),
                city: "Quezon City".to_string(),
                zip: "1100".to_string(),
                country: "Philippines".to_string(),
            },
            card: None,
        }
    }

    fn cart_with_one_line<'a>() -> Cart<'a> {
        let mut cart = Cart::new(PHP);
        cart.add_item(key(), Money::from_minor(3490, PHP), 2)
            .expect("quantity within limit");
        cart
    }

    #[test]
    fn begin_with_empty_cart_fails_and_stays_idle() {
        let cart = Cart::new(PHP);
        let mut checkout = Checkout::new();

        assert_eq!(checkout.begin(&cart), Err(CheckoutError::EmptyCart));
        assert_eq!(checkout.state(), CheckoutState::Idle);
    }

    #[test]
    fn begin_with_items_moves_to_reviewing() -> TestResult {
        let cart = cart_with_one_line();
        let mut checkout = Checkout::new();

        checkout.begin(&cart)?;

        assert_eq!(checkout.state(), CheckoutState::Reviewing);
        Ok(())
    }

    #[test]
    fn submit_without_begin_is_an_invalid_state() {
        let mut cart = cart_with_one_line();
        let mut history = ActionHistory::new();
        let mut ledger = OrderLedger::new();
        let mut checkout = Checkout::new();

        let result = checkout.submit(&valid_form(), &mut cart, &mut history, &mut ledger);

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidState {
                found: CheckoutState::Idle,
                ..
            })
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn validation_failure_returns_to_reviewing_without_mutation() -> TestResult {
        let mut cart = cart_with_one_line();
        let mut history = ActionHistory::new();
        let mut ledger = OrderLedger::new();
        let mut checkout = Checkout::new();
        checkout.begin(&cart)?;

        let mut form = valid_form();
        form.customer.email = "not-an-email".to_string();

        let result = checkout.submit(&form, &mut cart, &mut history, &mut ledger);

        let Err(CheckoutError::ValidationFailed(errors)) = result else {
            return Err("expected validation failure".into());
        };
        assert!(errors.iter().any(|e| e.field == "email"));
        assert_eq!(checkout.state(), CheckoutState::Reviewing);
        assert_eq!(cart.len(), 1);
        assert!(ledger.is_empty());

        Ok(())
    }

    #[test]
    fn missing_required_fields_are_reported_per_field() {
        let form = CheckoutForm::default();

        let errors = form.validate(Utc::now());

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"firstName"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"country"));
        assert_eq!(fields.len(), 8, "one failure per required field");
    }

    #[test]
    fn successful_submit_appends_order_then_clears_cart_and_history() -> TestResult {
        let mut cart = cart_with_one_line();
        let total_at_submission = cart.total();

        let mut history = ActionHistory::new();
        history.push(crate::history::ActionRecord::Added {
            product: key(),
            quantity: 2,
        });

        let mut ledger = OrderLedger::new();
        let mut checkout = Checkout::new();
        checkout.begin(&cart)?;

        checkout.submit(&valid_form(), &mut cart, &mut history, &mut ledger)?;

        assert_eq!(checkout.state(), CheckoutState::Completed);
        assert_eq!(ledger.len(), 1);

        let order = ledger.orders().first().ok_or("expected order")?;
        assert_eq!(order.total(), total_at_submission);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, PHP));
        assert!(history.is_empty());

        Ok(())
    }

    #[test]
    fn expired_card_is_rejected() {
        let mut form = valid_form();
        form.card = Some(CardDetails {
            number: "4111111111111111".to_string(),
            cvv: "123".to_string(),
            expiry_month: 1,
            expiry_year: 2020,
        });

        let errors = form.validate(Utc::now());

        assert!(
            errors
                .iter()
                .any(|e| e.field == "expiry" && e.reason.contains("expired"))
        );
    }

    #[test]
    fn future_card_passes_validation() {
        let mut form = valid_form();
        form.card = Some(CardDetails {
            number: "4111111111111111".to_string(),
            cvv: "123".to_string(),
            expiry_month: 12,
            expiry_year: 2099,
        });

        assert!(form.validate(Utc::now()).is_empty());
    }

    #[test]
    fn malformed_card_fields_are_rejected() {
        let mut form = valid_form();
        form.card = Some(CardDetails {
            number: "not a number".to_string(),
            cvv: "12".to_string(),
            expiry_month: 13,
            expiry_year: 2099,
        });

        let errors = form.validate(Utc::now());

        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"cardNumber"));
        assert!(fields.contains(&"cvv"));
        assert!(fields.contains(&"expiry"));
    }

    #[test]
    fn malformed_phone_is_rejected() {
        let mut form = valid_form();
        form.customer.phone = "call me".to_string();

        let errors = form.validate(Utc::now());

        assert!(errors.iter().any(|e| e.field == "phone"));
    }
}
