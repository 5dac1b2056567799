//! Price arithmetic on decimal amounts.
//!
//! All money in the system is a plain [`Decimal`] in the store currency
//! (display-only, defaults to NPR). There is no multi-currency support.

use rust_decimal::Decimal;

/// Apply a percentage discount to a list price.
///
/// Returns `(final_price, old_price)`: with a non-zero discount the final
/// price is reduced and the list price is kept as `old_price` for display;
/// with a zero discount the list price stands alone.
///
/// The discount is a whole-number percentage (e.g. `10` for 10% off).
#[must_use]
pub fn discounted_price(list_price: Decimal, discount_percent: u32) -> (Decimal, Option<Decimal>) {
    if discount_percent == 0 {
        return (list_price, None);
    }

    let percent = Decimal::from(discount_percent);
    let final_price = list_price - (list_price * percent) / Decimal::ONE_HUNDRED;
    (final_price, Some(list_price))
}

/// Total for a quantity of items at a unit price.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_discount_keeps_list_price() {
        let (price, old) = discounted_price(Decimal::new(49_999, 2), 0);
        assert_eq!(price, Decimal::new(49_999, 2));
        assert_eq!(old, None);
    }

    #[test]
    fn test_discount_reduces_and_keeps_old_price() {
        let (price, old) = discounted_price(Decimal::new(200, 0), 25);
        assert_eq!(price, Decimal::new(150, 0));
        assert_eq!(old, Some(Decimal::new(200, 0)));
    }

    #[test]
    fn test_discount_exact_decimal_arithmetic() {
        // 10% off 99.99 must not pick up float noise
        let (price, _) = discounted_price(Decimal::new(9_999, 2), 10);
        assert_eq!(price, Decimal::new(89_991, 3));
    }

    #[test]
    fn test_full_discount_is_free() {
        let (price, old) = discounted_price(Decimal::new(80, 0), 100);
        assert_eq!(price, Decimal::ZERO);
        assert_eq!(old, Some(Decimal::new(80, 0)));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Decimal::new(100, 0), 2), Decimal::new(200, 0));
        assert_eq!(line_total(Decimal::new(1_999, 2), 3), Decimal::new(5_997, 2));
        assert_eq!(line_total(Decimal::new(5, 0), 0), Decimal::ZERO);
    }
}
