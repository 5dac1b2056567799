//! Order lifecycle and payment enums.
//!
//! The order state machine is deliberately loose: admins may move an order
//! freely between the non-terminal states, and `Cancelled` is the single
//! terminal state with no outgoing transitions. Customers may only cancel an
//! order that is still `Pending`.

use serde::{Deserialize, Serialize};

use crate::pg_text_enum;

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used by the admin stats breakdown.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether a customer may still cancel the order.
    ///
    /// Only orders that have not started processing qualify; everything else
    /// must go through store support.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether an admin may overwrite this status with another one.
    ///
    /// `Cancelled` is terminal. Any other state accepts any of the five
    /// statuses, including moving backwards.
    #[must_use]
    pub const fn accepts_status_change(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

pg_text_enum!(OrderStatus);

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[serde(alias = "cash")]
    Cash,
    /// Manual bank transfer via QR code, confirmed out of band.
    #[serde(rename = "QR", alias = "qr")]
    Qr,
}

impl PaymentMethod {
    /// The order and payment status a fresh order starts in.
    ///
    /// Cash orders go straight to `Processing` and are paid on delivery. QR
    /// orders optimistically mark the payment as received and wait in
    /// `Pending` until an operator confirms the transfer.
    #[must_use]
    pub const fn initial_order_state(self) -> (OrderStatus, PaymentStatus) {
        match self {
            Self::Cash => (OrderStatus::Processing, PaymentStatus::Pending),
            Self::Qr => (OrderStatus::Pending, PaymentStatus::Paid),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Qr => write!(f, "QR"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" | "cash" => Ok(Self::Cash),
            "QR" | "qr" => Ok(Self::Qr),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

pg_text_enum!(PaymentMethod);

/// Whether payment for an order has been received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

pg_text_enum!(PaymentStatus);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_is_cancellable() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(!OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!OrderStatus::Cancelled.accepts_status_change());
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert!(status.accepts_status_change(), "{status} should accept changes");
        }
    }

    #[test]
    fn test_status_display_parse_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("Delayed".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_cash_order_starts_processing_unpaid() {
        let (status, payment) = PaymentMethod::Cash.initial_order_state();
        assert_eq!(status, OrderStatus::Processing);
        assert_eq!(payment, PaymentStatus::Pending);
    }

    #[test]
    fn test_qr_order_starts_pending_paid() {
        let (status, payment) = PaymentMethod::Qr.initial_order_state();
        assert_eq!(status, OrderStatus::Pending);
        assert_eq!(payment, PaymentStatus::Paid);
    }

    #[test]
    fn test_payment_method_accepts_lowercase_wire_form() {
        let method: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(method, PaymentMethod::Cash);
        let method: PaymentMethod = serde_json::from_str("\"QR\"").unwrap();
        assert_eq!(method, PaymentMethod::Qr);
        assert_eq!(serde_json::to_string(&PaymentMethod::Qr).unwrap(), "\"QR\"");
    }
}
