//! Role-based authorization table.
//!
//! Every privileged operation the API exposes is named here, and
//! [`is_allowed`] is the single place that decides which role may perform it.
//! Handlers ask the table instead of comparing role values inline, so the
//! full permission surface is readable (and testable) in one screen.
//!
//! Operations that only require *a* logged-in caller (cart, checkout, own
//! orders, own reviews, own stats) are not listed: authentication itself is
//! the gate, and ownership checks happen against the caller's identity.

use crate::types::Role;

/// Privileged operations gated on role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create, update or delete catalog entries (products and categories).
    ManageCatalog,
    /// List every order in the store.
    ViewAllOrders,
    /// Overwrite an order's fulfilment status.
    ChangeOrderStatus,
    /// List every registered customer.
    ViewAllCustomers,
    /// Promote a customer to admin.
    PromoteUser,
    /// Read the store-wide dashboard numbers.
    ViewAdminStats,
}

/// Whether `role` may perform `operation`.
#[must_use]
pub const fn is_allowed(role: Role, operation: Operation) -> bool {
    match role {
        Role::Admin => match operation {
            Operation::ManageCatalog
            | Operation::ViewAllOrders
            | Operation::ChangeOrderStatus
            | Operation::ViewAllCustomers
            | Operation::PromoteUser
            | Operation::ViewAdminStats => true,
        },
        Role::Customer => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPERATIONS: [Operation; 6] = [
        Operation::ManageCatalog,
        Operation::ViewAllOrders,
        Operation::ChangeOrderStatus,
        Operation::ViewAllCustomers,
        Operation::PromoteUser,
        Operation::ViewAdminStats,
    ];

    #[test]
    fn test_admin_may_do_everything_listed() {
        for op in ALL_OPERATIONS {
            assert!(is_allowed(Role::Admin, op), "{op:?} should be allowed for Admin");
        }
    }

    #[test]
    fn test_customer_may_do_none_of_it() {
        for op in ALL_OPERATIONS {
            assert!(!is_allowed(Role::Customer, op), "{op:?} should be denied for Customer");
        }
    }
}
