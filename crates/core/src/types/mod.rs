//! Shared type definitions.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{discounted_price, line_total};
pub use role::Role;
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
