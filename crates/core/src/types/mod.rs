//! Shared type definitions.

pub mod email;
pub mod id;
pub mod status;
pub mod username;

pub use email::{Email, EmailError};
pub use id::{CartId, LineItemId, OrderId, ProductId, UserId};
pub use status::{OrderStatus, PaymentStatus, UserRole};
pub use username::{Username, UsernameError};
