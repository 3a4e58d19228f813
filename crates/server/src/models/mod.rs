//! Domain models for the Mirakle backend.
//!
//! These types represent validated domain objects separate from database row
//! types. Each module pairs with a repository in [`crate::db`].

pub mod address;
pub mod banner;
pub mod cart;
pub mod message;
pub mod order;
pub mod product;
pub mod user;

pub use address::Address;
pub use banner::Banner;
pub use cart::{Cart, CartLineItem, IncomingLineItem};
pub use message::ContactMessage;
pub use order::PaymentOrder;
pub use product::{Product, ProductVariant};
pub use user::{CurrentUser, User};
