// storefront/src/models/mod.rs

//! Contains data structures representing database entities.

// Declare child modules for each model
pub mod cart_line;
pub mod order;
pub mod order_line;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use cart_line::{CartLine, CartLineWithProduct};
pub use order::{NewOrder, Order, OrderStatus, ShippingAddress};
pub use order_line::{NewOrderLine, OrderLine};
pub use product::{Category, Product};
pub use user::User;
