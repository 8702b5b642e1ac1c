// storefront/src/services/mod.rs

//! Domain services that sit between the HTTP handlers and the store. The
//! multi-step write flows (add-to-cart, checkout) live in `pipelines`
//! instead; everything here is a single read or a short read-then-write.

pub mod cart;
pub mod catalog;
pub mod orders;
