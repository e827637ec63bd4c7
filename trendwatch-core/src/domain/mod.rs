//! Core domain types: the price window and the recommendation category.

pub mod action;
pub mod window;

pub use action::Action;
pub use window::PriceWindow;
