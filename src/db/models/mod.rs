//! Database models
//!
//! Document shapes stored in SurrealDB plus the create/update payloads
//! accepted by the API.

pub mod serde_id;

mod cart;
mod discount;
mod order;
mod product;
mod user;

pub use cart::{Cart, CartAdd, CartItem};
pub use discount::{Discount, DiscountCreate};
pub use order::{Order, OrderItem, OrderStatus, OrderStatusUpdate, Shipping};
pub use product::{Product, ProductCreate, ProductFilter, ProductUpdate};
pub use user::{
    LoginRequest, ProfileUpdate, RegisterRequest, User, UserProfile, ROLE_ADMIN, ROLE_USER,
};
