//! Authentication module
//!
//! JWT token issuing/validation, Argon2 password hashing and the axum
//! middleware that injects [`CurrentUser`] into requests.

mod extractor;
mod jwt;
mod middleware;
mod password;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use password::{hash_password, verify_password};
