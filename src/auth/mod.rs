//! Authentication module
//!
//! - JWT issuing and verification for access, refresh and purpose tokens
//! - bcrypt password hashing
//! - Login sessions with refresh token rotation and revocation

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, IssuedToken, JwtError, TokenService, TokenType};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, SessionTokens};
