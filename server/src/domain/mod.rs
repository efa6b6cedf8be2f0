//! Domain logic for the books platform
//!
//! - `credential` - Password hash value object
//! - `users` - Sign-up, sign-in, profiles and user management
//! - `books` - Book management and book assets
//! - `error` - Service-level error type

pub mod books;
pub mod credential;
pub mod error;
pub mod users;

pub use books::BookService;
pub use credential::{Credential, CredentialError};
pub use error::DomainError;
pub use users::UserService;
