//! Authentication logic: password hashing.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
