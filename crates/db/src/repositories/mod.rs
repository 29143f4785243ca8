//! Repository layer for database access.

pub mod account;
pub mod application;
pub mod transaction;
pub mod user;

pub use account::AccountRepository;
pub use application::ApplicationRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
