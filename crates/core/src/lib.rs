//! Core business logic for Bankd.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and state machines
//! live here.
//!
//! # Modules
//!
//! - `account` - Account domain types and account-number generation
//! - `application` - Application review state machine and payload validation
//! - `auth` - Password hashing
//! - `movement` - Balance movement validation (deposits and withdrawals)

pub mod account;
pub mod application;
pub mod auth;
pub mod movement;
