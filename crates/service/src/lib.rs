//! Service layer for the user registry.
//! - Keeps storage behind the `UserStorage` trait.
//! - Runs validation and the read-modify-write cycle for every operation.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod user_service;
