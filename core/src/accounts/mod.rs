// gemstone/src/accounts/mod.rs

//! Users and their roles. Password hashing and session tokens live in the
//! web application; this module only knows about hashes.

pub mod model;
pub mod store;

pub use model::{normalize_email, Address, NewUser, ProfileUpdate, Role, User};
pub use store::UserStore;
