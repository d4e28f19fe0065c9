//! User records and the store that persists them.

pub mod models;
pub mod store;

pub use models::{FieldValue, User, UserField};
pub use store::UserStore;
