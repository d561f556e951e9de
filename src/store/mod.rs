//! Account persistence interfaces and the in-memory backend

pub mod memory;
pub mod traits;

pub use memory::MemoryUserStore;
pub use traits::{normalize_email, Account, UserStore};
