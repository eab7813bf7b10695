pub mod conversation;
pub mod models;
pub mod store;

pub use conversation::{Reply, converse};
pub use models::{ChatTurn, Role};
pub use store::{Session, SessionHandle, SessionStore};
