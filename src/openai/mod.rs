pub mod assistants;
pub mod error;

pub use assistants::{AssistantClient, Exchange, PollPolicy, RunState, RunStatus};
pub use error::{AssistantError, ErrorKind};
