//! Port traits: the seams between use cases and the outside world.

mod error;
mod external;
mod repos;
mod testing;

pub use error::{LlmError, StoreError};
pub use external::{LlmPort, LlmRequest, LlmResponse};
pub use repos::StoryStorePort;
#[cfg(test)]
pub use testing::MockClockPort;
pub use testing::ClockPort;
