pub mod instance;
pub mod params;
pub mod party;
pub mod queue;
pub mod summary;

pub use instance::{Instance, InstanceId};
pub use params::{parse_whole_number, Params, ParamsError};
pub use party::Party;
pub use queue::QueueCounts;
pub use summary::{InstanceSummary, Summary};
