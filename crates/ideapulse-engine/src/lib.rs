pub mod combine;
pub mod orchestrator;
pub mod registry;

pub use combine::combine_stats;
pub use orchestrator::MultiChannelOrchestrator;
pub use registry::{ChannelInfo, ChannelRegistry};
