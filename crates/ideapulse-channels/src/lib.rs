pub mod adapter;
pub mod client;
pub mod douyin;
pub mod error;
mod parse;
pub mod stats;
pub mod stub;
pub mod xiaohongshu;

pub use adapter::ChannelAdapter;
pub use client::{CallTracker, ChannelClient, RetryPolicy};
pub use douyin::DouyinAdapter;
pub use error::ChannelError;
pub use stats::compute_stats;
pub use stub::StubAdapter;
pub use xiaohongshu::XiaohongshuAdapter;
