pub mod metrics;

pub use metrics::{ChannelCounts, MetricsReport, PipelineMetrics};
