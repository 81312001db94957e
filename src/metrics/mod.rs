//! @ai:module:intent Metrics model and parsing
//! @ai:module:layer domain
//! @ai:module:public_api MetricsReport, MetricMap, MetricsParser, ParsedMetrics, MetricsParseError

pub mod parser;
pub mod types;

pub use parser::{strip_code_fences, MetricsParseError, MetricsParser, ParsedMetrics};
pub use types::{MetricMap, MetricsReport};
