mod measurement;
mod metric_kind;
mod normalize;
mod raw_reading;

pub use measurement::*;
pub use metric_kind::*;
pub use normalize::*;
pub use raw_reading::*;
