// Services layer for business logic
// Services own validation and reshaping, calling the store directly

pub mod aggregator;
pub mod recorder;

pub use aggregator::Aggregator;
pub use recorder::{EventRecorder, RequestContext};
