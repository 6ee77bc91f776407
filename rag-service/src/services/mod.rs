pub mod composer;
pub mod corpus;
pub mod gateway;
pub mod matcher;
pub mod metrics;
pub mod pipeline;
pub mod providers;

pub use corpus::CorpusStore;
pub use gateway::{GenerationError, GenerationGateway};
pub use metrics::{get_metrics, init_metrics};
pub use pipeline::RagPipeline;
