pub mod aggregator;
pub mod analysis;
pub mod decision;
pub mod indicators;
pub mod normalizer;
pub mod payload;
pub mod render;
pub mod request_guard;

pub use aggregator::{ChartArtifact, ChartPipeline};
pub use analysis::{AnalysisOutcome, AnalysisService};
pub use decision::{ContextProvider, DecisionEngine, HttpContextProvider, HttpDecisionEngine};
pub use normalizer::normalize;
pub use payload::DecisionPayload;
pub use render::{PngRenderer, Renderer};
pub use request_guard::{RequestToken, RequestTracker};
