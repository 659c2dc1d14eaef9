// Application layer - Use case interactors

pub mod container;
pub mod pipeline_interactor;
pub mod repair_controller;
pub mod segment_extractor;

// Re-export interactors
pub use pipeline_interactor::ClipPipeline;
pub use repair_controller::RepairController;
pub use segment_extractor::SegmentExtractor;
