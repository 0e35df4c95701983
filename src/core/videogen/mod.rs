//! Video Generation Orchestration
//!
//! Turns one heterogeneous "generate a video" request into a completed
//! artifact: normalize the request, dispatch to a provider backend, drive
//! the remote long-running operation to a terminal state, and extract the
//! resulting video.

pub mod accents;
pub mod artifact;
pub mod engine;
pub mod poller;
pub mod provider_impls;
pub mod providers;
pub mod request;

// Re-export main types
pub use artifact::VideoArtifact;
pub use engine::{GeneratedVideo, VideoGenEngine};
pub use poller::{Operation, OperationError, PollPolicy};
pub use providers::{
    HedraConfig, KlingConfig, SpeechSynthesizer, VeoConfig, VideoGenConfig, VideoProvider,
};
pub use request::{normalize, GenerationRequest, RawVideoRequest, VideoProviderKind};
