//! Reelgen Core Library
//!
//! Provider-orchestrated AI video generation.
//! One loosely-typed inbound request is normalized into a canonical
//! generation request, dispatched to a provider backend (Veo, Hedra, Kling),
//! driven through a bounded polling loop against the remote long-running
//! operation, and returned as a completed video artifact.
//!
//! The HTTP layer that feeds requests into this crate lives in the embedding
//! application; this library owns everything between a raw request body and
//! a finished `data:` URI.

pub mod core;

pub use crate::core::auth::{AuthProvider, GcpAccess, StaticAuthProvider};
pub use crate::core::videogen::{
    GeneratedVideo, GenerationRequest, RawVideoRequest, SpeechSynthesizer, VideoGenConfig,
    VideoGenEngine, VideoProviderKind,
};
pub use crate::core::{CoreError, CoreResult, RequestId};
