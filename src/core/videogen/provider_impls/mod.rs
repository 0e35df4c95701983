//! Provider Backend Implementations

pub mod hedra;
pub mod kling;
pub mod veo;

pub use hedra::HedraProvider;
pub use kling::KlingProvider;
pub use veo::VeoProvider;
