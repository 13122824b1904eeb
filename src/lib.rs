// Safegate: content-moderation gate for user-submitted images.
//
// This is the library root. Each module corresponds to one part of the
// gate: the classifier adapter, the verdict cache, and the policy that ties
// them together.

pub mod cache;
pub mod config;
pub mod image;
pub mod moderation;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod vision;
