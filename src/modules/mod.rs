//! Runway API operation wrappers.
//!
//! One function per vendor sub-operation:
//! - Image generation (text-to-image, with optional reference images)
//! - Video generation (text-to-video, image-to-video, video-to-video)
//! - Video upscaling
//! - Task lifecycle (retrieve, poll-until-terminal, cancel)

pub mod image;
pub mod tasks;
pub mod video;
