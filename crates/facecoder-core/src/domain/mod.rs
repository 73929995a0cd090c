//! Domain types for facecoder.
//!
//! These types are pure data structures with no infrastructure dependencies.

mod encoding;
mod image;

pub use encoding::{
    BatchOutcome, ENCODED_MESSAGE, GroupReset, ImageEncodingOutcome, ImageRegistration,
    InvalidationOutcome,
};
pub use image::{
    Embedding, GroupEmbedding, GroupId, Image, ImageFilter, ImageId, ImageUpdate, NewImage,
    ProfileId,
};
