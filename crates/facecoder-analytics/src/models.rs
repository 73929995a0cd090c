//! Wire types of the `encode_images` endpoint.

use serde::{Deserialize, Serialize};

/// Request body: `{"name":"encode","img_format":"route","imgs":[..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeImagesRequest<'a> {
    pub name: &'static str,
    pub img_format: &'static str,
    pub imgs: &'a [String],
}

impl<'a> EncodeImagesRequest<'a> {
    /// Ask the service to encode the files at `routes`.
    pub const fn routes(routes: &'a [String]) -> Self {
        Self {
            name: "encode",
            img_format: "route",
            imgs: routes,
        }
    }
}

/// Response body: one entry per submitted route, in submission order.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodeImagesResponse {
    pub embeddings: Vec<EncodedImage>,
}

/// One embedding in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedImage {
    pub embedding: Vec<f64>,
}
