//! Chirp domain models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A posted chirp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    pub author_id: u64,
}

/// Create chirp request
///
/// The length bound counts Unicode scalar values, not bytes.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChirpRequest {
    #[validate(length(max = 140, message = "Chirp is too long"))]
    pub body: String,
}

/// Query parameters for listing chirps
#[derive(Debug, Default, Deserialize)]
pub struct ChirpListQuery {
    pub author_id: Option<u64>,
    pub sort: Option<String>,
}
