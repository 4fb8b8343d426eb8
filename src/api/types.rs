//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;
use crate::irradiance::IrradianceData;
use crate::model::{Product, QuizAnswers};

/// Body of `POST /recommend`.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub answers: QuizAnswers,
    /// Pre-fetched site data; when absent the server's provider is asked.
    #[serde(default)]
    pub irradiance: Option<IrradianceData>,
}

/// Body of `GET /catalog`.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub source: CatalogSource,
    pub products: Vec<Product>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
