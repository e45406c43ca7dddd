// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod extract;
pub mod extract_url;
pub mod gate;
pub mod http_server;
pub mod rate_limiter;

pub use errors::{ApiError, ErrorResponse};
pub use extract::{extract_handler, ExtractRequest, ExtractResponse};
pub use extract_url::{extract_url_handler, ExtractUrlRequest, ExtractUrlResponse};
pub use gate::ExtractionGate;
pub use http_server::{create_app, start_server, AppState};
pub use rate_limiter::{client_key, ClientRateLimiter};
