// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL extraction endpoint
//!
//! Provides `POST /extract/url`: the service fetches the page itself.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::extract_url_handler;
pub use request::ExtractUrlRequest;
pub use response::ExtractUrlResponse;
