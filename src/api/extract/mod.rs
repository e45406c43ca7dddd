// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML extraction endpoint
//!
//! Provides `POST /extract`: the caller supplies the HTML and its source URL.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{extract_handler, run_extraction};
pub use request::ExtractRequest;
pub use response::ExtractResponse;
