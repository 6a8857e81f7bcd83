// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Raised while turning raw backend or file rows into typed records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: invalid amount '{value}' for '{field}'")]
    InvalidAmount {
        row: usize,
        field: &'static str,
        value: String,
    },
}
