// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod alerts;
pub mod cli;
pub mod commands;
pub mod db;
pub mod errors;
pub mod format;
pub mod models;
pub mod tabular;
pub mod utils;
