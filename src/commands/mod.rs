// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod config;
pub mod exporter;
pub mod fetch;
pub mod importer;
pub mod personnel;
pub mod projects;
