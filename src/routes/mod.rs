// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Route handlers for the HTTP API.

pub mod listings;

pub use listings::{listings_router, ListingsApiDoc};
