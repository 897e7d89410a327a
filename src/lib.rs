// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing discovery engine for the classifieds marketplace.

pub mod app;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
