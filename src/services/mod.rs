// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod category;
pub mod engine;
pub mod filter_compiler;
pub mod logging;
pub mod memory_store;
pub mod normalizer;
pub mod pagination;
pub mod projector;
pub mod ranking;
pub mod search;
pub mod store;
