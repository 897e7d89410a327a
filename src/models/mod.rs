// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod listing;
pub mod plan;
pub mod query;
pub mod response;
pub mod search;
pub mod settings;
pub mod version;
