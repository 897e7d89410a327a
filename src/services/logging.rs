// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging utilities for user-supplied search input.

/// Summarise a free-text query for logging.
/// Shows the first three characters and the length, hides the rest: "bic*** (7 chars)"
pub fn summarize_text(text: &str) -> String {
    let len = text.chars().count();
    if len == 0 {
        return "<empty>".to_string();
    }
    let prefix: String = text.chars().take(3).collect();
    format!("{}*** ({} chars)", prefix, len)
}
