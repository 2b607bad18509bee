// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Small string helpers shared across the crate.

/// Strip module paths from a `std::any::type_name` style string.
///
/// `"alloc::vec::Vec<u8>"` becomes `"Vec<u8>"`, including inside generic
/// argument lists.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut ident = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            ident.push(ch);
        } else if ch == ':' {
            // Path separator: drop the accumulated segment.
            ident.clear();
        } else {
            out.push_str(&ident);
            ident.clear();
            out.push(ch);
        }
    }
    out.push_str(&ident);
    out
}
