// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Resolve an uploaded object's content type: the declared header wins,
/// otherwise content-based detection on the body head, otherwise the generic
/// binary type.
pub fn resolve_content_type(declared: Option<&str>, head: &[u8]) -> String {
    if let Some(declared) = declared {
        let declared = declared.trim();
        if !declared.is_empty() {
            return declared.to_string();
        }
    }

    if let Some(detected) = infer::get(head) {
        return detected.mime_type().to_string();
    }

    "application/octet-stream".to_string()
}
