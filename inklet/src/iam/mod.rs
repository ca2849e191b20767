// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod tokens;
pub mod verifier;

pub use tokens::{Claims, TokenError, session_claims, sign_token, verify_token};
pub use verifier::CredentialVerifier;
