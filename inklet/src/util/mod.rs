// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod content_type;
pub mod range;
pub mod test_config;
pub mod test_fixtures;

pub use content_type::resolve_content_type;
pub use range::{ByteRange, content_range, unsatisfiable_content_range};
