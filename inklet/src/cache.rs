// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

pub const LABEL_COUNT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    stored_at: Instant,
    body: String,
}

/// Advisory response cache keyed by request URL. Entries are served until
/// their TTL passes; write paths never invalidate, so a stale entry can
/// survive up to the full TTL.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.body.clone())
    }

    /// Best-effort put; a poisoned lock just skips the store.
    pub fn store(&self, key: String, body: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key,
                CacheEntry {
                    stored_at: Instant::now(),
                    body,
                },
            );
        }
    }
}
