// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::borrow::Cow;

/// Post content is rendered unescaped by clients, so this is the sole XSS
/// defense. Every mutating path with a content field must go through it.
pub struct HtmlSanitizer {
    cleaner: ammonia::Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let mut cleaner = ammonia::Builder::default();
        cleaner
            .strip_comments(true)
            .add_tags(&["img", "iframe"])
            .add_tag_attributes("iframe", &["src", "width", "height", "allowfullscreen"])
            .link_rel(Some("noopener noreferrer"))
            .attribute_filter(|element, attribute, value| {
                // Iframes may only point at same-origin relative URLs.
                if element == "iframe" && attribute == "src" && !is_relative_url(value) {
                    return None;
                }
                Some(Cow::Borrowed(value))
            });
        Self { cleaner }
    }

    pub fn clean(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_relative_url(value: &str) -> bool {
    if value.starts_with("//") {
        return false;
    }
    // A colon before any path/query/fragment character marks a scheme.
    match value.find(':') {
        Some(pos) => value[..pos].contains(['/', '?', '#']),
        None => true,
    }
}
