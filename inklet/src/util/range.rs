// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// A single byte-range request. Multi-range headers are not supported; a
/// header carrying more than one range is treated as absent and the full
/// body is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    FromTo(u64, u64),
    From(u64),
    Last(u64),
}

impl ByteRange {
    /// Parse a `Range` header value holding exactly one range spec.
    pub fn parse(header: &str) -> Option<Self> {
        let spec = header.strip_prefix("bytes=")?.trim();
        if spec.is_empty() || spec.contains(',') {
            return None;
        }

        let (start, end) = spec.split_once('-')?;
        let start = start.trim();
        let end = end.trim();

        if start.is_empty() {
            let length: u64 = end.parse().ok()?;
            if length == 0 {
                return None;
            }
            return Some(ByteRange::Last(length));
        }

        let start: u64 = start.parse().ok()?;
        if end.is_empty() {
            return Some(ByteRange::From(start));
        }
        let end: u64 = end.parse().ok()?;
        if start > end {
            return None;
        }
        Some(ByteRange::FromTo(start, end))
    }

    /// Resolve against the object size into inclusive (start, end) offsets,
    /// or None when the range is unsatisfiable.
    pub fn resolve(self, total: u64) -> Option<(u64, u64)> {
        if total == 0 {
            return None;
        }
        let last = total - 1;
        match self {
            ByteRange::FromTo(start, end) => {
                if start > last {
                    None
                } else {
                    Some((start, end.min(last)))
                }
            }
            ByteRange::From(start) => {
                if start > last {
                    None
                } else {
                    Some((start, last))
                }
            }
            ByteRange::Last(length) => {
                if length > total {
                    None
                } else {
                    Some((total - length, last))
                }
            }
        }
    }
}

pub fn content_range(start: u64, end: u64, total: u64) -> String {
    format!("bytes {}-{}/{}", start, end, total)
}

pub fn unsatisfiable_content_range(total: u64) -> String {
    format!("bytes */{}", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_open_and_suffix_forms() {
        assert_eq!(ByteRange::parse("bytes=0-99"), Some(ByteRange::FromTo(0, 99)));
        assert_eq!(ByteRange::parse("bytes=500-"), Some(ByteRange::From(500)));
        assert_eq!(ByteRange::parse("bytes=-200"), Some(ByteRange::Last(200)));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(ByteRange::parse("0-99"), None);
        assert_eq!(ByteRange::parse("bytes="), None);
        assert_eq!(ByteRange::parse("bytes=-"), None);
        assert_eq!(ByteRange::parse("bytes=a-b"), None);
        assert_eq!(ByteRange::parse("bytes=99-0"), None);
        assert_eq!(ByteRange::parse("bytes=-0"), None);
    }

    #[test]
    fn rejects_multi_range_headers() {
        assert_eq!(ByteRange::parse("bytes=0-1,2-3"), None);
    }

    #[test]
    fn resolves_within_bounds() {
        assert_eq!(ByteRange::FromTo(0, 99).resolve(500), Some((0, 99)));
        assert_eq!(ByteRange::From(400).resolve(500), Some((400, 499)));
        assert_eq!(ByteRange::Last(100).resolve(500), Some((400, 499)));
        assert_eq!(ByteRange::Last(500).resolve(500), Some((0, 499)));
    }

    #[test]
    fn clamps_end_to_object_size() {
        assert_eq!(ByteRange::FromTo(450, 999).resolve(500), Some((450, 499)));
    }

    #[test]
    fn unsatisfiable_ranges_resolve_to_none() {
        assert_eq!(ByteRange::FromTo(500, 600).resolve(500), None);
        assert_eq!(ByteRange::From(500).resolve(500), None);
        assert_eq!(ByteRange::Last(501).resolve(500), None);
        assert_eq!(ByteRange::FromTo(0, 0).resolve(0), None);
    }

    #[test]
    fn formats_content_range_headers() {
        assert_eq!(content_range(0, 99, 500), "bytes 0-99/500");
        assert_eq!(unsatisfiable_content_range(500), "bytes */500");
    }
}
