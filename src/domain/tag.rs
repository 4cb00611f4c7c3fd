//! Relational location tag parsing
//!
//! A tag such as `N12W4`, `N2-4W4` or `N0-100E0-50` names an offset in meters from
//! the site datum. Each axis segment is a compass letter bound to a magnitude or to
//! a `lo-hi` range. The number of ranged axes decides the geometry kind.

use crate::error::{ArchShapeError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Regex for matching compass letters, case-insensitive
fn direction_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[NnSsEeWw]").unwrap())
}

/// Geometry produced by a tag, decided by how many axes carry a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// No ranged axis
    Point,
    /// One ranged axis
    Line,
    /// Both axes ranged
    Polygon,
}

impl GeometryKind {
    fn from_ranged_axes(count: usize) -> Option<Self> {
        match count {
            0 => Some(GeometryKind::Point),
            1 => Some(GeometryKind::Line),
            2 => Some(GeometryKind::Polygon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::Line => "line",
            GeometryKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed start/end offsets in meters along both axes.
///
/// A non-ranged axis has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtents {
    pub ns_start: f64,
    pub ns_end: f64,
    pub ew_start: f64,
    pub ew_end: f64,
}

/// Result of classifying a tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedTag {
    pub kind: GeometryKind,
    pub extents: AxisExtents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    fn of(letter: char) -> Axis {
        match letter.to_ascii_uppercase() {
            'N' | 'S' => Axis::NorthSouth,
            _ => Axis::EastWest,
        }
    }
}

/// One axis segment with its magnitude(s) as written, before sign resolution
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    start: f64,
    end: f64,
    ranged: bool,
}

pub struct TagParser;

impl TagParser {
    /// Classify a tag as point, line or polygon and extract its signed axis extents.
    ///
    /// Range bounds keep the order they are written in. The sign comes from a scan of
    /// the whole tag: any `S` negates the north-south values and any `W` negates the
    /// east-west values.
    pub fn classify_and_extract(tag: &str) -> Result<ParsedTag> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ArchShapeError::malformed_tag(tag, "tag is empty"));
        }

        let segments = split_segments(tag, trimmed)?;

        let mut ns = None;
        let mut ew = None;
        for (letter, text) in segments {
            let extent = parse_extent(tag, text)?;
            match Axis::of(letter) {
                Axis::NorthSouth => ns = Some(extent),
                Axis::EastWest => ew = Some(extent),
            }
        }
        // split_segments guarantees one letter per axis
        let (ns, ew) = match (ns, ew) {
            (Some(ns), Some(ew)) => (ns, ew),
            _ => {
                return Err(ArchShapeError::malformed_tag(
                    tag,
                    "expected one N/S and one E/W direction",
                ))
            }
        };

        let dashes = trimmed.matches('-').count();
        let ranged = [ns.ranged, ew.ranged].iter().filter(|r| **r).count();
        let kind = match GeometryKind::from_ranged_axes(ranged) {
            Some(kind) if dashes == ranged => kind,
            _ => {
                return Err(ArchShapeError::malformed_tag(
                    tag,
                    format!("found {} range separators, expected 0, 1 or 2", dashes),
                ))
            }
        };

        let ns_sign = if trimmed.contains('S') || trimmed.contains('s') {
            -1.0
        } else {
            1.0
        };
        let ew_sign = if trimmed.contains('W') || trimmed.contains('w') {
            -1.0
        } else {
            1.0
        };

        Ok(ParsedTag {
            kind,
            extents: AxisExtents {
                ns_start: ns_sign * ns.start,
                ns_end: ns_sign * ns.end,
                ew_start: ew_sign * ew.start,
                ew_end: ew_sign * ew.end,
            },
        })
    }
}

/// Pair each compass letter with the text of its segment.
///
/// `N2-4W4` binds text after each letter; `2-4N 4W` binds the text before it.
fn split_segments<'a>(tag: &str, trimmed: &'a str) -> Result<Vec<(char, &'a str)>> {
    let letters: Vec<(usize, char)> = direction_regex()
        .find_iter(trimmed)
        .filter_map(|m| m.as_str().chars().next().map(|c| (m.start(), c)))
        .collect();

    let ns_count = letters
        .iter()
        .filter(|(_, c)| Axis::of(*c) == Axis::NorthSouth)
        .count();
    let ew_count = letters.len() - ns_count;
    if ns_count != 1 || ew_count != 1 {
        let found: String = letters.iter().map(|(_, c)| *c).collect();
        let found = if found.is_empty() { "none".to_string() } else { found };
        return Err(ArchShapeError::malformed_tag(
            tag,
            format!(
                "expected exactly one N/S and one E/W direction, found {}",
                found
            ),
        ));
    }

    let letter_first = letters[0].0 == 0;
    let mut segments = Vec::with_capacity(2);
    for (i, &(pos, letter)) in letters.iter().enumerate() {
        let text = if letter_first {
            let end = letters.get(i + 1).map_or(trimmed.len(), |(next, _)| *next);
            &trimmed[pos + 1..end]
        } else {
            let start = if i == 0 { 0 } else { letters[i - 1].0 + 1 };
            &trimmed[start..pos]
        };
        segments.push((letter, text));
    }

    if !letter_first {
        let (last, _) = letters[letters.len() - 1];
        if !trimmed[last + 1..].trim().is_empty() {
            return Err(ArchShapeError::malformed_tag(
                tag,
                "magnitude after the final direction letter",
            ));
        }
    }

    Ok(segments)
}

fn parse_extent(tag: &str, text: &str) -> Result<Extent> {
    let text = text.trim();
    match text.matches('-').count() {
        0 => {
            let value = parse_magnitude(tag, text)?;
            Ok(Extent {
                start: value,
                end: value,
                ranged: false,
            })
        }
        1 => {
            let (lo, hi) = text.split_once('-').unwrap_or((text, ""));
            Ok(Extent {
                start: parse_magnitude(tag, lo)?,
                end: parse_magnitude(tag, hi)?,
                ranged: true,
            })
        }
        n => Err(ArchShapeError::malformed_tag(
            tag,
            format!("segment '{}' has {} range separators", text, n),
        )),
    }
}

fn parse_magnitude(tag: &str, text: &str) -> Result<f64> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ArchShapeError::malformed_tag(
            tag,
            format!("invalid magnitude '{}'", text),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tag: &str) -> ParsedTag {
        TagParser::classify_and_extract(tag).unwrap()
    }

    fn reason(tag: &str) -> String {
        match TagParser::classify_and_extract(tag).unwrap_err() {
            ArchShapeError::MalformedTag { tag: t, reason } => {
                assert_eq!(t, tag);
                reason
            }
            other => panic!("Expected MalformedTag, got {:?}", other),
        }
    }

    #[test]
    fn test_point_without_range() {
        let parsed = parse("N12E4");
        assert_eq!(parsed.kind, GeometryKind::Point);
        assert_eq!(
            parsed.extents,
            AxisExtents {
                ns_start: 12.0,
                ns_end: 12.0,
                ew_start: 4.0,
                ew_end: 4.0,
            }
        );
    }

    #[test]
    fn test_sign_law() {
        let e = parse("S5E3").extents;
        assert_eq!((e.ns_start, e.ew_start), (-5.0, 3.0));

        let e = parse("N5W3").extents;
        assert_eq!((e.ns_start, e.ew_start), (5.0, -3.0));

        let e = parse("S5W3").extents;
        assert_eq!((e.ns_start, e.ew_start), (-5.0, -3.0));
    }

    #[test]
    fn test_lowercase_letters() {
        let e = parse("s2.5w0.75").extents;
        assert_eq!((e.ns_start, e.ew_start), (-2.5, -0.75));
    }

    #[test]
    fn test_range_order_is_kept() {
        let parsed = parse("N2-4E1");
        assert_eq!(parsed.kind, GeometryKind::Line);
        assert_eq!(parsed.extents.ns_start, 2.0);
        assert_eq!(parsed.extents.ns_end, 4.0);
        assert_eq!(parsed.extents.ew_start, 1.0);
        assert_eq!(parsed.extents.ew_end, 1.0);

        let parsed = parse("N4-2E1");
        assert_eq!(parsed.extents.ns_start, 4.0);
        assert_eq!(parsed.extents.ns_end, 2.0);
    }

    #[test]
    fn test_line_on_east_west_axis() {
        let parsed = parse("S3W1-6");
        assert_eq!(parsed.kind, GeometryKind::Line);
        assert_eq!(
            parsed.extents,
            AxisExtents {
                ns_start: -3.0,
                ns_end: -3.0,
                ew_start: -1.0,
                ew_end: -6.0,
            }
        );
    }

    #[test]
    fn test_polygon_with_two_ranges() {
        let parsed = parse("N0-100E0-50");
        assert_eq!(parsed.kind, GeometryKind::Polygon);
        assert_eq!(
            parsed.extents,
            AxisExtents {
                ns_start: 0.0,
                ns_end: 100.0,
                ew_start: 0.0,
                ew_end: 50.0,
            }
        );
    }

    #[test]
    fn test_axis_follows_letter_not_position() {
        let e = parse("E3N5").extents;
        assert_eq!(e.ns_start, 5.0);
        assert_eq!(e.ew_start, 3.0);
    }

    #[test]
    fn test_letter_after_digits_form() {
        let parsed = parse("2-4N 4W");
        assert_eq!(parsed.kind, GeometryKind::Line);
        assert_eq!(
            parsed.extents,
            AxisExtents {
                ns_start: 2.0,
                ns_end: 4.0,
                ew_start: -4.0,
                ew_end: -4.0,
            }
        );
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let parsed = parse("  N 2 - 4 W 4 ");
        assert_eq!(parsed.kind, GeometryKind::Line);
        assert_eq!(parsed.extents.ns_end, 4.0);
        assert_eq!(parsed.extents.ew_start, -4.0);
    }

    #[test]
    fn test_missing_east_west_axis() {
        assert!(reason("N5").contains("exactly one N/S and one E/W"));
    }

    #[test]
    fn test_two_north_south_letters() {
        assert!(reason("N5S3").contains("found NS"));
    }

    #[test]
    fn test_no_letters() {
        assert!(reason("12-4").contains("found none"));
    }

    #[test]
    fn test_empty_tag() {
        assert_eq!(reason("   "), "tag is empty");
    }

    #[test]
    fn test_too_many_range_separators() {
        assert!(reason("N1-2-3E4").contains("2 range separators"));
    }

    #[test]
    fn test_open_range() {
        assert!(reason("N-5E1").contains("invalid magnitude ''"));
        assert!(reason("N5-E1").contains("invalid magnitude ''"));
    }

    #[test]
    fn test_bad_magnitude() {
        assert!(reason("N1.2.3E4").contains("invalid magnitude '1.2.3'"));
        assert!(reason("NxE4").contains("invalid magnitude 'x'"));
        assert!(reason("N5E").contains("invalid magnitude ''"));
    }

    #[test]
    fn test_trailing_magnitude_in_letter_after_form() {
        assert!(reason("5N3E4").contains("after the final direction letter"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(GeometryKind::Polygon.to_string(), "polygon");
        assert_eq!(GeometryKind::Line.as_str(), "line");
    }
}
