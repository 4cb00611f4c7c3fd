//! Flat-earth projection of tag offsets onto the datum

use super::tag::{GeometryKind, ParsedTag};
use geo_types::{Coord, LineString, Point, Polygon};

/// Meters per degree used for both axes, with no latitude correction
pub const METERS_PER_DEGREE: f64 = 111_319.5;

/// The fixed absolute reference point every tag of a run is offset from
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    /// x = longitude, y = latitude, in degrees
    pub coord: Coord<f64>,
    pub label: String,
}

impl Datum {
    pub fn new(longitude: f64, latitude: f64, label: impl Into<String>) -> Self {
        Datum {
            coord: Coord {
                x: longitude,
                y: latitude,
            },
            label: label.into(),
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coord.x
    }

    pub fn latitude(&self) -> f64 {
        self.coord.y
    }
}

/// Offset `datum` by signed meters north and east.
pub fn project(datum: Coord<f64>, ns_meters: f64, ew_meters: f64) -> Coord<f64> {
    Coord {
        x: datum.x + ew_meters / METERS_PER_DEGREE,
        y: datum.y + ns_meters / METERS_PER_DEGREE,
    }
}

/// Geometry resolved from one record
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedGeometry {
    Point(Point<f64>),
    Line(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl ProjectedGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            ProjectedGeometry::Point(_) => GeometryKind::Point,
            ProjectedGeometry::Line(_) => GeometryKind::Line,
            ProjectedGeometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// All coordinates in output order; a polygon ring includes its closing coordinate
    pub fn coords(&self) -> Vec<Coord<f64>> {
        match self {
            ProjectedGeometry::Point(point) => vec![point.0],
            ProjectedGeometry::Line(line) => line.0.clone(),
            ProjectedGeometry::Polygon(polygon) => polygon.exterior().0.clone(),
        }
    }
}

/// Projects parsed tags relative to a single datum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatumProjector {
    origin: Coord<f64>,
}

impl DatumProjector {
    pub fn new(origin: Coord<f64>) -> Self {
        DatumProjector { origin }
    }

    pub fn origin(&self) -> Coord<f64> {
        self.origin
    }

    pub fn project(&self, ns_meters: f64, ew_meters: f64) -> Coord<f64> {
        project(self.origin, ns_meters, ew_meters)
    }

    /// Build the geometry for a parsed tag.
    ///
    /// Rectangle corners run (x, y) = (ew_start, ns_start), (ew_start, ns_end),
    /// (ew_end, ns_end), (ew_end, ns_start) and back to the first corner. Any other
    /// order can produce a crossed ring.
    pub fn assemble(&self, parsed: &ParsedTag) -> ProjectedGeometry {
        let e = parsed.extents;
        match parsed.kind {
            GeometryKind::Point => {
                ProjectedGeometry::Point(Point(self.project(e.ns_start, e.ew_start)))
            }
            GeometryKind::Line => ProjectedGeometry::Line(LineString::new(vec![
                self.project(e.ns_start, e.ew_start),
                self.project(e.ns_end, e.ew_end),
            ])),
            GeometryKind::Polygon => {
                let first = self.project(e.ns_start, e.ew_start);
                let ring = LineString::new(vec![
                    first,
                    self.project(e.ns_end, e.ew_start),
                    self.project(e.ns_end, e.ew_end),
                    self.project(e.ns_start, e.ew_end),
                    first,
                ]);
                ProjectedGeometry::Polygon(Polygon::new(ring, vec![]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::TagParser;

    fn datum() -> Coord<f64> {
        Coord { x: -90.0, y: 40.0 }
    }

    fn resolve(tag: &str) -> ProjectedGeometry {
        let parsed = TagParser::classify_and_extract(tag).unwrap();
        DatumProjector::new(datum()).assemble(&parsed)
    }

    fn shoelace_area(ring: &[Coord<f64>]) -> f64 {
        ring.windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_zero_offset_is_datum() {
        assert_eq!(project(datum(), 0.0, 0.0), datum());
    }

    #[test]
    fn test_one_degree_north() {
        match resolve("N111319.5E0") {
            ProjectedGeometry::Point(p) => {
                assert_eq!(p.x(), -90.0);
                assert_eq!(p.y(), 41.0);
            }
            other => panic!("Expected point, got {:?}", other),
        }
    }

    #[test]
    fn test_point_offsets_apply_sign_per_axis() {
        let expected = Coord {
            x: -90.0 + 3.0 / METERS_PER_DEGREE,
            y: 40.0 - 5.0 / METERS_PER_DEGREE,
        };
        assert_eq!(resolve("S5E3").coords(), vec![expected]);

        let expected = Coord {
            x: -90.0 - 3.0 / METERS_PER_DEGREE,
            y: 40.0 + 5.0 / METERS_PER_DEGREE,
        };
        assert_eq!(resolve("N5W3").coords(), vec![expected]);
    }

    #[test]
    fn test_no_latitude_scaling_of_longitude() {
        let high = DatumProjector::new(Coord { x: 10.0, y: 70.0 });
        let c = high.project(0.0, METERS_PER_DEGREE);
        assert_eq!(c, Coord { x: 11.0, y: 70.0 });
    }

    #[test]
    fn test_line_one_degree_north() {
        let geometry = resolve("N0-111319.5E0");
        assert_eq!(geometry.kind(), GeometryKind::Line);
        assert_eq!(
            geometry.coords(),
            vec![Coord { x: -90.0, y: 40.0 }, Coord { x: -90.0, y: 41.0 }]
        );
    }

    #[test]
    fn test_line_shares_one_axis() {
        let coords = resolve("N2-4E1").coords();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].x, coords[1].x);
        assert_ne!(coords[0].y, coords[1].y);
        assert_eq!(coords[0].y, 40.0 + 2.0 / METERS_PER_DEGREE);
        assert_eq!(coords[1].y, 40.0 + 4.0 / METERS_PER_DEGREE);

        let coords = resolve("S3W1-6").coords();
        assert_eq!(coords[0].y, coords[1].y);
        assert!(coords[1].x < coords[0].x);
    }

    #[test]
    fn test_rectangle_corner_order() {
        let geometry = resolve("N0-100E0-50");
        assert_eq!(geometry.kind(), GeometryKind::Polygon);

        let ns = |m: f64| 40.0 + m / METERS_PER_DEGREE;
        let ew = |m: f64| -90.0 + m / METERS_PER_DEGREE;
        assert_eq!(
            geometry.coords(),
            vec![
                Coord { x: ew(0.0), y: ns(0.0) },
                Coord { x: ew(0.0), y: ns(100.0) },
                Coord { x: ew(50.0), y: ns(100.0) },
                Coord { x: ew(50.0), y: ns(0.0) },
                Coord { x: ew(0.0), y: ns(0.0) },
            ]
        );
    }

    #[test]
    fn test_rectangle_is_simple_closed_ring() {
        for tag in ["N0-100E0-50", "S2-4W10-3", "N7-1E3-9"] {
            let ring = resolve(tag).coords();
            assert_eq!(ring.len(), 5, "{}", tag);
            assert_eq!(ring[0], ring[4], "{}", tag);
            assert!(shoelace_area(&ring).abs() > 0.0, "{}", tag);

            // Axis-aligned edges that alternate direction cannot cross each other
            for i in 0..4 {
                let (a, b) = (ring[i], ring[i + 1]);
                let vertical = a.x == b.x && a.y != b.y;
                let horizontal = a.y == b.y && a.x != b.x;
                assert!(vertical ^ horizontal, "{} edge {}", tag, i);
                assert_eq!(vertical, i % 2 == 0, "{} edge {}", tag, i);
            }
        }
    }

    #[test]
    fn test_datum_accessors() {
        let d = Datum::new(-90.0, 40.0, "Site datum");
        assert_eq!(d.longitude(), -90.0);
        assert_eq!(d.latitude(), 40.0);
        assert_eq!(d.coord, datum());
    }
}
