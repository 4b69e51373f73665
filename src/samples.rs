use std::str::FromStr;

use crate::error::{ClusteringError, Result};
use crate::features::{Aabb, HasFeatures, Point2, Point3};
use crate::types::{Coordinate, FeatureVector};

/// An item whose type is only known at run time, e.g. a line of a points file.
///
/// Text form: `<tag>:<c_1>,<c_2>,...` with tag one of `point2`, `point3`, `box`
/// (center followed by size) or `tuple`. Lines without a tag are tuples.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Point2(Point2),
    Point3(Point3),
    Aabb(Aabb),
    Tuple(Vec<Coordinate>),
}

impl Sample {
    /// Parses a single sample; line is only used for error messages.
    pub fn parse_line(content: &str, line: usize) -> Result<Sample> {
        let (tag, values) = match content.split_once(':') {
            Some((tag, values)) => (tag.trim(), values),
            None => ("tuple", content),
        };
        let coordinates = parse_coordinates(values, line)?;
        let expect = |count: usize| -> Result<()> {
            if coordinates.len() == count {
                Ok(())
            } else {
                Err(ClusteringError::Parse {
                    line,
                    reason: format!("'{}' needs {} coordinates, found {}", tag, count, coordinates.len()),
                })
            }
        };
        match tag {
            "point2" => {
                expect(2)?;
                Ok(Sample::Point2(Point2::new(coordinates[0], coordinates[1])))
            }
            "point3" => {
                expect(3)?;
                Ok(Sample::Point3(Point3::new(coordinates[0], coordinates[1], coordinates[2])))
            }
            "box" => {
                expect(6)?;
                Ok(Sample::Aabb(Aabb::new(
                    Point3::new(coordinates[0], coordinates[1], coordinates[2]),
                    Point3::new(coordinates[3], coordinates[4], coordinates[5]),
                )))
            }
            "tuple" => Ok(Sample::Tuple(coordinates)),
            other => Err(ClusteringError::UnsupportedItemType(other.to_string())),
        }
    }
}

fn parse_coordinates(values: &str, line: usize) -> Result<Vec<Coordinate>> {
    values
        .split(',')
        .map(|v| {
            v.trim().parse::<Coordinate>().map_err(|e| ClusteringError::Parse {
                line,
                reason: format!("cannot parse '{}' as f64: {}", v.trim(), e),
            })
        })
        .collect()
}

impl FromStr for Sample {
    type Err = ClusteringError;

    fn from_str(s: &str) -> Result<Sample> {
        Sample::parse_line(s, 0)
    }
}

impl HasFeatures for Sample {
    fn features(&self) -> FeatureVector {
        match self {
            Sample::Point2(p) => p.features(),
            Sample::Point3(p) => p.features(),
            Sample::Aabb(b) => b.features(),
            Sample::Tuple(t) => t.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tagged_samples() {
        assert_eq!("point2: 1.0, 2.0".parse::<Sample>().unwrap(), Sample::Point2(Point2::new(1.0, 2.0)));
        assert_eq!(
            "point3:1,2,3".parse::<Sample>().unwrap().features(),
            vec![1.0, 2.0, 3.0]
        );
        let b: Sample = "box:1,2,3,0.5,0.5,0.5".parse().unwrap();
        assert_eq!(b.features(), vec![1.0, 2.0, 3.0]);
        assert_eq!("4,5,6,7".parse::<Sample>().unwrap(), Sample::Tuple(vec![4.0, 5.0, 6.0, 7.0]));
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        match "sphere:1,2,3,4".parse::<Sample>() {
            Err(ClusteringError::UnsupportedItemType(tag)) => assert_eq!(tag, "sphere"),
            other => panic!("expected UnsupportedItemType, got {:?}", other),
        }
    }

    #[test]
    fn wrong_arity_and_garbage_are_parse_errors() {
        assert!(matches!(Sample::parse_line("point2:1,2,3", 7), Err(ClusteringError::Parse { line: 7, .. })));
        assert!(matches!(Sample::parse_line("1.0,abc", 3), Err(ClusteringError::Parse { line: 3, .. })));
    }
}
