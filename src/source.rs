//! External boundary sources
//!
//! Real-world boundaries come from an external collaborator that owns
//! fetching and caching. This crate only consumes the polygons it returns.

use crate::config::VoronoiConfig;
use crate::error::Result;
use geo::MultiPolygon;
use std::collections::BTreeMap;
use tracing::debug;

/// Trait for boundary providers
pub trait BoundarySource: Send + Sync {
    /// Fetch the boundary polygons matching a place query
    ///
    /// # Arguments
    /// * `query` - Place name or identifier understood by the provider
    /// * `tags` - Feature tags narrowing the match (e.g. `boundary=administrative`)
    fn fetch_boundary(
        &self,
        query: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<MultiPolygon<f64>>;
}

/// Build a partition config covering a fetched boundary
pub fn region_for(
    source: &dyn BoundarySource,
    query: &str,
    tags: &BTreeMap<String, String>,
    num_units: usize,
) -> Result<VoronoiConfig> {
    let boundary = source.fetch_boundary(query, tags)?;
    debug!(query, polygons = boundary.0.len(), "Fetched boundary");
    VoronoiConfig::from_boundary(num_units, &boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use geo::polygon;

    struct FixedSource;

    impl BoundarySource for FixedSource {
        fn fetch_boundary(
            &self,
            query: &str,
            tags: &BTreeMap<String, String>,
        ) -> Result<MultiPolygon<f64>> {
            match (query, tags.get("boundary").map(String::as_str)) {
                ("Springfield", Some("administrative")) => Ok(MultiPolygon::new(vec![
                    polygon![(x: 10.0, y: 20.0), (x: 30.0, y: 20.0), (x: 30.0, y: 25.0)],
                    polygon![(x: 12.0, y: 22.0), (x: 14.0, y: 40.0), (x: 11.0, y: 30.0)],
                ])),
                ("Nowhere", _) => Ok(MultiPolygon::new(vec![])),
                _ => Err(Error::NotSupported(format!(
                    "No boundary for '{}'",
                    query
                ))),
            }
        }
    }

    fn admin_tags() -> BTreeMap<String, String> {
        BTreeMap::from([("boundary".to_string(), "administrative".to_string())])
    }

    #[test]
    fn test_region_for_boundary() {
        let config = region_for(&FixedSource, "Springfield", &admin_tags(), 8).unwrap();
        assert_eq!(config.num_units, 8);
        assert_eq!(
            <[f64; 4]>::from(config.bounding_box),
            [10.0, 20.0, 30.0, 40.0]
        );
    }

    #[test]
    fn test_region_for_empty_boundary() {
        let result = region_for(&FixedSource, "Nowhere", &admin_tags(), 8);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_source_errors_propagate() {
        let result = region_for(&FixedSource, "Springfield", &BTreeMap::new(), 8);
        assert!(matches!(result, Err(Error::NotSupported(_))));
    }
}
