use super::registry::AtomGroupRegistry;
use crate::core::models::ids::GroupId;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;

const RADIUS_SLACK: f64 = 1e-6;

/// Spatial index over the centroids of a set of atom groups.
pub struct AtomGroupNeighborhood {
    groups: Vec<(GroupId, Point3<f64>)>,
    kdtree: KdTree<f64, 3>,
}

impl AtomGroupNeighborhood {
    pub fn new(groups: impl IntoIterator<Item = (GroupId, Point3<f64>)>) -> Self {
        let groups: Vec<(GroupId, Point3<f64>)> = groups.into_iter().collect();
        let positions: Vec<[f64; 3]> = groups
            .iter()
            .map(|(_, c)| [c.x, c.y, c.z])
            .collect();
        let kdtree: KdTree<f64, 3> = (&positions).into();
        Self { groups, kdtree }
    }

    /// Index over every group of the registry.
    pub fn from_registry(registry: &AtomGroupRegistry) -> Self {
        Self::new(registry.iter().map(|(id, g)| (id, g.centroid())))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups whose centroid lies within `radius` of `center`, paired with
    /// their distance, sorted by distance and then by group id.
    pub fn search(&self, center: &Point3<f64>, radius: f64) -> Vec<(GroupId, f64)> {
        if self.groups.is_empty() || radius < 0.0 {
            return Vec::new();
        }
        let query = [center.x, center.y, center.z];
        // The tree is queried slightly wider; the exact cut is applied below.
        let inflated = radius + RADIUS_SLACK;
        let mut found: Vec<(GroupId, f64)> = self
            .kdtree
            .within_unsorted::<SquaredEuclidean>(&query, inflated * inflated)
            .into_iter()
            .filter_map(|nn| {
                let (id, centroid) = self.groups.get(nn.item as usize)?;
                let distance = (centroid - center).norm();
                (distance <= radius).then_some((*id, distance))
            })
            .collect();
        found.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        found
    }
}
