//! Uniform-grid broad phase over the static entities of the world.
//!
//! Moving platforms are not indexed; the world scans them separately because
//! their bounds change every frame.

use std::collections::HashMap;

use parkour_core::{Aabb, CoinId, JumpPadId, ObstacleId, PlatformId, WallId};

const BUCKET_SIZE: f32 = 4.0;

/// Reference to an indexed entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum EntityRef {
    Platform(PlatformId),
    Wall(WallId),
    Obstacle(ObstacleId),
    JumpPad(JumpPadId),
    Coin(CoinId),
}

#[derive(Debug, Default)]
pub(crate) struct SpatialIndex {
    buckets: HashMap<(i32, i32), Vec<EntityRef>>,
}

impl SpatialIndex {
    pub(crate) fn insert(&mut self, entity: EntityRef, bounds: &Aabb) {
        for key in bucket_keys(bounds) {
            self.buckets.entry(key).or_default().push(entity);
        }
    }

    pub(crate) fn remove(&mut self, entity: EntityRef, bounds: &Aabb) {
        for key in bucket_keys(bounds) {
            if let Some(bucket) = self.buckets.get_mut(&key) {
                bucket.retain(|candidate| *candidate != entity);
                if bucket.is_empty() {
                    let _ = self.buckets.remove(&key);
                }
            }
        }
    }

    /// Candidates whose buckets overlap the region, sorted and deduplicated.
    pub(crate) fn query(&self, region: &Aabb) -> Vec<EntityRef> {
        let mut found = Vec::new();
        for key in bucket_keys(region) {
            if let Some(bucket) = self.buckets.get(&key) {
                found.extend_from_slice(bucket);
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}

fn bucket_keys(bounds: &Aabb) -> impl Iterator<Item = (i32, i32)> {
    let min = bounds.min();
    let max = bounds.max();
    let x0 = bucket_coordinate(min.x);
    let x1 = bucket_coordinate(max.x);
    let z0 = bucket_coordinate(min.z);
    let z1 = bucket_coordinate(max.z);
    (x0..=x1).flat_map(move |x| (z0..=z1).map(move |z| (x, z)))
}

fn bucket_coordinate(value: f32) -> i32 {
    (value / BUCKET_SIZE).floor() as i32
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn query_finds_entities_spanning_several_buckets() {
        let mut index = SpatialIndex::default();
        let wide = Aabb::from_corners(Vec3::new(-10.0, 0.0, -1.0), Vec3::new(10.0, 1.0, 1.0));
        let far = Aabb::from_corners(Vec3::new(50.0, 0.0, 50.0), Vec3::new(51.0, 1.0, 51.0));
        index.insert(EntityRef::Platform(PlatformId::new(1)), &wide);
        index.insert(EntityRef::Wall(WallId::new(2)), &far);

        let probe = Aabb::from_center_size(Vec3::new(7.0, 0.5, 0.0), Vec3::ONE);
        assert_eq!(
            index.query(&probe),
            vec![EntityRef::Platform(PlatformId::new(1))]
        );
    }

    #[test]
    fn removed_entities_disappear() {
        let mut index = SpatialIndex::default();
        let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(9.0));
        let coin = EntityRef::Coin(CoinId::new(3));
        index.insert(coin, &bounds);
        index.remove(coin, &bounds);

        assert!(index.query(&bounds).is_empty());
        assert!(index.buckets.is_empty());
    }
}
