//! Voxel storage
//!
//! The store owns the authoritative voxel array. Its length and id set only
//! change on [`VoxelStore::load`]; dismantle and rebuild mutate voxels in place.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::VoxelColor;
use crate::rng::VoxelRng;

/// One input point from a model source (generator, file, import)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelPoint {
    pub position: Vec3,
    pub color: VoxelColor,
}

impl VoxelPoint {
    pub fn new(x: f32, y: f32, z: f32, color: VoxelColor) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            color,
        }
    }
}

/// A simulated unit cube
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationVoxel {
    /// Stable index assigned at load time
    pub id: u32,
    pub position: Vec3,
    /// Units per tick
    pub velocity: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Radians per tick
    pub angular_velocity: Vec3,
    pub color: VoxelColor,
}

impl SimulationVoxel {
    /// A voxel at rest at `point`, keeping its color as given
    pub fn at_rest(id: u32, point: &VoxelPoint) -> Self {
        Self {
            id,
            position: point.position,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            color: point.color,
        }
    }
}

/// Owner of the voxel array
#[derive(Debug, Default)]
pub struct VoxelStore {
    voxels: Vec<SimulationVoxel>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self { voxels: Vec::new() }
    }

    /// Replace every voxel with one per point, in input order
    ///
    /// Ids are sequential from 0, kinematics start at zero and each color gets a
    /// random lightness offset in `±lightness_jitter`. Returns the new count.
    pub fn load<R: VoxelRng + ?Sized>(
        &mut self,
        points: &[VoxelPoint],
        lightness_jitter: f32,
        rng: &mut R,
    ) -> usize {
        self.voxels.clear();
        self.voxels.reserve(points.len());

        for (index, point) in points.iter().enumerate() {
            let mut voxel = SimulationVoxel::at_rest(index as u32, point);
            if lightness_jitter > 0.0 {
                voxel.color = point
                    .color
                    .offset_lightness(rng.gen_signed(lightness_jitter));
            }
            self.voxels.push(voxel);
        }

        self.voxels.len()
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &[SimulationVoxel] {
        &self.voxels
    }

    pub fn voxels_mut(&mut self) -> &mut [SimulationVoxel] {
        &mut self.voxels
    }

    pub fn get(&self, id: u32) -> Option<&SimulationVoxel> {
        self.voxels.get(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn points() -> Vec<VoxelPoint> {
        vec![
            VoxelPoint::new(0.0, 0.0, 0.0, VoxelColor::from_packed(0xFF0000)),
            VoxelPoint::new(1.0, 2.0, 3.0, VoxelColor::from_packed(0x00FF00)),
            VoxelPoint::new(-1.0, 5.0, 0.0, VoxelColor::from_packed(0x808080)),
        ]
    }

    #[test]
    fn test_load_assigns_sequential_ids() {
        let mut store = VoxelStore::new();
        let count = store.load(&points(), 0.05, &mut seeded(1));

        assert_eq!(count, 3);
        for (index, voxel) in store.voxels().iter().enumerate() {
            assert_eq!(voxel.id, index as u32);
            assert_eq!(voxel.velocity, Vec3::ZERO);
            assert_eq!(voxel.rotation, Vec3::ZERO);
            assert_eq!(voxel.angular_velocity, Vec3::ZERO);
        }
        assert_eq!(store.get(1).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert!(store.get(3).is_none());
    }

    #[test]
    fn test_load_replaces_previous_model() {
        let mut store = VoxelStore::new();
        store.load(&points(), 0.05, &mut seeded(1));
        store.voxels_mut()[0].velocity = Vec3::ONE;

        let count = store.load(&points()[..1], 0.05, &mut seeded(1));
        assert_eq!(count, 1);
        assert_eq!(store.voxels()[0].velocity, Vec3::ZERO);
    }

    #[test]
    fn test_jitter_stays_bounded() {
        let gray = VoxelColor::from_packed(0x808080);
        let input = vec![VoxelPoint::new(0.0, 0.0, 0.0, gray); 200];

        let mut store = VoxelStore::new();
        store.load(&input, 0.05, &mut seeded(99));

        let (_, _, base_lightness) = gray.to_hsl();
        let mut varied = false;
        for voxel in store.voxels() {
            let (_, _, l) = voxel.color.to_hsl();
            assert!((l - base_lightness).abs() <= 0.05 + 1e-5);
            if (l - base_lightness).abs() > 1e-3 {
                varied = true;
            }
        }
        assert!(varied, "jitter should perturb at least some voxels");
    }

    #[test]
    fn test_zero_jitter_keeps_colors() {
        let mut store = VoxelStore::new();
        store.load(&points(), 0.0, &mut seeded(5));
        assert_eq!(store.voxels()[0].color, VoxelColor::from_packed(0xFF0000));
    }

    #[test]
    fn test_load_empty() {
        let mut store = VoxelStore::new();
        store.load(&points(), 0.05, &mut seeded(1));
        assert_eq!(store.load(&[], 0.05, &mut seeded(1)), 0);
        assert!(store.is_empty());
    }
}
