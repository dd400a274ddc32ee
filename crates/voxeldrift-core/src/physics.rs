//! Dismantle physics - explosion impulse, gravity, floor bounce
//!
//! Per-tick explicit Euler on every voxel independently. There is no
//! voxel-voxel collision and no coupling between linear and angular motion.

use glam::Vec3;

use crate::rng::VoxelRng;
use crate::settings::PhysicsSettings;
use crate::voxel::SimulationVoxel;

/// Kinematic integrator for scattered voxels
pub struct PhysicsIntegrator;

impl PhysicsIntegrator {
    /// Give every voxel a random linear and angular impulse
    ///
    /// Replaces (does not add to) the current velocities.
    pub fn explode<R: VoxelRng + ?Sized>(
        voxels: &mut [SimulationVoxel],
        settings: &PhysicsSettings,
        rng: &mut R,
    ) {
        for voxel in voxels.iter_mut() {
            voxel.velocity = Vec3::new(
                rng.gen_signed(settings.impulse_horizontal),
                rng.gen_between(settings.impulse_vertical_min, settings.impulse_vertical_max),
                rng.gen_signed(settings.impulse_horizontal),
            );
            voxel.angular_velocity = Vec3::new(
                rng.gen_signed(settings.impulse_angular),
                rng.gen_signed(settings.impulse_angular),
                rng.gen_signed(settings.impulse_angular),
            );
        }
    }

    /// Advance all voxels by one tick
    ///
    /// Returns how many voxels touched the floor this tick.
    pub fn step(voxels: &mut [SimulationVoxel], settings: &PhysicsSettings) -> usize {
        let floor_top = settings.floor_top();
        let mut contacts = 0;

        for voxel in voxels.iter_mut() {
            // 1. Gravity
            voxel.velocity.y -= settings.gravity;

            // 2. Integrate
            voxel.position += voxel.velocity;
            voxel.rotation += voxel.angular_velocity;

            // 3. Floor response
            if voxel.position.y < floor_top {
                voxel.position.y = floor_top;
                voxel.velocity.y *= -settings.restitution;
                voxel.velocity.x *= settings.friction;
                voxel.velocity.z *= settings.friction;
                voxel.angular_velocity *= settings.rotational_damping;
                contacts += 1;
            }
        }

        log::trace!("Physics step: {} floor contacts", contacts);
        contacts
    }
}
