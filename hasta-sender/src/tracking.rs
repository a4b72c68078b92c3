//! Hand tracking sources
//!
//! [`TrackingSource`] is the seam to whatever tracker supplies hand poses.
//! [`SimulatedHands`] stands in for hardware: both hands circle in front of
//! the sensor and leave the view on a fixed schedule, so a receiver sees
//! every create/update/destroy transition.
//!
//! ```text
//! visibility cycle:  |-- both (40%) --|- left (20%) -|- none (20%) -|- right (20%) -|
//! ```

use crate::config::SimulationConfig;
use hasta_wire::{HandPose, Quat, Side, Vec3};
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::StandardNormal;
use std::f32::consts::TAU;

/// Supplies the currently tracked hands once per tick.
pub trait TrackingSource {
    /// Zero, one or two poses in the sender's local space.
    fn poll_hands(&mut self) -> Vec<HandPose>;
}

/// Resting point of each hand, relative to the sensor
const LEFT_CENTER: Vec3 = Vec3::new(-0.15, 0.25, 0.0);
const RIGHT_CENTER: Vec3 = Vec3::new(0.15, 0.25, 0.0);

/// Simulated tracker driven by tick count, not wall time
pub struct SimulatedHands {
    config: SimulationConfig,
    tick_secs: f64,
    ticks: u64,
    rng: SmallRng,
}

impl SimulatedHands {
    /// If `random_seed` is 0, jitter uses entropy; otherwise runs repeat exactly.
    pub fn new(config: SimulationConfig, tick_hz: f32) -> Self {
        let rng = if config.random_seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.random_seed)
        };

        Self {
            config,
            tick_secs: 1.0 / f64::from(tick_hz.max(1.0)),
            ticks: 0,
            rng,
        }
    }

    /// Simulated seconds elapsed.
    pub fn elapsed_secs(&self) -> f64 {
        self.ticks as f64 * self.tick_secs
    }

    /// Which hands are in view at time `t`.
    fn visible(&self, t: f64) -> (bool, bool) {
        let cycle = self.config.visibility_cycle_secs;
        if cycle <= 0.0 {
            return (true, true);
        }

        let phase = cycle_fraction(t, cycle);
        match phase {
            p if p < 0.4 => (true, true),
            p if p < 0.6 => (true, false),
            p if p < 0.8 => (false, false),
            _ => (false, true),
        }
    }

    fn jitter(&mut self) -> f32 {
        let stddev = self.config.jitter_stddev;
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        n * stddev
    }

    fn hand_at(&mut self, side: Side, t: f64) -> HandPose {
        let period = self.config.orbit_period_secs.max(f32::EPSILON);
        // Hands circle in opposite directions
        let direction = match side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };
        let angle = direction * TAU * cycle_fraction(t, period);
        let radius = self.config.orbit_radius;

        let center = match side {
            Side::Left => LEFT_CENTER,
            Side::Right => RIGHT_CENTER,
        };
        let orbit = Vec3::new(
            radius * angle.cos() + self.jitter(),
            self.jitter(),
            radius * angle.sin() + self.jitter(),
        );

        HandPose::new(side, center + orbit, Quat::from_rotation_y(angle))
    }
}

/// Position of `t` within a repeating period, in `[0, 1)`.
///
/// Reduced in f64 so the phase stays tick-accurate on long runs.
fn cycle_fraction(t: f64, period: f32) -> f32 {
    let period = f64::from(period);
    ((t % period) / period) as f32
}

impl TrackingSource for SimulatedHands {
    fn poll_hands(&mut self) -> Vec<HandPose> {
        let t = self.elapsed_secs();
        self.ticks += 1;

        let (left, right) = self.visible(t);
        let mut hands = Vec::with_capacity(2);
        if left {
            hands.push(self.hand_at(Side::Left, t));
        }
        if right {
            hands.push(self.hand_at(Side::Right, t));
        }
        hands
    }
}
