use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::Size;
use glam::DVec2;

/// Hue band for particles, in degrees (green).
pub const HUE_MIN: f64 = 105.0;
pub const HUE_MAX: f64 = 135.0;

const MAX_SPEED: f64 = 0.5;
const RADIUS_MIN: f64 = 0.5;
const RADIUS_MAX: f64 = 2.5;
const ALPHA_MIN: f64 = 0.3;
const ALPHA_MAX: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    /// Pixels per frame.
    pub velocity: DVec2,
    pub radius: f64,
    /// Alpha before theme scaling.
    pub alpha: f64,
    /// Hue in degrees, within `[HUE_MIN, HUE_MAX)`.
    pub hue: f64,
}

impl Particle {
    /// A particle at a uniform position inside `bounds`.
    pub fn random(bounds: Size, rng: &mut Xorshift64) -> Self {
        Self {
            position: DVec2::new(
                rng.next_range(0.0, bounds.width),
                rng.next_range(0.0, bounds.height),
            ),
            velocity: DVec2::new(
                rng.next_range(-MAX_SPEED, MAX_SPEED),
                rng.next_range(-MAX_SPEED, MAX_SPEED),
            ),
            radius: rng.next_range(RADIUS_MIN, RADIUS_MAX),
            alpha: rng.next_range(ALPHA_MIN, ALPHA_MAX),
            hue: rng.next_range(HUE_MIN, HUE_MAX),
        }
    }
}

/// Moves a particle by its velocity and wraps it to the opposite edge when
/// it leaves `bounds`.
pub fn step(particle: Particle, bounds: Size) -> Particle {
    let mut p = particle.position + particle.velocity;
    p.x = wrap(p.x, bounds.width);
    p.y = wrap(p.y, bounds.height);
    Particle {
        position: p,
        ..particle
    }
}

fn wrap(v: f64, extent: f64) -> f64 {
    if v < 0.0 {
        extent
    } else if v > extent {
        0.0
    } else {
        v
    }
}

/// Alpha of the line joining two particles `distance` apart: linear from
/// `max_alpha` at zero distance down to zero at `threshold` and beyond.
pub fn connection_alpha(distance: f64, threshold: f64, max_alpha: f64) -> f64 {
    if distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Size {
        Size::new(400.0, 300.0).unwrap()
    }

    fn at(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle {
            position: DVec2::new(x, y),
            velocity: DVec2::new(vx, vy),
            radius: 1.0,
            alpha: 0.5,
            hue: 120.0,
        }
    }

    #[test]
    fn step_integrates_velocity() {
        let p = step(at(10.0, 20.0, 0.25, -0.5), bounds());
        assert_eq!(p.position, DVec2::new(10.25, 19.5));
        assert_eq!(p.velocity, DVec2::new(0.25, -0.5));
    }

    #[test]
    fn leaving_left_reenters_right() {
        let p = step(at(0.2, 50.0, -0.5, 0.0), bounds());
        assert_eq!(p.position.x, 400.0);
    }

    #[test]
    fn leaving_right_reenters_left() {
        let p = step(at(399.8, 50.0, 0.5, 0.0), bounds());
        assert_eq!(p.position.x, 0.0);
    }

    #[test]
    fn leaving_top_and_bottom_wraps_vertically() {
        assert_eq!(step(at(5.0, 0.1, 0.0, -0.3), bounds()).position.y, 300.0);
        assert_eq!(step(at(5.0, 299.9, 0.0, 0.3), bounds()).position.y, 0.0);
    }

    #[test]
    fn step_keeps_other_fields() {
        let before = at(5.0, 5.0, 0.1, 0.1);
        let after = step(before, bounds());
        assert_eq!(after.radius, before.radius);
        assert_eq!(after.alpha, before.alpha);
        assert_eq!(after.hue, before.hue);
    }

    #[test]
    fn random_particles_respect_ranges() {
        let mut rng = Xorshift64::new(9);
        for _ in 0..1000 {
            let p = Particle::random(bounds(), &mut rng);
            assert!(bounds().contains(p.position));
            assert!(p.velocity.x.abs() <= MAX_SPEED && p.velocity.y.abs() <= MAX_SPEED);
            assert!((RADIUS_MIN..RADIUS_MAX).contains(&p.radius));
            assert!((ALPHA_MIN..ALPHA_MAX).contains(&p.alpha));
            assert!((HUE_MIN..HUE_MAX).contains(&p.hue));
        }
    }

    #[test]
    fn connection_alpha_is_zero_at_and_beyond_threshold() {
        assert_eq!(connection_alpha(80.0, 80.0, 0.15), 0.0);
        assert_eq!(connection_alpha(120.0, 80.0, 0.15), 0.0);
        assert_eq!(connection_alpha(0.0, 80.0, 0.15), 0.15);
        assert!((connection_alpha(40.0, 80.0, 0.12) - 0.06).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrapped_particles_stay_in_bounds(
                seed in any::<u64>(),
                w in 10.0f64..2000.0,
                h in 10.0f64..2000.0,
                frames in 1usize..400,
            ) {
                let bounds = Size::new(w, h).unwrap();
                let mut rng = Xorshift64::new(seed);
                let mut p = Particle::random(bounds, &mut rng);
                for _ in 0..frames {
                    p = step(p, bounds);
                    prop_assert!(p.position.x >= 0.0 && p.position.x <= w);
                    prop_assert!(p.position.y >= 0.0 && p.position.y <= h);
                }
            }

            #[test]
            fn connection_alpha_decreases_with_distance(
                a in 0.0f64..200.0,
                b in 0.0f64..200.0,
                max in 0.0f64..1.0,
            ) {
                let (near, far) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(connection_alpha(near, 80.0, max) >= connection_alpha(far, 80.0, max));
                prop_assert!(connection_alpha(far, 80.0, max) >= 0.0);
            }
        }
    }
}
