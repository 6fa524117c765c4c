#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure solver that aims a pursuer at the future position of a moving target.

use arena_warden_core::Vector2Int;

const LINEAR_EPSILON: f64 = 1e-9;

/// Outcome of an interception query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interception {
    /// The pursuer can meet the target after `turns` turns.
    Solved {
        /// Projected target position after the whole turns elapsed.
        point: Vector2Int,
        /// Exact meeting time measured in turns.
        turns: f64,
    },
    /// No non-negative meeting time exists; the pursuer should hold position.
    Degenerate {
        /// Safe no-op destination, the pursuer's own position.
        fallback: Vector2Int,
    },
}

impl Interception {
    /// Destination the pursuer should move toward.
    #[must_use]
    pub const fn point(&self) -> Vector2Int {
        match self {
            Self::Solved { point, .. } => *point,
            Self::Degenerate { fallback } => *fallback,
        }
    }

    /// Whether a real meeting point was found.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
}

/// Solves for the point where a pursuer moving in a straight line at `speed`
/// meets a target travelling `trajectory` units per turn.
///
/// With `D = pursuer - target` the meeting time `t` satisfies
/// `(speed² - |trajectory|²)·t² + 2·(D·trajectory)·t - |D|² = 0`. The larger
/// root is the earliest non-negative one whenever the pursuer is faster. The
/// returned point is the target projected by `floor(t)` whole turns.
///
/// A negative discriminant, or a root that is negative or not finite, means
/// the target cannot be caught; the pursuer's own position is returned as a
/// no-op destination instead.
#[must_use]
pub fn intercept(
    pursuer: Vector2Int,
    speed: f64,
    target: Vector2Int,
    trajectory: Vector2Int,
) -> Interception {
    let offset = pursuer - target;

    if trajectory == Vector2Int::ZERO {
        let turns = if speed > 0.0 {
            offset.magnitude() / speed
        } else {
            0.0
        };
        return Interception::Solved {
            point: target,
            turns,
        };
    }

    let a = speed * speed - trajectory.sqr_magnitude() as f64;
    let b = 2.0 * offset.dot(trajectory) as f64;
    let c = -(offset.sqr_magnitude() as f64);

    let turns = if a.abs() < LINEAR_EPSILON {
        if b.abs() < LINEAR_EPSILON {
            return degenerate(pursuer);
        }
        -c / b
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return degenerate(pursuer);
        }
        (-b + discriminant.sqrt()) / (2.0 * a)
    };

    if !turns.is_finite() || turns < 0.0 {
        return degenerate(pursuer);
    }

    Interception::Solved {
        point: project(target, trajectory, turns.floor()),
        turns,
    }
}

fn degenerate(pursuer: Vector2Int) -> Interception {
    Interception::Degenerate { fallback: pursuer }
}

fn project(origin: Vector2Int, trajectory: Vector2Int, whole_turns: f64) -> Vector2Int {
    let steps = whole_turns.min(f64::from(i32::MAX)) as i64;
    let x = i64::from(origin.x()) + steps * i64::from(trajectory.x());
    let y = i64::from(origin.y()) + steps * i64::from(trajectory.y());
    Vector2Int::new(saturate(x), saturate(y))
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::{intercept, Interception};
    use arena_warden_core::{Vector2Int, HERO_SPEED};

    #[test]
    fn stationary_target_is_met_where_it_stands() {
        let result = intercept(
            Vector2Int::new(0, 0),
            HERO_SPEED,
            Vector2Int::new(1_000, 0),
            Vector2Int::ZERO,
        );

        match result {
            Interception::Solved { point, turns } => {
                assert_eq!(point, Vector2Int::new(1_000, 0));
                assert!((turns - 1.25).abs() < 1e-9);
            }
            Interception::Degenerate { .. } => panic!("stationary target must be reachable"),
        }
    }

    #[test]
    fn crossing_target_is_led_by_whole_turns() {
        let result = intercept(
            Vector2Int::new(0, 0),
            HERO_SPEED,
            Vector2Int::new(1_000, 0),
            Vector2Int::new(0, 400),
        );

        assert!(result.is_solved());
        assert_eq!(result.point(), Vector2Int::new(1_000, 400));
    }

    #[test]
    fn approaching_target_is_met_part_way() {
        let result = intercept(
            Vector2Int::new(0, 0),
            HERO_SPEED,
            Vector2Int::new(2_000, 0),
            Vector2Int::new(-400, 0),
        );

        match result {
            Interception::Solved { point, turns } => {
                assert!((turns - 5.0 / 3.0).abs() < 1e-9);
                assert_eq!(point, Vector2Int::new(1_600, 0));
            }
            Interception::Degenerate { .. } => panic!("approaching target must be reachable"),
        }
    }

    #[test]
    fn equal_speeds_fall_back_to_the_linear_solution() {
        let result = intercept(
            Vector2Int::new(0, 0),
            400.0,
            Vector2Int::new(1_000, 0),
            Vector2Int::new(-400, 0),
        );

        assert!(result.is_solved());
        assert_eq!(result.point(), Vector2Int::new(600, 0));
    }

    #[test]
    fn negative_discriminant_holds_position() {
        let pursuer = Vector2Int::new(500, 0);
        let result = intercept(
            pursuer,
            HERO_SPEED,
            Vector2Int::new(1_000, 0),
            Vector2Int::new(0, 1_000),
        );

        assert_eq!(result, Interception::Degenerate { fallback: pursuer });
        assert_eq!(result.point(), pursuer);
    }

    #[test]
    fn faster_target_running_away_cannot_be_caught() {
        let pursuer = Vector2Int::new(0, 0);
        let result = intercept(
            pursuer,
            HERO_SPEED,
            Vector2Int::new(1_000, 0),
            Vector2Int::new(1_000, 0),
        );

        assert!(!result.is_solved());
        assert_eq!(result.point(), pursuer);
    }
}
