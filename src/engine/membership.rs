//! Universes of discourse and triangular membership functions

use super::DefinitionError;

// ============================================================================
// Universe
// ============================================================================

/// A closed interval `[min, max]` sampled at a fixed step.
///
/// The sample points are the defuzzification grid of an output variable:
/// `min, min + step, ..., max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
}

impl Universe {
    /// Universe sampled at unit steps
    pub fn new(min: f64, max: f64) -> Result<Self, DefinitionError> {
        Self::with_step(min, max, 1.0)
    }

    /// Universe sampled at a custom step
    pub fn with_step(min: f64, max: f64, step: f64) -> Result<Self, DefinitionError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || min >= max || step <= 0.0 {
            return Err(DefinitionError::InvalidUniverse { min, max, step });
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Check whether a value lies inside the closed interval
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        // Tolerance keeps 0..=50 at 51 points despite float division noise
        ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the grid points in ascending order
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.min + (i as f64) * self.step)
    }
}

// ============================================================================
// Membership Function
// ============================================================================

/// Triangular membership function with control points `a <= b <= c`.
///
/// `a == b` makes a left shoulder (degree 1 for every `x <= b`), `b == c` a
/// right shoulder (degree 1 for every `x >= b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipFunction {
    a: f64,
    b: f64,
    c: f64,
}

impl MembershipFunction {
    /// Build a triangular function, rejecting unordered or zero-width points
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, DefinitionError> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();
        if !finite || a > b || b > c || a == c {
            return Err(DefinitionError::InvalidMembership { a, b, c });
        }
        Ok(Self { a, b, c })
    }

    /// Control points `(a, b, c)`
    pub fn points(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    pub fn is_left_shoulder(&self) -> bool {
        self.a == self.b
    }

    pub fn is_right_shoulder(&self) -> bool {
        self.b == self.c
    }

    /// Degree of membership of `x`, always within `[0, 1]`
    pub fn degree(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;

        if a == b && x <= b {
            return 1.0;
        }
        if b == c && x >= b {
            return 1.0;
        }
        if x <= a || x >= c {
            return 0.0;
        }

        if x < b {
            (x - a) / (b - a)
        } else if x > b {
            (c - x) / (c - b)
        } else {
            1.0
        }
    }

    /// Support interval (where membership may be > 0)
    pub fn support(&self) -> (f64, f64) {
        (self.a, self.c)
    }
}

/// Shorthand for [`MembershipFunction::triangular`]
pub fn trimf(a: f64, b: f64, c: f64) -> Result<MembershipFunction, DefinitionError> {
    MembershipFunction::triangular(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_membership() {
        let mf = trimf(0.0, 5.0, 10.0).unwrap();

        assert!((mf.degree(0.0) - 0.0).abs() < 0.001);
        assert!((mf.degree(5.0) - 1.0).abs() < 0.001);
        assert!((mf.degree(10.0) - 0.0).abs() < 0.001);
        assert!((mf.degree(2.5) - 0.5).abs() < 0.001);
        assert!((mf.degree(7.5) - 0.5).abs() < 0.001);
        assert_eq!(mf.degree(-3.0), 0.0);
        assert_eq!(mf.degree(42.0), 0.0);
    }

    #[test]
    fn test_left_shoulder() {
        let cold = trimf(0.0, 0.0, 15.0).unwrap();
        assert!(cold.is_left_shoulder());

        for x in [-10.0, -0.5, 0.0] {
            assert_eq!(cold.degree(x), 1.0);
        }
        assert!((cold.degree(7.5) - 0.5).abs() < 1e-12);
        assert_eq!(cold.degree(15.0), 0.0);
    }

    #[test]
    fn test_right_shoulder() {
        let hot = trimf(28.0, 50.0, 50.0).unwrap();
        assert!(hot.is_right_shoulder());

        for x in [50.0, 50.5, 1000.0] {
            assert_eq!(hot.degree(x), 1.0);
        }
        assert!((hot.degree(39.0) - 0.5).abs() < 1e-12);
        assert_eq!(hot.degree(28.0), 0.0);
    }

    #[test]
    fn test_degree_bounded_over_grid() {
        let universe = Universe::new(0.0, 100.0).unwrap();
        let functions = [
            trimf(0.0, 0.0, 30.0).unwrap(),
            trimf(25.0, 50.0, 75.0).unwrap(),
            trimf(70.0, 100.0, 100.0).unwrap(),
        ];

        for mf in &functions {
            for x in universe.points() {
                let d = mf.degree(x);
                assert!((0.0..=1.0).contains(&d), "degree {} at {}", d, x);
                assert!(d.is_finite());
            }
        }
    }

    #[test]
    fn test_continuity_at_control_points() {
        let eps = 1e-9;
        let functions = [
            trimf(20.0, 50.0, 80.0).unwrap(),
            trimf(0.0, 0.0, 40.0).unwrap(),
            trimf(60.0, 100.0, 100.0).unwrap(),
        ];

        for mf in &functions {
            let (a, b, c) = mf.points();
            for p in [a, b, c] {
                let left = mf.degree(p - eps);
                let at = mf.degree(p);
                let right = mf.degree(p + eps);
                // Shoulders are flat on their outer side; any jump must be below eps scale
                assert!((left - at).abs() < 1e-6, "jump left of {} : {} vs {}", p, left, at);
                assert!((right - at).abs() < 1e-6, "jump right of {} : {} vs {}", p, right, at);
            }
        }
    }

    #[test]
    fn test_invalid_membership_rejected() {
        assert!(matches!(
            trimf(10.0, 5.0, 20.0),
            Err(DefinitionError::InvalidMembership { .. })
        ));
        assert!(trimf(5.0, 5.0, 5.0).is_err());
        assert!(trimf(f64::NAN, 1.0, 2.0).is_err());
    }

    #[test]
    fn test_universe_grid() {
        let universe = Universe::new(0.0, 50.0).unwrap();
        assert_eq!(universe.len(), 51);

        let points: Vec<f64> = universe.points().collect();
        assert_eq!(points.first(), Some(&0.0));
        assert_eq!(points.last(), Some(&50.0));

        let co2 = Universe::new(300.0, 2000.0).unwrap();
        assert_eq!(co2.len(), 1701);
        assert!(co2.contains(300.0));
        assert!(co2.contains(2000.0));
        assert!(!co2.contains(299.99));
    }

    #[test]
    fn test_universe_with_step() {
        let universe = Universe::with_step(0.0, 1.0, 0.25).unwrap();
        assert_eq!(universe.len(), 5);
        assert!(Universe::with_step(0.0, 1.0, 0.0).is_err());
        assert!(Universe::new(10.0, 10.0).is_err());
    }
}
