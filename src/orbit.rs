use crate::error::{CrError, CrResult};
use crate::mapping::Mapping2D;

/// Which coupling the orbit tracer uses when advancing `(x, y) -> (f(x,y), g(x,y))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrder {
    /// `x' = f(x, y)`, `y' = g(x, y)`: both components evaluated against the same `(x, y)`.
    /// The standard reading of the stated recurrence, and the only one that is a fixed point of
    /// it; the default.
    #[default]
    Simultaneous,
    /// `x' = f(x, y)`, `y' = g(x', y)`: the reference implementation's `x, y = f(x,y), g(x,y)`
    /// Python tuple assignment, which evaluates the right-hand side left to right and so feeds
    /// the *already-updated* `x` into `g`. Kept only for parity testing against the reference
    /// implementation; not a fixed point of the stated model.
    Staggered,
}

/// The trivial forward-iteration routine for orbit tracing. Shares the `Mapping2D` interface
/// with the localiser but otherwise has no dependency on it.
pub struct OrbitTracer;

impl OrbitTracer {
    /// Trace `iterations` steps of `mapping` starting from `start`, returning parallel `f32`
    /// arrays of length `iterations + 1` with element 0 equal to `start`.
    pub fn trace(
        mapping: &dyn Mapping2D,
        start: (f64, f64),
        iterations: usize,
        order: UpdateOrder,
    ) -> CrResult<(Vec<f32>, Vec<f32>)> {
        if iterations < 1 {
            return Err(CrError::InvalidConfig(
                "iterations must be >= 1".to_string(),
            ));
        }

        let mut xs = Vec::with_capacity(iterations + 1);
        let mut ys = Vec::with_capacity(iterations + 1);

        let (mut x, mut y) = start;
        xs.push(x as f32);
        ys.push(y as f32);

        for _ in 0..iterations {
            let (new_x, new_y) = match order {
                UpdateOrder::Simultaneous => mapping.eval(x, y),
                UpdateOrder::Staggered => {
                    let (fx, _) = mapping.eval(x, y);
                    let (_, gy) = mapping.eval(fx, y);
                    (fx, gy)
                }
            };
            x = new_x;
            y = new_y;
            xs.push(x as f32);
            ys.push(y as f32);
        }

        Ok((xs, ys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{HenonF, HenonG, PairMapping};

    #[test]
    fn length_matches_iterations_plus_one() {
        let mapping = PairMapping::new(HenonF::classical(), HenonG);
        let (xs, ys) = OrbitTracer::trace(&mapping, (1.1, 0.5), 10, UpdateOrder::Simultaneous)
            .unwrap();
        assert_eq!(xs.len(), 11);
        assert_eq!(ys.len(), 11);
        assert_eq!(xs[0], 1.1_f32);
        assert_eq!(ys[0], 0.5_f32);
        assert!(xs.iter().chain(ys.iter()).all(|v| v.is_finite()));
    }

    #[test]
    fn henon_simultaneous_matches_closed_form_recurrence() {
        let mapping = PairMapping::new(HenonF::classical(), HenonG);
        let (xs, ys) = OrbitTracer::trace(&mapping, (1.1, 0.5), 3, UpdateOrder::Simultaneous)
            .unwrap();

        let mut x = 1.1_f64;
        let mut y = 0.5_f64;
        for i in 0..3 {
            let (nx, ny) = (1.0 - 1.4 * x * x + 0.3 * y, x);
            x = nx;
            y = ny;
            assert!((xs[i + 1] as f64 - x).abs() < 1e-5);
            assert!((ys[i + 1] as f64 - y).abs() < 1e-5);
        }
    }

    #[test]
    fn staggered_differs_from_simultaneous_when_g_depends_on_x() {
        let mapping = PairMapping::new(HenonF::classical(), HenonG);
        let (_, ys_sim) =
            OrbitTracer::trace(&mapping, (1.1, 0.5), 1, UpdateOrder::Simultaneous).unwrap();
        let (_, ys_stag) =
            OrbitTracer::trace(&mapping, (1.1, 0.5), 1, UpdateOrder::Staggered).unwrap();
        // g = HenonG returns x unchanged, so staggered feeds the *new* x through g, diverging
        // from the simultaneous update which feeds the *old* x.
        assert_ne!(ys_sim[1], ys_stag[1]);
    }

    #[test]
    fn rejects_zero_iterations() {
        let mapping = PairMapping::new(HenonF::classical(), HenonG);
        assert!(matches!(
            OrbitTracer::trace(&mapping, (0.0, 0.0), 0, UpdateOrder::Simultaneous),
            Err(CrError::InvalidConfig(_))
        ));
    }
}
