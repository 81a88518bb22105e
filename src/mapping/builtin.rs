use super::Mapping1D;

/// `f(x, y) = x`. Pair with [`IdentityY`] for the identity map used in scenario S1.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityX;

impl Mapping1D for IdentityX {
    fn eval(&self, x: f64, _y: f64) -> f64 {
        x
    }
}

/// `g(x, y) = y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityY;

impl Mapping1D for IdentityY {
    fn eval(&self, _x: f64, y: f64) -> f64 {
        y
    }
}

/// `f(x, y) = value`, ignoring its arguments. Pair two of these for the pure-sink scenario (S2).
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub f64);

impl Mapping1D for Constant {
    fn eval(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// `f(x, y) = x + offset`.
#[derive(Debug, Clone, Copy)]
pub struct TranslateX(pub f64);

impl Mapping1D for TranslateX {
    fn eval(&self, x: f64, _y: f64) -> f64 {
        x + self.0
    }
}

/// `g(x, y) = y + offset`.
#[derive(Debug, Clone, Copy)]
pub struct TranslateY(pub f64);

impl Mapping1D for TranslateY {
    fn eval(&self, _x: f64, y: f64) -> f64 {
        y + self.0
    }
}

/// The `f` component of the Hénon map, `f(x, y) = 1 - a*x^2 + b*y`.
#[derive(Debug, Clone, Copy)]
pub struct HenonF {
    pub a: f64,
    pub b: f64,
}

impl HenonF {
    /// The classical Hénon parameters (a=1.4, b=0.3).
    pub fn classical() -> Self {
        Self { a: 1.4, b: 0.3 }
    }
}

impl Mapping1D for HenonF {
    fn eval(&self, x: f64, y: f64) -> f64 {
        1.0 - self.a * x * x + self.b * y
    }
}

/// The `g` component of the Hénon map, `g(x, y) = x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HenonG;

impl Mapping1D for HenonG {
    fn eval(&self, x: f64, _y: f64) -> f64 {
        x
    }
}

/// The `f` component of a rigid rotation by `theta`, optionally contracted by `scale`.
#[derive(Debug, Clone, Copy)]
pub struct RotationF {
    pub theta: f64,
    pub scale: f64,
}

impl Mapping1D for RotationF {
    fn eval(&self, x: f64, y: f64) -> f64 {
        self.scale * (x * self.theta.cos() - y * self.theta.sin())
    }
}

/// The `g` component of a rigid rotation by `theta`, optionally contracted by `scale`.
#[derive(Debug, Clone, Copy)]
pub struct RotationG {
    pub theta: f64,
    pub scale: f64,
}

impl Mapping1D for RotationG {
    fn eval(&self, x: f64, y: f64) -> f64 {
        self.scale * (x * self.theta.sin() + y * self.theta.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn henon_matches_closed_form() {
        let f = HenonF::classical();
        let g = HenonG;
        let (x, y) = (1.1_f64, 0.5_f64);
        assert!((f.eval(x, y) - (1.0 - 1.4 * x * x + 0.3 * y)).abs() < 1e-12);
        assert_eq!(g.eval(x, y), x);
    }

    #[test]
    fn rotation_preserves_radius_without_contraction() {
        let f = RotationF {
            theta: 0.4,
            scale: 1.0,
        };
        let g = RotationG {
            theta: 0.4,
            scale: 1.0,
        };
        let (x, y) = (1.0_f64, 0.0_f64);
        let (nx, ny) = (f.eval(x, y), g.eval(x, y));
        assert!(((nx * nx + ny * ny).sqrt() - 1.0).abs() < 1e-12);
    }
}
