//! Quadratic functions and their real roots.

use arrayvec::ArrayVec;

/// Relative tolerance below which a leading coefficient is considered zero.
pub const DEGENERACY_EPSILON: f64 = 1e-9;

/// A quadratic function `a*x^2 + b*x + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticFn {
    coeffs: [f64; 3],
}

impl QuadraticFn {
    /// Creates a quadratic from its coefficients, highest power first.
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { coeffs: [a, b, c] }
    }

    /// The coefficients, highest power first.
    pub fn coeffs(&self) -> [f64; 3] {
        self.coeffs
    }

    pub fn y(&self, x: f64) -> f64 {
        let [a, b, c] = self.coeffs;
        (a * x + b) * x + c
    }

    pub fn discriminant(&self) -> f64 {
        let [a, b, c] = self.coeffs;
        b * b - 4.0 * a * c
    }

    /// Whether the leading coefficient is significant, given `scale`, the
    /// magnitude the leading coefficient would ordinarily take.
    pub fn is_quadratic(&self, scale: f64) -> bool {
        self.coeffs[0].abs() > DEGENERACY_EPSILON * scale.abs()
    }

    /// Finds the real roots of the function, in ascending order.
    ///
    /// If the leading coefficient is insignificant (see [Self::is_quadratic]),
    /// the function is solved as a line; a constant function has no roots.
    /// A repeated root is reported twice.
    pub fn roots(&self, scale: f64) -> ArrayVec<f64, 2> {
        let [a, b, c] = self.coeffs;
        let mut roots = ArrayVec::new();

        if !self.is_quadratic(scale) {
            if b != 0.0 {
                roots.push(-c / b);
            }
            return roots;
        }

        let discr = self.discriminant();
        if discr < 0.0 {
            return roots;
        }

        // Avoids cancellation between `-b` and the square root
        let q = -0.5 * (b + b.signum() * discr.sqrt());
        if q == 0.0 {
            roots.push(0.0);
            roots.push(0.0);
        } else {
            let (r1, r2) = (q / a, c / q);
            roots.push(f64::min(r1, r2));
            roots.push(f64::max(r1, r2));
        }
        roots
    }
}
