use crate::common::*;

/// A 2D affine transform on `[x, y]` points.
///
/// It maps `x' = a * x + b * y + tx` and `y' = c * x + d * y + ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Affine2<T> {
    pub a: T,
    pub b: T,
    pub tx: T,
    pub c: T,
    pub d: T,
    pub ty: T,
}

impl<T> Affine2<T>
where
    T: Float,
{
    pub fn identity() -> Self {
        Self {
            a: T::one(),
            b: T::zero(),
            tx: T::zero(),
            c: T::zero(),
            d: T::one(),
            ty: T::zero(),
        }
    }

    pub fn translation(tx: T, ty: T) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    pub fn scaling(sx: T, sy: T) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Mirrors points across the vertical center line of an image of the given width.
    pub fn horizontal_flip(width: T) -> Self {
        Self {
            a: -T::one(),
            tx: width,
            ..Self::identity()
        }
    }

    /// Rotates points around `(cx, cy)`.
    ///
    /// With the y axis pointing down, a positive angle turns the image content
    /// counter-clockwise on screen.
    pub fn rotation_about(radians: T, cx: T, cy: T) -> Self {
        let cos = radians.cos();
        let sin = radians.sin();
        let rotation = Self {
            a: cos,
            b: sin,
            tx: T::zero(),
            c: -sin,
            d: cos,
            ty: T::zero(),
        };

        Self::translation(-cx, -cy)
            .then(&rotation)
            .then(&Self::translation(cx, cy))
    }

    /// Returns the transform that applies `self` first and `next` afterwards.
    pub fn then(&self, next: &Self) -> Self {
        next * self
    }

    pub fn determinant(&self) -> T {
        self.a * self.d - self.b * self.c
    }

    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() <= T::epsilon() {
            return None;
        }

        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        let tx = -(a * self.tx + b * self.ty);
        let ty = -(c * self.tx + d * self.ty);

        Some(Self { a, b, tx, c, d, ty })
    }

    pub fn apply(&self, [x, y]: [T; 2]) -> [T; 2] {
        [
            self.a * x + self.b * y + self.tx,
            self.c * x + self.d * y + self.ty,
        ]
    }

    /// Returns the row-major 2×3 matrix.
    pub fn to_rows(&self) -> [[T; 3]; 2] {
        [[self.a, self.b, self.tx], [self.c, self.d, self.ty]]
    }
}

impl<T> Mul<&Affine2<T>> for &Affine2<T>
where
    T: Float,
{
    type Output = Affine2<T>;

    fn mul(self, rhs: &Affine2<T>) -> Self::Output {
        Affine2 {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            tx: self.a * rhs.tx + self.b * rhs.ty + self.tx,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
            ty: self.c * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

impl<T> Mul<[T; 2]> for &Affine2<T>
where
    T: Float,
{
    type Output = [T; 2];

    fn mul(self, rhs: [T; 2]) -> Self::Output {
        self.apply(rhs)
    }
}
