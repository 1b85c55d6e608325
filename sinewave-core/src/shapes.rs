//! Runtime shapes of tensors.

/// The dimensions of a tensor, outermost first. Data is always stored
/// contiguously in row-major order, so strides are derived from the dims.
///
/// A shape with no dims is a scalar and holds one element.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self { dims: dims.into() }
    }

    /// The shape of a rank 0 tensor.
    pub fn scalar() -> Self {
        Self::default()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of `axis`. **Panics** if `axis >= self.rank()`.
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Splits the shape around `axis` into `(outer, axis size, inner)` element
    /// counts, which is all a contiguous layout needs to walk that axis.
    pub(crate) fn split_at_axis(&self, axis: usize) -> (usize, usize, usize) {
        let outer = self.dims[..axis].iter().product();
        let inner = self.dims[axis + 1..].iter().product();
        (outer, self.dims[axis], inner)
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

impl From<&Shape> for Shape {
    fn from(shape: &Shape) -> Self {
        shape.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_elements() {
        assert_eq!(Shape::scalar().num_elements(), 1);
        assert_eq!(Shape::from([64, 20, 1]).num_elements(), 1280);
        assert_eq!(Shape::from([3, 0]).num_elements(), 0);
    }

    #[test]
    fn test_split_at_axis() {
        let s = Shape::from([2, 3, 4]);
        assert_eq!(s.split_at_axis(0), (1, 2, 12));
        assert_eq!(s.split_at_axis(1), (2, 3, 4));
        assert_eq!(s.split_at_axis(2), (6, 4, 1));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Shape::from([64, 20, 1])), "(64, 20, 1)");
        assert_eq!(format!("{:?}", Shape::from([5])), "(5,)");
        assert_eq!(format!("{}", Shape::scalar()), "()");
    }
}
