use std::ops::Deref;
use std::sync::Arc;

use super::affine::AffineTransform;
use crate::error::SymmetryError;

/// Ordered, immutable, non-empty sequence of transforms produced for one
/// parameter tuple.
///
/// Cloning shares the underlying slice, so the active set can be swapped as
/// a whole and snapshotted once per render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransformSet {
    transforms: Arc<[AffineTransform]>,
}

impl AffineTransformSet {
    pub fn new(transforms: Vec<AffineTransform>) -> Result<Self, SymmetryError> {
        if transforms.is_empty() {
            return Err(SymmetryError::EmptyTransformSet);
        }
        Ok(Self {
            transforms: transforms.into(),
        })
    }

    pub fn transforms(&self) -> &[AffineTransform] {
        &self.transforms
    }

    /// True when both handles point at the same allocation.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.transforms, &other.transforms)
    }
}

impl Default for AffineTransformSet {
    fn default() -> Self {
        identity_set()
    }
}

impl Deref for AffineTransformSet {
    type Target = [AffineTransform];

    fn deref(&self) -> &Self::Target {
        &self.transforms
    }
}

/// The set used when no symmetry is selected.
pub fn identity_set() -> AffineTransformSet {
    AffineTransformSet {
        transforms: Arc::new([AffineTransform::identity()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_set() {
        let set = identity_set();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0], AffineTransform::identity());
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert_eq!(
            AffineTransformSet::new(Vec::new()),
            Err(SymmetryError::EmptyTransformSet)
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = AffineTransformSet::new(vec![AffineTransform::translate(1.0, 2.0)]).unwrap();
        let b = AffineTransformSet::new(vec![AffineTransform::translate(1.0, 2.0)]).unwrap();
        assert_eq!(a, b);
        assert!(!a.shares_storage_with(&b));
        assert!(a.shares_storage_with(&a.clone()));
    }
}
