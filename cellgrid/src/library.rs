//! Ready-made operation objects
//!
//! Every type in this module implements one of the operation contracts of
//! `cellgrid-core` and can be passed straight to the matching [`Matrix`]
//! operation. Objects that present results at a group key take a
//! [`Placement`](cellgrid_core::Placement): `new()` overwrites the position,
//! `named(placement)` lets the caller append a descriptive coordinate.
//!
//! [`Matrix`]: crate::Matrix

/// Implement `new()` with [`Overwrite`](cellgrid_core::Overwrite) placement
/// and `named(placement)` for a struct whose only field is `placement`.
macro_rules! placed {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $name<cellgrid_core::Overwrite> {
                pub fn new() -> Self {
                    Self {
                        placement: cellgrid_core::Overwrite,
                    }
                }
            }

            impl Default for $name<cellgrid_core::Overwrite> {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<P> $name<P> {
                /// Present results at the position derived by `placement`
                pub fn named(placement: P) -> Self {
                    Self { placement }
                }
            }
        )+
    };
}

pub mod aggregate;
pub mod pairwise;
pub mod partition;
pub mod reshape;
pub mod squash;
pub mod transform;
pub mod window;
