//! Wire identifiers.

use std::fmt;

macro_rules! wire_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the wire, usable as a bit offset.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

wire_id!(
    /// A qubit wire. Qubit `k` is bit `k` of a basis index.
    QubitId,
    "q"
);

wire_id!(
    /// A classical bit receiving a measurement.
    ClbitId,
    "c"
);
