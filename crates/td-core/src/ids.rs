//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Agents never hold references to
//! each other; they hold these handles and resolve them through the owning
//! store.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Creation-ordered vehicle identifier.  Never reused within a run, so it
    /// stays stable while extras are added and retired.
    pub struct VehicleId(u32);
}

typed_id! {
    /// Index of a requester in the requester store.  Requesters live for the
    /// whole run.
    pub struct RequesterId(u32);
}

/// Tagged handle for anything that can occupy a grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentRef {
    Vehicle(VehicleId),
    Requester(RequesterId),
}

impl From<VehicleId> for AgentRef {
    fn from(id: VehicleId) -> Self {
        AgentRef::Vehicle(id)
    }
}

impl From<RequesterId> for AgentRef {
    fn from(id: RequesterId) -> Self {
        AgentRef::Requester(id)
    }
}

impl fmt::Display for AgentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRef::Vehicle(id)   => id.fmt(f),
            AgentRef::Requester(id) => id.fmt(f),
        }
    }
}
