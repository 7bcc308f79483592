//! Topology handles and subtype dispatch
//!
//! The kernel hands out opaque `Handle`s and reports an integer type tag
//! for each of them. `narrow` turns the pair into a `TypedHandle`, a tagged
//! union whose variants wrap one newtype per topology class. Operations that
//! only make sense for one class (a face's internal vertex, a vertex's
//! coordinates) take that newtype, so the check happens once, at the
//! accessor.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::KernelError;

/// Opaque reference to a kernel-owned object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(Uuid);

impl Handle {
    /// Allocate a fresh, globally unique handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! topology_classes {
    ($(
        $(#[$doc:meta])*
        $class:ident = $tag:literal, $as_fn:ident, $into_fn:ident;
    )*) => {
        /// Concrete topology class, recovered from a kernel type tag
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum TopologyType {
            $($(#[$doc])* $class,)*
            /// Base class, used for any unrecognised tag
            Topology,
        }

        impl TopologyType {
            /// Map a kernel type tag to its class. Unknown tags map to `Topology`.
            pub fn from_tag(tag: u32) -> Self {
                match tag {
                    $($tag => TopologyType::$class,)*
                    _ => TopologyType::Topology,
                }
            }

            /// The kernel type tag, or `None` for the base class
            pub fn tag(self) -> Option<u32> {
                match self {
                    $(TopologyType::$class => Some($tag),)*
                    TopologyType::Topology => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(TopologyType::$class => stringify!($class),)*
                    TopologyType::Topology => "Topology",
                }
            }
        }

        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $class(Handle);

            impl $class {
                pub fn handle(&self) -> Handle {
                    self.0
                }
            }
        )*

        /// A handle together with its concrete class
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TypedHandle {
            $($class($class),)*
            Topology(Handle),
        }

        impl TypedHandle {
            pub fn handle(&self) -> Handle {
                match self {
                    $(TypedHandle::$class(typed) => typed.0,)*
                    TypedHandle::Topology(handle) => *handle,
                }
            }

            pub fn topology_type(&self) -> TopologyType {
                match self {
                    $(TypedHandle::$class(_) => TopologyType::$class,)*
                    TypedHandle::Topology(_) => TopologyType::Topology,
                }
            }

            $(
                pub fn $as_fn(&self) -> Option<&$class> {
                    match self {
                        TypedHandle::$class(typed) => Some(typed),
                        _ => None,
                    }
                }

                pub fn $into_fn(self) -> Result<$class, KernelError> {
                    match self {
                        TypedHandle::$class(typed) => Ok(typed),
                        other => Err(KernelError::WrongType {
                            expected: TopologyType::$class,
                            found: other.topology_type(),
                        }),
                    }
                }
            )*
        }

        /// Reinterpret `handle` as the class named by `type_tag`.
        ///
        /// Pure: does not consult or touch the kernel.
        pub fn narrow(handle: Handle, type_tag: u32) -> TypedHandle {
            match TopologyType::from_tag(type_tag) {
                $(TopologyType::$class => TypedHandle::$class($class(handle)),)*
                TopologyType::Topology => TypedHandle::Topology(handle),
            }
        }
    };
}

topology_classes! {
    /// Point
    Vertex = 1, as_vertex, into_vertex;
    /// Curve segment between two vertices
    Edge = 2, as_edge, into_edge;
    /// Open or closed chain of edges
    Wire = 4, as_wire, into_wire;
    /// Bounded surface patch
    Face = 8, as_face, into_face;
    /// Connected group of faces
    Shell = 16, as_shell, into_shell;
    /// Solid region
    Cell = 32, as_cell, into_cell;
    /// Partitioned solid made of cells
    CellComplex = 64, as_cell_complex, into_cell_complex;
    /// Heterogeneous collection
    Cluster = 128, as_cluster, into_cluster;
}

impl fmt::Display for TopologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TypedHandle> for Handle {
    fn from(typed: TypedHandle) -> Self {
        typed.handle()
    }
}
