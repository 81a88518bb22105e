//! `osipenko` locates the chain-recurrent set of a 2D discrete dynamical system by Osipenko's
//! symbolic image method: adaptively subdivide a rectangular region into cells, build a directed
//! graph of how the mapping carries sampled points between cells, strip away everything outside
//! a non-trivial strongly connected component, and refine the survivors. It also provides a
//! plain forward orbit tracer for the same mappings.
//!
//! The core ([`localiser`], [`symbolic_image`], [`scc`], [`geometry`], [`orbit`]) has no
//! knowledge of any particular user interface; [`cli`] and `main` wrap it with session
//! persistence and terminal I/O, following `imlet`'s split between a polished library and a
//! thin example binary on top of it.

pub mod cli;
pub mod error;
pub mod geometry;
pub mod localiser;
pub mod mapping;
pub mod orbit;
pub mod scc;
pub mod session;
pub mod symbolic_image;
pub mod utils;

#[cfg(feature = "plot")]
pub mod plot;

pub use error::{CrError, CrResult};
