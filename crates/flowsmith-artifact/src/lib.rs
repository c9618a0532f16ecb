//! Flowsmith Artifact System
//!
//! The boundary type shared by every stage of the pipeline.
//!
//! # Core Concepts
//!
//! - [`ArtifactBundle`]: ordered set of generated files plus dependencies
//! - [`Artifact`]: one generated file with its [`ArtifactId`]
//! - [`ContentHash`]: 32-byte BLAKE3 fingerprint of a bundle
//! - [`ErrorKind`]: failure classification used by all crates
//!
//! # Example
//!
//! ```rust
//! use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId};
//!
//! let bundle = ArtifactBundle::new("demo")
//!     .with_artifact(Artifact::python(ArtifactId::Nodes, "nodes.py", "# TODO\n"));
//! assert_eq!(bundle.len(), 1);
//! println!("fingerprint: {}", bundle.fingerprint().short());
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod artifact;
mod bundle;
mod hash;
mod kind;

pub use artifact::{Artifact, ArtifactId, ArtifactIdError, ArtifactRole, SourceLanguage};
pub use bundle::{ArtifactBundle, Dependency, DependencyManifest};
pub use hash::{ContentHash, Fingerprinter, HashError};
pub use kind::ErrorKind;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
