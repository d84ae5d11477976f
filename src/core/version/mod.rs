pub mod chain;
pub mod descriptor;
pub mod loader;
pub mod manifest;
pub mod version_file;

pub use chain::{resolve_version, InheritanceChain, ResolvedVersion, VersionCollection, VersionLookup};
pub use descriptor::{
    required_or_default, ArgumentTemplate, Library, LibraryArtifact, LoggingConfig,
    VersionDescriptor,
};
pub use loader::{load_chain, ChainedVersionLoader, LocalVersionLoader, MojangVersionLoader, VersionLoader};
pub use manifest::{VersionEntry, VersionManifest};
pub use version_file::{JavaVersion, VersionJson};
