pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::auth::Session;
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::launch::{LaunchOption, ProcessBuilder, ProcessInvocation, ResolvedLaunchSpec};
pub use crate::core::launcher::Launcher;
pub use crate::core::maven::MavenArtifact;
pub use crate::core::path::MinecraftPath;
pub use crate::core::rules::LaunchContext;
pub use crate::core::version::{resolve_version, ResolvedVersion, VersionCollection, VersionDescriptor};

/// Install the `tracing` subscriber. `RUST_LOG` overrides the default filter.
///
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,interface_core=debug")),
        )
        .try_init();

    tracing::debug!("interface-core logging initialised");
}
