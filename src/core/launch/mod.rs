pub mod arguments;
pub mod builder;
pub mod classpath;
pub mod option;
pub mod process;

pub use arguments::{interpolate, ArgumentBuilder, PlaceholderMap};
pub use builder::ProcessBuilder;
pub use classpath::{build_classpath, classpath_entries, get_classpath_separator, resolve_libraries, ResolvedLibrary};
pub use option::{LaunchOption, DEFAULT_JVM_ARGUMENTS, DEFAULT_SERVER_PORT};
pub use process::{ProcessInvocation, ResolvedLaunchSpec};
