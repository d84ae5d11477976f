// ─── Launcher ───
// Entry point tying version lookup, Java discovery and command building.

use tracing::{info, warn};

use crate::core::error::LauncherResult;
use crate::core::java::{JavaPathResolver, MinecraftJavaPathResolver};
use crate::core::launch::{LaunchOption, ProcessBuilder, ProcessInvocation, ResolvedLaunchSpec};
use crate::core::path::MinecraftPath;
use crate::core::rules::LaunchContext;
use crate::core::version::{load_chain, resolve_version, ResolvedVersion, VersionCollection, VersionLookup, VersionLoader};

pub struct Launcher<L = VersionCollection> {
    path: MinecraftPath,
    versions: L,
    java_resolver: Box<dyn JavaPathResolver>,
}

impl<L: VersionLookup> Launcher<L> {
    pub fn new(path: MinecraftPath, versions: L) -> Self {
        let java_resolver = Box::new(MinecraftJavaPathResolver::new(&path));
        Self {
            path,
            versions,
            java_resolver,
        }
    }

    pub fn with_java_resolver(mut self, resolver: impl JavaPathResolver + 'static) -> Self {
        self.java_resolver = Box::new(resolver);
        self
    }

    pub fn path(&self) -> &MinecraftPath {
        &self.path
    }

    pub fn resolve_version(&self, id: &str) -> LauncherResult<ResolvedVersion> {
        resolve_version(&self.versions, id)
    }

    /// Fill the parts of `option` the launcher knows about: target version,
    /// game directory, host rule context and a Java binary.
    pub fn prepare_option(&self, version_id: &str, mut option: LaunchOption) -> LauncherResult<LaunchOption> {
        let version = self.resolve_version(version_id)?;

        if option.path.is_none() {
            option.path = Some(self.path.clone());
        }
        let ctx = option
            .rules_context
            .get_or_insert_with(LaunchContext::current)
            .clone();

        let needs_java = option
            .java_path
            .as_ref()
            .map_or(true, |path| path.as_os_str().is_empty());
        if needs_java {
            option.java_path = self
                .java_resolver
                .resolve(version.java_version.as_ref(), &ctx);
            if option.java_path.is_none() {
                warn!("No Java runtime found for {}", version_id);
            }
        }

        option.start_version = Some(version);
        Ok(option)
    }

    pub fn create_launch_spec(&self, version_id: &str, option: LaunchOption) -> LauncherResult<ResolvedLaunchSpec> {
        let option = self.prepare_option(version_id, option)?;
        ProcessBuilder::new(&option)?.build_launch_spec()
    }

    pub fn create_process(&self, version_id: &str, option: LaunchOption) -> LauncherResult<ProcessInvocation> {
        let option = self.prepare_option(version_id, option)?;
        let process = ProcessBuilder::new(&option)?.build_process()?;
        info!("Prepared launch of {} with {}", version_id, process.executable.display());
        Ok(process)
    }
}

impl Launcher<VersionCollection> {
    /// Collect the inheritance chain of `id` through `loader` first.
    pub async fn load<V>(path: MinecraftPath, loader: &V, id: &str) -> LauncherResult<Self>
    where
        V: VersionLoader + ?Sized,
    {
        let versions = load_chain(loader, id).await?;
        Ok(Self::new(path, versions))
    }
}
