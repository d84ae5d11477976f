// ─── Java Runtime Discovery ───
// Finds a java binary before launch. Runs before the engine, never inside it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::path::MinecraftPath;
use crate::core::rules::{LaunchContext, OS_LINUX, OS_OSX, OS_WINDOWS};
use crate::core::version::JavaVersion;

pub trait JavaPathResolver: Send + Sync {
    /// Binary matching the version's `javaVersion` requirement, if installed.
    fn java_binary_path(&self, java_version: &JavaVersion, ctx: &LaunchContext) -> Option<PathBuf>;

    /// Any usable binary when no specific runtime is found.
    fn default_java_binary_path(&self, ctx: &LaunchContext) -> Option<PathBuf>;

    fn resolve(&self, java_version: Option<&JavaVersion>, ctx: &LaunchContext) -> Option<PathBuf> {
        java_version
            .and_then(|version| self.java_binary_path(version, ctx))
            .or_else(|| self.default_java_binary_path(ctx))
    }
}

/// Looks in Mojang's runtime layout under the game directory, then
/// `JAVA_HOME`, then `PATH`.
pub struct MinecraftJavaPathResolver {
    runtime_dir: PathBuf,
}

impl MinecraftJavaPathResolver {
    pub fn new(path: &MinecraftPath) -> Self {
        Self {
            runtime_dir: path.runtime.clone(),
        }
    }

    /// `runtime/<component>/<platform>/<component>`
    pub fn runtime_root(&self, component: &str, ctx: &LaunchContext) -> Option<PathBuf> {
        let platform = runtime_platform(ctx)?;
        Some(
            self.runtime_dir
                .join(component)
                .join(platform)
                .join(component),
        )
    }
}

impl JavaPathResolver for MinecraftJavaPathResolver {
    fn java_binary_path(&self, java_version: &JavaVersion, ctx: &LaunchContext) -> Option<PathBuf> {
        let component = java_version.component.as_deref()?;
        let root = self.runtime_root(component, ctx)?;
        let found = locate_java_binary(&root, ctx);
        debug!("Mojang runtime {} for {}: {:?}", component, ctx.os_name, found);
        found
    }

    fn default_java_binary_path(&self, ctx: &LaunchContext) -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("JAVA_HOME") {
            let candidate = PathBuf::from(home).join("bin").join(java_exe(ctx));
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        which::which(java_exe(ctx)).ok()
    }
}

/// Mojang's platform key in `runtime/<component>/<platform>`.
fn runtime_platform(ctx: &LaunchContext) -> Option<&'static str> {
    let arch = ctx.os_arch.as_str();
    match ctx.os_name.as_str() {
        OS_WINDOWS => Some(match arch {
            "x86" => "windows-x86",
            "arm64" => "windows-arm64",
            _ => "windows-x64",
        }),
        OS_OSX => Some(if arch == "arm64" { "mac-os-arm64" } else { "mac-os" }),
        OS_LINUX => Some(if arch == "x86" { "linux-i386" } else { "linux" }),
        _ => None,
    }
}

fn java_exe(ctx: &LaunchContext) -> &'static str {
    if ctx.os_name == OS_WINDOWS {
        "java.exe"
    } else {
        "java"
    }
}

fn locate_java_binary(runtime_root: &Path, ctx: &LaunchContext) -> Option<PathBuf> {
    let primary = runtime_root.join("bin").join(java_exe(ctx));
    if primary.is_file() {
        return Some(primary);
    }

    let mac_layout = runtime_root
        .join("jre.bundle")
        .join("Contents")
        .join("Home")
        .join("bin")
        .join(java_exe(ctx));
    if mac_layout.is_file() {
        return Some(mac_layout);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(component: &str) -> JavaVersion {
        JavaVersion {
            component: Some(component.into()),
            major_version: 17,
        }
    }

    #[test]
    fn runtime_platform_keys() {
        assert_eq!(runtime_platform(&LaunchContext::new(OS_WINDOWS, "x64")), Some("windows-x64"));
        assert_eq!(runtime_platform(&LaunchContext::new(OS_WINDOWS, "x86")), Some("windows-x86"));
        assert_eq!(runtime_platform(&LaunchContext::new(OS_OSX, "arm64")), Some("mac-os-arm64"));
        assert_eq!(runtime_platform(&LaunchContext::new(OS_LINUX, "x64")), Some("linux"));
        assert_eq!(runtime_platform(&LaunchContext::new("solaris", "x64")), None);
    }

    #[test]
    fn finds_installed_mojang_runtime() {
        let tmp = tempfile::tempdir().unwrap();
        let path = MinecraftPath::new(tmp.path());
        let ctx = LaunchContext::new(OS_LINUX, "x64");
        let resolver = MinecraftJavaPathResolver::new(&path);

        let root = resolver.runtime_root("java-runtime-gamma", &ctx).unwrap();
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin").join("java"), b"").unwrap();

        assert_eq!(
            resolver.java_binary_path(&requirement("java-runtime-gamma"), &ctx),
            Some(root.join("bin").join("java"))
        );
        assert_eq!(resolver.java_binary_path(&requirement("jre-legacy"), &ctx), None);
    }

    #[test]
    fn requirement_without_component_is_not_looked_up() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = MinecraftJavaPathResolver::new(&MinecraftPath::new(tmp.path()));
        let version = JavaVersion {
            component: None,
            major_version: 8,
        };
        assert_eq!(
            resolver.java_binary_path(&version, &LaunchContext::new(OS_LINUX, "x64")),
            None
        );
    }
}
