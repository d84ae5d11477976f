// ─── Launch Context ───
// Immutable snapshot of the environment every rule is evaluated against.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Mojang OS names as they appear in `rules[].os.name`.
pub const OS_WINDOWS: &str = "windows";
pub const OS_OSX: &str = "osx";
pub const OS_LINUX: &str = "linux";

/// Environment a version is resolved for.
///
/// Built fresh for every resolution and never mutated afterwards: the
/// `with_*` helpers return a new value instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchContext {
    pub os_name: String,
    pub os_arch: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub features: BTreeSet<String>,
}

impl LaunchContext {
    pub fn new(os_name: impl Into<String>, os_arch: impl Into<String>) -> Self {
        Self {
            os_name: os_name.into(),
            os_arch: os_arch.into(),
            os_version: String::new(),
            features: BTreeSet::new(),
        }
    }

    /// Context describing the host this process runs on.
    pub fn current() -> Self {
        let os_version = sysinfo::System::os_version().unwrap_or_default();
        Self::new(current_os_name(), current_arch()).with_os_version(os_version)
    }

    pub fn with_os_version(mut self, os_version: impl Into<String>) -> Self {
        self.os_version = os_version.into();
        self
    }

    /// Returns a copy with `features` added to the active set.
    pub fn with_features<I, S>(&self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.features.extend(features.into_iter().map(Into::into));
        next
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains(name)
    }

    pub fn is_osx(&self) -> bool {
        self.os_name == OS_OSX
    }

    /// Value substituted for `${arch}` in native classifiers.
    pub fn arch_bits(&self) -> &'static str {
        match self.os_arch.as_str() {
            "x64" | "arm64" => "64",
            _ => "32",
        }
    }
}

/// Mojang OS name for the current platform.
pub fn current_os_name() -> &'static str {
    if cfg!(target_os = "windows") {
        OS_WINDOWS
    } else if cfg!(target_os = "macos") {
        OS_OSX
    } else {
        OS_LINUX
    }
}

/// Mojang architecture name for the current platform.
pub fn current_arch() -> &'static str {
    if cfg!(target_arch = "x86_64") {
        "x64"
    } else if cfg!(target_arch = "aarch64") {
        "arm64"
    } else if cfg!(target_arch = "arm") {
        "arm"
    } else {
        "x86"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_features_does_not_touch_the_original() {
        let base = LaunchContext::new(OS_LINUX, "x64");
        let derived = base.with_features(["is_demo_user"]);

        assert!(derived.has_feature("is_demo_user"));
        assert!(!base.has_feature("is_demo_user"));
    }

    #[test]
    fn arch_bits_follow_pointer_width() {
        assert_eq!(LaunchContext::new(OS_WINDOWS, "x64").arch_bits(), "64");
        assert_eq!(LaunchContext::new(OS_WINDOWS, "arm64").arch_bits(), "64");
        assert_eq!(LaunchContext::new(OS_WINDOWS, "x86").arch_bits(), "32");
    }

    #[test]
    fn current_context_uses_mojang_names() {
        let ctx = LaunchContext::current();
        assert!([OS_WINDOWS, OS_OSX, OS_LINUX].contains(&ctx.os_name.as_str()));
        assert!(ctx.features.is_empty());
    }
}
