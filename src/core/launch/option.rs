// ─── Launch Options ───
// Everything the caller decides about one launch.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::auth::Session;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::path::MinecraftPath;
use crate::core::rules::LaunchContext;
use crate::core::version::ResolvedVersion;

use super::classpath::get_classpath_separator;

pub const DEFAULT_SERVER_PORT: u16 = 25565;

/// JVM flags used when the version itself declares none (pre-1.13 schema).
pub const DEFAULT_JVM_ARGUMENTS: [&str; 7] = [
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=16M",
    "-Dlog4j2.formatMsgNoLookups=true",
];

// Feature flags consulted by `arguments` rules.
pub const FEATURE_DEMO_USER: &str = "is_demo_user";
pub const FEATURE_CUSTOM_RESOLUTION: &str = "has_custom_resolution";
pub const FEATURE_QUICK_PLAYS_SUPPORT: &str = "has_quick_plays_support";
pub const FEATURE_QUICK_PLAY_SINGLEPLAYER: &str = "is_quick_play_singleplayer";
pub const FEATURE_QUICK_PLAY_MULTIPLAYER: &str = "is_quick_play_multiplayer";
pub const FEATURE_QUICK_PLAY_REALMS: &str = "is_quick_play_realms";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchOption {
    /// Flattened target version. Filled by the caller or the `Launcher`.
    #[serde(skip)]
    pub start_version: Option<ResolvedVersion>,
    pub path: Option<MinecraftPath>,
    pub session: Option<Session>,
    pub rules_context: Option<LaunchContext>,
    pub java_path: Option<PathBuf>,
    /// Defaults to `versions/<id>/natives`.
    pub natives_directory: Option<PathBuf>,

    pub maximum_ram_mb: u32,
    pub minimum_ram_mb: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub full_screen: bool,
    pub is_demo: bool,

    pub server_ip: Option<String>,
    pub server_port: u16,
    pub quick_play_path: Option<String>,
    pub quick_play_singleplayer: Option<String>,
    pub quick_play_realms: Option<String>,

    /// macOS only.
    pub dock_name: Option<String>,
    pub dock_icon: Option<String>,

    pub launcher_name: String,
    pub launcher_version: String,
    pub client_id: Option<String>,
    pub version_type: Option<String>,
    pub user_properties: String,
    pub path_separator: String,

    /// Replaces every templated JVM argument when set.
    pub jvm_argument_overrides: Option<Vec<String>>,
    pub extra_jvm_arguments: Vec<String>,
    pub extra_game_arguments: Vec<String>,
    /// Placeholder values merged last; `None` unsets a placeholder.
    pub argument_dictionary: BTreeMap<String, Option<String>>,
}

impl Default for LaunchOption {
    fn default() -> Self {
        Self {
            start_version: None,
            path: None,
            session: None,
            rules_context: None,
            java_path: None,
            natives_directory: None,
            maximum_ram_mb: 0,
            minimum_ram_mb: 0,
            screen_width: 0,
            screen_height: 0,
            full_screen: false,
            is_demo: false,
            server_ip: None,
            server_port: DEFAULT_SERVER_PORT,
            quick_play_path: None,
            quick_play_singleplayer: None,
            quick_play_realms: None,
            dock_name: None,
            dock_icon: None,
            launcher_name: "minecraft-launcher".into(),
            launcher_version: "2".into(),
            client_id: None,
            version_type: None,
            user_properties: "{}".into(),
            path_separator: get_classpath_separator().into(),
            jvm_argument_overrides: None,
            extra_jvm_arguments: Vec::new(),
            extra_game_arguments: Vec::new(),
            argument_dictionary: BTreeMap::new(),
        }
    }
}

impl LaunchOption {
    /// Pre-flight check run before any resolution work.
    pub fn check_valid(&self) -> LauncherResult<()> {
        let invalid = |message: &str| Err(LauncherError::InvalidLaunchOption(message.into()));

        if self.start_version.is_none() {
            return invalid("start version is not set");
        }
        if self.path.is_none() {
            return invalid("game directory is not set");
        }
        if self.rules_context.is_none() {
            return invalid("rules context is not set");
        }
        if self.session.is_none() {
            return invalid("session is not set");
        }
        if self
            .java_path
            .as_ref()
            .map_or(true, |path| path.as_os_str().is_empty())
        {
            return invalid("java path is not set and no runtime could be found");
        }
        if self.minimum_ram_mb > 0
            && self.maximum_ram_mb > 0
            && self.minimum_ram_mb > self.maximum_ram_mb
        {
            return invalid("minimum memory is larger than maximum memory");
        }
        if has_text(&self.server_ip) && self.server_port == 0 {
            return invalid("server port must not be 0");
        }
        if self.path_separator.is_empty() {
            return invalid("classpath separator is empty");
        }
        Ok(())
    }

    /// Feature flags activated by these options.
    pub fn features(&self) -> Vec<&'static str> {
        let mut features = Vec::new();
        if self.is_demo {
            features.push(FEATURE_DEMO_USER);
        }
        if self.has_custom_resolution() {
            features.push(FEATURE_CUSTOM_RESOLUTION);
        }
        if has_text(&self.quick_play_path) {
            features.push(FEATURE_QUICK_PLAYS_SUPPORT);
        }
        if has_text(&self.quick_play_singleplayer) {
            features.push(FEATURE_QUICK_PLAY_SINGLEPLAYER);
        }
        if has_text(&self.server_ip) {
            features.push(FEATURE_QUICK_PLAY_MULTIPLAYER);
        }
        if has_text(&self.quick_play_realms) {
            features.push(FEATURE_QUICK_PLAY_REALMS);
        }
        features
    }

    pub fn has_custom_resolution(&self) -> bool {
        self.screen_width > 0 && self.screen_height > 0
    }

    /// `host`, or `host:port` when the port is not the default one.
    pub fn server_address(&self) -> Option<String> {
        let ip = self.server_ip.as_deref().filter(|ip| !ip.trim().is_empty())?;
        if self.server_port == DEFAULT_SERVER_PORT {
            Some(ip.to_string())
        } else {
            Some(format!("{}:{}", ip, self.server_port))
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
