// ─── Minecraft Path ───
// Directory layout of a game installation (`.minecraft` equivalent).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::rules::{current_os_name, OS_OSX, OS_WINDOWS};

/// Every directory the launch engine derives paths from.
///
/// Pure path arithmetic: nothing here touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftPath {
    /// Game working directory (saves, options, mods).
    pub base_path: PathBuf,
    pub library: PathBuf,
    pub versions: PathBuf,
    pub assets: PathBuf,
    pub resources: PathBuf,
    /// Mojang-provided Java runtimes.
    pub runtime: PathBuf,
}

impl MinecraftPath {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let base: &Path = base_path.as_ref();
        Self {
            base_path: base.to_path_buf(),
            library: base.join("libraries"),
            versions: base.join("versions"),
            assets: base.join("assets"),
            resources: base.join("resources"),
            runtime: base.join("runtime"),
        }
    }

    /// The launcher's default game directory for the current OS.
    pub fn os_default() -> Self {
        Self::new(os_default_base_path())
    }

    pub fn version_dir(&self, id: &str) -> PathBuf {
        self.versions.join(id)
    }

    pub fn version_json_path(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.json", id))
    }

    pub fn version_jar_path(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{}.jar", id))
    }

    /// Default directory native libraries are extracted into for `id`.
    pub fn natives_dir(&self, id: &str) -> PathBuf {
        self.version_dir(id).join("natives")
    }

    pub fn asset_legacy_path(&self, asset_id: &str) -> PathBuf {
        self.assets.join("virtual").join(asset_id)
    }

    pub fn log_config_file_path(&self, config_id: &str) -> PathBuf {
        let file_name = if config_id.ends_with(".xml") {
            config_id.to_string()
        } else {
            format!("{}.xml", config_id)
        };
        self.assets.join("log_configs").join(file_name)
    }
}

fn os_default_base_path() -> PathBuf {
    let os = current_os_name();
    if os == OS_WINDOWS {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".minecraft")
    } else if os == OS_OSX {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minecraft")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".minecraft")
    }
}

/// Lossy string form used for argument values.
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_derived_from_base() {
        let path = MinecraftPath::new("/games/mc");
        assert_eq!(path.library, PathBuf::from("/games/mc/libraries"));
        assert_eq!(
            path.version_jar_path("1.20.1"),
            PathBuf::from("/games/mc/versions/1.20.1/1.20.1.jar")
        );
        assert_eq!(
            path.version_json_path("1.20.1"),
            PathBuf::from("/games/mc/versions/1.20.1/1.20.1.json")
        );
        assert_eq!(
            path.natives_dir("1.20.1"),
            PathBuf::from("/games/mc/versions/1.20.1/natives")
        );
    }

    #[test]
    fn log_config_path_appends_xml_once() {
        let path = MinecraftPath::new("/games/mc");
        assert_eq!(
            path.log_config_file_path("client-1.12.xml"),
            PathBuf::from("/games/mc/assets/log_configs/client-1.12.xml")
        );
        assert_eq!(
            path.log_config_file_path("1.7.10"),
            PathBuf::from("/games/mc/assets/log_configs/1.7.10.xml")
        );
    }

    #[test]
    fn os_default_ends_with_minecraft_dir() {
        let path = MinecraftPath::os_default();
        let name = path.base_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name == ".minecraft" || name == "minecraft");
    }
}
