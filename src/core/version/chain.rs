// ─── Inheritance Chain ───
// Flattens `inheritsFrom` chains into a single effective version.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

use super::descriptor::{ArgumentTemplate, Library, LoggingConfig, VersionDescriptor};
use super::version_file::JavaVersion;

/// Read access to raw version descriptors by id.
pub trait VersionLookup {
    fn find(&self, id: &str) -> Option<&VersionDescriptor>;
}

impl VersionLookup for HashMap<String, VersionDescriptor> {
    fn find(&self, id: &str) -> Option<&VersionDescriptor> {
        self.get(id)
    }
}

impl VersionLookup for BTreeMap<String, VersionDescriptor> {
    fn find(&self, id: &str) -> Option<&VersionDescriptor> {
        self.get(id)
    }
}

/// In-memory set of descriptors keyed by id.
#[derive(Debug, Clone, Default)]
pub struct VersionCollection {
    versions: BTreeMap<String, VersionDescriptor>,
}

impl VersionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced.
    pub fn insert(&mut self, version: VersionDescriptor) -> Option<VersionDescriptor> {
        self.versions.insert(version.id.clone(), version)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.versions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }
}

impl VersionLookup for VersionCollection {
    fn find(&self, id: &str) -> Option<&VersionDescriptor> {
        self.versions.get(id)
    }
}

impl FromIterator<VersionDescriptor> for VersionCollection {
    fn from_iter<T: IntoIterator<Item = VersionDescriptor>>(iter: T) -> Self {
        let mut collection = Self::new();
        for version in iter {
            collection.insert(version);
        }
        collection
    }
}

/// Leaf-to-root list of descriptors. No id appears twice.
#[derive(Debug, Clone)]
pub struct InheritanceChain<'a> {
    versions: Vec<&'a VersionDescriptor>,
}

impl<'a> InheritanceChain<'a> {
    /// Walk parent pointers from `id` upward.
    pub fn resolve<L>(lookup: &'a L, id: &str) -> LauncherResult<Self>
    where
        L: VersionLookup + ?Sized,
    {
        let leaf = lookup
            .find(id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))?;

        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut versions = vec![leaf];
        let mut current = leaf;

        while let Some(parent_id) = current.inherits_from.as_deref() {
            if !visited.insert(parent_id.to_string()) {
                return Err(LauncherError::CyclicInheritance {
                    id: parent_id.to_string(),
                });
            }

            let parent = lookup
                .find(parent_id)
                .ok_or_else(|| LauncherError::MissingParentVersion {
                    id: current.id.clone(),
                    parent: parent_id.to_string(),
                })?;

            versions.push(parent);
            current = parent;
        }

        Ok(Self { versions })
    }

    /// The launch target.
    pub fn leaf(&self) -> &'a VersionDescriptor {
        self.versions[0]
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a VersionDescriptor> + '_ {
        self.versions.iter().copied()
    }

    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|v| v.id.clone()).collect()
    }

    /// Nearest non-null value walking from the leaf to the root.
    fn nearest<T, F>(&self, field: F) -> Option<T>
    where
        T: Clone + 'a,
        F: Fn(&'a VersionDescriptor) -> Option<&'a T>,
    {
        self.iter().find_map(|version| field(version)).cloned()
    }

    pub fn flatten(&self) -> ResolvedVersion {
        let mut libraries = Vec::new();
        let mut jvm_arguments = Vec::new();
        let mut game_arguments = Vec::new();
        let mut legacy_taken = false;

        for (depth, version) in self.iter().enumerate() {
            let is_base_version = depth > 0;
            libraries.extend(version.libraries.iter().cloned());
            jvm_arguments.extend_from_slice(version.jvm_arguments(is_base_version));

            // The nearest legacy argument string stands in for its whole
            // subtree, so an ancestor's string is never appended twice.
            let legacy = version.uses_legacy_arguments();
            let use_primary = !is_base_version || (legacy && !legacy_taken);
            game_arguments.extend_from_slice(version.game_arguments(!use_primary));
            legacy_taken |= legacy;
        }

        ResolvedVersion {
            id: self.leaf().id.clone(),
            inheritance: self.ids(),
            main_class: self.nearest(|v| v.main_class.as_ref()),
            asset_index_id: self.nearest(|v| v.asset_index_id.as_ref()),
            jar: self.nearest(|v| v.jar.as_ref()),
            logging: self.nearest(|v| v.logging.as_ref()),
            java_version: self.nearest(|v| v.java_version.as_ref()),
            release_time: self.nearest(|v| v.release_time.as_ref()),
            version_type: self.nearest(|v| v.version_type.as_ref()),
            libraries,
            jvm_arguments,
            game_arguments,
        }
    }
}

/// The effective version after flattening the inheritance chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    /// Id of the launch target.
    pub id: String,
    /// Chain ids, leaf first.
    pub inheritance: Vec<String>,
    pub main_class: Option<String>,
    pub asset_index_id: Option<String>,
    pub jar: Option<String>,
    pub logging: Option<LoggingConfig>,
    pub java_version: Option<JavaVersion>,
    pub release_time: Option<DateTime<FixedOffset>>,
    pub version_type: Option<String>,
    pub libraries: Vec<Library>,
    pub jvm_arguments: Vec<ArgumentTemplate>,
    pub game_arguments: Vec<ArgumentTemplate>,
}

impl ResolvedVersion {
    /// Id of the jar placed last on the classpath.
    pub fn jar_id(&self) -> &str {
        self.jar.as_deref().unwrap_or(&self.id)
    }
}

/// Resolve and flatten `id` in one step.
pub fn resolve_version<L>(lookup: &L, id: &str) -> LauncherResult<ResolvedVersion>
where
    L: VersionLookup + ?Sized,
{
    let chain = InheritanceChain::resolve(lookup, id)?;
    debug!("Resolved inheritance chain for {}: {:?}", id, chain.ids());
    Ok(chain.flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(value: serde_json::Value) -> VersionDescriptor {
        VersionDescriptor::from_json(serde_json::from_value(value).unwrap())
    }

    fn values(templates: &[ArgumentTemplate]) -> Vec<String> {
        templates.iter().flat_map(|t| t.values.clone()).collect()
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let collection: VersionCollection =
            [version(serde_json::json!({"id": "loop", "inheritsFrom": "loop"}))]
                .into_iter()
                .collect();

        let err = resolve_version(&collection, "loop").unwrap_err();
        assert!(matches!(err, LauncherError::CyclicInheritance { id } if id == "loop"));
    }

    #[test]
    fn longer_cycle_is_detected() {
        let collection: VersionCollection = [
            version(serde_json::json!({"id": "a", "inheritsFrom": "b"})),
            version(serde_json::json!({"id": "b", "inheritsFrom": "c"})),
            version(serde_json::json!({"id": "c", "inheritsFrom": "a"})),
        ]
        .into_iter()
        .collect();

        let err = resolve_version(&collection, "a").unwrap_err();
        assert!(matches!(err, LauncherError::CyclicInheritance { id } if id == "a"));
    }

    #[test]
    fn missing_parent_and_missing_leaf() {
        let collection: VersionCollection =
            [version(serde_json::json!({"id": "fabric", "inheritsFrom": "1.20.1"}))]
                .into_iter()
                .collect();

        let err = resolve_version(&collection, "fabric").unwrap_err();
        assert!(matches!(
            err,
            LauncherError::MissingParentVersion { ref id, ref parent } if id == "fabric" && parent == "1.20.1"
        ));

        let err = resolve_version(&collection, "nope").unwrap_err();
        assert!(matches!(err, LauncherError::VersionNotFound(id) if id == "nope"));
    }

    #[test]
    fn scalars_take_the_nearest_defined_value() {
        let mut lookup = HashMap::new();
        for v in [
            version(serde_json::json!({
                "id": "root", "mainClass": "root.Main", "assetIndex": {"id": "5"},
                "type": "release", "javaVersion": {"component": "java-runtime-gamma", "majorVersion": 17}
            })),
            version(serde_json::json!({"id": "mid", "inheritsFrom": "root", "mainClass": "mid.Main"})),
            version(serde_json::json!({"id": "leaf", "inheritsFrom": "mid", "type": "custom"})),
        ] {
            lookup.insert(v.id.clone(), v);
        }

        let resolved = resolve_version(&lookup, "leaf").unwrap();
        assert_eq!(resolved.inheritance, vec!["leaf", "mid", "root"]);
        assert_eq!(resolved.main_class.as_deref(), Some("mid.Main"));
        assert_eq!(resolved.asset_index_id.as_deref(), Some("5"));
        assert_eq!(resolved.version_type.as_deref(), Some("custom"));
        assert_eq!(resolved.java_version.as_ref().unwrap().major_version, 17);
        assert_eq!(resolved.jar_id(), "leaf");
    }

    #[test]
    fn deep_chain_main_class_comes_from_nearest_ancestor() {
        let mut collection = VersionCollection::new();
        collection.insert(version(serde_json::json!({"id": "v0", "mainClass": "v0.Main"})));
        for depth in 1..16 {
            let mut json = serde_json::json!({
                "id": format!("v{}", depth),
                "inheritsFrom": format!("v{}", depth - 1)
            });
            if depth == 7 {
                json["mainClass"] = serde_json::json!("v7.Main");
            }
            collection.insert(version(json));
        }

        assert_eq!(resolve_version(&collection, "v15").unwrap().main_class.as_deref(), Some("v7.Main"));
        assert_eq!(resolve_version(&collection, "v6").unwrap().main_class.as_deref(), Some("v0.Main"));
    }

    #[test]
    fn collections_are_concatenated_leaf_first() {
        let collection: VersionCollection = [
            version(serde_json::json!({
                "id": "1.20.1",
                "libraries": [{"name": "com.mojang:brigadier:1.1.8"}],
                "arguments": {"game": ["--version", "${version_name}"], "jvm": ["-cp", "${classpath}"]}
            })),
            version(serde_json::json!({
                "id": "fabric-loader-0.15.0-1.20.1",
                "inheritsFrom": "1.20.1",
                "libraries": [{"name": "net.fabricmc:fabric-loader:0.15.0"}],
                "arguments": {"game": [], "jvm": ["-DFabricMcEmu= net.minecraft.client.main.Main "]}
            })),
        ]
        .into_iter()
        .collect();

        let resolved = resolve_version(&collection, "fabric-loader-0.15.0-1.20.1").unwrap();
        let names: Vec<_> = resolved.libraries.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["net.fabricmc:fabric-loader:0.15.0", "com.mojang:brigadier:1.1.8"]);
        assert_eq!(
            values(&resolved.jvm_arguments),
            vec!["-DFabricMcEmu= net.minecraft.client.main.Main ", "-cp", "${classpath}"]
        );
        assert_eq!(values(&resolved.game_arguments), vec!["--version", "${version_name}"]);
    }

    #[test]
    fn legacy_child_replaces_legacy_parent_string() {
        let collection: VersionCollection = [
            version(serde_json::json!({
                "id": "1.7.10",
                "minecraftArguments": "--username ${auth_player_name} --version ${version_name}"
            })),
            version(serde_json::json!({
                "id": "1.7.10-Forge",
                "inheritsFrom": "1.7.10",
                "minecraftArguments": "--username ${auth_player_name} --version ${version_name} --tweakClass cpw.mods.fml.common.launcher.FMLTweaker"
            })),
        ]
        .into_iter()
        .collect();

        let resolved = resolve_version(&collection, "1.7.10-Forge").unwrap();
        let tokens = values(&resolved.game_arguments);
        assert_eq!(tokens.iter().filter(|t| *t == "--username").count(), 1);
        assert!(tokens.contains(&"--tweakClass".to_string()));
    }

    #[test]
    fn structured_child_inherits_legacy_parent_string() {
        let collection: VersionCollection = [
            version(serde_json::json!({
                "id": "1.8.9",
                "minecraftArguments": "--username ${auth_player_name}"
            })),
            version(serde_json::json!({
                "id": "fabric-1.8.9",
                "inheritsFrom": "1.8.9",
                "arguments": {"game": ["--extra"]}
            })),
        ]
        .into_iter()
        .collect();

        let resolved = resolve_version(&collection, "fabric-1.8.9").unwrap();
        assert_eq!(
            values(&resolved.game_arguments),
            vec!["--extra", "--username", "${auth_player_name}"]
        );
    }

    #[test]
    fn explicit_jar_is_inherited() {
        let collection: VersionCollection = [
            version(serde_json::json!({"id": "1.20.1"})),
            version(serde_json::json!({"id": "forge", "inheritsFrom": "1.20.1", "jar": "1.20.1"})),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve_version(&collection, "forge").unwrap().jar_id(), "1.20.1");
    }
}
