// ─── Version Descriptor ───
// Normalized, immutable view of one version JSON.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::core::error::LauncherResult;
use crate::core::rules::{LaunchContext, Rule};

use super::version_file::{FileMetadata, JavaVersion, LibraryEntry, RawArgument, VersionJson};

/// One launchable version (vanilla release, snapshot or mod-loader profile).
#[derive(Debug, Clone, PartialEq)]
pub struct VersionDescriptor {
    pub id: String,
    pub inherits_from: Option<String>,
    pub main_class: Option<String>,
    pub asset_index_id: Option<String>,
    pub jar: Option<String>,
    pub release_time: Option<DateTime<FixedOffset>>,
    pub version_type: Option<String>,
    pub java_version: Option<JavaVersion>,
    pub logging: Option<LoggingConfig>,
    pub libraries: Vec<Library>,
    pub jvm_arguments: Vec<ArgumentTemplate>,
    pub game_arguments: Vec<ArgumentTemplate>,
    /// Lists used when this descriptor is an ancestor of the launch target.
    pub jvm_arguments_for_base: Vec<ArgumentTemplate>,
    pub game_arguments_for_base: Vec<ArgumentTemplate>,
    /// Raw `minecraftArguments` string of the legacy schema.
    pub legacy_game_arguments: Option<String>,
}

impl VersionDescriptor {
    /// Parse a raw version JSON document.
    pub fn parse(raw: &str) -> LauncherResult<Self> {
        let json: VersionJson = serde_json::from_str(raw)?;
        Ok(Self::from_json(json))
    }

    pub fn from_json(json: VersionJson) -> Self {
        let asset_index_id = json
            .asset_index
            .map(|index| index.id)
            .or(json.assets)
            .filter(|id| !id.is_empty());

        let logging = json
            .logging
            .and_then(|logging| logging.client)
            .and_then(|client| {
                let argument = client.argument.filter(|arg| !arg.trim().is_empty())?;
                Some(LoggingConfig {
                    argument,
                    file_id: client.file.map(|file| file.id),
                })
            });

        let libraries = json
            .libraries
            .into_iter()
            .filter_map(Library::from_entry)
            .collect();

        // The structured schema is inherited as-is. A legacy argument string
        // is never inherited through the base variant; see `chain.rs`.
        let legacy_game_arguments = json.minecraft_arguments.filter(|s| !s.trim().is_empty());
        let structured = json.arguments.unwrap_or_default();
        let jvm_arguments = normalize_arguments(structured.jvm);
        let structured_game = normalize_arguments(structured.game);
        let (game_arguments, game_arguments_for_base) =
            match (&legacy_game_arguments, structured_game.is_empty()) {
                (Some(legacy), true) => (ArgumentTemplate::from_command_line(legacy), Vec::new()),
                _ => (structured_game.clone(), structured_game),
            };

        Self {
            id: json.id,
            inherits_from: json.inherits_from.filter(|parent| !parent.is_empty()),
            main_class: json.main_class.filter(|class| !class.is_empty()),
            asset_index_id,
            jar: json.jar.filter(|jar| !jar.is_empty()),
            release_time: json.release_time,
            version_type: json.version_type,
            java_version: json.java_version,
            logging,
            libraries,
            jvm_arguments_for_base: jvm_arguments.clone(),
            jvm_arguments,
            game_arguments,
            game_arguments_for_base,
            legacy_game_arguments,
        }
    }

    /// `true` when this descriptor carries only the pre-1.13 argument string.
    pub fn uses_legacy_arguments(&self) -> bool {
        self.legacy_game_arguments.is_some() && self.game_arguments_for_base.is_empty()
    }

    pub fn jvm_arguments(&self, is_base_version: bool) -> &[ArgumentTemplate] {
        if is_base_version {
            &self.jvm_arguments_for_base
        } else {
            &self.jvm_arguments
        }
    }

    pub fn game_arguments(&self, is_base_version: bool) -> &[ArgumentTemplate] {
        if is_base_version {
            &self.game_arguments_for_base
        } else {
            &self.game_arguments
        }
    }
}

fn normalize_arguments(raw: Vec<RawArgument>) -> Vec<ArgumentTemplate> {
    raw.into_iter()
        .filter_map(|argument| match argument {
            RawArgument::Plain(token) => Some(ArgumentTemplate::literal(token)),
            RawArgument::Conditional { rules, value } => {
                Some(ArgumentTemplate::conditional(rules, value.into_tokens()))
            }
            RawArgument::Unknown(_) => None,
        })
        .filter(|template| !template.values.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Argument template such as `-Dlog4j.configurationFile=${path}`.
    pub argument: String,
    pub file_id: Option<String>,
}

// ─── Argument Templates ───

/// One argument entry. All `values` are kept or dropped together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTemplate {
    pub values: Vec<String>,
    pub rules: Vec<Rule>,
}

impl ArgumentTemplate {
    pub fn literal(token: impl Into<String>) -> Self {
        Self {
            values: vec![token.into()],
            rules: Vec::new(),
        }
    }

    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: tokens.into_iter().map(Into::into).collect(),
            rules: Vec::new(),
        }
    }

    pub fn conditional(rules: Vec<Rule>, values: Vec<String>) -> Self {
        Self { values, rules }
    }

    /// Split a whitespace-delimited command line into one entry per token.
    pub fn from_command_line(line: &str) -> Vec<Self> {
        line.split_whitespace().map(Self::literal).collect()
    }

    /// One entry per token, for user supplied argument lists.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<Self> {
        tokens
            .iter()
            .map(|token| token.as_ref().trim())
            .filter(|token| !token.is_empty())
            .map(Self::literal)
            .collect()
    }
}

// ─── Libraries ───

/// Resolve a nullable "required" flag. Absent means required.
pub fn required_or_default(flag: Option<bool>) -> bool {
    flag.unwrap_or(true)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryArtifact {
    pub path: Option<String>,
    pub url: Option<String>,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

impl From<FileMetadata> for LibraryArtifact {
    fn from(meta: FileMetadata) -> Self {
        Self {
            path: meta.path.filter(|p| !p.is_empty()),
            url: meta.url.filter(|u| !u.is_empty()),
            sha1: meta.sha1,
            size: meta.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    /// Maven-style coordinate.
    pub name: String,
    pub artifact: Option<LibraryArtifact>,
    pub classifiers: Option<BTreeMap<String, LibraryArtifact>>,
    /// OS name → classifier (may contain `${arch}`).
    pub natives: Option<BTreeMap<String, String>>,
    pub rules: Vec<Rule>,
    pub client_required: bool,
    pub server_required: bool,
}

impl Library {
    /// Entries without a name are dropped.
    pub fn from_entry(entry: LibraryEntry) -> Option<Self> {
        if entry.name.trim().is_empty() {
            return None;
        }

        let mut artifact = entry
            .artifact
            .or_else(|| entry.downloads.as_ref().and_then(|d| d.artifact.clone()))
            .map(LibraryArtifact::from);

        let classifiers = entry
            .classifiers
            .or_else(|| entry.downloads.and_then(|d| d.classifiers))
            .map(|map| {
                map.into_iter()
                    .map(|(key, meta)| (key, LibraryArtifact::from(meta)))
                    .collect::<BTreeMap<_, _>>()
            });

        if artifact.is_none() && classifiers.is_none() {
            artifact = Some(LibraryArtifact {
                path: entry.path.filter(|p| !p.is_empty()),
                url: entry.url.filter(|u| !u.is_empty()),
                sha1: entry.sha1,
                size: entry.size,
            });
        }

        Some(Self {
            name: entry.name,
            artifact,
            classifiers,
            natives: entry.natives,
            rules: entry.rules.unwrap_or_default(),
            client_required: required_or_default(entry.clientreq),
            server_required: required_or_default(entry.serverreq),
        })
    }

    /// Native classifier selected for the context OS, with `${arch}` expanded.
    pub fn native_classifier(&self, ctx: &LaunchContext) -> Option<String> {
        let natives = self.natives.as_ref()?;
        natives
            .get(&ctx.os_name)
            .map(|classifier| classifier.replace("${arch}", ctx.arch_bits()))
    }
}
