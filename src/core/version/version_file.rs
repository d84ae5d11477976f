// ─── Version File ───
// Raw serde mirror of a Mojang / mod-loader version JSON.
//
// Only the shape of the file lives here; normalization into the immutable
// `VersionDescriptor` happens in `descriptor.rs`.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

use crate::core::rules::Rule;

/// A parsed version JSON, exactly as found on disk or on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    #[serde(default)]
    pub inherits_from: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    /// Pre-1.7 asset index id (`"legacy"`, `"pre-1.6"`).
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub jar: Option<String>,
    #[serde(default, deserialize_with = "lenient_release_time")]
    pub release_time: Option<DateTime<FixedOffset>>,
    #[serde(default, rename = "type")]
    pub version_type: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersion>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub logging: Option<LoggingInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersion {
    #[serde(default)]
    pub component: Option<String>,
    pub major_version: u32,
}

// ─── Arguments ───

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<RawArgument>,
    #[serde(default)]
    pub jvm: Vec<RawArgument>,
}

/// One entry of `arguments.game` / `arguments.jvm`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawArgument {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
    /// Anything else is tolerated and ignored.
    Unknown(serde_json::Value),
}

/// `value` may be a single string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    One(String),
    Many(Vec<String>),
}

impl ArgumentValue {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            ArgumentValue::One(token) => vec![token],
            ArgumentValue::Many(tokens) => tokens,
        }
    }
}

// ─── Logging ───

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingInfo {
    #[serde(default)]
    pub client: Option<ClientLogging>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientLogging {
    #[serde(default)]
    pub argument: Option<String>,
    #[serde(default)]
    pub file: Option<LogFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogFile {
    pub id: String,
}

// ─── Library Entry ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
    #[serde(default)]
    pub artifact: Option<FileMetadata>,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default, alias = "classifies")]
    pub classifiers: Option<BTreeMap<String, FileMetadata>>,
    #[serde(default)]
    pub natives: Option<BTreeMap<String, String>>,
    /// Forge-style tri-state flags; absent means required.
    #[serde(default)]
    pub serverreq: Option<bool>,
    #[serde(default)]
    pub clientreq: Option<bool>,

    // Forge, Fabric and OptiFine profiles put the artifact metadata directly
    // on the library entry instead of under `artifact` / `downloads`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<FileMetadata>,
    #[serde(default)]
    pub classifiers: Option<BTreeMap<String, FileMetadata>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Some installer-generated profiles write offsets without a colon
/// (`1960-01-01T00:00:00-0700`); anything unparsable is treated as absent.
fn lenient_release_time<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_release_time))
}

pub(crate) fn parse_release_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}
