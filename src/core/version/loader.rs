// ─── Version Loaders ───
// Collaborators that fetch raw descriptors before resolution starts.
// The resolver itself never calls these; callers collect a chain first.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::path::MinecraftPath;

use super::chain::VersionCollection;
use super::descriptor::VersionDescriptor;
use super::manifest::{VersionManifest, VERSION_MANIFEST_URL};

const APP_USER_AGENT: &str = "InterfaceOficial/0.1.0";

#[async_trait]
pub trait VersionLoader: Send + Sync {
    /// `Ok(None)` when this loader does not know `id`.
    async fn load_version(&self, id: &str) -> LauncherResult<Option<VersionDescriptor>>;
}

/// Load `id` and every ancestor reachable through `inheritsFrom`.
///
/// Stops silently on a repeated or unknown id; the resolver reports those
/// as `CyclicInheritance` / `MissingParentVersion`.
pub async fn load_chain<L>(loader: &L, id: &str) -> LauncherResult<VersionCollection>
where
    L: VersionLoader + ?Sized,
{
    let mut collection = VersionCollection::new();
    let mut requested = HashSet::new();
    let mut next = Some(id.to_string());

    while let Some(current) = next.take() {
        if !requested.insert(current.clone()) {
            break;
        }

        let Some(version) = loader.load_version(&current).await? else {
            debug!("Version {} not available from loader", current);
            break;
        };

        next = version.inherits_from.clone();
        collection.insert(version);
    }

    info!("Loaded {} version descriptors for {}", collection.len(), id);
    Ok(collection)
}

// ─── Local ───

/// Reads `versions/<id>/<id>.json` from a game directory.
pub struct LocalVersionLoader {
    path: MinecraftPath,
}

impl LocalVersionLoader {
    pub fn new(path: MinecraftPath) -> Self {
        Self { path }
    }

    /// Ids of every installed version that has a descriptor file.
    pub async fn list_versions(&self) -> LauncherResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.path.versions).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(source) => {
                return Err(LauncherError::Io {
                    path: self.path.versions.clone(),
                    source,
                })
            }
        };

        while let Some(entry) = entries.next_entry().await? {
            let Some(id) = entry.file_name().to_str().map(ToString::to_string) else {
                continue;
            };
            if tokio::fs::try_exists(self.path.version_json_path(&id))
                .await
                .unwrap_or(false)
            {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl VersionLoader for LocalVersionLoader {
    async fn load_version(&self, id: &str) -> LauncherResult<Option<VersionDescriptor>> {
        let path = self.path.version_json_path(id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(LauncherError::Io { path, source }),
        };

        Ok(Some(VersionDescriptor::parse(&raw)?))
    }
}

// ─── Remote ───

/// Fetches vanilla descriptors through the Mojang version manifest.
pub struct MojangVersionLoader {
    client: reqwest::Client,
    manifest_url: String,
    manifest: OnceCell<VersionManifest>,
}

impl MojangVersionLoader {
    pub fn new() -> LauncherResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(default_headers)
            .build()?;
        Ok(Self::with_client(client, VERSION_MANIFEST_URL))
    }

    pub fn with_client(client: reqwest::Client, manifest_url: impl Into<String>) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
            manifest: OnceCell::new(),
        }
    }

    async fn manifest(&self) -> LauncherResult<&VersionManifest> {
        self.manifest
            .get_or_try_init(|| VersionManifest::fetch(&self.client, &self.manifest_url))
            .await
    }
}

#[async_trait]
impl VersionLoader for MojangVersionLoader {
    async fn load_version(&self, id: &str) -> LauncherResult<Option<VersionDescriptor>> {
        let Some(entry) = self.manifest().await?.find_version(id) else {
            return Ok(None);
        };

        debug!("Fetching version JSON for {} from {}", id, entry.url);
        let raw = self
            .client
            .get(&entry.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(Some(VersionDescriptor::parse(&raw)?))
    }
}

// ─── Chained ───

/// Asks each loader in order; the first one that knows the id wins.
/// If none knows it, the first loader error is returned instead of `None`.
///
/// Typical setup: local profiles first (mod loaders), Mojang second.
pub struct ChainedVersionLoader {
    loaders: Vec<Box<dyn VersionLoader>>,
}

impl ChainedVersionLoader {
    pub fn new(loaders: Vec<Box<dyn VersionLoader>>) -> Self {
        Self { loaders }
    }
}

#[async_trait]
impl VersionLoader for ChainedVersionLoader {
    async fn load_version(&self, id: &str) -> LauncherResult<Option<VersionDescriptor>> {
        let mut first_error: Option<LauncherError> = None;
        for loader in &self.loaders {
            match loader.load_version(id).await {
                Ok(Some(version)) => return Ok(Some(version)),
                Ok(None) => continue,
                Err(e) => {
                    warn!("Version loader failed for {}: {}", id, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}
