// ─── Classpath Builder ───
// Picks the libraries a launch needs and joins them into a classpath string.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::MavenArtifact;
use crate::core::path::path_str;
use crate::core::rules::{applies, LaunchContext};
use crate::core::version::{Library, LibraryArtifact};

/// A library that survived filtering, with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLibrary {
    pub name: String,
    /// Jar placed on the classpath.
    pub path: Option<PathBuf>,
    /// Native jar for the context OS. Extraction is left to the caller.
    pub native_path: Option<PathBuf>,
}

impl ResolvedLibrary {
    pub fn is_native(&self) -> bool {
        self.native_path.is_some()
    }
}

/// Filter `libraries` for `ctx` and compute their paths under `library_dir`.
///
/// A library is kept when it is required on the client, its rules apply and
/// it has either a main artifact or a native classifier for the OS.
pub fn resolve_libraries(
    libraries: &[Library],
    ctx: &LaunchContext,
    library_dir: &Path,
) -> LauncherResult<Vec<ResolvedLibrary>> {
    let mut resolved = Vec::with_capacity(libraries.len());

    for library in libraries {
        if !library.client_required {
            trace!("Skipping server-only library {}", library.name);
            continue;
        }
        if !applies(&library.rules, ctx) {
            trace!("Library {} excluded by rules", library.name);
            continue;
        }

        let native_classifier = library.native_classifier(ctx);
        if library.artifact.is_none() && native_classifier.is_none() {
            trace!("Library {} has nothing to load for {}", library.name, ctx.os_name);
            continue;
        }

        let path = match &library.artifact {
            Some(artifact) => Some(library_dir.join(artifact_path(library, artifact, None)?)),
            None => None,
        };

        let native_path = match native_classifier.as_deref() {
            Some(classifier) => {
                let artifact = library
                    .classifiers
                    .as_ref()
                    .and_then(|classifiers| classifiers.get(classifier));
                Some(library_dir.join(native_artifact_path(library, artifact, classifier)?))
            }
            None => None,
        };

        resolved.push(ResolvedLibrary {
            name: library.name.clone(),
            path,
            native_path,
        });
    }

    debug!("Resolved {} of {} libraries", resolved.len(), libraries.len());
    Ok(resolved)
}

/// Relative path of the main artifact, derived from the coordinate when the
/// descriptor gives none.
fn artifact_path(
    library: &Library,
    artifact: &LibraryArtifact,
    classifier: Option<&str>,
) -> LauncherResult<PathBuf> {
    if let Some(path) = artifact.path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    derived_path(library, classifier)
}

fn native_artifact_path(
    library: &Library,
    artifact: Option<&LibraryArtifact>,
    classifier: &str,
) -> LauncherResult<PathBuf> {
    match artifact {
        Some(artifact) => artifact_path(library, artifact, Some(classifier)),
        None => derived_path(library, Some(classifier)),
    }
}

fn derived_path(library: &Library, classifier: Option<&str>) -> LauncherResult<PathBuf> {
    let coordinate =
        MavenArtifact::parse(&library.name).map_err(|_| LauncherError::MissingArtifactPath {
            name: library.name.clone(),
        })?;
    let coordinate = match classifier {
        Some(classifier) => coordinate.with_classifier(classifier),
        None => coordinate,
    };
    Ok(coordinate.local_path())
}

/// Classpath entries: library jars in resolution order, then the game jar.
pub fn classpath_entries(libraries: &[ResolvedLibrary], jar_path: &Path) -> Vec<String> {
    let jar = path_str(jar_path);
    let mut entries: Vec<String> = libraries
        .iter()
        .filter_map(|library| library.path.as_deref())
        .map(path_str)
        .filter(|entry| *entry != jar)
        .collect();

    dedup_preserving_order(&mut entries);
    entries.push(jar);
    entries
}

pub fn build_classpath(libraries: &[ResolvedLibrary], jar_path: &Path, separator: &str) -> String {
    classpath_entries(libraries, jar_path).join(separator)
}

/// Host classpath separator: `;` on Windows, `:` elsewhere.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

fn dedup_preserving_order(entries: &mut Vec<String>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}
