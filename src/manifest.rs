//! Module manifests: parsing, discovery, and the per-run manifest set.
//!
//! A manifest is a Unity assembly definition (`.asmdef`): a JSON document
//! declaring the module's `name` and the `references` it depends on. Only
//! those two fields matter here; everything else in the file is ignored.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Origin recorded for manifests built in memory rather than read from disk.
pub const IN_MEMORY_ORIGIN: &str = "<memory>";

/// Errors raised while reading manifests or assembling the manifest set.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Manifest {} has no module name", path.display())]
    MissingName { path: PathBuf },
    #[error(
        "Module '{name}' is declared twice: {} and {}",
        first.display(),
        second.display()
    )]
    Duplicate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Invalid manifest pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ManifestError {
    /// Whether the run can continue by skipping the offending manifest.
    ///
    /// Unreadable and malformed files are input defects. A manifest without a
    /// name, a fail-fast duplicate, or a bad discovery pattern aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}

/// A parsed module descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    /// Referenced module names in declaration order.
    pub references: Vec<String>,
    /// Where the manifest came from; diagnostics only.
    pub origin: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    references: Vec<String>,
}

impl Manifest {
    pub fn new<N, I, R>(name: N, references: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            name: name.into(),
            references: references.into_iter().map(Into::into).collect(),
            origin: PathBuf::from(IN_MEMORY_ORIGIN),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Parse manifest JSON. `origin` is only used for diagnostics.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ManifestError> {
        // Unity writes some .asmdef files with a UTF-8 byte order mark
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let raw: RawManifest =
            serde_json::from_str(content).map_err(|source| ManifestError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ManifestError::MissingName {
                path: origin.to_path_buf(),
            })?;

        Ok(Self {
            name,
            references: raw.references,
            origin: origin.to_path_buf(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }
}

/// What to do when two manifests declare the same module name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the last definition and report the duplicate as a warning.
    #[default]
    Warn,
    /// Abort the run.
    Fail,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Warn => write!(f, "warn"),
            DuplicatePolicy::Fail => write!(f, "fail"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(DuplicatePolicy::Warn),
            "fail" => Ok(DuplicatePolicy::Fail),
            _ => anyhow::bail!("Invalid duplicate policy '{}'. Valid options: warn, fail", s),
        }
    }
}

/// A module name that was declared by more than one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateDefinition {
    pub name: String,
    pub kept: PathBuf,
    pub discarded: PathBuf,
}

/// A manifest file that was excluded from the run because it could not be read
/// or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub reason: String,
}

/// The modules taking part in one validation run, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    modules: BTreeMap<String, Manifest>,
    duplicates: Vec<DuplicateDefinition>,
    policy: DuplicatePolicy,
}

impl ManifestSet {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            modules: BTreeMap::new(),
            duplicates: Vec::new(),
            policy,
        }
    }

    /// Build a set under the warn policy; later manifests replace earlier ones.
    pub fn from_manifests<I>(manifests: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = Manifest>,
    {
        let mut set = Self::new(DuplicatePolicy::Warn);
        for manifest in manifests {
            set.insert(manifest)?;
        }
        Ok(set)
    }

    /// Add a manifest, applying the duplicate policy on a name clash.
    pub fn insert(&mut self, manifest: Manifest) -> Result<(), ManifestError> {
        if manifest.name.trim().is_empty() {
            return Err(ManifestError::MissingName {
                path: manifest.origin,
            });
        }

        match self.modules.entry(manifest.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(manifest);
            }
            Entry::Occupied(mut slot) => match self.policy {
                DuplicatePolicy::Fail => {
                    return Err(ManifestError::Duplicate {
                        name: manifest.name,
                        first: slot.get().origin.clone(),
                        second: manifest.origin,
                    });
                }
                DuplicatePolicy::Warn => {
                    warn!(
                        module = %manifest.name,
                        kept = %manifest.origin.display(),
                        discarded = %slot.get().origin.display(),
                        "duplicate module name, keeping last definition"
                    );
                    let previous = slot.insert(manifest);
                    self.duplicates.push(DuplicateDefinition {
                        name: previous.name,
                        kept: slot.get().origin.clone(),
                        discarded: previous.origin,
                    });
                }
            },
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules in ascending name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Manifest> {
        self.modules.iter()
    }

    pub fn duplicates(&self) -> &[DuplicateDefinition] {
        &self.duplicates
    }

}

/// Discovery and duplicate handling options for [`load_dir`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Glob pattern relative to the root, e.g. `**/*.asmdef`.
    pub pattern: String,
    /// Globs matched against root-relative paths; matching files are ignored.
    pub exclude: Vec<String>,
    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pattern: crate::paths::MANIFEST_PATTERN.to_string(),
            exclude: Vec::new(),
            duplicates: DuplicatePolicy::Warn,
        }
    }
}

/// Manifests loaded from a directory tree.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub manifests: ManifestSet,
    pub skipped: Vec<SkippedManifest>,
    /// Number of manifest files found, including skipped ones.
    pub discovered: usize,
}

/// Find manifest files under `root`, sorted by path.
pub fn discover(
    root: &Path,
    pattern: &str,
    exclude: &[String],
) -> Result<Vec<PathBuf>, ManifestError> {
    let excludes = exclude
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|source| ManifestError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let root_str = glob::Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!("{}/{}", root_str.trim_end_matches('/'), pattern);
    let entries = glob::glob(&full_pattern).map_err(|source| ManifestError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if excludes.iter().any(|p| p.matches_path(relative)) {
            debug!(path = %relative.display(), "excluded");
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}

/// Discover and parse every manifest under `root`.
///
/// Unreadable or malformed files are logged, recorded in
/// [`LoadOutcome::skipped`], and left out of the set. Any other error aborts.
pub fn load_dir(root: &Path, options: &LoadOptions) -> Result<LoadOutcome, ManifestError> {
    let paths = discover(root, &options.pattern, &options.exclude)?;
    debug!(root = %root.display(), count = paths.len(), "discovered manifests");

    let mut manifests = ManifestSet::new(options.duplicates);
    let mut skipped = Vec::new();

    for path in &paths {
        match Manifest::load(path) {
            Ok(manifest) => manifests.insert(manifest)?,
            Err(e) if e.is_recoverable() => {
                warn!(path = %path.display(), error = %e, "skipping manifest");
                skipped.push(SkippedManifest {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(LoadOutcome {
        manifests,
        skipped,
        discovered: paths.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_manifest() {
        let content = r#"{
    "name": "Game.Core",
    "rootNamespace": "",
    "references": ["Game.Shared", "Unity.Mathematics"],
    "autoReferenced": true
}"#;
        let manifest = Manifest::parse(content, Path::new("Core.asmdef")).unwrap();
        assert_eq!(manifest.name, "Game.Core");
        assert_eq!(manifest.references, vec!["Game.Shared", "Unity.Mathematics"]);
        assert_eq!(manifest.origin, PathBuf::from("Core.asmdef"));
    }

    #[test]
    fn test_parse_manifest_without_references() {
        let manifest = Manifest::parse(r#"{"name": "Lonely"}"#, Path::new("x")).unwrap();
        assert!(manifest.references.is_empty());
    }

    #[test]
    fn test_parse_manifest_with_bom() {
        let manifest =
            Manifest::parse("\u{feff}{\"name\": \"Bom\"}", Path::new("bom.asmdef")).unwrap();
        assert_eq!(manifest.name, "Bom");
    }

    #[test]
    fn test_parse_malformed_manifest_is_recoverable() {
        let err = Manifest::parse("{ not json", Path::new("bad.asmdef")).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("bad.asmdef"));
    }

    #[test]
    fn test_parse_keeps_name_verbatim() {
        let manifest = Manifest::parse(
            r#"{"name": " Core", "references": [" Core"]}"#,
            Path::new("core.asmdef"),
        )
        .unwrap();
        assert_eq!(manifest.name, " Core");
        assert_eq!(manifest.references, vec![" Core"]);
    }

    #[test]
    fn test_parse_missing_name_is_fatal() {
        for content in [r#"{"references": []}"#, r#"{"name": "  "}"#, r#"{"name": null}"#] {
            let err = Manifest::parse(content, Path::new("anon.asmdef")).unwrap_err();
            assert!(matches!(err, ManifestError::MissingName { .. }), "{}", content);
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn test_duplicate_warn_keeps_last() {
        let mut set = ManifestSet::new(DuplicatePolicy::Warn);
        set.insert(Manifest::new("A", ["B"]).with_origin("first.asmdef")).unwrap();
        set.insert(Manifest::new("A", ["C"]).with_origin("second.asmdef")).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().references, vec!["C"]);
        assert_eq!(
            set.duplicates(),
            &[DuplicateDefinition {
                name: "A".to_string(),
                kept: PathBuf::from("second.asmdef"),
                discarded: PathBuf::from("first.asmdef"),
            }]
        );
    }

    #[test]
    fn test_duplicate_fail_aborts() {
        let mut set = ManifestSet::new(DuplicatePolicy::Fail);
        set.insert(Manifest::new("A", Vec::<String>::new()).with_origin("a1")).unwrap();
        let err = set
            .insert(Manifest::new("A", Vec::<String>::new()).with_origin("a2"))
            .unwrap_err();

        assert!(matches!(err, ManifestError::Duplicate { .. }));
        assert!(err.to_string().contains("a1"));
        assert!(err.to_string().contains("a2"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_insert_rejects_blank_name() {
        let mut set = ManifestSet::default();
        let err = set.insert(Manifest::new("", ["B"])).unwrap_err();
        assert!(matches!(err, ManifestError::MissingName { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_manifests_rejects_unnamed() {
        let err = ManifestSet::from_manifests([
            Manifest::new("", ["A"]),
            Manifest::new("A", ["B"]),
        ])
        .unwrap_err();
        assert!(matches!(err, ManifestError::MissingName { .. }));
    }

    #[test]
    fn test_from_manifests_keeps_last_duplicate() {
        let set = ManifestSet::from_manifests([
            Manifest::new("A", ["B"]),
            Manifest::new("A", ["C"]),
        ])
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().references, vec!["C"]);
        assert_eq!(set.duplicates().len(), 1);
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!("warn".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Warn);
        assert_eq!("FAIL".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Fail);
        assert!("ignore".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_load_dir_skips_malformed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Assets/A/A.asmdef", r#"{"name": "A", "references": ["B"]}"#);
        write(tmp.path(), "Assets/B/B.asmdef", r#"{"name": "B"}"#);
        write(tmp.path(), "Assets/Broken/Broken.asmdef", "{ oops");
        write(tmp.path(), "Assets/A/readme.txt", "not a manifest");

        let outcome = load_dir(tmp.path(), &LoadOptions::default()).unwrap();

        assert_eq!(outcome.discovered, 3);
        assert_eq!(outcome.manifests.len(), 2);
        assert!(outcome.manifests.contains("A"));
        assert!(outcome.manifests.contains("B"));
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].path.ends_with("Broken.asmdef"));
    }

    #[test]
    fn test_load_dir_missing_name_aborts() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "A.asmdef", r#"{"name": "A"}"#);
        write(tmp.path(), "Anon.asmdef", r#"{"references": ["A"]}"#);

        let err = load_dir(tmp.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ManifestError::MissingName { .. }));
    }

    #[test]
    fn test_discover_applies_excludes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Assets/Game/Game.asmdef", r#"{"name": "Game"}"#);
        write(tmp.path(), "Assets/Library/Old.asmdef", r#"{"name": "Old"}"#);

        let paths = discover(tmp.path(), "**/*.asmdef", &["**/Library/**".to_string()]).unwrap();

        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("Game.asmdef"));
    }

    #[test]
    fn test_discover_rejects_bad_exclude() {
        let tmp = TempDir::new().unwrap();
        let err = discover(tmp.path(), "**/*.asmdef", &["[".to_string()]).unwrap_err();
        assert!(matches!(err, ManifestError::Pattern { .. }));
    }
}
