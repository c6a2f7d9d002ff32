//! Read-only view of the host's installed components

#[cfg(test)]
use mockall::automock;

/// One installed component as enumerated by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledComponent {
    /// Host-unique file key, e.g. `foo/foo.php`
    pub file: String,
    /// Version declared by the installed copy, if the host could read one
    pub version: Option<String>,
}

impl InstalledComponent {
    pub fn new(file: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            file: file.into(),
            version: version.map(str::to_string),
        }
    }

    /// Identifier used to look up this component's update source.
    pub fn slug(&self) -> String {
        component_slug(&self.file)
    }
}

/// Normalizes a component file key into its source-lookup slug.
///
/// Takes the basename, drops the last extension, and maps `-` to `_` so
/// slugs stay identifier-style names.
pub fn component_slug(file: &str) -> String {
    let base = file.rsplit('/').next().unwrap_or(file);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    stem.replace('-', "_")
}

/// The host's component-enumeration API
#[cfg_attr(test, automock)]
pub trait ComponentProvider: Send + Sync {
    /// Every installed component, keyed by its file identifier
    fn installed_components(&self) -> Vec<InstalledComponent>;
}
