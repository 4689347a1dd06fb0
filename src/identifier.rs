//! Namespace-qualified texture identifiers (`minecraft:block/dirt`)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Namespace used when an identifier string has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error type for identifier parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Namespace part was empty (e.g. `:block/dirt`)
    #[error("empty namespace in '{0}'")]
    EmptyNamespace(String),
    /// Path part was empty (e.g. `minecraft:`)
    #[error("empty path in '{0}'")]
    EmptyPath(String),
    /// More than one `:` separator
    #[error("identifier '{0}' has more than one ':'")]
    ExtraSeparator(String),
    /// Relative texture path could not be turned into an identifier
    #[error("texture path '{0}' is not valid UTF-8 or has no file name")]
    InvalidPath(String),
    /// A `:` or control character inside the namespace or path
    #[error("identifier '{0}' contains invalid character {1:?}")]
    InvalidCharacter(String, char),
    /// Namespace or path starts or ends with whitespace
    #[error("identifier '{0}' has leading or trailing whitespace")]
    SurroundingWhitespace(String),
}

/// Check one half of an identifier so that `ns:path` parses back unchanged.
fn check_part(part: &str, full: &str) -> Result<(), IdentifierError> {
    if let Some(c) = part.chars().find(|c| *c == ':' || c.is_control()) {
        return Err(IdentifierError::InvalidCharacter(full.to_string(), c));
    }
    if part.trim() != part {
        return Err(IdentifierError::SurroundingWhitespace(full.to_string()));
    }
    Ok(())
}

/// A texture identifier: a namespace plus a `/`-separated path below `textures/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId {
    namespace: String,
    path: String,
}

impl TextureId {
    /// Build an identifier from its parts without validation.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), path: path.into() }
    }

    /// Derive an identifier from a texture file path relative to `textures/`.
    ///
    /// The file extension (everything after the last `.` of the file name) is
    /// stripped and platform separators are normalized to `/`, so
    /// `block\stone\granite.png` under namespace `minecraft` becomes
    /// `minecraft:block/stone/granite`.
    pub fn from_relative_path(namespace: &str, relative: &Path) -> Result<Self, IdentifierError> {
        let invalid = || IdentifierError::InvalidPath(relative.display().to_string());

        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str().ok_or_else(invalid)?;
            segments.push(segment.to_string());
        }

        let file_name = segments.pop().ok_or_else(invalid)?;
        let stem = match file_name.rfind('.') {
            Some(dot) => &file_name[..dot],
            None => file_name.as_str(),
        };
        if stem.is_empty() {
            return Err(invalid());
        }
        segments.push(stem.to_string());

        // Backslashes can survive inside a single component on non-Windows hosts
        let path = segments.join("/").replace('\\', "/");

        let full = format!("{}:{}", namespace, path);
        if namespace.is_empty() {
            return Err(IdentifierError::EmptyNamespace(full));
        }
        check_part(namespace, &full)?;
        check_part(&path, &full)?;
        Ok(Self::new(namespace, path))
    }

    /// The namespace part (`minecraft`)
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path part (`block/dirt`)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First path segment, e.g. `block` or `item`
    pub fn kind_segment(&self) -> &str {
        self.path.split('/').next().unwrap_or("")
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for TextureId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (namespace, path) = match s.split_once(':') {
            Some((ns, path)) => {
                if path.contains(':') {
                    return Err(IdentifierError::ExtraSeparator(s.to_string()));
                }
                (ns, path)
            }
            None => (DEFAULT_NAMESPACE, s),
        };

        if namespace.is_empty() {
            return Err(IdentifierError::EmptyNamespace(s.to_string()));
        }
        if path.is_empty() {
            return Err(IdentifierError::EmptyPath(s.to_string()));
        }
        check_part(namespace, s)?;
        check_part(path, s)?;

        Ok(Self::new(namespace, path.replace('\\', "/")))
    }
}

impl Serialize for TextureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TextureId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
