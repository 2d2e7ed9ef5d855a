use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

pub const KEY_NAME: &str = "name";
pub const KEY_VERSION: &str = "version";
pub const KEY_BUILD: &str = "build";
pub const KEY_COPYRIGHT: &str = "copyright";

const DEFAULT_BUILD: &str = "0";

/// A read-only key/value store describing the host application.
pub trait MetadataSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl MetadataSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Package metadata of the binary that links this crate, captured at compile time.
///
/// The build number comes from `FLIPABOUT_BUILD` when it was set during the build.
pub struct CargoDescriptor {
    name: &'static str,
    version: &'static str,
    build: Option<&'static str>,
    copyright: Option<&'static str>,
}

impl CargoDescriptor {
    pub const fn new(
        name: &'static str,
        version: &'static str,
        build: Option<&'static str>,
        copyright: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            version,
            build,
            copyright,
        }
    }
}

/// Capture the calling crate's Cargo metadata as a [`CargoDescriptor`].
#[macro_export]
macro_rules! cargo_descriptor {
    () => {
        $crate::metadata::CargoDescriptor::new(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            option_env!("FLIPABOUT_BUILD"),
            option_env!("FLIPABOUT_COPYRIGHT"),
        )
    };
}

impl MetadataSource for CargoDescriptor {
    fn lookup(&self, key: &str) -> Option<String> {
        let value = match key {
            KEY_NAME => Some(self.name),
            KEY_VERSION => Some(self.version),
            KEY_BUILD => self.build,
            KEY_COPYRIGHT => self.copyright,
            _ => None,
        };
        value.filter(|v| !v.is_empty()).map(str::to_owned)
    }
}

/// Descriptor read from a JSON object of string fields, e.g.
/// `{"name": "Demo", "version": "1.2", "build": "42", "copyright": "..."}`.
/// Non-string values are skipped.
pub struct Descriptor {
    fields: HashMap<String, String>,
}

impl Descriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading descriptor {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing descriptor {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let fields = raw
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();
        Ok(Self { fields })
    }
}

impl MetadataSource for Descriptor {
    fn lookup(&self, key: &str) -> Option<String> {
        self.fields.lookup(key)
    }
}

/// Values shown in the About window. Read once when the window is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayMetadata {
    pub app_name: String,
    pub version_marketing: String,
    pub version_build: String,
    pub copyright_text: String,
}

impl DisplayMetadata {
    pub fn from_source(source: &dyn MetadataSource) -> Self {
        Self {
            app_name: resolve(source, KEY_NAME, "app_name", ""),
            version_marketing: resolve(source, KEY_VERSION, "version_marketing", ""),
            version_build: resolve(source, KEY_BUILD, "version_build", DEFAULT_BUILD),
            copyright_text: resolve(source, KEY_COPYRIGHT, "copyright_text", ""),
        }
    }
}

fn resolve(source: &dyn MetadataSource, key: &str, field: &str, fallback: &str) -> String {
    match source.lookup(key) {
        Some(value) => value,
        None => {
            log::debug!("Unable to determine '{}' (missing key '{}')", field, key);
            fallback.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_keys_present() {
        let source = map(&[
            ("name", "Demo"),
            ("version", "2.1"),
            ("build", "314"),
            ("copyright", "Copyright 2026 Demo Org"),
        ]);
        let meta = DisplayMetadata::from_source(&source);
        assert_eq!(meta.app_name, "Demo");
        assert_eq!(meta.version_marketing, "2.1");
        assert_eq!(meta.version_build, "314");
        assert_eq!(meta.copyright_text, "Copyright 2026 Demo Org");
    }

    #[test]
    fn test_missing_keys_use_fallbacks() {
        let meta = DisplayMetadata::from_source(&HashMap::<String, String>::new());
        assert_eq!(meta.app_name, "");
        assert_eq!(meta.version_marketing, "");
        assert_eq!(meta.version_build, "0");
        assert_eq!(meta.copyright_text, "");
    }

    #[test]
    fn test_partial_source() {
        let meta = DisplayMetadata::from_source(&map(&[("name", "Demo")]));
        assert_eq!(meta.app_name, "Demo");
        assert_eq!(meta.version_build, "0");
    }

    #[test]
    fn test_cargo_descriptor() {
        let descriptor = CargoDescriptor::new("demo", "0.3.0", None, Some(""));
        let meta = DisplayMetadata::from_source(&descriptor);
        assert_eq!(meta.app_name, "demo");
        assert_eq!(meta.version_marketing, "0.3.0");
        assert_eq!(meta.version_build, "0");
        assert_eq!(meta.copyright_text, "");
    }

    #[test]
    fn test_cargo_descriptor_macro() {
        let meta = DisplayMetadata::from_source(&crate::cargo_descriptor!());
        assert_eq!(meta.app_name, "flipabout");
        assert_eq!(meta.version_marketing, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_descriptor_skips_non_strings() {
        let descriptor =
            Descriptor::parse(r#"{"name": "Demo", "build": 7, "copyright": "(c) Org"}"#).unwrap();
        let meta = DisplayMetadata::from_source(&descriptor);
        assert_eq!(meta.app_name, "Demo");
        assert_eq!(meta.version_build, "0");
        assert_eq!(meta.copyright_text, "(c) Org");
    }

    #[test]
    fn test_descriptor_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(Descriptor::load(&missing).is_err());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2").unwrap();
        assert!(Descriptor::load(&bad).is_err());

        let good = dir.path().join("app.json");
        std::fs::write(&good, r#"{"version": "1.0"}"#).unwrap();
        let meta = DisplayMetadata::from_source(&Descriptor::load(&good).unwrap());
        assert_eq!(meta.version_marketing, "1.0");
    }
}
