//! Lookup of extracted specs by artboard name.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::types::Specs;

/// Specs of every artboard seen in a render pass, keyed by artboard name.
#[derive(Debug, Clone, Default)]
pub struct SpecsContext {
    specs: BTreeMap<String, Specs>,
}

impl SpecsContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store specs under `name`, returning the entry it replaced.
    ///
    /// Later artboards with the same name win.
    pub fn insert(&mut self, name: impl Into<String>, specs: Specs) -> Option<Specs> {
        self.specs.insert(name.into(), specs)
    }

    /// Get the specs for an artboard.
    pub fn get(&self, name: &str) -> Option<&Specs> {
        self.specs.get(name)
    }

    /// Number of artboards.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no artboard has been added.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Artboards sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Specs)> {
        self.specs.iter().map(|(name, specs)| (name.as_str(), specs))
    }

    /// Resolve a dotted data path such as `Palette.colors.0.hex`.
    ///
    /// The first segment names the artboard; the rest walk into its
    /// serialized specs by key or array index. Any missing step yields `None`.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let specs = self.specs.get(segments.next()?)?;
        let mut value = serde_json::to_value(specs).ok()?;

        for segment in segments {
            value = match value {
                Value::Object(mut map) => map.remove(segment)?,
                Value::Array(mut items) => {
                    let index: usize = segment.parse().ok()?;
                    if index >= items.len() {
                        return None;
                    }
                    items.swap_remove(index)
                }
                _ => return None,
            };
        }

        Some(value)
    }
}

/// Artboard name of a path: the file name without directory or extension.
pub fn asset_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}
