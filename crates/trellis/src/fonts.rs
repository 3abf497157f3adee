//! Font registry for the UI root context.
//!
//! Trellis does no text measurement or rasterization; fonts are opaque
//! handles that widgets and the tooltip controller pass through to the
//! rendering layer.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use slotmap::SlotMap;

use crate::id::FontId;

/// A font known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    /// Registered name.
    name: String,
    /// Source file path.
    path: PathBuf,
}

impl FontFace {
    /// The name the face was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The font file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Named font handles, owned by the UI root context.
#[derive(Default)]
pub struct Fonts {
    /// Face storage.
    faces: SlotMap<FontId, FontFace>,
    /// Name lookup.
    by_name: HashMap<String, FontId>,
}

impl Fonts {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font file under a name. Re-registering a name replaces
    /// the previous face and invalidates its handle.
    pub fn register(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> FontId {
        let name = name.into();
        let id = self.faces.insert(FontFace {
            name: name.clone(),
            path: path.into(),
        });
        if let Some(old) = self.by_name.insert(name, id) {
            self.faces.remove(old);
        }
        id
    }

    /// Look up a font handle by registered name.
    pub fn get(&self, name: &str) -> Option<FontId> {
        self.by_name.get(name).copied()
    }

    /// The face behind a handle, if still registered.
    pub fn face(&self, id: FontId) -> Option<&FontFace> {
        self.faces.get(id)
    }

    /// True if the handle resolves to a live face.
    pub fn contains(&self, id: FontId) -> bool {
        self.faces.contains_key(id)
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if no faces are registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut fonts = Fonts::new();
        let id = fonts.register("body", "fonts/body.ttf");
        assert_eq!(fonts.get("body"), Some(id));
        assert_eq!(fonts.face(id).map(FontFace::name), Some("body"));
        assert!(fonts.contains(id));
    }

    #[test]
    fn reregister_invalidates_old_handle() {
        let mut fonts = Fonts::new();
        let old = fonts.register("body", "fonts/a.ttf");
        let new = fonts.register("body", "fonts/b.ttf");
        assert!(!fonts.contains(old));
        assert_eq!(fonts.get("body"), Some(new));
        assert_eq!(fonts.len(), 1);
    }
}
