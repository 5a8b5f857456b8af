//! Read-only lookup from `(package, name)` to [`MessageDef`].

use std::collections::HashMap;

use crate::types::{BuiltinKind, FieldDef, MessageDef, TypeRef};

/// All message definitions a decoder may need, keyed by package then name.
///
/// Built once before decoding starts and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    packages: HashMap<String, HashMap<String, MessageDef>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any previous one with the same name.
    pub fn insert(&mut self, def: MessageDef) -> Option<MessageDef> {
        self.packages
            .entry(def.ty.package().to_string())
            .or_default()
            .insert(def.ty.name().to_string(), def)
    }

    pub fn with(mut self, def: MessageDef) -> Self {
        self.insert(def);
        self
    }

    pub fn get(&self, package: &str, name: &str) -> Option<&MessageDef> {
        self.packages.get(package)?.get(name)
    }

    /// Look up the message definition behind a non-builtin type reference.
    pub fn resolve(&self, ty: &TypeRef) -> Option<&MessageDef> {
        if ty.is_builtin() {
            return None;
        }
        self.get(ty.package(), ty.name())
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every known `pkg/Name`, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .packages
            .values()
            .flat_map(|defs| defs.values().map(|d| d.ty.base_name()))
            .collect();
        names.sort();
        names
    }

    /// Ensure that `std_msgs/Header` is present.
    ///
    /// Nearly every stamped message embeds it, yet definition bundles coming
    /// from a single message often leave it out.
    pub fn ensure_builtin_types(&mut self) {
        self.packages
            .entry("std_msgs".to_string())
            .or_default()
            .entry("Header".to_string())
            .or_insert_with(|| {
                MessageDef::new(
                    "std_msgs",
                    "Header",
                    vec![
                        FieldDef::new("seq", TypeRef::builtin(BuiltinKind::U32)),
                        FieldDef::new("stamp", TypeRef::builtin(BuiltinKind::Time)),
                        FieldDef::new("frame_id", TypeRef::builtin(BuiltinKind::String)),
                    ],
                )
            });
    }
}

impl FromIterator<MessageDef> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = MessageDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}
