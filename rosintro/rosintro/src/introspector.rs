//! Catalog-owning entry point for decoding, encoding and attribute discovery.

use std::sync::Arc;

use rayon::prelude::*;
use rosintro_core::{TypeCatalog, TypeRef};
use rosintro_flat::{
    DecodeOptions, FlatMessage, RenderedView, decode, encode_to_vec, encode_verified, skeleton,
};

use crate::error::IntrospectError;

/// Decodes and re-encodes messages of any type registered in its catalog.
///
/// Cheap to clone; the catalog is shared.
#[derive(Debug, Clone)]
pub struct Introspector {
    catalog: Arc<TypeCatalog>,
    options: DecodeOptions,
}

/// Builder for configuring [`Introspector`].
#[derive(Debug, Default)]
pub struct IntrospectorBuilder {
    catalog: TypeCatalog,
    options: DecodeOptions,
}

impl Introspector {
    /// Create a builder for [`Introspector`].
    pub fn builder() -> IntrospectorBuilder {
        IntrospectorBuilder::default()
    }

    pub fn new(catalog: TypeCatalog) -> Self {
        Self::builder().with_catalog(catalog).build()
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Parse `type_name` and check that it names a message in the catalog.
    pub fn resolve_type(&self, type_name: &str) -> Result<TypeRef, IntrospectError> {
        let invalid = |reason| IntrospectError::InvalidTypeName {
            type_name: type_name.to_string(),
            reason,
        };
        let ty = TypeRef::parse(type_name).ok_or_else(|| invalid("expected 'pkg/Name'"))?;
        if ty.is_builtin() {
            return Err(invalid("root type must be a message, not a builtin"));
        }
        if self.catalog.resolve(&ty).is_none() {
            return Err(IntrospectError::UnknownRootType {
                type_name: ty.base_name(),
            });
        }
        Ok(ty)
    }

    /// Decode a buffer holding exactly one record of `type_name`.
    pub fn decode(&self, type_name: &str, data: &[u8]) -> Result<FlatMessage, IntrospectError> {
        let ty = self.resolve_type(type_name)?;
        self.decode_exact(&ty, data)
    }

    /// Decode one record from the front of `buf` and advance past it.
    ///
    /// Unlike [`Self::decode`], bytes after the record are left in `buf`.
    pub fn decode_next(
        &self,
        type_name: &str,
        buf: &mut &[u8],
    ) -> Result<FlatMessage, IntrospectError> {
        let ty = self.resolve_type(type_name)?;
        Ok(decode(&self.catalog, &ty, buf, &self.options)?)
    }

    /// Decode independent records of the same type in parallel.
    ///
    /// Results are in input order; one failing record does not affect the
    /// others.
    pub fn decode_batch(
        &self,
        type_name: &str,
        records: &[&[u8]],
    ) -> Result<Vec<Result<FlatMessage, IntrospectError>>, IntrospectError> {
        let ty = self.resolve_type(type_name)?;
        Ok(records
            .par_iter()
            .map(|data| self.decode_exact(&ty, data))
            .collect())
    }

    pub fn encode(&self, view: &RenderedView) -> Result<Vec<u8>, IntrospectError> {
        Ok(encode_to_vec(view)?)
    }

    /// Encode `view`, failing at the first field whose bytes differ from
    /// `reference`.
    pub fn encode_verified(
        &self,
        view: &RenderedView,
        reference: &[u8],
    ) -> Result<Vec<u8>, IntrospectError> {
        let mut out = Vec::with_capacity(reference.len());
        encode_verified(view, &mut out, reference)?;
        Ok(out)
    }

    /// Every attribute path of `type_name` with its kind and zero value.
    pub fn skeleton(&self, type_name: &str) -> Result<RenderedView, IntrospectError> {
        let ty = self.resolve_type(type_name)?;
        Ok(skeleton(&self.catalog, &ty, self.options.prefix())?)
    }

    fn decode_exact(&self, ty: &TypeRef, data: &[u8]) -> Result<FlatMessage, IntrospectError> {
        let mut buf = data;
        let flat = decode(&self.catalog, ty, &mut buf, &self.options)?;
        if !buf.is_empty() {
            tracing::debug!(type_name = %ty, remaining = buf.len(), "record has trailing bytes");
            return Err(IntrospectError::TrailingBytes {
                type_name: ty.base_name(),
                remaining: buf.len(),
            });
        }
        Ok(flat)
    }
}

impl IntrospectorBuilder {
    /// Set the message definitions (default: empty catalog).
    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the decode options (default: [`DecodeOptions::default`]).
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the introspector. Well-known types such as `std_msgs/Header`
    /// are added to the catalog when missing.
    pub fn build(self) -> Introspector {
        let mut catalog = self.catalog;
        catalog.ensure_builtin_types();
        Introspector {
            catalog: Arc::new(catalog),
            options: self.options,
        }
    }
}
