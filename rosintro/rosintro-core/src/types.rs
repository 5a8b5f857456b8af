//! Structured message definitions as consumed by the flattener.
//!
//! These types are the already-parsed form of ROS message definitions: the
//! text parser lives elsewhere and hands over a list of [`MessageDef`]s.

use std::fmt::{self, Display, Formatter};

/// Primitive wire types of the ROS 1 message format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Bool,
    /// Deprecated alias of `uint8`.
    Byte,
    /// Deprecated alias of `int8`.
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// `u32` length prefix followed by raw UTF-8 bytes.
    String,
    /// `u32` seconds + `u32` nanoseconds.
    Time,
    /// `i32` seconds + `i32` nanoseconds.
    Duration,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 16] = [
        BuiltinKind::Bool,
        BuiltinKind::Byte,
        BuiltinKind::Char,
        BuiltinKind::I8,
        BuiltinKind::I16,
        BuiltinKind::I32,
        BuiltinKind::I64,
        BuiltinKind::U8,
        BuiltinKind::U16,
        BuiltinKind::U32,
        BuiltinKind::U64,
        BuiltinKind::F32,
        BuiltinKind::F64,
        BuiltinKind::String,
        BuiltinKind::Time,
        BuiltinKind::Duration,
    ];

    /// Encoded size in bytes, or `None` for the length-prefixed `string`.
    pub fn wire_width(&self) -> Option<usize> {
        match self {
            BuiltinKind::Bool
            | BuiltinKind::Byte
            | BuiltinKind::Char
            | BuiltinKind::I8
            | BuiltinKind::U8 => Some(1),
            BuiltinKind::I16 | BuiltinKind::U16 => Some(2),
            BuiltinKind::I32 | BuiltinKind::U32 | BuiltinKind::F32 => Some(4),
            BuiltinKind::I64
            | BuiltinKind::U64
            | BuiltinKind::F64
            | BuiltinKind::Time
            | BuiltinKind::Duration => Some(8),
            BuiltinKind::String => None,
        }
    }

    /// Name used in message definition text.
    pub fn type_name(&self) -> &'static str {
        match self {
            BuiltinKind::Bool => "bool",
            BuiltinKind::Byte => "byte",
            BuiltinKind::Char => "char",
            BuiltinKind::I8 => "int8",
            BuiltinKind::I16 => "int16",
            BuiltinKind::I32 => "int32",
            BuiltinKind::I64 => "int64",
            BuiltinKind::U8 => "uint8",
            BuiltinKind::U16 => "uint16",
            BuiltinKind::U32 => "uint32",
            BuiltinKind::U64 => "uint64",
            BuiltinKind::F32 => "float32",
            BuiltinKind::F64 => "float64",
            BuiltinKind::String => "string",
            BuiltinKind::Time => "time",
            BuiltinKind::Duration => "duration",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }
}

impl Display for BuiltinKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Array cardinality of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArraySize {
    #[default]
    Scalar,
    /// `T[N]`: no length prefix on the wire.
    Fixed(usize),
    /// `T[]`: `i32` length prefix on the wire.
    Variable,
}

/// Reference to a field type: either a builtin or a (package, name) message.
///
/// Cardinality and builtin-ness are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    package: String,
    name: String,
    builtin: Option<BuiltinKind>,
    array: ArraySize,
}

impl TypeRef {
    pub fn builtin(kind: BuiltinKind) -> Self {
        Self {
            package: String::new(),
            name: kind.type_name().to_string(),
            builtin: Some(kind),
            array: ArraySize::Scalar,
        }
    }

    pub fn message(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            builtin: None,
            array: ArraySize::Scalar,
        }
    }

    /// Parse `"pkg/Name"`, `"pkg/msg/Name"` or a builtin name such as `"int32"`.
    ///
    /// Array suffixes are not accepted; use [`Self::fixed_array`] /
    /// [`Self::variable_array`].
    pub fn parse(full_name: &str) -> Option<Self> {
        if let Some(kind) = BuiltinKind::from_type_name(full_name) {
            return Some(Self::builtin(kind));
        }
        let parts: Vec<&str> = full_name.split('/').collect();
        match parts.as_slice() {
            [pkg, name] | [pkg, "msg", name] if !pkg.is_empty() && !name.is_empty() => {
                Some(Self::message(*pkg, *name))
            }
            _ => None,
        }
    }

    pub fn fixed_array(mut self, len: usize) -> Self {
        self.array = ArraySize::Fixed(len);
        self
    }

    pub fn variable_array(mut self) -> Self {
        self.array = ArraySize::Variable;
        self
    }

    /// The same type with scalar cardinality.
    pub fn element(&self) -> Self {
        Self {
            array: ArraySize::Scalar,
            ..self.clone()
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn builtin_kind(&self) -> Option<BuiltinKind> {
        self.builtin
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin.is_some()
    }

    pub fn array_size(&self) -> ArraySize {
        self.array
    }

    pub fn is_array(&self) -> bool {
        self.array != ArraySize::Scalar
    }

    /// `pkg/Name` for messages, the builtin name otherwise; no array suffix.
    pub fn base_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_name())?;
        match self.array {
            ArraySize::Scalar => Ok(()),
            ArraySize::Fixed(n) => write!(f, "[{n}]"),
            ArraySize::Variable => f.write_str("[]"),
        }
    }
}

/// A single field of a message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    /// Raw constant value as written in the definition; constants have no
    /// wire representation.
    pub constant: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            constant: None,
        }
    }

    pub fn constant(name: impl Into<String>, ty: TypeRef, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            constant: Some(value.into()),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }
}

/// A message definition: its own type and the fields in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDef {
    pub ty: TypeRef,
    pub fields: Vec<FieldDef>,
}

impl MessageDef {
    pub fn new(package: impl Into<String>, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            ty: TypeRef::message(package, name),
            fields,
        }
    }

    /// Fields that occupy bytes on the wire, in wire order.
    pub fn wire_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.is_constant())
    }
}

impl Display for MessageDef {
    /// Renders the definition in `.msg` style, one field per line.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            match &field.constant {
                Some(value) => writeln!(f, "{} {}={}", field.ty, field.name, value)?,
                None => writeln!(f, "{} {}", field.ty, field.name)?,
            }
        }
        Ok(())
    }
}
