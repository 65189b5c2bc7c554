//! Record type description for the mapping engine
//!
//! The engine never inspects Rust types at runtime. Instead a record type
//! declares its column annotations once, as a static [`FieldSpec`] table,
//! and moves parsed values in and out through [`CellValue`]. This is the
//! statically-typed equivalent of a struct-tag scan: the table is read a
//! single time per run and compiled into an immutable binding set.

use chrono::{DateTime, Utc};

/// Tagged union of parsed cell values
///
/// Every built-in field parser produces one of these variants; custom
/// parsers may produce any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

impl CellValue {
    /// Name of the contained variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Str(_) => "String",
            CellValue::I8(_) => "i8",
            CellValue::I16(_) => "i16",
            CellValue::I32(_) => "i32",
            CellValue::I64(_) => "i64",
            CellValue::F32(_) => "f32",
            CellValue::F64(_) => "f64",
            CellValue::Bool(_) => "bool",
            CellValue::DateTime(_) => "DateTime",
        }
    }

    /// Whether the value is the zero value of its type
    ///
    /// Blank timestamp cells parse to the Unix epoch, so the epoch is the
    /// datetime zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            CellValue::Str(s) => s.is_empty(),
            CellValue::I8(v) => *v == 0,
            CellValue::I16(v) => *v == 0,
            CellValue::I32(v) => *v == 0,
            CellValue::I64(v) => *v == 0,
            CellValue::F32(v) => *v == 0.0,
            CellValue::F64(v) => *v == 0.0,
            CellValue::Bool(v) => !v,
            CellValue::DateTime(v) => *v == DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Str(s) => f.write_str(s),
            CellValue::I8(v) => write!(f, "{}", v),
            CellValue::I16(v) => write!(f, "{}", v),
            CellValue::I32(v) => write!(f, "{}", v),
            CellValue::I64(v) => write!(f, "{}", v),
            CellValue::F32(v) => write!(f, "{}", v),
            CellValue::F64(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Typed extraction from a [`CellValue`]
///
/// Returns `None` on a variant mismatch. The `Option<T>` impl encodes the
/// optional-field contract: a zero value maps to `None`, so a record can
/// distinguish "not provided" from "provided as zero".
pub trait FromCell: Sized {
    fn from_cell(value: CellValue) -> Option<Self>;
}

impl FromCell for String {
    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_cell {
    ($ty:ty, $variant:ident) => {
        impl FromCell for $ty {
            fn from_cell(value: CellValue) -> Option<Self> {
                match value {
                    CellValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_cell!(i8, I8);
impl_from_cell!(i16, I16);
impl_from_cell!(i32, I32);
impl_from_cell!(i64, I64);
impl_from_cell!(f32, F32);
impl_from_cell!(f64, F64);
impl_from_cell!(bool, Bool);
impl_from_cell!(DateTime<Utc>, DateTime);

impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(value: CellValue) -> Option<Self> {
        if value.is_zero() {
            Some(None)
        } else {
            T::from_cell(value).map(Some)
        }
    }
}

/// Declarative column annotation for one record field
///
/// One entry per struct field, in field order. A blank or `"-"` column
/// label excludes the field from mapping entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Struct field name, for diagnostics
    pub name: &'static str,

    /// External column label; `""` or `"-"` excludes the field
    pub column: &'static str,

    /// Primitive type name of the field; the parser key when none is declared
    pub type_name: &'static str,

    /// Explicit parser key; `""` or `"-"` falls back to `type_name`
    pub parser: &'static str,

    /// Write-path converter key; `""` means none
    pub converter: &'static str,

    /// Explicit 1-based column index; 0 means unset
    pub column_index: u32,

    /// Whether a blank value (after default substitution) is an error
    pub required: bool,

    /// Literal substituted when the raw cell is blank; `""` means none
    pub default: &'static str,
}

impl FieldSpec {
    /// Create a spec with no parser override, no default, no explicit index
    pub const fn new(name: &'static str, column: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            column,
            type_name,
            parser: "",
            converter: "",
            column_index: 0,
            required: false,
            default: "",
        }
    }

    /// Create a spec for a field excluded from mapping
    pub const fn skipped(name: &'static str) -> Self {
        Self::new(name, "-", "")
    }

    /// Mark the field required
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Override the parser key
    pub const fn with_parser(mut self, key: &'static str) -> Self {
        self.parser = key;
        self
    }

    /// Set the write-path converter key
    pub const fn with_converter(mut self, key: &'static str) -> Self {
        self.converter = key;
        self
    }

    /// Pin the source column to an explicit 1-based index
    pub const fn at_column(mut self, index: u32) -> Self {
        self.column_index = index;
        self
    }

    /// Set the blank-cell default literal
    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = value;
        self
    }
}

/// Failed assignment of a parsed value into a record field
///
/// Signals a configuration defect (parser producing the wrong variant for
/// the target field), so the engine escalates it to a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignError {
    /// Field index the assignment targeted
    pub index: usize,

    /// Variant name of the rejected value
    pub got: &'static str,
}

impl std::fmt::Display for AssignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot assign {} value into field index {}",
            self.got, self.index
        )
    }
}

impl std::error::Error for AssignError {}

/// A record type that can be mapped to and from tabular rows
///
/// Implementations pair a static annotation table with typed field access.
/// The `Default` bound supplies the zero-valued record each row starts
/// from; `Send + 'static` lets the worker pipeline move records across
/// tasks.
///
/// # Example
///
/// ```rust
/// use rowbind::{AssignError, CellValue, FieldSpec, FromCell, Record};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     age: i8,
///     nickname: Option<String>,
/// }
///
/// impl Record for Person {
///     fn fields() -> &'static [FieldSpec] {
///         const FIELDS: &[FieldSpec] = &[
///             FieldSpec::new("name", "name", "String").required(),
///             FieldSpec::new("age", "age", "i8").required(),
///             FieldSpec::new("nickname", "nickname", "String"),
///         ];
///         FIELDS
///     }
///
///     fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError> {
///         let got = value.type_name();
///         let mismatch = move || AssignError { index, got };
///         match index {
///             0 => self.name = FromCell::from_cell(value).ok_or_else(mismatch)?,
///             1 => self.age = FromCell::from_cell(value).ok_or_else(mismatch)?,
///             2 => self.nickname = FromCell::from_cell(value).ok_or_else(mismatch)?,
///             _ => return Err(mismatch()),
///         }
///         Ok(())
///     }
///
///     fn get(&self, index: usize) -> Option<CellValue> {
///         match index {
///             0 => Some(CellValue::Str(self.name.clone())),
///             1 => Some(CellValue::I8(self.age)),
///             2 => Some(CellValue::Str(self.nickname.clone().unwrap_or_default())),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record: Default + Send + 'static {
    /// The annotation table, one entry per field, in field order
    fn fields() -> &'static [FieldSpec];

    /// Store a parsed value into the field at `index`
    fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError>;

    /// Read the field at `index` back out (write path)
    fn get(&self, index: usize) -> Option<CellValue>;
}
