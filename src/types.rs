//! Core flatrec types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of scalar kinds the inferencer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// 32-bit signed integer
    Int,
    /// Single-precision float
    Float,
    /// Double-precision float
    Double,
    /// Single character
    Char,
    /// Opaque text
    Str,
}

impl ScalarType {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Char => "char",
            ScalarType::Str => "string",
        }
    }

    /// Whether a sequence of this element type can be encoded
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Int | ScalarType::Float | ScalarType::Double)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i32),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
}

impl Scalar {
    pub fn str(v: impl Into<String>) -> Self {
        Scalar::Str(v.into())
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Double(_) => ScalarType::Double,
            Scalar::Char(_) => ScalarType::Char,
            Scalar::Str(_) => ScalarType::Str,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Scalar::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Scalar::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(v) => Some(v),
            _ => None,
        }
    }
}

/// Natural string form: decimal digits for numbers, verbatim otherwise
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", v),
            Scalar::Char(v) => write!(f, "{}", v),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

/// Current value of a member as read through its getter
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    /// Absent value
    Null,
    /// Scalar leaf
    Scalar(Scalar),
    /// Ordered collection
    Seq(Vec<MemberValue>),
}

/// Declared type of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Scalar(ScalarType),
    Optional(Box<TypeTag>),
    Sequence(Box<TypeTag>),
}

impl TypeTag {
    /// The scalar type an inferred value must have to be assigned directly
    pub fn assignable_scalar(&self) -> Option<ScalarType> {
        match self {
            TypeTag::Scalar(s) => Some(*s),
            TypeTag::Optional(inner) => inner.assignable_scalar(),
            TypeTag::Sequence(_) => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Scalar(s) => write!(f, "{}", s),
            TypeTag::Optional(inner) => write!(f, "{}?", inner),
            TypeTag::Sequence(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// Field or property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
}

// ============================================================
// Records
// ============================================================

/// One serialized member: key plus its text, `None` being the null marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub key: String,
    pub text: Option<String>,
}

impl RecordEntry {
    pub fn new(key: impl Into<String>, text: Option<String>) -> Self {
        Self {
            key: key.into(),
            text,
        }
    }
}

/// Ordered, key-unique sequence of serialized members. Stored records are
/// folded through [`Record::insert`] on deserialize, so a repeated key keeps
/// its first position and its last text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<RecordEntry>", from = "Vec<RecordEntry>")]
pub struct Record {
    entries: Vec<RecordEntry>,
}

impl From<Vec<RecordEntry>> for Record {
    fn from(entries: Vec<RecordEntry>) -> Self {
        let mut record = Record::new();
        for entry in entries {
            record.insert(entry.key, entry.text);
        }
        record
    }
}

impl From<Record> for Vec<RecordEntry> {
    fn from(record: Record) -> Self {
        record.entries
    }
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An existing key keeps its position and takes the
    /// new text; returns `true` in that case.
    pub fn insert(&mut self, key: impl Into<String>, text: Option<String>) -> bool {
        let key = key.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.text = text;
            return true;
        }
        self.entries.push(RecordEntry::new(key, text));
        false
    }

    /// `None` if the key is missing, `Some(None)` for a null marker
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.text.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sort_by_key(&mut self) {
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));
    }
}

/// A `(key, value-text)` pair as scanned from wire text. The value keeps
/// any surrounding quotes the scanner matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPair {
    pub key: String,
    pub value: String,
}

impl RawPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A raw token paired with the scalar the inferencer assigned it
#[derive(Debug, Clone, PartialEq)]
pub struct InferredValue {
    /// Token text with delimiting quotes removed
    pub raw: String,
    pub value: Scalar,
}

impl InferredValue {
    pub fn new(raw: impl Into<String>, value: Scalar) -> Self {
        Self {
            raw: raw.into(),
            value,
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.value.scalar_type()
    }
}

/// Ordered type/value/name triple used to reconstruct an object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstructionPlan {
    pub signature: Vec<ScalarType>,
    pub values: Vec<InferredValue>,
    pub names: Vec<String>,
}

impl ConstructionPlan {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn scalars(&self) -> Vec<Scalar> {
        self.values.iter().map(|v| v.value.clone()).collect()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &InferredValue)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

/// Comma-separated rendering of a signature, used in error messages
pub fn signature_string(signature: &[ScalarType]) -> String {
    signature
        .iter()
        .map(ScalarType::name)
        .collect::<Vec<_>>()
        .join(", ")
}
