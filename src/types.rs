use bson::Bson;
use std::fmt;

/// Coarse kind of a value, as seen by the matcher and the modifier planners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Undefined,
    Boolean,
    Number,
    String,
    Date,
    Regexp,
    Array,
    Object,
    Buffer,
    NaN,
    Other,
}

impl TypeTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Date => "date",
            Self::Regexp => "regexp",
            Self::Array => "array",
            Self::Object => "object",
            Self::Buffer => "buffer",
            Self::NaN => "nan",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a possibly-missing value. `None` and stored `Bson::Undefined`
/// (array holes) are both undefined.
#[must_use]
pub fn classify(value: Option<&Bson>) -> TypeTag {
    use bson::Bson as T;
    let Some(v) = value else {
        return TypeTag::Undefined;
    };
    match v {
        T::Undefined => TypeTag::Undefined,
        T::Null => TypeTag::Null,
        T::Boolean(_) => TypeTag::Boolean,
        T::Double(f) if f.is_nan() => TypeTag::NaN,
        T::Double(_) | T::Int32(_) | T::Int64(_) | T::Decimal128(_) => TypeTag::Number,
        T::String(_) => TypeTag::String,
        T::DateTime(_) | T::Timestamp(_) => TypeTag::Date,
        T::RegularExpression(_) => TypeTag::Regexp,
        T::Array(_) => TypeTag::Array,
        T::Document(_) => TypeTag::Object,
        T::Binary(_) => TypeTag::Buffer,
        _ => TypeTag::Other,
    }
}

/// Drops stored holes so that callers only see real values.
#[inline]
#[must_use]
pub fn defined(value: Option<&Bson>) -> Option<&Bson> {
    value.filter(|v| !matches!(v, Bson::Undefined))
}
