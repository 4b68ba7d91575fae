//! Member value encoding
//!
//! Scalars render through their natural string form. One-dimensional
//! numeric sequences render as each element followed by a comma, so
//! `[1, 2]` becomes `1,2,` and an empty sequence becomes the empty string.
//! Every other shape is rejected.

use crate::error::*;
use crate::reflect::MemberDescriptor;
use crate::types::*;
use std::fmt::Write as _;

/// Encode one member of `owner`. `Ok(None)` is the null marker: no owner,
/// an absent value, or a write-only member.
pub fn encode_member<T>(member: &MemberDescriptor<T>, owner: Option<&T>) -> Result<Option<String>> {
    check_declared_shape(member.name, &member.declared)?;

    let Some(owner) = owner else {
        return Ok(None);
    };
    let Some(value) = member.read(owner) else {
        return Ok(None);
    };
    encode_value(member.name, &value)
}

/// Encode a value read from the member named `member`
pub fn encode_value(member: &str, value: &MemberValue) -> Result<Option<String>> {
    match value {
        MemberValue::Null => Ok(None),
        MemberValue::Scalar(s) => Ok(Some(s.to_string())),
        MemberValue::Seq(items) => encode_sequence(member, items).map(Some),
    }
}

/// Encode a one-dimensional numeric sequence with a trailing comma per element
pub fn encode_sequence(member: &str, items: &[MemberValue]) -> Result<String> {
    let mut buf = String::new();
    for item in items {
        match item {
            MemberValue::Scalar(s) if s.scalar_type().is_numeric() => {
                let _ = write!(buf, "{},", s);
            }
            MemberValue::Scalar(s) => {
                return Err(FlatError::shape(
                    member,
                    format!("sequence element of type {} is not numeric", s.scalar_type()),
                ));
            }
            MemberValue::Seq(_) => {
                return Err(FlatError::shape(member, "multi-dimensional sequence"));
            }
            MemberValue::Null => {
                return Err(FlatError::shape(member, "sequence contains an absent element"));
            }
        }
    }
    Ok(buf)
}

fn check_declared_shape(member: &str, declared: &TypeTag) -> Result<()> {
    match declared {
        TypeTag::Scalar(_) => Ok(()),
        TypeTag::Optional(inner) => check_declared_shape(member, inner),
        TypeTag::Sequence(inner) => match inner.as_ref() {
            TypeTag::Scalar(s) if s.is_numeric() => Ok(()),
            TypeTag::Scalar(s) => Err(FlatError::shape(
                member,
                format!("sequence of {} is not numeric", s),
            )),
            TypeTag::Sequence(_) => Err(FlatError::shape(member, "multi-dimensional sequence")),
            TypeTag::Optional(_) => Err(FlatError::shape(member, "sequence of optional elements")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::reflect::{Reflect, TypeDescriptor};

    struct Sample {
        counts: Vec<i32>,
        ratios: [f32; 2],
        names: Vec<String>,
        grid: Vec<Vec<i32>>,
        note: Option<String>,
    }

    impl Reflect for Sample {
        fn describe() -> TypeDescriptor<Self> {
            TypeDescriptor::new("Sample")
                .member(field!(Sample, counts: Vec<i32>))
                .member(field!(Sample, ratios: [f32; 2]))
                .member(field!(Sample, names: Vec<String>))
                .member(field!(Sample, grid: Vec<Vec<i32>>))
                .member(field!(Sample, note: Option<String>))
        }
    }

    fn sample() -> Sample {
        Sample {
            counts: vec![1, 2],
            ratios: [0.5, 1.5],
            names: Vec::new(),
            grid: vec![vec![1]],
            note: None,
        }
    }

    fn encode(name: &str, owner: Option<&Sample>) -> Result<Option<String>> {
        let desc = Sample::describe();
        let member = desc.field(name).unwrap();
        encode_member(member, owner)
    }

    #[test]
    fn test_sequence_trailing_comma() {
        let s = sample();
        assert_eq!(encode("counts", Some(&s)).unwrap(), Some("1,2,".to_string()));
        assert_eq!(encode("ratios", Some(&s)).unwrap(), Some("0.5,1.5,".to_string()));
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(encode_sequence("xs", &[]).unwrap(), "");
    }

    #[test]
    fn test_non_numeric_sequence_rejected_even_when_empty() {
        let s = sample();
        let err = encode("names", Some(&s)).unwrap_err();
        assert!(matches!(err, FlatError::UnsupportedValueShape { ref member, .. } if member == "names"));
    }

    #[test]
    fn test_multi_dimensional_rejected() {
        let s = sample();
        assert!(matches!(
            encode("grid", Some(&s)),
            Err(FlatError::UnsupportedValueShape { .. })
        ));
    }

    #[test]
    fn test_null_markers() {
        let s = sample();
        assert_eq!(encode("note", Some(&s)).unwrap(), None);
        assert_eq!(encode("counts", None).unwrap(), None);
    }

    #[test]
    fn test_scalar_natural_form() {
        assert_eq!(
            encode_value("c", &MemberValue::Scalar(Scalar::Char('z'))).unwrap(),
            Some("z".to_string())
        );
        assert_eq!(
            encode_value("d", &MemberValue::Scalar(Scalar::Double(-2.25))).unwrap(),
            Some("-2.25".to_string())
        );
    }

    #[test]
    fn test_char_elements_rejected() {
        let items = vec![MemberValue::Scalar(Scalar::Char('a'))];
        assert!(encode_sequence("letters", &items).is_err());
    }
}
