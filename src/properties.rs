//! Authored key/value properties and the coercions used to build typed
//! entities from them.

use crate::error::ObjectError;
use std::collections::HashMap;

/// Scalar value of one authored property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    fn describe(&self) -> String {
        match self {
            PropertyValue::Bool(v) => format!("bool {v}"),
            PropertyValue::Int(v) => format!("int {v}"),
            PropertyValue::Float(v) => format!("float {v}"),
            PropertyValue::String(v) => format!("string {v:?}"),
        }
    }
}

/// One property exactly as authored, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Type name declared by the editor (`bool`, `int`, `string`, ...), if any.
    pub declared_type: Option<String>,
    pub value: PropertyValue,
}

/// Name -> value lookup built from an authored property list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries with a repeated name replace earlier ones.
    pub fn from_list(list: &[Property]) -> Self {
        let mut out = Self::new();
        for p in list {
            out.insert(p.name.clone(), p.value.clone());
        }
        out
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bool(&self, name: &str) -> Result<bool, ObjectError> {
        coerce_bool(name, self.get(name))
    }

    pub fn string(&self, name: &str) -> Result<String, ObjectError> {
        coerce_string(name, self.get(name))
    }

    pub fn u8(&self, name: &str) -> Result<u8, ObjectError> {
        coerce_u8(name, self.get(name))
    }
}

/// Absent means `false`; anything but a bool is a mismatch.
pub fn coerce_bool(name: &str, value: Option<&PropertyValue>) -> Result<bool, ObjectError> {
    match value {
        None => Ok(false),
        Some(PropertyValue::Bool(b)) => Ok(*b),
        Some(_) => Err(ObjectError::TypeMismatch {
            property: name.to_owned(),
            expected: "bool",
        }),
    }
}

/// Absent means the empty string.
pub fn coerce_string(name: &str, value: Option<&PropertyValue>) -> Result<String, ObjectError> {
    match value {
        None => Ok(String::new()),
        Some(PropertyValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(ObjectError::TypeMismatch {
            property: name.to_owned(),
            expected: "string",
        }),
    }
}

/// Absent means `0`. Numbers and numeric strings are truncated toward zero;
/// anything outside `0..=255` or non-numeric fails.
pub fn coerce_u8(name: &str, value: Option<&PropertyValue>) -> Result<u8, ObjectError> {
    let fail = |v: &PropertyValue| ObjectError::TypeCoercion {
        property: name.to_owned(),
        value: v.describe(),
    };

    let Some(v) = value else {
        return Ok(0);
    };
    let number = match v {
        PropertyValue::Int(i) => *i as f64,
        PropertyValue::Float(f) => *f,
        PropertyValue::String(s) => match s.parse::<u8>() {
            Ok(n) => return Ok(n),
            Err(_) => s.parse::<f64>().map_err(|_| fail(v))?,
        },
        PropertyValue::Bool(_) => return Err(fail(v)),
    };

    let truncated = number.trunc();
    if truncated.is_finite() && (0.0..=u8::MAX as f64).contains(&truncated) {
        Ok(truncated as u8)
    } else {
        Err(fail(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, value: PropertyValue) -> Property {
        Property {
            name: name.to_owned(),
            declared_type: None,
            value,
        }
    }

    #[test]
    fn absent_values_take_defaults() {
        assert_eq!(coerce_u8("capacity", None).unwrap(), 0);
        assert!(!coerce_bool("is_spawn", None).unwrap());
        assert_eq!(coerce_string("captured_by", None).unwrap(), "");
    }

    #[test]
    fn u8_accepts_numbers_and_numeric_strings() {
        let s = PropertyValue::String("12".into());
        assert_eq!(coerce_u8("n", Some(&s)).unwrap(), 12);
        assert_eq!(coerce_u8("n", Some(&PropertyValue::Int(7))).unwrap(), 7);
        assert_eq!(coerce_u8("n", Some(&PropertyValue::Float(3.9))).unwrap(), 3);
        let frac = PropertyValue::String("4.5".into());
        assert_eq!(coerce_u8("n", Some(&frac)).unwrap(), 4);
    }

    #[test]
    fn u8_rejects_text_bools_and_out_of_range() {
        let abc = PropertyValue::String("abc".into());
        assert!(matches!(
            coerce_u8("n", Some(&abc)),
            Err(ObjectError::TypeCoercion { .. })
        ));
        assert!(coerce_u8("n", Some(&PropertyValue::Bool(true))).is_err());
        assert!(coerce_u8("n", Some(&PropertyValue::Int(256))).is_err());
        assert!(coerce_u8("n", Some(&PropertyValue::Int(-1))).is_err());
    }

    #[test]
    fn bool_rejects_other_types() {
        let err = coerce_bool("is_spawn", Some(&PropertyValue::String("true".into())));
        assert!(matches!(err, Err(ObjectError::TypeMismatch { expected: "bool", .. })));
    }

    #[test]
    fn duplicate_names_keep_last_value() {
        let props = Properties::from_list(&[
            prop("capacity", PropertyValue::Int(2)),
            prop("capacity", PropertyValue::Int(5)),
        ]);
        assert_eq!(props.len(), 1);
        assert_eq!(props.u8("capacity").unwrap(), 5);
    }
}
