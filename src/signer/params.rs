//! Query parameter values and the parameter map fed to the signers.

use super::error::SignerError;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single query parameter value.
///
/// `Absent` marks a parameter that must not be sent at all. It is distinct
/// from an empty string, which is sent as `name=`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Absent,
}

impl QueryValue {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// String form of a present value, `None` for `Absent`.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            other => Some(other.to_string()),
        }
    }

    /// Convert a JSON value, rejecting arrays and objects.
    pub fn from_json(name: &str, value: &serde_json::Value) -> Result<Self, SignerError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Absent),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::String(s) => Ok(Self::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(SignerError::invalid_parameter(name, "unrepresentable number"))
                }
            }
            Value::Array(_) => Err(SignerError::invalid_parameter(
                name,
                "arrays are not valid query values",
            )),
            Value::Object(_) => Err(SignerError::invalid_parameter(
                name,
                "objects are not valid query values",
            )),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write_float(f, *x),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Absent => Ok(()),
        }
    }
}

/// Number-to-string the way JavaScript does it: shortest round-trip digits,
/// integral values without a fraction, exponent form outside `[1e-6, 1e21)`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if x == 0.0 {
        // Covers -0.0 too.
        return f.write_str("0");
    }

    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{x}");
    }

    let exponential = format!("{x:e}");
    match exponential.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&exponential),
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl Serialize for QueryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::UInt(u) => serializer.serialize_u64(*u),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

/// Parameter map with unique, case-sensitive names.
///
/// Keeps insertion order so that order-sensitive signers can reproduce it.
/// Re-inserting an existing name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, name: &str) -> Option<QueryValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, including absent ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Entries in insertion order with absent values skipped.
    pub fn present(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.iter().filter(|(_, value)| !value.is_absent())
    }

    /// Build from a JSON object, keeping document order.
    pub fn from_json_object(
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, SignerError> {
        let mut params = Self::new();
        for (name, value) in object {
            params.try_insert_json(name, value)?;
        }
        Ok(params)
    }

    fn try_insert_json(&mut self, name: &str, value: &serde_json::Value) -> Result<(), SignerError> {
        if name.is_empty() {
            return Err(SignerError::invalid_parameter(name, "parameter name is empty"));
        }
        let value = QueryValue::from_json(name, value)?;
        self.insert(name, value);
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// Visits the map directly so document order survives; `serde_json::Map`
// would sort keys without the `preserve_order` feature.
impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = QueryParams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar or null query parameter values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<QueryParams, A::Error> {
                let mut params = QueryParams::new();
                while let Some((name, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    params
                        .try_insert_json(&name, &value)
                        .map_err(de::Error::custom)?;
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_replaces_existing_name_in_place() {
        let mut params = QueryParams::new().with("b", "1").with("a", "2");
        params.insert("b", "3");

        let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(params.get("b"), Some(&QueryValue::Str("3".to_string())));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn remove_drops_name_and_keeps_order() {
        let mut params = QueryParams::new().with("c", "1").with("b", "2").with("a", "3");

        assert_eq!(params.remove("b"), Some(QueryValue::Str("2".to_string())));
        assert_eq!(params.remove("b"), None);

        let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let params = QueryParams::new().with("Host", "a").with("host", "b");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn option_none_becomes_absent() {
        let params = QueryParams::new()
            .with("token", None::<String>)
            .with("date", Some("20240101T000000Z"));

        assert_eq!(params.get("token"), Some(&QueryValue::Absent));
        assert_eq!(params.present().count(), 1);
    }

    #[test]
    fn scalar_rendering() {
        assert_eq!(QueryValue::from("x y").render().as_deref(), Some("x y"));
        assert_eq!(QueryValue::Int(-7).render().as_deref(), Some("-7"));
        assert_eq!(QueryValue::UInt(u64::MAX).render().as_deref(), Some("18446744073709551615"));
        assert_eq!(QueryValue::Float(3.0).render().as_deref(), Some("3"));
        assert_eq!(QueryValue::Float(0.25).render().as_deref(), Some("0.25"));
        assert_eq!(QueryValue::Bool(true).render().as_deref(), Some("true"));
        assert_eq!(QueryValue::Absent.render(), None);
        assert_eq!(QueryValue::from("").render().as_deref(), Some(""));
    }

    #[test]
    fn float_rendering_switches_to_exponent_at_the_extremes() {
        let render = |x: f64| QueryValue::Float(x).to_string();

        assert_eq!(render(1e20), "100000000000000000000");
        assert_eq!(render(1e21), "1e+21");
        assert_eq!(render(-1.5e22), "-1.5e+22");
        assert_eq!(render(0.000001), "0.000001");
        assert_eq!(render(1e-7), "1e-7");
        assert_eq!(render(-2.5e-9), "-2.5e-9");
        assert_eq!(render(-0.0), "0");
        assert_eq!(render(f64::NAN), "NaN");
        assert_eq!(render(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn deserialize_keeps_document_order_and_nulls() {
        let raw = r#"{"X-Amz-Signature":"abc","X-Amz-Algorithm":"AWS4-HMAC-SHA256","X-Amz-Security-Token":null,"X-Amz-Expires":299}"#;
        let params: QueryParams = serde_json::from_str(raw).unwrap();

        let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "X-Amz-Signature",
                "X-Amz-Algorithm",
                "X-Amz-Security-Token",
                "X-Amz-Expires"
            ]
        );
        assert_eq!(params.get("X-Amz-Security-Token"), Some(&QueryValue::Absent));
        assert_eq!(params.get("X-Amz-Expires"), Some(&QueryValue::Int(299)));
    }

    #[test]
    fn deserialize_rejects_nested_values() {
        let err = serde_json::from_str::<QueryParams>(r#"{"a":[1,2]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid query parameter 'a'"));

        let err = serde_json::from_str::<QueryParams>(r#"{"a":{"b":1}}"#).unwrap_err();
        assert!(err.to_string().contains("objects are not valid"));
    }

    #[test]
    fn from_json_object_rejects_empty_name() {
        let value = json!({ "": "x" });
        let object = value.as_object().unwrap();
        let err = QueryParams::from_json_object(object).unwrap_err();
        assert!(matches!(err, SignerError::InvalidParameter { .. }));
    }

    #[test]
    fn serialize_writes_absent_as_null() {
        let params = QueryParams::new().with("a", "1").with("b", QueryValue::Absent);
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"a": "1", "b": null}));
    }
}
