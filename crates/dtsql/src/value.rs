//! Bound parameter values.

use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};

/// A value bound to a placeholder.
///
/// Search patterns are always [`Value::Text`]; the other variants exist for
/// caller-supplied `where_result` / `where_all` fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// The text payload, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn encode<T: ToSql>(
    value: &T,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    if !T::accepts(ty) {
        return Err(Box::new(WrongType::new::<T>(ty.clone())));
    }
    value.to_sql(ty, out)
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Text(s) => encode(s, ty, out),
            Value::Bool(b) => encode(b, ty, out),
            // Postgres infers the parameter type from the column, so narrow to fit it.
            Value::Int(i) if *ty == Type::INT2 => encode(&i16::try_from(*i)?, ty, out),
            Value::Int(i) if *ty == Type::INT4 => encode(&i32::try_from(*i)?, ty, out),
            Value::Int(i) => encode(i, ty, out),
            Value::Float(f) if *ty == Type::FLOAT4 => encode(&(*f as f32), ty, out),
            Value::Float(f) => encode(f, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
            || <bool as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <f32 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
        assert_eq!(Value::from("%x%").as_str(), Some("%x%"));
    }

    #[test]
    fn int_narrows_to_column_type() {
        let mut buf = BytesMut::new();
        Value::Int(5).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &5_i32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql(&Type::INT2, &mut buf).is_err());
    }

    #[test]
    fn mismatched_type_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(Value::from("abc").to_sql(&Type::INT4, &mut buf).is_err());
        assert!(Value::Bool(true).to_sql(&Type::TEXT, &mut buf).is_err());
    }

    #[test]
    fn null_binds_to_anything() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            Value::Null.to_sql(&Type::INT8, &mut buf).unwrap(),
            IsNull::Yes
        ));
    }
}
