//! Reply values as handed over by the native client's reply decoder.

/// A decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value (key doesn't exist, etc.)
    Null,
    /// Simple string (status replies like "OK")
    Status(String),
    /// Bulk string (actual data)
    Bulk(Vec<u8>),
    /// Integer
    Integer(i64),
    /// Double (RESP3)
    Double(f64),
    /// Array of values
    Array(Vec<Value>),
    /// Error from Redis
    Error(String),
}

impl Value {
    /// Status text of a reply.
    ///
    /// Inside a multi-bulk reply (`EXEC`, pipelines) statuses arrive as bulk
    /// strings, possibly still carrying the `+` marker.
    pub fn as_status(&self) -> Option<&str> {
        match self {
            Value::Status(s) => Some(s),
            Value::Bulk(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Try to get as bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bulk(b) => Some(b),
            Value::Status(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a float, accepting the bulk-string form used by RESP2
    /// for scores.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            Value::Bulk(b) => std::str::from_utf8(b).ok()?.parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_simple_and_bulk_string() {
        assert_eq!(Value::Status("OK".into()).as_status(), Some("OK"));
        assert_eq!(Value::Bulk(b"+OK".to_vec()).as_status(), Some("+OK"));
        assert_eq!(Value::Bulk(vec![0xff, 0xfe]).as_status(), None);
        assert_eq!(Value::Integer(1).as_status(), None);
    }

    #[test]
    fn test_score_from_bulk() {
        assert_eq!(Value::Bulk(b"1.5".to_vec()).as_f64(), Some(1.5));
        assert_eq!(Value::Bulk(b"-inf".to_vec()).as_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(Value::Bulk(b"abc".to_vec()).as_f64(), None);
        assert_eq!(Value::Double(2.0).as_f64(), Some(2.0));
    }
}
