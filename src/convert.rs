//! Conversions between native client replies/arguments and the canonical
//! data-access types.
//!
//! Everything here is a pure function; nothing is cached. Functions whose
//! behavior depends on [`CompatConfig`] live on [`Converter`].

use std::fmt;

use crate::config::{CompatConfig, PositionCheck, StringEncoding};
use crate::error::{DataAccessError, DataAccessResult, NativeError, into_data_access};
use crate::native::{self, ListPosition, NativeTuple, SortingParams};
use crate::types::{FieldValueMap, Order, Position, ScoredMember, SortParameters};
use crate::value::Value;

const OK_CODE: &str = "OK";
const OK_MULTI_CODE: &str = "+OK";

/// Wire form of `true`.
pub static ONE: &[u8] = b"1";
/// Wire form of `false`.
pub static ZERO: &[u8] = b"0";

/// Raised when a caller violates a shape contract (mismatched lengths,
/// out-of-range limits, odd-length score replies).
#[derive(Debug)]
pub struct BoundaryError(String);

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BoundaryError {}

fn boundary(message: String) -> DataAccessError {
    DataAccessError::invalid(message.clone(), BoundaryError(message))
}

/// True iff `status` is exactly `OK` or `+OK`.
pub fn is_status_ok(status: Option<&str>) -> bool {
    matches!(status, Some(OK_CODE) | Some(OK_MULTI_CODE))
}

/// Integer reply to boolean: `1` is true, anything else false.
pub fn convert_code_reply(code: Option<i64>) -> Option<bool> {
    code.map(|n| n == 1)
}

/// Status text of a reply: a simple string, or a UTF-8 bulk string as
/// found inside multi-bulk replies.
pub fn status_from_reply(reply: &Value) -> Option<&str> {
    reply.as_status()
}

/// Integer of a reply, if it is an integer reply.
pub fn code_from_reply(reply: &Value) -> Option<i64> {
    reply.as_int()
}

/// Native score/member pairs to scored members, keeping input order.
pub fn convert_tuples<I>(tuples: I) -> Vec<ScoredMember>
where
    I: IntoIterator<Item = NativeTuple>,
{
    tuples
        .into_iter()
        .map(|t| ScoredMember::new(t.element, t.score))
        .collect()
}

/// Decode a `WITHSCORES` reply.
///
/// Accepts the flat RESP2 layout (`member, score, member, score, ...`) and
/// the RESP3 layout of two-element arrays (`[member, score], ...`). An error
/// reply is translated like any other server data error.
pub fn tuples_from_reply(reply: Value) -> DataAccessResult<Vec<NativeTuple>> {
    if reply.is_null() {
        return Ok(Vec::new());
    }
    let items = match reply {
        Value::Array(items) => items,
        Value::Error(msg) => return Err(into_data_access(NativeError::Data(msg))),
        other => return Err(boundary(format!("Expected array reply, got {:?}", other))),
    };

    let nested = !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, Value::Array(pair) if pair.len() == 2));
    if nested {
        return items
            .into_iter()
            .map(|item| match item {
                Value::Array(pair) => {
                    let mut pair = pair.into_iter();
                    match (pair.next(), pair.next()) {
                        (Some(member), Some(score)) => tuple_from(member, score),
                        _ => Err(boundary("Score pair is incomplete".to_string())),
                    }
                }
                other => Err(boundary(format!("Invalid score pair: {:?}", other))),
            })
            .collect();
    }

    if items.len() % 2 != 0 {
        return Err(boundary(format!(
            "Score reply has odd length {}",
            items.len()
        )));
    }

    let mut tuples = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(member), Some(score)) = (iter.next(), iter.next()) {
        tuples.push(tuple_from(member, score)?);
    }
    Ok(tuples)
}

fn tuple_from(member: Value, score: Value) -> DataAccessResult<NativeTuple> {
    let score_value = score
        .as_f64()
        .ok_or_else(|| boundary(format!("Invalid score: {:?}", score)))?;
    let element = member
        .as_bytes()
        .ok_or_else(|| boundary(format!("Invalid member: {:?}", member)))?;
    Ok(NativeTuple::new(element, score_value))
}

/// Flatten a hash reply into `key, value, key, value, ...` in iteration
/// order.
pub fn flatten_pairs<I, K, V>(map: I) -> Vec<Vec<u8>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    let iter = map.into_iter();
    let mut result = Vec::with_capacity(iter.size_hint().0 * 2);
    for (key, value) in iter {
        result.push(key.into());
        result.push(value.into());
    }
    result
}

/// Zip field names with values positionally.
///
/// Iterates over `fields`; extra values are ignored, missing ones fail.
pub fn zip_to_map<F, V>(fields: &[F], values: &[V]) -> DataAccessResult<FieldValueMap>
where
    F: AsRef<str>,
    V: AsRef<str>,
{
    if values.len() < fields.len() {
        return Err(boundary(format!(
            "{} fields but only {} values",
            fields.len(),
            values.len()
        )));
    }

    let mut map = FieldValueMap::with_capacity(fields.len());
    for (field, value) in fields.iter().zip(values) {
        map.insert(field.as_ref(), value.as_ref());
    }
    Ok(map)
}

/// Interleave keys and values: `k0, v0, k1, v1, ...`.
pub fn arrange<K, V>(keys: &[K], values: &[V]) -> DataAccessResult<Vec<String>>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if values.len() < keys.len() {
        return Err(boundary(format!(
            "{} keys but only {} values",
            keys.len(),
            values.len()
        )));
    }

    let mut result = Vec::with_capacity(keys.len() * 2);
    for (key, value) in keys.iter().zip(values) {
        result.push(key.as_ref().to_string());
        result.push(value.as_ref().to_string());
    }
    Ok(result)
}

/// Build native `SORT` arguments. `None` in, `None` out.
pub fn convert_sort_params(
    params: Option<&SortParameters>,
) -> DataAccessResult<Option<SortingParams>> {
    let Some(params) = params else {
        return Ok(None);
    };

    let mut sorting = SortingParams::new();

    if let Some(ref by) = params.by_pattern {
        sorting.by(by);
    }

    if let Some(ref get) = params.get_patterns {
        sorting.get(get);
    }

    if let Some(limit) = params.limit {
        let start = narrow(limit.offset, "offset")?;
        let count = narrow(limit.count, "count")?;
        sorting.limit(start, count);
    }

    if params.order == Some(Order::Desc) {
        sorting.desc();
    }

    if params.alphabetic == Some(true) {
        sorting.alpha();
    }

    Ok(Some(sorting))
}

fn narrow(value: i64, what: &str) -> DataAccessResult<i32> {
    i32::try_from(value)
        .map_err(|_| boundary(format!("Sort limit {} {} does not fit in 32 bits", what, value)))
}

/// Wire byte for a boolean argument.
pub fn as_bit(value: bool) -> &'static [u8] {
    if value { ONE } else { ZERO }
}

/// Decode byte arrays as UTF-8, replacing invalid sequences.
pub fn decode_strings<B: AsRef<[u8]>>(raw: &[B]) -> Vec<String> {
    raw.iter()
        .map(|b| String::from_utf8_lossy(b.as_ref()).into_owned())
        .collect()
}

/// Arguments for `BLPOP`/`BRPOP`: the keys, then the timeout.
pub fn bxpop_args<K: AsRef<[u8]>>(timeout: i32, keys: &[K]) -> Vec<Vec<u8>> {
    let mut args: Vec<Vec<u8>> = Vec::with_capacity(keys.len() + 1);
    args.extend(keys.iter().map(|k| k.as_ref().to_vec()));
    args.push(native::to_byte_array(timeout.into()));
    args
}

/// Conversions whose behavior is chosen by configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: CompatConfig,
}

impl Converter {
    pub fn new(config: CompatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    /// Map a list position: `After` to `AFTER`, anything else to `BEFORE`.
    pub fn convert_position(&self, position: Option<Position>) -> DataAccessResult<ListPosition> {
        match (position, self.config.list_position_check) {
            (Some(Position::After), _) => Ok(ListPosition::After),
            (Some(Position::Before), _) | (None, PositionCheck::Lenient) => {
                Ok(ListPosition::Before)
            }
            (None, PositionCheck::Strict) => Err(boundary(
                "list positions are mandatory".to_string(),
            )),
        }
    }

    /// Decode byte arrays with the configured encoding.
    pub fn decode_strings<B: AsRef<[u8]>>(&self, raw: &[B]) -> DataAccessResult<Vec<String>> {
        match self.config.string_encoding {
            StringEncoding::Utf8Lossy => Ok(decode_strings(raw)),
            StringEncoding::Utf8 => raw
                .iter()
                .map(|b| {
                    String::from_utf8(b.as_ref().to_vec())
                        .map_err(|e| DataAccessError::invalid("Reply is not valid UTF-8", e))
                })
                .collect(),
            StringEncoding::Latin1 => Ok(raw
                .iter()
                .map(|b| b.as_ref().iter().map(|&c| char::from(c)).collect())
                .collect()),
        }
    }
}
