//! Shapes owned by the native client library.
//!
//! These mirror what the client exposes: its score/member pair, its `SORT`
//! argument builder, its list-position enum, its integer argument encoding
//! and its binary pub/sub callback set.

/// Score/member pair as returned by the client for sorted-set replies.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTuple {
    pub element: Vec<u8>,
    pub score: f64,
}

impl NativeTuple {
    pub fn new(element: impl Into<Vec<u8>>, score: f64) -> Self {
        Self {
            element: element.into(),
            score,
        }
    }
}

/// Argument builder for `SORT`.
///
/// Arguments are appended in call order, the way the client sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingParams {
    params: Vec<Vec<u8>>,
}

impl SortingParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// `BY pattern`
    pub fn by(&mut self, pattern: &[u8]) -> &mut Self {
        self.params.push(b"BY".to_vec());
        self.params.push(pattern.to_vec());
        self
    }

    /// `GET pattern` for each pattern.
    pub fn get<P: AsRef<[u8]>>(&mut self, patterns: &[P]) -> &mut Self {
        for pattern in patterns {
            self.params.push(b"GET".to_vec());
            self.params.push(pattern.as_ref().to_vec());
        }
        self
    }

    /// `LIMIT start count`
    pub fn limit(&mut self, start: i32, count: i32) -> &mut Self {
        self.params.push(b"LIMIT".to_vec());
        self.params.push(to_byte_array(start.into()));
        self.params.push(to_byte_array(count.into()));
        self
    }

    /// `DESC`
    pub fn desc(&mut self) -> &mut Self {
        self.params.push(b"DESC".to_vec());
        self
    }

    /// `ALPHA`
    pub fn alpha(&mut self) -> &mut Self {
        self.params.push(b"ALPHA".to_vec());
        self
    }

    /// Arguments accumulated so far.
    pub fn params(&self) -> &[Vec<u8>] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// `LINSERT` position keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    Before,
    After,
}

impl ListPosition {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            ListPosition::Before => b"BEFORE",
            ListPosition::After => b"AFTER",
        }
    }
}

/// Encode an integer command argument: its ASCII decimal form.
pub fn to_byte_array(value: i64) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Binary pub/sub callbacks invoked by the client's subscription loop.
pub trait BinaryPubSub {
    fn on_message(&self, channel: &[u8], message: &[u8]);

    fn on_pmessage(&self, pattern: &[u8], channel: &[u8], message: &[u8]);

    fn on_subscribe(&self, _channel: &[u8], _subscribed_channels: i64) {}

    fn on_unsubscribe(&self, _channel: &[u8], _subscribed_channels: i64) {}

    fn on_psubscribe(&self, _pattern: &[u8], _subscribed_channels: i64) {}

    fn on_punsubscribe(&self, _pattern: &[u8], _subscribed_channels: i64) {}
}
