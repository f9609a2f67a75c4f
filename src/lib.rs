//! # redis-compat
//!
//! Reply and error normalization between a native Redis client and a
//! data-access layer. No protocol work happens here: the client decodes
//! replies and owns connections, this crate reshapes what it produces.
//!
//! ## Quick Example
//!
//! ```
//! use redis_compat::prelude::*;
//!
//! assert!(is_status_ok(Some("OK")));
//! assert_eq!(convert_code_reply(Some(1)), Some(true));
//!
//! let params = SortParameters::new().order(Order::Desc);
//! let native = convert_sort_params(Some(&params)).unwrap().unwrap();
//! assert_eq!(native.params(), &[b"DESC".to_vec()]);
//!
//! let err = into_data_access(NativeError::Connection("reset by peer".into()));
//! assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
//! ```
//!
//! ## Error taxonomy
//!
//! | Native category | Kind                | Message                         |
//! |-----------------|---------------------|---------------------------------|
//! | `Data`          | `DataAccess`        | original                        |
//! | `Connection`    | `ConnectionFailure` | original                        |
//! | `UnknownHost`   | `ConnectionFailure` | `Unknown host: <original>`      |
//! | `Io`            | `ConnectionFailure` | `Could not connect to server`   |
//! | `PoolTimeout`   | `ConnectionFailure` | raised, never returned          |
//! | `Foreign`       | not handled         | handed back to the caller       |
//! | `Client`        | `DataAccess`        | original                        |

pub mod config;
pub mod convert;
pub mod error;
pub mod info;
pub mod native;
pub mod pubsub;
pub mod types;
pub mod value;

pub use config::CompatConfig;
pub use convert::Converter;
pub use error::{DataAccessError, DataAccessResult, ErrorKind, NativeError, Translation};
pub use value::Value;

pub mod prelude {
    pub use crate::config::{CompatConfig, PositionCheck, StringEncoding};
    pub use crate::convert::*;
    pub use crate::error::{
        DataAccessError, DataAccessResult, ErrorKind, NativeError, Translation, into_data_access,
        translate,
    };
    pub use crate::info::{parse_info, read_info};
    pub use crate::native::{BinaryPubSub, ListPosition, NativeTuple, SortingParams};
    pub use crate::pubsub::{Message, MessageListener, PubSubAdapter, adapt_pubsub};
    pub use crate::types::*;
    pub use crate::value::Value;
}
