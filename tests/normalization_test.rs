use std::error::Error;
use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use redis_compat::prelude::*;

fn load(result: DataAccessResult<Translation>) -> DataAccessError {
    match result {
        Ok(Translation::Converted(err)) => err,
        other => panic!("unexpected translation: {:?}", other),
    }
}

#[test]
fn test_error_taxonomy_end_to_end() {
    let cases = vec![
        (NativeError::Data("ERR syntax error".into()), ErrorKind::DataAccess, "ERR syntax error"),
        (NativeError::Connection("Broken pipe".into()), ErrorKind::ConnectionFailure, "Broken pipe"),
        (
            NativeError::UnknownHost(io::Error::other("cache.local")),
            ErrorKind::ConnectionFailure,
            "Unknown host: cache.local",
        ),
        (
            NativeError::Io(io::Error::new(io::ErrorKind::TimedOut, "read timed out")),
            ErrorKind::ConnectionFailure,
            "Could not connect to server",
        ),
        (NativeError::Client("unknown".into()), ErrorKind::DataAccess, "unknown"),
    ];

    for (native, kind, message) in cases {
        let err = load(translate(native));
        assert_eq!(err.kind(), kind);
        assert_eq!(err.message(), message);
        assert!(err.source().is_some(), "cause dropped for {}", message);
    }
}

#[test]
fn test_pool_timeout_propagates_with_question_mark() {
    fn checkout() -> DataAccessResult<&'static str> {
        translate(NativeError::PoolTimeout("no idle connections".into()))?;
        Ok("unreachable")
    }

    let err = checkout().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
}

#[test]
fn test_hash_reply_roundtrip_through_map() {
    let fields = decode_strings(&[b"name".to_vec(), b"lang".to_vec()]);
    let values = decode_strings(&[b"ferris".to_vec(), b"rust".to_vec()]);
    let map = zip_to_map(&fields, &values).unwrap();

    let flat = flatten_pairs(
        map.iter()
            .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec())),
    );
    assert_eq!(flat.len(), 2 * map.len());
    assert_eq!(decode_strings(&flat), arrange(&fields, &values).unwrap());
}

#[test]
fn test_zset_reply_to_scored_members() {
    let reply = Value::Array(vec![
        Value::Bulk(b"carol".to_vec()),
        Value::Bulk(b"12".to_vec()),
        Value::Bulk(b"alice".to_vec()),
        Value::Bulk(b"3.25".to_vec()),
    ]);
    let members = convert_tuples(tuples_from_reply(reply).unwrap());
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].member(), b"carol");
    assert_eq!(members[0].score(), 12.0);
    assert_eq!(members[1].member(), b"alice");
    assert_eq!(members[1].score(), 3.25);
}

#[test]
fn test_info_block_to_json() {
    let text = "# Memory\r\nused_memory:1024\r\nused_memory_human:1.00K\r\n";
    let props = parse_info(text).unwrap();
    assert_eq!(
        serde_json::to_string(&props).unwrap(),
        r#"{"used_memory":"1024","used_memory_human":"1.00K"}"#
    );
}

#[test]
fn test_pubsub_bridge_through_native_trait() {
    struct Collect(Mutex<Vec<String>>);

    impl MessageListener for Collect {
        fn on_message(&self, message: &Message, pattern: Option<&[u8]>) {
            let tag = pattern.map(|p| String::from_utf8_lossy(p).into_owned());
            self.0
                .lock()
                .unwrap()
                .push(format!("{:?}:{}", tag, message));
        }
    }

    let listener = Arc::new(Collect(Mutex::new(Vec::new())));
    let native: Box<dyn BinaryPubSub> = Box::new(adapt_pubsub(listener.clone()));
    native.on_message(b"ch", b"one");
    native.on_pmessage(b"c*", b"ch", b"two");

    assert_eq!(
        *listener.0.lock().unwrap(),
        vec!["None:one".to_string(), "Some(\"c*\"):two".to_string()]
    );
}

#[test]
fn test_wire_arguments() {
    assert_eq!(as_bit(true), ONE);
    assert_eq!(as_bit(false), ZERO);
    assert_eq!(
        bxpop_args(5, &["a", "b"]),
        vec![b"a".to_vec(), b"b".to_vec(), b"5".to_vec()]
    );
}

#[test]
fn test_linsert_keyword_from_position() {
    let converter = Converter::default();
    let native = converter.convert_position(Some(Position::After)).unwrap();
    assert_eq!(native.as_bytes(), b"AFTER");
}

#[test]
fn test_exec_reply_statuses() {
    let exec = Value::Array(vec![
        Value::Bulk(b"+OK".to_vec()),
        Value::Integer(1),
        Value::Status("OK".into()),
    ]);
    let Value::Array(items) = exec else {
        unreachable!()
    };
    let oks: Vec<bool> = items
        .iter()
        .map(|item| is_status_ok(status_from_reply(item)))
        .collect();
    assert_eq!(oks, vec![true, false, true]);
}
