use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use kvport_adapter::{register, AdapterError, Ports, StorageAdapter};
use kvport_protocol::EnvelopeCodec;
use kvport_store::KeyValueStore;

/// Counters reported when the input stream ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub handled: usize,
    pub responses: usize,
    pub rejected: usize,
}

/// Read envelopes from `input` one line at a time, dispatch each to the
/// storage ports, and write any responses to `output` as they are produced.
///
/// A line that fails to decode, names an unknown port, or carries a payload of
/// the wrong shape is logged and skipped. Store failures, a closed outbound
/// port, and I/O errors on `input` or `output` end the loop with an error.
pub fn serve<S, R, W>(adapter: Arc<StorageAdapter<S>>, input: R, mut output: W) -> anyhow::Result<ServeStats>
where
    S: KeyValueStore + 'static,
    R: BufRead,
    W: Write,
{
    let (mut ports, mut responses) = Ports::channel();
    register(&mut ports, adapter);

    let mut stats = ServeStats::default();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("reading port input")?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = EnvelopeCodec::decode(&line)
            .map_err(AdapterError::from)
            .and_then(|envelope| ports.dispatch_envelope(envelope));
        match outcome {
            Ok(()) => stats.handled += 1,
            Err(AdapterError::Protocol(e)) => {
                warn!(line = lineno + 1, error = %e, "rejected port message");
                stats.rejected += 1;
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("port message on line {}", lineno + 1)));
            }
        }

        while let Ok(envelope) = responses.try_recv() {
            output.write_all(EnvelopeCodec::encode(&envelope)?.as_bytes())?;
            stats.responses += 1;
        }
        output.flush()?;
    }

    info!(handled = stats.handled, responses = stats.responses, rejected = stats.rejected, "port input closed");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvport_protocol::{Envelope, PortResponse};
    use kvport_store::{InMemoryStore, StoreError};
    use serde_json::{json, Value};
    use std::io::Cursor;

    fn run(input: &str) -> (ServeStats, Vec<Envelope>, Arc<StorageAdapter<InMemoryStore>>) {
        let adapter = Arc::new(StorageAdapter::new(InMemoryStore::new()));
        let mut out = Vec::new();
        let stats = serve(Arc::clone(&adapter), Cursor::new(input.to_string()), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let envelopes = text
            .lines()
            .map(|l| EnvelopeCodec::decode(l).unwrap())
            .collect();
        (stats, envelopes, adapter)
    }

    #[test]
    fn get_after_set_answers() {
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["k",{"a":[1,2]}]}"#, "\n",
            r#"{"port":"storageGetItem","payload":"k"}"#, "\n",
        );
        let (stats, out, _) = run(input);
        assert_eq!(stats, ServeStats { handled: 2, responses: 1, rejected: 0 });
        let resp = PortResponse::from_envelope(out[0].clone()).unwrap();
        assert_eq!(resp, PortResponse::GetItem { key: "k".into(), value: json!({"a": [1, 2]}) });
    }

    #[test]
    fn set_scenario_over_the_wire() {
        let input = concat!(
            r#"{"port":"storagePushToSet","payload":["s","one"]}"#, "\n",
            r#"{"port":"storagePushToSet","payload":["s","two"]}"#, "\n",
            r#"{"port":"storagePushToSet","payload":["s","two"]}"#, "\n",
            r#"{"port":"storagePushToSet","payload":["s","three"]}"#, "\n",
            r#"{"port":"storageRemoveFromSet","payload":["s","one"]}"#, "\n",
            r#"{"port":"storageGetItem","payload":"s"}"#, "\n",
        );
        let (stats, out, _) = run(input);
        assert_eq!(stats.handled, 6);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload, json!(["s", ["two", "three"]]));
    }

    #[test]
    fn bad_lines_are_skipped() {
        let input = concat!(
            "not json\n",
            "\n",
            r#"{"port":"storageNope","payload":1}"#, "\n",
            r#"{"port":"storageSetItem","payload":"missing-value"}"#, "\n",
            r#"{"port":"storageGetItem","payload":"k"}"#, "\n",
        );
        let (stats, out, _) = run(input);
        assert_eq!(stats, ServeStats { handled: 1, responses: 1, rejected: 3 });
        assert_eq!(out[0].payload, json!(["k", Value::Null]));
    }

    #[test]
    fn store_failure_ends_the_loop() {
        let adapter = Arc::new(StorageAdapter::new(InMemoryStore::with_quota(8)));
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["k","ok"]}"#, "\n",
            r#"{"port":"storageSetItem","payload":["big","far too long"]}"#, "\n",
            r#"{"port":"storageGetItem","payload":"k"}"#, "\n",
        );
        let mut out = Vec::new();
        let err = serve(Arc::clone(&adapter), Cursor::new(input.to_string()), &mut out).unwrap_err();

        assert!(err.to_string().contains("line 2"));
        let cause = err.downcast_ref::<AdapterError>().unwrap();
        assert!(matches!(
            cause,
            AdapterError::Store(StoreError::QuotaExceeded { key, .. }) if key == "big"
        ));
        // Nothing after the failing line runs.
        assert!(out.is_empty());
        assert_eq!(adapter.store().get_item("big").unwrap(), None);
    }

    #[test]
    fn clear_and_remove_are_silent() {
        let input = concat!(
            r#"{"port":"storageSetItem","payload":["a",1]}"#, "\n",
            r#"{"port":"storageSetItem","payload":["b",2]}"#, "\n",
            r#"{"port":"storageRemoveItem","payload":"a"}"#, "\n",
            r#"{"port":"storageClear"}"#, "\n",
        );
        let (stats, out, adapter) = run(input);
        assert_eq!(stats.handled, 4);
        assert!(out.is_empty());
        assert!(adapter.store().is_empty().unwrap());
    }
}
