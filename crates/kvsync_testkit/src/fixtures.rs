//! Test fixtures for sources and executors.

use crate::consul::FakeConsul;
use kvsync_engine::{HttpStore, LoopbackClient, Source, SyncConfig, SyncExecutor, Value};
use std::sync::Arc;
use std::time::Duration;

/// An executor wired to a [`FakeConsul`] through the loopback client.
pub type FakeExecutor = SyncExecutor<HttpStore<LoopbackClient<Arc<FakeConsul>>>>;

/// Creates an executor against `consul` with no inter-batch delay.
pub fn fake_executor(consul: Arc<FakeConsul>) -> FakeExecutor {
    fake_executor_with(SyncConfig::default().with_batch_delay(Duration::ZERO), consul)
}

/// Creates an executor against `consul` with the given configuration.
pub fn fake_executor_with(config: SyncConfig, consul: Arc<FakeConsul>) -> FakeExecutor {
    let store = HttpStore::new(&config, LoopbackClient::new(consul));
    SyncExecutor::new(config, store)
}

/// Creates a source with flat top-level text values.
pub fn flat_source(id: &str, pairs: &[(&str, &str)]) -> Source {
    Source::new(
        id,
        Value::map(pairs.iter().map(|(k, v)| (*k, Value::from(*v)))),
    )
}

/// Creates a source with `n` integer leaves under `prefix`.
///
/// Leaf keys are zero-padded so path order matches numeric order.
pub fn wide_source(id: &str, prefix: &str, n: usize) -> Source {
    let leaves = (0..n).map(|i| (format!("k{:04}", i), Value::Integer(i as i64)));
    Source::new(id, Value::map([(prefix, Value::map(leaves))]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvsync_engine::flatten;

    #[test]
    fn wide_source_paths_sort_numerically() {
        let source = wide_source("w.yaml", "w", 12);
        let mut entries = flatten(&source.root);
        entries.sort();
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].path, "w/k0000");
        assert_eq!(entries[11].path, "w/k0011");
        assert_eq!(entries[11].value, "11");
    }

    #[test]
    fn flat_source_values() {
        let source = flat_source("f.yaml", &[("a", "1"), ("b", "2")]);
        assert_eq!(flatten(&source.root).len(), 2);
    }
}
