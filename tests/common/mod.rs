//! Scaffolding for traversal tests

use std::sync::{Arc, Mutex};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared log of which slots' effects ran, in the order they ran.
#[derive(Clone, Default)]
pub struct ExecLog(Arc<Mutex<Vec<usize>>>);

impl ExecLog {
    pub fn push(&self, slot: usize) {
        self.0.lock().unwrap().push(slot);
    }

    pub fn entries(&self) -> Vec<usize> {
        self.0.lock().unwrap().clone()
    }
}

/// Check that `map_async` over a record of `$len` slots runs one effect per
/// slot, in row order, even when every effect yields to the scheduler.
macro_rules! assert_row_order {
    ($name:ident, $len:expr) => {
        #[::tokio::test]
        async fn $name() {
            $crate::common::init_logging();
            let log = $crate::common::ExecLog::default();
            let record: ::anon_records::Canonical<usize> = (0..$len).collect();
            let out = record
                .map_async(|slot| {
                    let log = log.clone();
                    async move {
                        ::tokio::task::yield_now().await;
                        log.push(slot);
                        slot * 2
                    }
                })
                .await;
            assert_eq!(log.entries(), (0..$len).collect::<Vec<usize>>());
            assert_eq!(out.into_vec(), (0..$len).map(|i| i * 2).collect::<Vec<usize>>());
        }
    };
}

pub(crate) use assert_row_order;
