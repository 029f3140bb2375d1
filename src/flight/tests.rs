//! Flight Module Tests
//!
//! ## Test Scopes
//! - **Deduplication**: overlapping calls run once and share the result.
//! - **Lifecycle**: markers disappear after completion and after cancellation.

#[cfg(test)]
mod tests {
    use crate::error::CacheError;
    use crate::flight::FlightGroup;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_calls_execute_once() {
        // ARRANGE
        let group: Arc<FlightGroup<String>> = Arc::new(FlightGroup::new());
        let calls = Arc::new(AtomicUsize::new(0));

        // ACT: 10 overlapping calls for the same key
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let group = group.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    group
                        .run("Tom", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            "630".to_string()
                        })
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        // ASSERT
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r == "630"));
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_errors_are_shared_with_waiters() {
        let group: Arc<FlightGroup<Result<String, CacheError>>> = Arc::new(FlightGroup::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let group = group.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    group
                        .run("kkk", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Err(CacheError::Loader("kkk not exist".to_string()))
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result, Err(CacheError::Loader("kkk not exist".to_string())));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_calls_execute_each_time() {
        let group: FlightGroup<usize> = FlightGroup::new();
        let calls = AtomicUsize::new(0);

        for expected in 1..=3 {
            let value = group
                .run("key", || async { calls.fetch_add(1, Ordering::SeqCst) + 1 })
                .await;
            assert_eq!(value, expected);
        }
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_different_keys_run_in_parallel() {
        let group: Arc<FlightGroup<&'static str>> = Arc::new(FlightGroup::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = ["Tom", "Jack", "Sam"]
            .into_iter()
            .map(|key| {
                let group = group.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    group
                        .run(key, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            key
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancelled_executor_hands_over_to_waiter() {
        let group: Arc<FlightGroup<String>> = Arc::new(FlightGroup::new());

        // ARRANGE: an executor that never finishes on its own
        let executor = {
            let group = group.clone();
            tokio::spawn(async move {
                group
                    .run("key", || async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        "never".to_string()
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(group.in_flight(), 1);

        let waiter = {
            let group = group.clone();
            tokio::spawn(async move {
                group
                    .run("key", || async { "recovered".to_string() })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // ACT
        executor.abort();

        // ASSERT
        let value = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should not hang")
            .unwrap();
        assert_eq!(value, "recovered");
        assert_eq!(group.in_flight(), 0);
    }
}
