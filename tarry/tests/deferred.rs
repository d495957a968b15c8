use std::thread;
use std::time::Duration;

use tarry::sync::{Deferred, deferred};
use tarry::task;
use tarry::time::sleep;

#[tarry::test]
async fn resolves_with_unit_by_default() {
    let d: Deferred = deferred();
    let resolve = d.resolve.clone();

    task::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        resolve.resolve(());
    });

    assert_eq!(d.promise.await, Ok(()));
}

#[tarry::test]
async fn resolves_with_value() {
    let Deferred { promise, resolve, .. } = deferred::<u32, String>();

    task::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        resolve.resolve(2);
    });

    assert_eq!(promise.await, Ok(2));
}

#[tarry::test]
async fn rejects_with_reason() {
    let Deferred { promise, reject, .. } = deferred::<u32, &str>();

    task::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        reject.reject("FAILED!");
    });

    assert_eq!(promise.await, Err("FAILED!"));
}

#[tarry::test]
async fn only_first_settlement_counts() {
    let Deferred {
        promise,
        resolve,
        reject,
    } = deferred::<u32, &str>();

    assert!(resolve.resolve(1));
    assert!(!reject.reject("late"));
    assert!(!resolve.resolve(2));
    assert!(reject.is_settled());

    assert_eq!(promise.await, Ok(1));
}

#[tarry::test]
async fn adopts_another_future() {
    let Deferred { promise, resolve, .. } = deferred::<&str, ()>();

    assert!(resolve.resolve_with(async {
        sleep(Duration::from_millis(20)).await;
        Ok("adopted")
    }));
    assert!(!resolve.resolve("ignored"));

    assert_eq!(promise.await, Ok("adopted"));
}

#[tarry::test]
async fn adopts_another_promise() {
    let outer = deferred::<u8, &str>();
    let inner = deferred::<u8, &str>();

    outer.resolve.resolve_with(inner.promise);
    inner.reject.reject("inner failed");

    assert_eq!(outer.promise.await, Err("inner failed"));
}

#[tarry::test]
async fn settles_from_another_thread() {
    let Deferred { promise, resolve, .. } = deferred::<u32, String>();

    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        resolve.resolve(7)
    });

    assert_eq!(promise.await, Ok(7));
    assert!(worker.join().unwrap());
}
