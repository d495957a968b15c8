//! Example: settling a promise from a callback running on another thread

use std::thread;
use std::time::Duration;

use tarry::sync::{Deferred, deferred};
use tarry::time::timeout;

fn on_complete(callback: impl FnOnce(Result<u64, String>) + Send + 'static) {
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        callback(Ok(42));
    });
}

#[tarry::main]
async fn main() {
    let Deferred {
        promise,
        resolve,
        reject,
    } = deferred::<u64, String>();

    on_complete(move |result| {
        match result {
            Ok(value) => resolve.resolve(value),
            Err(reason) => reject.reject(reason),
        };
    });

    match timeout(Duration::from_secs(1), promise).await {
        Ok(Ok(value)) => println!("callback produced {value}"),
        Ok(Err(reason)) => println!("callback failed: {reason}"),
        Err(elapsed) => println!("{elapsed}"),
    }
}
