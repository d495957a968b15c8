//! Example: retrying a flaky operation with a delay and a deadline

use std::cell::Cell;
use std::time::{Duration, Instant};

use tarry::time::sleep;
use tarry::tools::retry;

#[tarry::main]
async fn main() {
    let start = Instant::now();
    let attempts = Cell::new(0);

    let result = retry(|| {
        attempts.set(attempts.get() + 1);
        let attempt = attempts.get();

        async move {
            println!("[{:>4}ms] attempt {attempt}", start.elapsed().as_millis());
            sleep(Duration::from_millis(20)).await;

            if attempt < 3 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok(attempt * 10)
            }
        }
    })
    .retries(5)
    .delay(Duration::from_millis(100))
    .timeout(Duration::from_secs(1))
    .await;

    println!("result: {result:?}");

    // The deadline cuts the session short and the last failure is reported.
    let result = retry(|| async {
        sleep(Duration::from_millis(75)).await;
        Err::<(), _>("backend unavailable")
    })
    .unbounded()
    .timeout(Duration::from_millis(200))
    .await;

    match result {
        Ok(()) => println!("unexpected success"),
        Err(err) => println!("gave up: {err}"),
    }
}
