//! Example: polling a condition until it holds

use std::future::ready;
use std::time::{Duration, Instant};

use tarry::task;
use tarry::time::sleep;
use tarry::tools::wait_for;

#[tarry::main]
async fn main() {
    let start = Instant::now();
    let ready_at = start + Duration::from_millis(120);

    task::spawn(async {
        sleep(Duration::from_millis(120)).await;
        println!("service is up");
    });

    let result = wait_for(|| {
        ready(if Instant::now() >= ready_at {
            Ok(())
        } else {
            Err("service not ready")
        })
    })
    .await;

    println!(
        "waited {}ms: {result:?}",
        start.elapsed().as_millis()
    );

    // Nothing to report but the deadline.
    let result = wait_for(|| ready(Err::<(), _>(())))
        .timeout(Duration::from_millis(100))
        .await;

    println!("{result:?}");
}
