mod common;

use common::{Calls, GRACE, at_least, ms, stub};

use std::future::{pending, ready};
use std::io;
use std::time::Instant;

use tarry::RuntimeBuilder;
use tarry::time::sleep;
use tarry::tools::{Retries, RetryError, RetryOptions, retry};

fn fails_until(success: usize) -> impl Fn(usize) -> std::future::Ready<Result<&'static str, &'static str>> {
    move |n| ready(if n >= success { Ok("OK") } else { Err("FAIL") })
}

#[tarry::test]
async fn resolves_value_of_successful_action() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Ok::<_, &str>("OK")))).await;
    sleep(GRACE).await;

    assert_eq!(result, Ok("OK"));
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn exposes_failure_of_always_failing_action() {
    let result = retry(|| ready(Err::<(), _>("FAIL"))).await;

    assert_eq!(result, Err(RetryError::Failed("FAIL")));
    assert_eq!(result.unwrap_err().to_string(), "FAIL");
}

#[tarry::test]
async fn retries_three_times_by_default() {
    let on_four = Calls::new();
    let on_five = Calls::new();

    let succeeded = retry(stub(&on_four, fails_until(4))).await;
    let failed = retry(stub(&on_five, fails_until(5))).await;
    sleep(GRACE).await;

    assert_eq!(succeeded, Ok("OK"));
    assert_eq!(failed, Err(RetryError::Failed("FAIL")));
    assert_eq!(on_four.len(), 4);
    assert_eq!(on_five.len(), 4);
}

#[tarry::test]
async fn honors_retry_count() {
    let calls = Calls::new();

    let result = retry(stub(&calls, fails_until(4))).retries(2).await;
    sleep(GRACE).await;

    assert_eq!(result, Err(RetryError::Failed("FAIL")));
    assert_eq!(calls.len(), 3);
}

#[tarry::test]
async fn always_failing_action_is_called_retries_plus_one_times() {
    for retries in 0..6u32 {
        let calls = Calls::new();

        let result = retry(stub(&calls, |_| ready(Err::<(), _>("FAIL"))))
            .retries(retries)
            .await;

        assert!(result.is_err());
        assert_eq!(calls.len(), retries as usize + 1);
    }
}

#[tarry::test]
async fn unbounded_retries_until_success() {
    let calls = Calls::new();

    let result = retry(stub(&calls, fails_until(100))).unbounded().await;
    sleep(GRACE).await;

    assert_eq!(result, Ok("OK"));
    assert_eq!(calls.len(), 100);
}

#[tarry::test]
async fn blank_failures_report_attempt_count() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>("")))).await;
    sleep(GRACE).await;

    let err = result.unwrap_err();
    assert_eq!(err, RetryError::Exhausted(4));
    assert_eq!(err.to_string(), "failed after 4 tries");
    assert_eq!(calls.len(), 4);
}

#[tarry::test]
async fn unit_failures_are_blank() {
    let result = retry(|| ready(Err::<u8, ()>(()))).retries(1).await;

    assert_eq!(result, Err(RetryError::Exhausted(2)));
}

#[tarry::test]
async fn blank_failure_keeps_earlier_reason() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |n| {
        ready(Err::<(), _>(if n == 1 { Some("first") } else { None }))
    }))
    .await;

    assert_eq!(result, Err(RetryError::Failed(Some("first"))));
    assert_eq!(calls.len(), 4);
}

#[tarry::test]
async fn delays_between_attempts() {
    let calls = Calls::new();
    let delay = ms(100);

    let result = retry(stub(&calls, |n| {
        ready(if n >= 3 { Ok("OK") } else { Err("") })
    }))
    .delay(delay)
    .await;
    sleep(GRACE).await;

    assert_eq!(result, Ok("OK"));
    assert_eq!(calls.len(), 3);
    assert!(calls.gaps().iter().all(|gap| at_least(*gap, delay)));
}

#[tarry::test]
async fn delay_with_limited_retries() {
    let calls = Calls::new();
    let delay = ms(100);

    let result = retry(stub(&calls, fails_until(3)))
        .retries(2)
        .delay(delay)
        .await;

    assert_eq!(result, Ok("OK"));
    assert_eq!(calls.len(), 3);
    assert!(calls.gaps().iter().all(|gap| at_least(*gap, delay)));
}

#[tarry::test]
async fn resolves_when_action_beats_timeout() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| async {
        sleep(ms(100)).await;
        Ok::<_, &str>("OK")
    }))
    .timeout(ms(150))
    .await;
    sleep(GRACE).await;

    assert_eq!(result, Ok("OK"));
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn times_out_pending_action() {
    let calls = Calls::new();
    let timeout = ms(100);
    let start = Instant::now();

    let result = retry(stub(&calls, |_| pending::<Result<(), &str>>()))
        .timeout(timeout)
        .await;

    assert!(at_least(start.elapsed(), timeout));
    sleep(GRACE).await;

    let err = result.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "timed out after 100ms");
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn exposes_last_failure_when_timeout_expires_during_delay() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>("FAIL"))))
        .delay(ms(200))
        .timeout(ms(100))
        .await;
    sleep(ms(400)).await;

    assert_eq!(result, Err(RetryError::Failed("FAIL")));
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn exposes_last_failure_when_timeout_expires_during_action() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| async {
        sleep(ms(75)).await;
        Err::<(), _>("FAIL")
    }))
    .timeout(ms(100))
    .await;

    assert_eq!(result, Err(RetryError::Failed("FAIL")));
    assert_eq!(calls.len(), 2);
}

#[tarry::test]
async fn reports_timeout_when_no_reason_was_seen() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>(""))))
        .delay(ms(200))
        .timeout(ms(100))
        .await;
    sleep(ms(400)).await;

    let err = result.unwrap_err();
    assert_eq!(err, RetryError::TimedOut(ms(100)));
    assert_eq!(err.to_string(), "timed out after 100ms");
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn deadline_can_fire_during_delay_after_last_attempt() {
    let calls = Calls::new();
    let start = Instant::now();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>(""))))
        .retries(2)
        .delay(ms(100))
        .timeout(ms(250))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err, RetryError::TimedOut(ms(250)));
    assert_eq!(err.to_string(), "timed out after 250ms");
    assert!(at_least(start.elapsed(), ms(250)));
    assert_eq!(calls.len(), 3);
}

#[tarry::test]
async fn delay_follows_every_failure() {
    let calls = Calls::new();
    let start = Instant::now();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>("FAIL"))))
        .retries(2)
        .delay(ms(100))
        .await;

    assert_eq!(result, Err(RetryError::Failed("FAIL")));
    assert_eq!(calls.len(), 3);
    assert!(at_least(start.elapsed(), ms(300)));
}

#[tarry::test]
async fn counts_attempts() {
    let mut session = retry(|| ready(Err::<(), _>("FAIL"))).retries(2);
    assert_eq!(session.attempts(), 0);

    let result = (&mut session).await;

    assert!(result.is_err());
    assert_eq!(session.attempts(), 3);
}

#[tarry::test]
async fn huge_timeout_does_not_overflow() {
    let result = retry(|| ready(Ok::<_, &str>(1)))
        .timeout(std::time::Duration::MAX)
        .await;

    assert_eq!(result, Ok(1));
}

#[tarry::test]
async fn sync_action_returns_value() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Ok::<_, io::Error>("OK")))).await;
    sleep(GRACE).await;

    assert_eq!(result.unwrap(), "OK");
    assert_eq!(calls.len(), 1);
}

#[tarry::test]
async fn sync_action_exposes_errors() {
    let calls = Calls::new();

    let result = retry(stub(&calls, |_| ready(Err::<(), _>(io::Error::other("FAIL"))))).await;
    sleep(GRACE).await;

    assert_eq!(result.unwrap_err().to_string(), "FAIL");
    assert_eq!(calls.len(), 4);
}

#[tarry::test]
async fn options_replace_the_policy() {
    let calls = Calls::new();
    let options = RetryOptions::default().retries(Retries::Limited(1));

    let result = retry(stub(&calls, fails_until(5))).options(options).await;

    assert!(result.is_err());
    assert_eq!(calls.len(), 2);
}

#[test]
fn releases_timers_on_every_exit_path() {
    let rt = RuntimeBuilder::new().build();

    let success = rt.block_on(
        retry(|| ready(Ok::<_, &str>(1)))
            .delay(ms(50))
            .timeout(ms(500)),
    );
    assert_eq!(success, Ok(1));
    assert_eq!(rt.active_timers(), 0);

    let exhausted = rt.block_on(
        retry(|| ready(Err::<(), _>("FAIL")))
            .retries(1)
            .delay(ms(10))
            .timeout(ms(500)),
    );
    assert!(exhausted.is_err());
    assert_eq!(rt.active_timers(), 0);

    let timed_out = rt.block_on(
        retry(|| async {
            sleep(ms(1_000)).await;
            Ok::<(), &str>(())
        })
        .timeout(ms(50)),
    );
    assert!(timed_out.unwrap_err().is_timeout());
    assert_eq!(rt.active_timers(), 0);
}

#[test]
fn dropping_a_session_releases_its_timers() {
    let rt = RuntimeBuilder::new().build();

    rt.block_on(async {
        let session = retry(|| pending::<Result<(), &str>>()).timeout(ms(1_000));
        let outcome = tarry::time::timeout(ms(20), session).await;

        assert!(outcome.is_err());
    });

    assert_eq!(rt.active_timers(), 0);
}
