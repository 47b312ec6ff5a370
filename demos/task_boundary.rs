use safe_result::{Outcome, ServiceUnavailableError, Thrown, guard_async, try_join, try_result_with};
use std::time::Duration;

async fn call_upstream(attempt: u32) -> Result<String, Thrown> {
    tokio::time::sleep(Duration::from_millis(10)).await;
    match attempt {
        0 => Err(Thrown::error("connection refused").with("attempt", attempt)),
        1 => panic!("upstream client bug"),
        _ => Ok(format!("payload #{attempt}")),
    }
}

#[tokio::main]
async fn main() {
    println!("--- Task Boundary Example ---\n");

    // 1. Map an upstream failure to a 503
    let outcome = try_result_with(call_upstream(0), ServiceUnavailableError::from).await;
    if let Outcome::Failure(err) = &outcome {
        println!("upstream: {err}");
    }

    // 2. A guarded handler never panics, even when its body does
    let handler = guard_async(call_upstream);
    for attempt in 0..3 {
        match handler.call(attempt).await {
            Outcome::Success(body) => println!("attempt {attempt}: {body}"),
            Outcome::Failure(err) => println!("attempt {attempt}: {err}"),
        }
    }

    // 3. Spawned tasks: cancellation is a fault like any other
    let finished = tokio::spawn(call_upstream(2));
    let cancelled = tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        call_upstream(2).await
    });
    cancelled.abort();

    for (label, handle) in [("finished", finished), ("cancelled", cancelled)] {
        match try_join(handle).await {
            Outcome::Success(body) => println!("{label}: {body}"),
            Outcome::Failure(err) => println!("{label}: {} ({})", err.status(), err.message()),
        }
    }
}
