use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use feedmix::{Debouncer, RequestTracker};
use log::{debug, warn};

use crate::render;

use super::Context;

/// Longest wait for input before finished requests are checked again.
const TICK: Duration = Duration::from_millis(20);

pub(crate) fn cmd_search(ctx: &Context, debounce: Duration) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let range = ctx.settings.pagination()?.range(1)?;
    let p = &ctx.palette;
    let width = ctx.width();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    run_search(
        rx,
        debounce,
        |query| store.published_page(query, range),
        |query, result| {
            let heading = if query.is_empty() {
                "All posts".to_string()
            } else {
                format!("Results for \"{query}\"")
            };
            println!("{}", render::section(&heading, p));
            match result {
                Ok(page) if page.posts.is_empty() => println!("No posts found."),
                Ok(page) => {
                    for post in &page.posts {
                        println!("{}", render::post_line(post, p, width));
                    }
                    if page.total > page.posts.len() {
                        println!(
                            "{}… {} more, see `blog list --search`{}",
                            p.dim,
                            page.total - page.posts.len(),
                            p.reset
                        );
                    }
                }
                Err(e) => {
                    warn!("search for {query:?} failed: {e}");
                    println!("{}", render::unavailable("results", p));
                }
            }
            println!();
        },
    );
    Ok(())
}

/// Drive a search box fed line by line from `input`.
///
/// Each line replaces the box content. A query is sent once the input has
/// been quiet for `quiet`, or right away when the input ends. Requests run
/// concurrently and `show` only ever sees the response to the most recently
/// sent query. Returns once the input is closed and every request finished.
pub(crate) fn run_search<R, F, S>(input: Receiver<String>, quiet: Duration, fetch: F, mut show: S)
where
    R: Send,
    F: Fn(&str) -> R + Sync,
    S: FnMut(&str, R),
{
    let (done_tx, done_rx) = mpsc::channel::<(feedmix::Ticket, String, R)>();
    let mut debouncer = Debouncer::new(quiet);
    let mut tracker = RequestTracker::new();
    let mut last_sent: Option<String> = None;
    let mut in_flight = 0usize;
    let mut open = true;

    thread::scope(|scope| {
        let fetch = &fetch;
        loop {
            let arrived: Vec<_> = if open {
                done_rx.try_iter().collect()
            } else {
                done_rx.recv_timeout(TICK).into_iter().collect()
            };
            for (ticket, query, response) in arrived {
                in_flight -= 1;
                match tracker.accept(ticket, response) {
                    Some(response) => show(&query, response),
                    None => debug!("dropping stale results for {query:?}"),
                }
            }
            if !open && in_flight == 0 && debouncer.is_idle() {
                break;
            }

            let due = if open {
                let wait = debouncer
                    .remaining(Instant::now())
                    .map_or(TICK, |left| left.min(TICK));
                match input.recv_timeout(wait) {
                    Ok(line) => {
                        debouncer.input(line.trim().to_string(), Instant::now());
                        None
                    }
                    Err(RecvTimeoutError::Timeout) => debouncer.poll(Instant::now()),
                    Err(RecvTimeoutError::Disconnected) => {
                        open = false;
                        debouncer.flush()
                    }
                }
            } else {
                None
            };

            let Some(query) = due else { continue };
            if last_sent.as_deref() == Some(query.as_str()) {
                continue;
            }
            last_sent = Some(query.clone());
            let ticket = tracker.issue();
            debug!("search #{} for {query:?}", ticket.seq());
            in_flight += 1;
            let done = done_tx.clone();
            scope.spawn(move || {
                let response = fetch(&query);
                // The receiver outlives every worker in this scope.
                let _ = done.send((ticket, query, response));
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const QUIET: Duration = Duration::from_millis(40);

    fn type_lines(lines: Vec<(&'static str, u64)>) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (line, pause_ms) in lines {
                tx.send(line.to_string()).unwrap();
                thread::sleep(Duration::from_millis(pause_ms));
            }
        });
        rx
    }

    #[test]
    fn test_burst_sends_one_request() {
        let sent = Mutex::new(Vec::new());
        let mut shown = Vec::new();
        run_search(
            type_lines(vec![("r", 0), ("ru", 0), ("rust", 0)]),
            QUIET,
            |q| {
                sent.lock().unwrap().push(q.to_string());
                q.len()
            },
            |q, n| shown.push((q.to_string(), n)),
        );
        assert_eq!(*sent.lock().unwrap(), vec!["rust"]);
        assert_eq!(shown, vec![("rust".to_string(), 4)]);
    }

    #[test]
    fn test_slow_early_response_is_dropped() {
        let mut shown = Vec::new();
        run_search(
            type_lines(vec![("slow", 150), ("fast", 0)]),
            QUIET,
            |q| {
                if q == "slow" {
                    thread::sleep(Duration::from_millis(400));
                }
                q.to_uppercase()
            },
            |_, r| shown.push(r),
        );
        assert_eq!(shown, vec!["FAST"]);
    }

    #[test]
    fn test_pauses_between_queries_show_each() {
        let mut shown = Vec::new();
        run_search(
            type_lines(vec![("go", 150), ("rust", 0)]),
            QUIET,
            |q| q.to_string(),
            |_, r| shown.push(r),
        );
        assert_eq!(shown, vec!["go", "rust"]);
    }

    #[test]
    fn test_repeated_query_is_not_resent() {
        let sent = Mutex::new(0);
        run_search(
            type_lines(vec![("rust", 150), ("rust ", 0)]),
            QUIET,
            |_| *sent.lock().unwrap() += 1,
            |_, _| {},
        );
        assert_eq!(*sent.lock().unwrap(), 1);
    }

    #[test]
    fn test_zero_quiet_period_sends_each_line() {
        let mut shown = Vec::new();
        run_search(
            type_lines(vec![("go", 100), ("rust", 0)]),
            Duration::ZERO,
            |q| q.to_string(),
            |_, r| shown.push(r),
        );
        assert_eq!(shown, vec!["go", "rust"]);
    }
}
