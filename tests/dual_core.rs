//! Primary and worker on two OS threads, talking over the mailbox FIFO.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use dualcore_sched::config::FIFO_DEPTH;
use dualcore_sched::ipc::mailbox;
use dualcore_sched::{create_task, Controller, IdlePolicy, Launch, Priority, WorkerConfig};

/// Runs the worker entry on a std thread.
#[derive(Default)]
struct ThreadLauncher {
    handle: Option<JoinHandle<()>>,
}

impl Launch for ThreadLauncher {
    fn launch<F>(&mut self, entry: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle = Some(thread::spawn(entry));
    }
}

impl ThreadLauncher {
    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("worker thread panicked");
        }
    }
}

fn wait_for(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::yield_now();
    }
}

fn config() -> WorkerConfig {
    WorkerConfig {
        idle: IdlePolicy::Hook(thread::yield_now),
        ..WorkerConfig::default()
    }
}

#[test]
fn tasks_run_on_worker_until_removed() {
    static REPEAT: AtomicUsize = AtomicUsize::new(0);
    static ONCE: AtomicUsize = AtomicUsize::new(0);
    fn repeat(_: usize) {
        REPEAT.fetch_add(1, Ordering::SeqCst);
    }
    fn once(_: usize) {
        ONCE.fetch_add(1, Ordering::SeqCst);
    }

    let (tx, rx) = mailbox::channel(FIFO_DEPTH);
    let mut ctl = Controller::with_config(tx, config());
    let mut launcher = ThreadLauncher::default();
    ctl.start(&mut launcher, rx);

    let repeating = create_task(repeat, 0, "repeat", Priority::Low, false).unwrap();
    let single = create_task(once, 0, "once", Priority::High, true).unwrap();
    ctl.add_task(&repeating).unwrap();
    ctl.add_task(&single).unwrap();

    wait_for("repeating task", || REPEAT.load(Ordering::SeqCst) >= 10);
    wait_for("single-shot release", || single.ref_count() == 1);
    assert_eq!(ONCE.load(Ordering::SeqCst), 1);

    ctl.remove_task(&repeating).unwrap();
    wait_for("removal", || repeating.ref_count() == 1);
    let after_remove = REPEAT.load(Ordering::SeqCst);

    ctl.stop();
    launcher.join();
    assert_eq!(REPEAT.load(Ordering::SeqCst), after_remove);
    assert_eq!(ONCE.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_releases_every_registered_task() {
    fn noop(_: usize) {}

    let (tx, rx) = mailbox::channel(FIFO_DEPTH);
    let mut ctl = Controller::with_config(tx, config());
    let mut launcher = ThreadLauncher::default();
    ctl.start(&mut launcher, rx);

    // More adds than the FIFO holds: the sender waits on the worker.
    let tasks: Vec<_> = (0..11)
        .map(|i| create_task(noop, i, "bulk", Priority::Medium, false).unwrap())
        .collect();
    for task in &tasks {
        ctl.add_task(task).unwrap();
    }

    // FIFO order: every add is handled before the stop.
    ctl.stop();
    launcher.join();
    assert!(tasks.iter().all(|t| t.ref_count() == 1));
    assert!(ctl.add_task(&tasks[0]).is_err());
}
