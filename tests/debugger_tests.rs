// Drives the debugger from a controller thread while a worker thread enters
// and leaves keywords, observing progress through channels with timeouts.

use keyword_debugger::debugger::{Admission, DebugSession, Debugger, RunMode};
use keyword_debugger::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Enter a keyword, report its name, run `body`, leave.
fn kw(debugger: &Debugger, tx: &Sender<&'static str>, name: &'static str, body: impl FnOnce()) {
    let _guard = debugger.enter();
    tx.send(name).unwrap();
    body();
}

fn spawn_worker(
    debugger: Arc<Debugger>,
    script: impl FnOnce(&Debugger, &Sender<&'static str>) + Send + 'static,
) -> (Receiver<&'static str>, JoinHandle<()>) {
    let (tx, rx) = channel();
    let handle = thread::spawn(move || script(&debugger, &tx));
    (rx, handle)
}

fn expect(rx: &Receiver<&'static str>, name: &str) {
    match rx.recv_timeout(TIMEOUT) {
        Ok(got) => assert_eq!(got, name),
        Err(e) => panic!("expected keyword {} to run: {}", name, e),
    }
}

fn expect_blocked(debugger: &Debugger, rx: &Receiver<&'static str>) {
    assert!(
        debugger.wait_until_blocked(TIMEOUT),
        "worker should be waiting at a keyword boundary"
    );
    assert!(rx.try_recv().is_err(), "no keyword may run while blocked");
}

#[cfg(test)]
mod command_tests {
    use super::*;

    #[test]
    fn test_pausing_and_resuming() {
        let debugger = Debugger::new();
        assert!(!debugger.is_paused());
        debugger.pause();
        assert!(debugger.is_paused());
        debugger.resume();
        assert!(!debugger.is_paused());
    }

    #[test]
    fn test_double_pause_is_one_pause() {
        let debugger = Debugger::new();
        debugger.pause();
        debugger.pause();
        assert_eq!(debugger.mode(), RunMode::Paused);
        debugger.resume();
        assert!(!debugger.is_paused());
    }

    #[test]
    fn test_step_commands_count_as_paused() {
        let debugger = Debugger::new();
        debugger.step_next();
        assert!(debugger.is_paused());
        debugger.step_over();
        assert!(debugger.is_paused());
        assert_eq!(debugger.mode(), RunMode::step_over(0));
    }

    #[test]
    fn test_end_keyword_at_depth_zero_is_a_protocol_violation() {
        let debugger = Debugger::new();
        assert!(matches!(
            debugger.end_keyword(),
            Err(Error::ProtocolViolation)
        ));
        assert_eq!(debugger.depth(), 0);

        // Still usable afterwards.
        assert_eq!(debugger.start_keyword(), 1);
        assert_eq!(debugger.end_keyword().unwrap(), 0);
    }

    #[test]
    fn test_commands_before_and_after_work_are_safe() {
        let debugger = Debugger::new();
        debugger.step_over();
        debugger.resume();
        assert_eq!(debugger.start_keyword(), 1);
        assert_eq!(debugger.end_keyword().unwrap(), 0);
        debugger.pause();
        debugger.step_next();
        debugger.resume();
        assert_eq!(debugger.depth(), 0);
        assert!(!debugger.is_blocked());
    }
}

#[cfg(test)]
mod stepping_tests {
    use super::*;

    #[test]
    fn test_step_next() {
        let debugger = Arc::new(Debugger::new());
        debugger.pause();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), |d, tx| {
            kw(d, tx, "first", || kw(d, tx, "second", || {}));
            kw(d, tx, "third", || {});
        });

        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 0);

        debugger.step_next();
        expect(&rx, "first");
        // Nested keyword blocks: the step token was used up.
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 1);

        debugger.step_next();
        expect(&rx, "second");
        // Sibling keyword blocks as well.
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 0);

        debugger.step_next();
        expect(&rx, "third");
        worker.join().unwrap();

        assert_eq!(debugger.depth(), 0);
        assert_eq!(debugger.mode(), RunMode::Paused);
    }

    #[test]
    fn test_step_over() {
        let debugger = Arc::new(Debugger::new());
        debugger.pause();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), |d, tx| {
            kw(d, tx, "first", || {
                kw(d, tx, "second", || {});
                kw(d, tx, "third", || {});
                kw(d, tx, "fourth", || {});
            });
            kw(d, tx, "last", || {});
        });

        expect_blocked(&debugger, &rx);
        debugger.step_over();
        for name in ["first", "second", "third", "fourth"] {
            expect(&rx, name);
        }

        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 0);
        assert!(debugger.is_paused());

        debugger.step_over();
        expect(&rx, "last");
        worker.join().unwrap();
    }

    #[test]
    fn test_step_over_from_nested_level() {
        let debugger = Arc::new(Debugger::new());
        let (go_tx, go_rx) = channel::<()>();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), move |d, tx| {
            kw(d, tx, "outer", || {
                go_rx.recv().unwrap();
                kw(d, tx, "stepped", || kw(d, tx, "inner", || {}));
                kw(d, tx, "sibling", || {});
            });
            kw(d, tx, "after", || {});
        });

        expect(&rx, "outer");
        debugger.pause();
        go_tx.send(()).unwrap();

        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 1);

        debugger.step_over();
        expect(&rx, "stepped");
        expect(&rx, "inner");
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 1);

        // A plain step into the sibling, then the top level blocks again.
        debugger.step_next();
        expect(&rx, "sibling");
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 0);

        debugger.resume();
        expect(&rx, "after");
        worker.join().unwrap();
        assert!(!debugger.is_paused());
    }

    #[test]
    fn test_step_next_while_running_arms_next_boundary() {
        let debugger = Arc::new(Debugger::new());
        debugger.step_next();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), |d, tx| {
            kw(d, tx, "one", || {});
            kw(d, tx, "two", || {});
        });

        expect(&rx, "one");
        expect_blocked(&debugger, &rx);

        debugger.resume();
        expect(&rx, "two");
        worker.join().unwrap();
    }

    #[test]
    fn test_step_over_while_running_steps_over_next_call() {
        let debugger = Arc::new(Debugger::new());
        let (go_tx, go_rx) = channel::<()>();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), move |d, tx| {
            kw(d, tx, "outer", || {
                go_rx.recv().unwrap();
                kw(d, tx, "stepped", || kw(d, tx, "inner", || {}));
                kw(d, tx, "sibling", || {});
            });
        });

        // Worker is running inside `outer` at depth 1.
        expect(&rx, "outer");
        debugger.step_over();
        assert_eq!(debugger.mode(), RunMode::step_over(1));
        go_tx.send(()).unwrap();

        expect(&rx, "stepped");
        expect(&rx, "inner");
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 1);

        debugger.resume();
        expect(&rx, "sibling");
        worker.join().unwrap();
    }

    #[test]
    fn test_step_over_while_running_follows_worker_unwinding() {
        let debugger = Arc::new(Debugger::new());
        let (go_tx, go_rx) = channel::<()>();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), move |d, tx| {
            kw(d, tx, "outer", || {
                kw(d, tx, "deep", || go_rx.recv().unwrap());
            });
            kw(d, tx, "next", || kw(d, tx, "next_inner", || {}));
            kw(d, tx, "last", || {});
        });

        // Issued at depth 2; the worker unwinds to 0 before its next call.
        expect(&rx, "outer");
        expect(&rx, "deep");
        debugger.step_over();
        go_tx.send(()).unwrap();

        // `next` is the stepped-over call: its body runs, `last` blocks.
        expect(&rx, "next");
        expect(&rx, "next_inner");
        expect_blocked(&debugger, &rx);
        assert_eq!(debugger.depth(), 0);
        assert_eq!(
            debugger.mode(),
            RunMode::StepOver {
                target_depth: 0,
                armed: false
            }
        );

        debugger.step_next();
        expect(&rx, "last");
        worker.join().unwrap();
    }

    #[test]
    fn test_step_over_while_running_then_going_deeper() {
        let debugger = Arc::new(Debugger::new());
        let (go_tx, go_rx) = channel::<()>();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), move |d, tx| {
            kw(d, tx, "outer", || {
                go_rx.recv().unwrap();
                kw(d, tx, "mid", || {
                    kw(d, tx, "leaf", || {});
                    kw(d, tx, "leaf2", || {});
                });
            });
        });

        // Issued at depth 1; the next call opens depth 2 and is stepped over.
        expect(&rx, "outer");
        debugger.step_over();
        go_tx.send(()).unwrap();

        expect(&rx, "mid");
        expect(&rx, "leaf");
        expect(&rx, "leaf2");
        worker.join().unwrap();
        assert_eq!(debugger.depth(), 0);
        assert_eq!(
            debugger.mode(),
            RunMode::StepOver {
                target_depth: 1,
                armed: false
            }
        );
    }

    #[test]
    fn test_resume_then_pause_blocks_next_keyword() {
        let debugger = Arc::new(Debugger::new());
        debugger.pause();
        debugger.resume();
        debugger.pause();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), |d, tx| {
            kw(d, tx, "only", || {});
        });

        expect_blocked(&debugger, &rx);
        debugger.resume();
        expect(&rx, "only");
        worker.join().unwrap();
    }

    #[test]
    fn test_resume_releases_worker_for_good() {
        let debugger = Arc::new(Debugger::new());
        debugger.pause();

        let (rx, worker) = spawn_worker(Arc::clone(&debugger), |d, tx| {
            for name in ["a", "b", "c"] {
                kw(d, tx, name, || kw(d, tx, "nested", || {}));
            }
        });

        expect_blocked(&debugger, &rx);
        debugger.resume();
        for name in ["a", "nested", "b", "nested", "c", "nested"] {
            expect(&rx, name);
        }
        worker.join().unwrap();
        assert_eq!(debugger.depth(), 0);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_dropping_session_releases_blocked_worker() {
        let session = DebugSession::new(true);
        assert!(session.is_paused());

        let (rx, worker) = spawn_worker(session.debugger(), |d, tx| {
            kw(d, tx, "stuck", || {});
            kw(d, tx, "free", || {});
        });

        expect_blocked(&session, &rx);
        let debugger = session.debugger();
        drop(session);

        expect(&rx, "stuck");
        expect(&rx, "free");
        worker.join().unwrap();

        assert!(debugger.is_closed());
        assert!(!debugger.is_paused());
        assert!(!debugger.is_blocked());
    }

    #[test]
    fn test_commands_after_shutdown_are_ignored() {
        let debugger = Debugger::new();
        debugger.shutdown();
        debugger.pause();
        debugger.step_next();
        assert!(!debugger.is_paused());
        // Would block forever if the pause had been applied.
        assert_eq!(debugger.start_keyword(), 1);
        assert_eq!(debugger.end_keyword().unwrap(), 0);
    }

    #[test]
    fn test_guard_leaves_keyword_on_panic() {
        let debugger = Arc::new(Debugger::new());
        let worker = {
            let debugger = Arc::clone(&debugger);
            thread::spawn(move || {
                let _outer = debugger.enter();
                let _inner = debugger.enter();
                panic!("keyword body blew up");
            })
        };

        assert!(worker.join().is_err());
        assert_eq!(debugger.depth(), 0);
    }

    #[test]
    fn test_guard_leaves_keyword_on_error_return() {
        fn failing(debugger: &Debugger) -> Result<(), String> {
            let guard = debugger.enter();
            if guard.depth() == 1 {
                return Err("keyword failed".to_string());
            }
            Ok(())
        }

        let debugger = Debugger::new();
        assert!(failing(&debugger).is_err());
        assert_eq!(debugger.depth(), 0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Hook {
        Start,
        End,
    }

    fn sequences<T: Copy>(alphabet: &[T], max_len: usize) -> Vec<Vec<T>> {
        let mut all = vec![Vec::new()];
        let mut frontier = vec![Vec::new()];
        for _ in 0..max_len {
            let mut next = Vec::new();
            for seq in &frontier {
                for &item in alphabet {
                    let mut longer: Vec<T> = seq.clone();
                    longer.push(item);
                    next.push(longer);
                }
            }
            all.extend(next.iter().cloned());
            frontier = next;
        }
        all
    }

    #[test]
    fn test_depth_tracks_open_keywords() {
        for seq in sequences(&[Hook::Start, Hook::End], 8) {
            let debugger = Debugger::new();
            let mut open = 0usize;
            for hook in &seq {
                match hook {
                    Hook::Start => {
                        open += 1;
                        assert_eq!(debugger.start_keyword(), open);
                    }
                    Hook::End if open == 0 => {
                        assert!(debugger.end_keyword().is_err(), "{:?}", seq);
                    }
                    Hook::End => {
                        open -= 1;
                        assert_eq!(debugger.end_keyword().unwrap(), open);
                    }
                }
                assert_eq!(debugger.depth(), open, "{:?}", seq);
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Cmd {
        Pause,
        Resume,
        StepNext,
        StepOver,
    }

    #[test]
    fn test_is_paused_follows_last_command() {
        for seq in sequences(&[Cmd::Pause, Cmd::Resume, Cmd::StepNext, Cmd::StepOver], 4) {
            let debugger = Debugger::new();
            for _ in 0..seq.len() {
                debugger.start_keyword();
            }

            for cmd in &seq {
                match cmd {
                    Cmd::Pause => debugger.pause(),
                    Cmd::Resume => debugger.resume(),
                    Cmd::StepNext => debugger.step_next(),
                    Cmd::StepOver => debugger.step_over(),
                }
                let expected = *cmd != Cmd::Resume;
                assert_eq!(debugger.is_paused(), expected, "{:?}", seq);

                // Leaving keywords never changes the answer.
                debugger.end_keyword().unwrap();
                assert_eq!(debugger.is_paused(), expected, "{:?}", seq);
            }

            let expected = seq.last().map_or(false, |cmd| *cmd != Cmd::Resume);
            assert_eq!(debugger.is_paused(), expected, "{:?}", seq);
        }
    }

    #[test]
    fn test_step_over_admits_deeper_levels_only() {
        for target in 0..3usize {
            for first_depth in 0..=target {
                let mut mode = RunMode::step_over(target);
                // The stepped-over keyword itself.
                match mode.admit(first_depth) {
                    Admission::Proceed { next } => mode = next,
                    other => panic!("stepped keyword must run, got {:?}", other),
                }
                let level = first_depth;
                for depth in 0..6 {
                    let admitted = matches!(
                        mode.admit(depth),
                        Admission::Proceed { .. }
                    );
                    assert_eq!(admitted, depth > level, "target {} depth {}", target, depth);
                }
            }
        }
    }
}
