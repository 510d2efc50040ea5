//! Integration tests for the reactivity runtime.
//!
//! These exercise the engine end to end: variables, autoruns, disposal,
//! untracking, and circular binding working together.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use filament_core::{bind_circular, create_autorun, create_variable, on_cleanup, untrack};

/// One run at subscription time, then exactly one run per write.
#[test]
fn counter_scenario() {
    let count = create_variable(0);
    let counter = Arc::new(AtomicI32::new(0));

    let counter_clone = Arc::clone(&counter);
    let reader = count.reader();
    let stop = create_autorun(move |_: Option<()>| {
        reader.get();
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    count.write(1);
    count.write(2);
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    // Stopping is final and idempotent: later writes change nothing.
    stop.stop();
    count.write(3);
    count.write(4);
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    stop.stop();
    count.write(5);
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

/// Exact settling trace of a circular binding between two variables.
#[test]
fn circular_binding_trace() {
    let number = create_variable(0);
    let double = create_variable(0);
    let counter = Arc::new(AtomicI32::new(0));

    let counter_clone = Arc::clone(&counter);
    let number_reader = number.reader();
    let double_reader = double.reader();
    let stop_observer = create_autorun(move |_: Option<()>| {
        number_reader.get();
        double_reader.get();
        counter_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let stop_binding = {
        let track_number = number.reader();
        let track_double = double.reader();
        let (half_source, number_writer) = (double.reader(), number.writer());
        let (double_source, double_writer) = (number.reader(), double.writer());
        bind_circular(
            move || {
                track_number.get();
            },
            move || number_writer.write(half_source.read() / 2),
            move || {
                track_double.get();
            },
            move || double_writer.write(double_source.read() * 2),
        )
    };
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    number.write(2);
    assert_eq!(counter.load(Ordering::SeqCst), 4);
    assert_eq!(number.read(), 2);
    assert_eq!(double.read(), 4);

    double.write(2);
    assert_eq!(counter.load(Ordering::SeqCst), 6);
    assert_eq!(number.read(), 1);
    assert_eq!(double.read(), 2);

    stop_binding.stop();
    stop_observer.stop();
}

/// Two writes to two different variables are two independent propagation
/// passes: the reader runs once per write and, inside each run, sees the
/// just-written variable's new value.
#[test]
fn sequential_writes_propagate_independently() {
    let first = create_variable(0);
    let second = create_variable(0);
    let observed = Arc::new(Mutex::new(Vec::new()));

    let observed_clone = Arc::clone(&observed);
    let first_reader = first.reader();
    let second_reader = second.reader();
    let stop = create_autorun(move |_: Option<()>| {
        observed_clone
            .lock()
            .unwrap()
            .push((first_reader.get(), second_reader.get()));
    });

    first.set(1);
    second.set(2);

    // No batching: one run per write, each seeing the fresh value.
    assert_eq!(*observed.lock().unwrap(), vec![(0, 0), (1, 0), (1, 2)]);
    stop.stop();
}

/// A conditional read stops reacting from the run where the branch goes
/// cold, and resumes when it warms up again.
#[test]
fn dynamic_dependencies_follow_the_branch() {
    let gate = create_variable(true);
    let value = create_variable(0);
    let runs = Arc::new(AtomicI32::new(0));

    let runs_clone = Arc::clone(&runs);
    let gate_reader = gate.reader();
    let value_reader = value.reader();
    let stop = create_autorun(move |_: Option<()>| {
        if gate_reader.get() {
            value_reader.get();
        }
        runs_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    value.set(1);
    assert_eq!(runs.load(Ordering::SeqCst), 2);

    gate.set(false);
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    value.set(2);
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    gate.set(true);
    assert_eq!(runs.load(Ordering::SeqCst), 4);

    value.set(3);
    assert_eq!(runs.load(Ordering::SeqCst), 5);

    stop.stop();
}

/// Untracked reads see current values without creating edges.
#[test]
fn untrack_reads_without_subscribing() {
    let tracked = create_variable(0);
    let peeked = create_variable(100);
    let observed = Arc::new(Mutex::new(Vec::new()));

    let observed_clone = Arc::clone(&observed);
    let tracked_reader = tracked.reader();
    let peeked_reader = peeked.reader();
    let stop = create_autorun(move |_: Option<()>| {
        let base = tracked_reader.get();
        let extra = untrack(|| peeked_reader.get());
        observed_clone.lock().unwrap().push(base + extra);
    });
    assert_eq!(*observed.lock().unwrap(), vec![100]);

    // Writing the peeked variable does not re-run the autorun...
    peeked.set(200);
    assert_eq!(*observed.lock().unwrap(), vec![100]);

    // ...but the next run sees its current value.
    tracked.set(1);
    assert_eq!(*observed.lock().unwrap(), vec![100, 201]);

    stop.stop();
}

/// Parent disposal cascades into nested autoruns and runs cleanups in
/// reverse-registration order.
#[test]
fn ownership_tree_tears_down_depth_first() {
    let trigger = create_variable(0);
    let inner_signal = create_variable(0);
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_clone = Arc::clone(&log);
    let trigger_reader = trigger.reader();
    let inner_reader = inner_signal.reader();
    let stop = create_autorun(move |_: Option<()>| {
        trigger_reader.get();

        let cleanup_log = Arc::clone(&log_clone);
        on_cleanup(move || {
            cleanup_log.lock().unwrap().push("outer cleanup");
        });

        let child_log = Arc::clone(&log_clone);
        let child_reader = inner_reader.clone();
        let _child = create_autorun(move |_: Option<()>| {
            child_reader.get();
            let nested_log = Arc::clone(&child_log);
            on_cleanup(move || {
                nested_log.lock().unwrap().push("inner cleanup");
            });
        });
    });

    stop.stop();
    // The child scope was registered after the outer cleanup, so it is torn
    // down first; its own cleanup runs before the outer one.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["inner cleanup", "outer cleanup"]
    );

    inner_signal.set(1);
    assert_eq!(inner_signal.subscriber_count(), 0);
}

/// Autoruns thread their previous return value between runs.
#[test]
fn autorun_accumulates_through_return_values() {
    let step = create_variable(1);
    let totals = Arc::new(Mutex::new(Vec::new()));

    let totals_clone = Arc::clone(&totals);
    let step_reader = step.reader();
    let stop = create_autorun(move |previous: Option<i32>| {
        let total = previous.unwrap_or(0) + step_reader.get();
        totals_clone.lock().unwrap().push(total);
        total
    });

    step.set(2);
    step.set(3);

    assert_eq!(*totals.lock().unwrap(), vec![1, 3, 6]);
    stop.stop();
}

/// Independent autoruns have independent stop handles.
#[test]
fn autoruns_are_independent() {
    let shared = create_variable(0);
    let first_runs = Arc::new(AtomicI32::new(0));
    let second_runs = Arc::new(AtomicI32::new(0));

    let first_clone = Arc::clone(&first_runs);
    let reader_a = shared.reader();
    let stop_first = create_autorun(move |_: Option<()>| {
        reader_a.get();
        first_clone.fetch_add(1, Ordering::SeqCst);
    });

    let second_clone = Arc::clone(&second_runs);
    let reader_b = shared.reader();
    let stop_second = create_autorun(move |_: Option<()>| {
        reader_b.get();
        second_clone.fetch_add(1, Ordering::SeqCst);
    });

    shared.set(1);
    assert_eq!(first_runs.load(Ordering::SeqCst), 2);
    assert_eq!(second_runs.load(Ordering::SeqCst), 2);

    stop_first.stop();
    shared.set(2);
    assert_eq!(first_runs.load(Ordering::SeqCst), 2);
    assert_eq!(second_runs.load(Ordering::SeqCst), 3);

    stop_second.stop();
    assert_eq!(shared.subscriber_count(), 0);
}
