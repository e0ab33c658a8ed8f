use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use relay::{ConstructionError, Dispatch, DispatchError, EventDispatcher, Handler, Rethrow, SyncLock};

fn summing(total: &Arc<AtomicI64>) -> Handler<i64> {
    let total = Arc::clone(total);
    Handler::infallible(move |_, v: &i64| {
        total.fetch_add(*v, Ordering::SeqCst);
    })
}

#[test]
fn test_filter_is_even() {
    let hits = Arc::new(AtomicUsize::new(0));
    let evens = EventDispatcher::<i64>::new().filter(|v| v % 2 == 0);
    {
        let hits = Arc::clone(&hits);
        evens.add_handler(Handler::infallible(move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
        }));
    }

    evens.notify(&(), &3).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    evens.notify(&(), &4).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_map_to_doubles_into_other_dispatcher() {
    let total = Arc::new(AtomicI64::new(0));
    let b = Arc::new(EventDispatcher::<i64>::new());
    b.add_handler(summing(&total));

    let a = EventDispatcher::<i64>::new()
        .map_to(Arc::clone(&b), |x: &i64| x * 2)
        .unwrap();
    a.notify(&(), &5).unwrap();

    assert_eq!(total.load(Ordering::SeqCst), 10);
    assert_eq!(a.handler_count(), 0);
}

#[test]
fn test_map_to_changes_event_type() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let names = Arc::new(EventDispatcher::<String>::new());
    {
        let seen = Arc::clone(&seen);
        names.add_handler(Handler::infallible(move |_, s: &String| {
            seen.lock().push(s.clone());
        }));
    }

    let ids = EventDispatcher::<u32>::new()
        .map_to(Arc::clone(&names), |id: &u32| format!("user-{id}"))
        .unwrap();
    ids.notify(&(), &7).unwrap();

    assert_eq!(*seen.lock(), vec!["user-7".to_string()]);
}

#[test]
fn test_link_to_runs_both_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let other = Arc::new(EventDispatcher::<i64>::new());
    {
        let order = Arc::clone(&order);
        other.add_handler(Handler::infallible(move |_, _| order.lock().push("other")));
    }

    let linked = EventDispatcher::<i64>::new()
        .link_to(Arc::clone(&other))
        .unwrap();
    {
        let order = Arc::clone(&order);
        linked.add_handler(Handler::infallible(move |_, _| order.lock().push("inner")));
    }

    linked.notify(&(), &1).unwrap();
    assert_eq!(*order.lock(), vec!["inner", "other"]);
}

#[test]
fn test_self_link_is_rejected() {
    let shared = Arc::new(EventDispatcher::<i64>::new());

    let err = Arc::clone(&shared).link_to(Arc::clone(&shared)).unwrap_err();
    assert_eq!(err, ConstructionError::SelfLink { wrapper: "link" });

    let err = Arc::clone(&shared)
        .map_to(Arc::clone(&shared), |x: &i64| x + 1)
        .unwrap_err();
    assert_eq!(err, ConstructionError::SelfLink { wrapper: "map" });
    assert_eq!(err.to_string(), "cannot map a dispatcher to itself");
}

#[test]
fn test_wrappers_stack() {
    let total = Arc::new(AtomicI64::new(0));
    let sink = Arc::new(EventDispatcher::<i64>::new());
    sink.add_handler(summing(&total));

    let pipeline = EventDispatcher::<i64>::new()
        .map_to(Arc::clone(&sink), |x: &i64| x * 10)
        .unwrap()
        .filter(|x: &i64| *x > 0)
        .synchronize();

    for v in [-2, 1, 0, 3] {
        pipeline.notify(&(), &v).unwrap();
    }
    assert_eq!(total.load(Ordering::SeqCst), 40);
}

#[test]
fn test_synchronized_serializes_threads() {
    const THREADS: usize = 4;
    const ROUNDS: usize = 250;

    let dispatcher = EventDispatcher::<i64>::with_policy(Rethrow).synchronize();
    let total = Arc::new(AtomicI64::new(0));
    dispatcher.add_handler(summing(&total));

    let rejected = AtomicUsize::new(0);
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..ROUNDS {
                    if let Err(DispatchError::Reentrant) = dispatcher.notify(&(), &1) {
                        rejected.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
        s.spawn(|| {
            for _ in 0..ROUNDS {
                let h = Handler::infallible(|_, _: &i64| {});
                dispatcher.add_handler(h.clone());
                dispatcher.remove_handler(&h);
            }
        });
    });

    assert_eq!(rejected.load(Ordering::SeqCst), 0);
    assert_eq!(total.load(Ordering::SeqCst), (THREADS * ROUNDS) as i64);
    assert_eq!(dispatcher.handler_count(), 1);
}

#[test]
fn test_shared_lock_makes_sequences_atomic() {
    let lock = SyncLock::new();
    let a = EventDispatcher::<i64>::new().synchronize_with(lock.clone());
    let b = EventDispatcher::<i64>::new().synchronize_with(lock.clone());
    let h = Handler::infallible(|_, _: &i64| {});

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..200 {
                let _guard = lock.lock();
                a.add_handler(h.clone());
                b.add_handler(h.clone());
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let _guard = lock.lock();
                assert_eq!(a.handler_count(), b.handler_count());
            }
        });
    });

    assert_eq!(a.handler_count(), 200);
}
