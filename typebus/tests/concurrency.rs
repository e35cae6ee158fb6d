//! Integration tests for concurrent use of a dispatcher.

use lazy_static::lazy_static;
use std::sync::atomic::{AtomicUsize, Ordering};
use typebus::{Dispatcher, ListenerHandle, global, on, testing::CountingListener};

lazy_static! {
    static ref BUS: Dispatcher = Dispatcher::new();
}

#[test]
fn test_concurrent_pushes_reach_every_listener() {
    let counter = CountingListener::new();
    let bus = Dispatcher::new();
    bus.register([
        ListenerHandle::new::<u64, _>(counter.clone()),
        ListenerHandle::new::<u64, _>(counter.clone()),
    ]);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for i in 0..250u64 {
                    bus.push(i);
                }
            });
        }
    });

    assert_eq!(counter.count(), 2 * 4 * 250);
}

#[test]
fn test_register_while_pushing() {
    let bus = Dispatcher::new();
    let counter = CountingListener::new();

    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..100 {
                bus.register([ListenerHandle::new::<u32, _>(counter.clone())]);
            }
        });
        s.spawn(|| {
            for i in 0..100u32 {
                bus.push(i);
            }
        });
    });

    assert_eq!(bus.listeners_for::<u32>(), 100);
    bus.push(0u32);
    // the last push alone reaches all 100
    assert!(counter.count() >= 100);
}

#[test]
fn test_static_dispatcher() {
    struct Tick;
    static TICKS: AtomicUsize = AtomicUsize::new(0);

    BUS.register([on::<Tick>(|_: &Tick| {
        TICKS.fetch_add(1, Ordering::SeqCst);
    })]);
    std::thread::scope(|s| {
        s.spawn(|| BUS.push(Tick));
        s.spawn(|| BUS.push(Tick));
    });

    assert_eq!(TICKS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_global_is_shared() {
    struct Ping;
    let counter = CountingListener::new();
    let handle = ListenerHandle::new::<Ping, _>(counter.clone());
    global().register([handle.clone()]);

    std::thread::spawn(|| {
        global().push(Ping);
    })
    .join()
    .unwrap();

    assert_eq!(counter.count(), 1);
    assert!(global().unregister([handle]).is_empty());
}
