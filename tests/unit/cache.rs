use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::*;
use crate::foundation::error::BlendError;

fn h(n: u64) -> Hash128 {
    Hash128::new(0, n)
}

#[test]
fn compiles_once_per_hash() {
    let cache = ProgramCache::<String>::new();
    let calls = AtomicUsize::new(0);
    let compile = || -> BlendResult<String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok("shader".to_string())
    };

    let a = cache.get_or_compile(h(1), compile).unwrap();
    let b = cache.get_or_compile(h(1), compile).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.get_or_compile(h(2), compile).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.compiled(), 2);
}

#[test]
fn failed_compile_can_be_retried() {
    let cache = ProgramCache::<u32>::new();
    let err = cache
        .get_or_compile(h(7), || Err(BlendError::invariant("backend rejected program")))
        .unwrap_err();
    assert!(err.to_string().contains("backend rejected"));
    assert_eq!(cache.compiled(), 0);
    assert!(cache.get(h(7)).is_none());

    let v = cache.get_or_compile(h(7), || Ok(42)).unwrap();
    assert_eq!(*v, 42);
    assert_eq!(cache.get(h(7)).as_deref(), Some(&42));
}

#[test]
fn concurrent_callers_share_one_compile() {
    let cache = ProgramCache::<usize>::new();
    let calls = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                let v = cache
                    .get_or_compile(h(3), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(5));
                        Ok(99)
                    })
                    .unwrap();
                assert_eq!(*v, 99);
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.compiled(), 1);
}

#[test]
fn clear_forgets_everything() {
    let cache = ProgramCache::<u8>::default();
    cache.get_or_compile(h(1), || Ok(1)).unwrap();
    assert!(!cache.is_empty());
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.compiled(), 0);
}
