use std::{ops, thread::ThreadId};

/// Guard a value that may only be used on the thread that created it.
///
/// OpenGL entry points are only valid on the thread where the context is current. Wrapping the
/// loaded function table in a guard lets handles to it be stored in `Send` types, while any use
/// from another thread panics instead of calling into the driver.
#[derive(Debug, Clone, Copy)]
pub struct ThreadGuard<T> {
    value: T,
    thread_id: ThreadId,
}

// # Safety
// Every access to the inner value goes through `get` or `Deref`, both of which check the calling
// thread first.
unsafe impl<T> Send for ThreadGuard<T> {}
unsafe impl<T> Sync for ThreadGuard<T> {}

impl<T> ThreadGuard<T> {
    pub fn new(value: T) -> Self {
        let thread_id = std::thread::current().id();
        Self { value, thread_id }
    }

    pub fn is_current_thread(&self) -> bool {
        self.thread_id == std::thread::current().id()
    }

    pub fn get(&self) -> Option<&T> {
        self.is_current_thread().then_some(&self.value)
    }

    #[inline(always)]
    fn assert_current_thread(&self) {
        if !self.is_current_thread() {
            panic!("OpenGL resource accessed outside of the context thread");
        }
    }
}

impl<T> ops::Deref for ThreadGuard<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.assert_current_thread();
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ThreadGuard;

    #[test]
    fn value_is_reachable_on_owning_thread() {
        let guard = ThreadGuard::new(42);
        assert_eq!(guard.get(), Some(&42));
        assert_eq!(*guard, 42);
    }

    #[test]
    fn other_threads_cannot_reach_the_value() {
        let guard = Arc::new(ThreadGuard::new(String::from("context")));
        let remote = std::thread::spawn({
            let guard = guard.clone();
            move || guard.get().is_none()
        });
        assert!(remote.join().unwrap());
    }

    #[test]
    fn deref_from_other_thread_panics() {
        let guard = Arc::new(ThreadGuard::new(7u32));
        let result = std::thread::spawn({
            let guard = guard.clone();
            move || **guard + 1
        })
        .join();
        assert!(result.is_err());
    }
}
