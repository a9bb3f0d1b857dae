use tokio::sync::watch;

/// A value that can be read, replaced and watched.
///
/// Writes never fail, even with no subscribers, and each write is applied
/// atomically.
#[derive(Debug)]
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Applies `f` and notifies subscribers only if it returns true.
    pub fn modify_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Holds a loading flag at `true` until dropped.
pub(crate) struct LoadingGuard<'a> {
    flag: &'a Observable<bool>,
}

impl<'a> LoadingGuard<'a> {
    pub(crate) fn new(flag: &'a Observable<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
