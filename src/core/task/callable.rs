//! Task code objects
//!
//! A task runs a zero-argument callable. Plain functions are stored as
//! function pointers; closures that capture context are stored by `'static`
//! mutable reference, typically into a `static_cell::StaticCell`, since
//! there is no heap.

/// Code a [`Task`](super::Task) runs
pub enum Callable {
    /// Plain function
    Fn(fn()),
    /// Closure in static storage
    Closure(&'static mut (dyn FnMut() + Send)),
}

impl Callable {
    /// Wrap a closure living in static storage
    ///
    /// ```ignore
    /// static WORKER: StaticCell<Worker> = StaticCell::new();
    ///
    /// let port = 3;
    /// let f = WORKER.init(move || poll_port(port));
    /// TASK.spawn(Callable::closure(f));
    /// ```
    #[inline]
    pub fn closure<F>(f: &'static mut F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Callable::Closure(f)
    }

    #[inline]
    pub fn call(&mut self) {
        match self {
            Callable::Fn(f) => (*f)(),
            Callable::Closure(f) => (**f)(),
        }
    }
}

impl From<fn()> for Callable {
    #[inline]
    fn from(f: fn()) -> Self {
        Callable::Fn(f)
    }
}
