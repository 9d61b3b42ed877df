use gloo_timers::callback::Timeout;
use log::{error, info};

/// Something that can run a task later. Dropping the returned handle must
/// cancel the task if it has not fired yet.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
}

pub trait Navigator {
    fn navigate(&self, url: &str);
}

pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}

pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            error!("no window to redirect from");
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            error!("redirect to {} failed: {:?}", url, e);
        }
    }
}

/// Pending navigation to the invite link. Owning this keeps the timer
/// alive; dropping it (e.g. when the form unmounts) clears it.
#[must_use = "dropping the timer cancels the redirect"]
pub struct RedirectTimer<H> {
    _handle: H,
}

impl<H> RedirectTimer<H> {
    pub fn start<S, N>(scheduler: &S, navigator: N, url: String, delay_ms: u32) -> Self
    where
        S: Scheduler<Handle = H>,
        N: Navigator + 'static,
    {
        let handle = scheduler.schedule(
            delay_ms,
            Box::new(move || {
                info!("redirecting to invite link");
                navigator.navigate(&url);
            }),
        );
        Self { _handle: handle }
    }

    pub fn cancel(self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use super::{Navigator, Scheduler};

    type Pending = Vec<(u32, Weak<()>, Box<dyn FnOnce()>)>;

    /// Holds tasks until `run_pending` is called. A task whose handle has
    /// been dropped is skipped.
    #[derive(Default)]
    pub struct ManualScheduler {
        pending: RefCell<Pending>,
    }

    impl ManualScheduler {
        pub fn delays(&self) -> Vec<u32> {
            self.pending.borrow().iter().map(|(delay, _, _)| *delay).collect()
        }

        pub fn run_pending(&self) {
            let tasks = std::mem::take(&mut *self.pending.borrow_mut());
            for (_, token, task) in tasks {
                if token.upgrade().is_some() {
                    task();
                }
            }
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = Rc<()>;

        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Rc<()> {
            let token = Rc::new(());
            self.pending.borrow_mut().push((delay_ms, Rc::downgrade(&token), task));
            token
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingNavigator {
        pub visited: Rc<RefCell<Vec<String>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) {
            self.visited.borrow_mut().push(url.to_string());
        }
    }
}
