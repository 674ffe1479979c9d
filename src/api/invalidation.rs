use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

/// Host primitive that asks the windowing layer for a deferred repaint.
pub trait RedrawHost {
    fn request_redraw(&self);
}

/// Dirty flag with redraw coalescing.
///
/// Any number of `schedule` calls between two paints set the flag once and
/// forward exactly one request to the host.
pub struct RedrawScheduler {
    dirty: Cell<bool>,
    requests: Cell<u64>,
    host: RefCell<Option<Rc<dyn RedrawHost>>>,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self {
            dirty: Cell::new(true),
            requests: Cell::new(0),
            host: RefCell::new(None),
        }
    }
}

impl std::fmt::Debug for RedrawScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawScheduler")
            .field("dirty", &self.dirty.get())
            .field("requests", &self.requests.get())
            .field("has_host", &self.host.borrow().is_some())
            .finish()
    }
}

impl RedrawScheduler {
    /// Installs the host; a pending dirty state is forwarded immediately.
    pub fn set_host(&self, host: Option<Rc<dyn RedrawHost>>) {
        *self.host.borrow_mut() = host;
        if self.dirty.get() {
            self.forward_request();
        }
    }

    pub fn schedule(&self) {
        if self.dirty.replace(true) {
            return;
        }
        self.forward_request();
    }

    pub fn mark_painted(&self) {
        self.dirty.set(false);
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Number of repaint requests forwarded to the host so far.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }

    fn forward_request(&self) {
        let host = self.host.borrow().clone();
        if let Some(host) = host {
            self.requests.set(self.requests.get() + 1);
            trace!(requests = self.requests.get(), "requesting redraw");
            host.request_redraw();
        }
    }
}
