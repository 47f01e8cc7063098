use super::context::ExecutionContext;
use std::collections::VecDeque;
use tracing::debug;

/// Owns one suspended context and guarantees it is released exactly once.
///
/// `release` consumes the guard; if the guard is dropped without an explicit
/// release (for example while unwinding a failure path) `Drop` releases it.
pub struct PendingContext {
    inner: Box<dyn ExecutionContext>,
    released: bool,
}

impl PendingContext {
    pub fn new(inner: Box<dyn ExecutionContext>) -> Self {
        Self {
            inner,
            released: false,
        }
    }

    pub fn context(&self) -> &dyn ExecutionContext {
        self.inner.as_ref()
    }

    pub fn context_mut(&mut self) -> &mut dyn ExecutionContext {
        self.inner.as_mut()
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        debug!(context = %self.inner.describe(), "releasing execution context");
        self.inner.release();
    }
}

impl Drop for PendingContext {
    fn drop(&mut self) {
        self.release_once();
    }
}

/// FIFO of suspended contexts in suspension order.
#[derive(Default)]
pub struct DeferredExecutionQueue {
    contexts: VecDeque<PendingContext>,
}

impl DeferredExecutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: Box<dyn ExecutionContext>) {
        self.contexts.push_back(PendingContext::new(context));
    }

    pub fn head(&self) -> Option<&PendingContext> {
        self.contexts.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut PendingContext> {
        self.contexts.front_mut()
    }

    pub fn pop(&mut self) -> Option<PendingContext> {
        self.contexts.pop_front()
    }

    /// Pop the head and release it. Returns false if the queue was empty.
    pub fn release_head(&mut self) -> bool {
        match self.contexts.pop_front() {
            Some(pending) => {
                pending.release();
                true
            }
            None => false,
        }
    }

    /// Release every context without running it.
    pub fn discard_all(&mut self) -> usize {
        let mut discarded = 0;
        while self.release_head() {
            discarded += 1;
        }
        discarded
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
