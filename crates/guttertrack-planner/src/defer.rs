use std::collections::VecDeque;

/// FIFO queue of callbacks to run on the next scheduler tick.
///
/// The UI uses this to sequence "close the dialog" before "invoke the
/// confirmation callback" once the close animation has finished. Purely
/// presentational ordering; it carries no data-consistency meaning.
#[derive(Default)]
pub struct DeferredQueue {
    tasks: VecDeque<Box<dyn FnOnce()>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a callback for the next tick.
    pub fn defer(&mut self, task: impl FnOnce() + 'static) {
        self.tasks.push_back(Box::new(task));
    }

    /// Run every pending callback in enqueue order. Callbacks queued while
    /// draining run on the *next* tick, not this one.
    pub fn run_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.tasks);
        let count = pending.len();
        for task in pending {
            task();
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_fifo_order() {
        let order: Rc<RefCell<Vec<&str>>> = Rc::default();
        let mut queue = DeferredQueue::new();

        let first = Rc::clone(&order);
        queue.defer(move || first.borrow_mut().push("close dialog"));
        let second = Rc::clone(&order);
        queue.defer(move || second.borrow_mut().push("confirm"));

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(*order.borrow(), vec!["close dialog", "confirm"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tasks_queued_while_draining_wait_for_next_tick() {
        let hits: Rc<RefCell<u32>> = Rc::default();
        let queue: Rc<RefCell<DeferredQueue>> = Rc::default();

        let inner_hits = Rc::clone(&hits);
        let inner_queue = Rc::clone(&queue);
        queue.borrow_mut().defer(move || {
            *inner_hits.borrow_mut() += 1;
            let late_hits = Rc::clone(&inner_hits);
            inner_queue
                .borrow_mut()
                .defer(move || *late_hits.borrow_mut() += 1);
        });

        // Drain one tick at a time; the borrow on the queue must end before
        // tasks run because a task may enqueue follow-up work.
        let tick = |queue: &Rc<RefCell<DeferredQueue>>| {
            let pending = std::mem::take(&mut queue.borrow_mut().tasks);
            for task in pending {
                task();
            }
        };

        tick(&queue);
        assert_eq!(*hits.borrow(), 1);
        assert!(!queue.borrow().is_empty());

        tick(&queue);
        assert_eq!(*hits.borrow(), 2);
        assert!(queue.borrow().is_empty());
    }
}
