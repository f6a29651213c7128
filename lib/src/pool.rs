use std::thread;

use crossbeam_channel::{
    bounded,
    unbounded,
};

pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Output of a single work item, tagged with the index of the item it belongs to.
#[derive(Debug)]
pub struct Completed<R> {
    pub index: usize,
    pub worker: usize,
    pub output: R,
}

/// Bounded pool of worker threads mapping a list of items to a list of results.
///
/// Every call to [`WorkerPool::map`] spawns its workers, drains all items and joins
/// the workers again before returning. A failing item never cancels the other items,
/// jobs report failures through their output.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_COUNT)
    }
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Execute `job` for every item using at most [`WorkerPool::workers`] threads.
    /// The job receives the id of the worker running it next to the item.
    ///
    /// `observer` is called on the calling thread for every result in the order the
    /// results arrive. The returned results are ordered by item index and contain
    /// exactly one entry per item.
    pub fn map<T, R, F, O>(&self, items: &[T], job: F, mut observer: O) -> Vec<Completed<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &T) -> R + Sync,
        O: FnMut(&Completed<R>),
    {
        if items.is_empty() {
            return Vec::new();
        }

        let worker_count = self.workers.min(items.len());
        let mut results = thread::scope(|scope| {
            let (work_tx, work_rx) = bounded::<usize>(worker_count);
            let (result_tx, result_rx) = unbounded::<Completed<R>>();

            let job = &job;
            for worker in 0..worker_count {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for index in work_rx.iter() {
                        log::trace!("Worker {}: picked up item {}", worker, index);
                        let output = job(worker, &items[index]);
                        if result_tx
                            .send(Completed {
                                index,
                                worker,
                                output,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                });
            }

            /* Channels disconnect once all workers exited */
            drop(work_rx);
            drop(result_tx);

            scope.spawn(move || {
                for index in 0..items.len() {
                    if work_tx.send(index).is_err() {
                        log::debug!("Aborting work distribution as all workers exited");
                        break;
                    }
                }
            });

            let mut results = Vec::with_capacity(items.len());
            for completed in result_rx.iter() {
                observer(&completed);
                results.push(completed);
            }
            results
        });

        results.sort_unstable_by_key(|completed| completed.index);
        results
    }
}
