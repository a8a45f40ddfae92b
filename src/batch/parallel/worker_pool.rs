use std::thread::{self, JoinHandle};

use async_channel::{Receiver, SendError, Sender};
use tracing::{debug, error};

type Job = Box<dyn FnOnce(usize) + Send + 'static>;

/// Fixed set of threads pulling jobs from a shared bounded queue.
/// Each job is handed the id of the worker running it.
pub struct WorkerPool {
    workers: Vec<Worker>,
    sender: Sender<Job>,
}

impl WorkerPool {
    pub fn new(size: usize) -> WorkerPool {
        assert!(size > 0);

        let (sender, receiver) = async_channel::bounded(size);
        let workers = (0..size)
            .map(|id| Worker::new(id, receiver.clone()))
            .collect();

        WorkerPool { workers, sender }
    }

    #[cfg(test)]
    fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues a job, blocking while all workers are busy and the queue is full.
    /// Fails only once every worker has gone away.
    pub fn execute<F>(&self, f: F) -> Result<(), SendError<Job>>
    where
        F: FnOnce(usize) + Send + 'static,
    {
        self.sender.send_blocking(Box::new(f))
    }

    /// Lets the workers drain the queue, then waits for all of them to exit.
    pub fn join(self) {
        self.sender.close();
        for worker in self.workers {
            if worker.thread.join().is_err() {
                error!(worker = worker.id, "worker panicked");
            }
        }
    }
}

struct Worker {
    id: usize,
    thread: JoinHandle<()>,
}

impl Worker {
    fn new(id: usize, receiver: Receiver<Job>) -> Worker {
        let thread = thread::spawn(move || {
            while let Ok(job) = receiver.recv_blocking() {
                job(id);
            }
            debug!(worker = id, "queue closed, worker exiting");
        });

        Worker { id, thread }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn runs_every_job_before_join_returns() {
        let pool = WorkerPool::new(3);
        assert_eq!(pool.size(), 3);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.execute(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.join();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn jobs_see_valid_worker_ids() {
        let pool = WorkerPool::new(2);
        let (tx, rx) = async_channel::unbounded();
        for _ in 0..6 {
            let tx = tx.clone();
            pool.execute(move |id| {
                tx.send_blocking(id).unwrap();
            })
            .unwrap();
        }
        drop(tx);
        pool.join();
        let mut seen = 0;
        while let Ok(id) = rx.try_recv() {
            assert!(id < 2);
            seen += 1;
        }
        assert_eq!(seen, 6);
    }
}
