// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed pool of persistent workers.
//!
//! Workers are partitioned by [`WorkerIdentity`], so a key whose files changed
//! lands in the same partition as its stale workers and evicts them on the
//! next acquire. Each partition bounds `idle + active` by its capacity and
//! serves blocked callers in FIFO order.
//!
//! Locks are never held across an await: process and filesystem work happens
//! on the caller's task after the partition lock is released.

use crate::config::PoolConfig;
use crate::error::{ConfigError, PoolError};
use crate::factory::WorkerFactory;
use crate::handle::WorkerHandle;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::oneshot;
use wk_adapters::{EventSink, ProcessAdapter};
use wk_core::{WorkerIdentity, WorkerKey};

/// Point-in-time counts for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartitionStats {
    pub idle: usize,
    /// Borrowed workers plus creations in flight
    pub active: usize,
    pub waiters: usize,
    pub capacity: usize,
}

/// What a blocked acquire is handed when it reaches the front of the queue.
enum Grant {
    Handle(WorkerHandle),
    /// Permission to create a worker in an already-counted slot
    Slot,
}

struct Waiter {
    ticket: u64,
    tx: oneshot::Sender<Grant>,
}

struct PartitionState {
    idle: VecDeque<WorkerHandle>,
    active: usize,
    waiters: VecDeque<Waiter>,
    next_ticket: u64,
    closed: bool,
    /// Removed from the pool map; acquires must look the partition up again
    retired: bool,
}

struct Partition {
    capacity: usize,
    state: Mutex<PartitionState>,
}

/// First step of an acquire, decided under the partition lock.
enum Claim {
    Idle(WorkerHandle),
    Create,
    Wait(u64, oneshot::Receiver<Grant>),
    Retired,
}

/// Offer `grant` to waiters in queue order. Returns it if nobody took it.
fn offer(waiters: &mut VecDeque<Waiter>, mut grant: Grant) -> Result<(), Grant> {
    while let Some(waiter) = waiters.pop_front() {
        match waiter.tx.send(grant) {
            Ok(()) => return Ok(()),
            Err(returned) => grant = returned,
        }
    }
    Err(grant)
}

impl Partition {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(PartitionState {
                idle: VecDeque::new(),
                active: 0,
                waiters: VecDeque::new(),
                next_ticket: 0,
                closed: false,
                retired: false,
            }),
        }
    }

    fn claim(&self) -> Result<Claim, PoolError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(PoolError::Closed);
        }
        if state.retired {
            return Ok(Claim::Retired);
        }
        // Queued callers go first; new arrivals never overtake them.
        if state.waiters.is_empty() {
            if let Some(handle) = state.idle.pop_front() {
                state.active += 1;
                return Ok(Claim::Idle(handle));
            }
            if state.idle.len() + state.active < self.capacity {
                state.active += 1;
                return Ok(Claim::Create);
            }
        }
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(Waiter { ticket, tx });
        Ok(Claim::Wait(ticket, rx))
    }

    /// Take another idle worker into a slot the caller already holds.
    fn take_idle(&self) -> Option<WorkerHandle> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.idle.pop_front()
    }

    /// Return a borrowed worker. Yields it back when the pool is closed so
    /// the caller can destroy it outside the lock.
    fn release_locked(&self, state: &mut PartitionState, handle: WorkerHandle) -> Option<WorkerHandle> {
        if state.closed {
            state.active = state.active.saturating_sub(1);
            return Some(handle);
        }
        match offer(&mut state.waiters, Grant::Handle(handle)) {
            Ok(()) => None,
            Err(Grant::Handle(handle)) => {
                state.active = state.active.saturating_sub(1);
                state.idle.push_back(handle);
                None
            }
            Err(Grant::Slot) => {
                state.active = state.active.saturating_sub(1);
                None
            }
        }
    }

    /// Give up one active slot, passing it on as a creation grant if someone waits.
    fn free_slot_locked(&self, state: &mut PartitionState) {
        state.active = state.active.saturating_sub(1);
        if state.closed || state.waiters.is_empty() {
            return;
        }
        if state.idle.len() + state.active < self.capacity {
            state.active += 1;
            if offer(&mut state.waiters, Grant::Slot).is_err() {
                state.active -= 1;
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn free_slot(&self) {
        let mut state = self.state.lock();
        self.free_slot_locked(&mut state);
    }

    /// Mark an unused partition retired. Returns whether it was unused.
    fn retire_if_unused(&self) -> bool {
        let mut state = self.state.lock();
        let unused = !state.closed
            && state.idle.is_empty()
            && state.active == 0
            && state.waiters.is_empty();
        if unused {
            state.retired = true;
        }
        unused
    }

    fn stats(&self) -> PartitionStats {
        let state = self.state.lock();
        PartitionStats {
            idle: state.idle.len(),
            active: state.active,
            waiters: state.waiters.len(),
            capacity: self.capacity,
        }
    }
}

/// An active slot held by an acquire in progress. Freed on drop unless committed.
struct Reservation {
    partition: Arc<Partition>,
    committed: bool,
}

impl Reservation {
    fn new(partition: Arc<Partition>) -> Self {
        Self {
            partition,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.committed {
            self.partition.free_slot();
        }
    }
}

/// A queued acquire. Dropping it before a grant is received undoes the queueing.
struct WaitTicket<P: ProcessAdapter> {
    partition: Arc<Partition>,
    factory: Arc<WorkerFactory<P>>,
    ticket: u64,
    rx: oneshot::Receiver<Grant>,
    settled: bool,
}

impl<P: ProcessAdapter> WaitTicket<P> {
    async fn wait(mut self) -> Result<Grant, PoolError> {
        let result = (&mut self.rx).await;
        self.settled = true;
        result.map_err(|_| PoolError::Closed)
    }
}

impl<P: ProcessAdapter> Drop for WaitTicket<P> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let doomed = {
            let mut state = self.partition.state.lock();
            if let Some(pos) = state.waiters.iter().position(|w| w.ticket == self.ticket) {
                state.waiters.remove(pos);
                None
            } else {
                // Granted between the last poll and this drop: pass it on.
                match self.rx.try_recv() {
                    Ok(Grant::Handle(handle)) => self.partition.release_locked(&mut state, handle),
                    Ok(Grant::Slot) => {
                        self.partition.free_slot_locked(&mut state);
                        None
                    }
                    Err(_) => None,
                }
            }
        };
        if let Some(handle) = doomed {
            destroy_detached(&self.factory, handle);
        }
    }
}

/// Destroy a worker from a synchronous context.
fn destroy_detached<P: ProcessAdapter>(factory: &Arc<WorkerFactory<P>>, handle: WorkerHandle) {
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            let factory = Arc::clone(factory);
            runtime.spawn(async move { factory.destroy(handle).await });
        }
        Err(_) => {
            tracing::warn!(
                worker = %handle.id(),
                mnemonic = handle.mnemonic(),
                "no runtime to destroy worker, dropping its handle"
            );
        }
    }
}

struct PoolInner {
    partitions: HashMap<WorkerIdentity, Arc<Partition>>,
    closed: bool,
}

/// Pool of persistent workers keyed by [`WorkerKey`].
///
/// Shareable through `Arc`. Every acquired handle must be given back with
/// [`release`](Self::release) or [`invalidate`](Self::invalidate).
pub struct WorkerPool<P: ProcessAdapter> {
    factory: Arc<WorkerFactory<P>>,
    inner: Mutex<PoolInner>,
}

impl<P: ProcessAdapter> WorkerPool<P> {
    pub fn new(factory: WorkerFactory<P>) -> Self {
        Self {
            factory: Arc::new(factory),
            inner: Mutex::new(PoolInner {
                partitions: HashMap::new(),
                closed: false,
            }),
        }
    }

    /// Build a pool from a validated config file.
    pub fn from_config(
        process: P,
        config: &PoolConfig,
        reporter: Option<Arc<dyn EventSink>>,
    ) -> Result<Self, ConfigError> {
        config.workers.validate()?;
        let factory =
            WorkerFactory::new(process, &config.worker_base_dir, config.workers.clone());
        factory.set_reporter(reporter);
        Ok(Self::new(factory))
    }

    pub fn factory(&self) -> &WorkerFactory<P> {
        &self.factory
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Non-blocking liveness probe for a borrowed worker.
    pub fn is_alive(&self, handle: &WorkerHandle) -> bool {
        self.factory.is_alive(handle)
    }

    /// Borrow a worker for `key`, reusing an idle one when its files are unchanged.
    ///
    /// Blocks while the key's partition is at capacity. Dropping the returned
    /// future gives up the place in the queue.
    pub async fn acquire(&self, key: &WorkerKey) -> Result<WorkerHandle, PoolError> {
        let (mut candidate, partition) = loop {
            let partition = self.partition(key)?;
            match partition.claim()? {
                Claim::Idle(handle) => break (Some(handle), partition),
                Claim::Create => break (None, partition),
                Claim::Wait(ticket, rx) => {
                    tracing::debug!(mnemonic = key.mnemonic(), ticket, "waiting for a worker");
                    let waiting = WaitTicket {
                        partition: Arc::clone(&partition),
                        factory: Arc::clone(&self.factory),
                        ticket,
                        rx,
                        settled: false,
                    };
                    match waiting.wait().await? {
                        Grant::Handle(handle) => break (Some(handle), partition),
                        Grant::Slot => break (None, partition),
                    }
                }
                // Pruned between lookup and claim
                Claim::Retired => continue,
            }
        };
        let reservation = Reservation::new(Arc::clone(&partition));

        while let Some(handle) = candidate.take() {
            if self.factory.validate(key, &handle) {
                tracing::debug!(worker = %handle.id(), mnemonic = key.mnemonic(), "reusing worker");
                reservation.commit();
                return Ok(handle);
            }
            self.factory.destroy(handle).await;
            candidate = partition.take_idle();
        }

        if partition.is_closed() {
            return Err(PoolError::Closed);
        }
        match self.factory.create(key).await {
            Ok(handle) => {
                reservation.commit();
                Ok(handle)
            }
            Err(e) => {
                drop(reservation);
                self.prune(key);
                Err(e)
            }
        }
    }

    /// Give a borrowed worker back to the pool.
    ///
    /// The oldest waiter gets it directly; otherwise it goes idle. After
    /// [`close`](Self::close) the worker is destroyed instead.
    pub async fn release(&self, key: &WorkerKey, handle: WorkerHandle) {
        let doomed = match self.lookup(key) {
            Some(partition) => {
                let mut state = partition.state.lock();
                partition.release_locked(&mut state, handle)
            }
            None => Some(handle),
        };
        if let Some(handle) = doomed {
            self.factory.destroy(handle).await;
        }
    }

    /// Destroy a borrowed worker that can no longer be used and free its slot.
    pub async fn invalidate(&self, key: &WorkerKey, handle: WorkerHandle) {
        let slot = self.lookup(key).map(Reservation::new);
        tracing::debug!(worker = %handle.id(), mnemonic = key.mnemonic(), "invalidating worker");
        self.factory.destroy(handle).await;
        drop(slot);
        self.prune(key);
    }

    /// Stop accepting acquires, fail every waiter, and destroy all idle workers.
    ///
    /// Borrowed workers are destroyed as they are released. Calling this again
    /// has no effect.
    pub async fn close(&self) {
        let partitions: Vec<Arc<Partition>> = {
            let mut inner = self.inner.lock();
            if inner.closed {
                return;
            }
            inner.closed = true;
            inner.partitions.values().cloned().collect()
        };

        let mut doomed = Vec::new();
        for partition in partitions {
            let mut state = partition.state.lock();
            state.closed = true;
            state.waiters.clear();
            doomed.extend(state.idle.drain(..));
        }
        tracing::info!(idle = doomed.len(), "closing worker pool");
        for handle in doomed {
            self.factory.destroy(handle).await;
        }
    }

    /// Counts for the partition serving `key`.
    pub fn stats(&self, key: &WorkerKey) -> PartitionStats {
        match self.lookup(key) {
            Some(partition) => partition.stats(),
            None => PartitionStats {
                capacity: self.capacity_for(key),
                ..PartitionStats::default()
            },
        }
    }

    fn capacity_for(&self, key: &WorkerKey) -> usize {
        self.factory.options().max_instances_for(key.mnemonic())
    }

    /// Forget the partition for `key` once nothing is idle, borrowed, or waiting.
    fn prune(&self, key: &WorkerKey) {
        let mut inner = self.inner.lock();
        let unused = inner
            .partitions
            .get(key.identity())
            .is_some_and(|partition| partition.retire_if_unused());
        if unused {
            inner.partitions.remove(key.identity());
            tracing::debug!(mnemonic = key.mnemonic(), "dropped unused partition");
        }
    }

    fn lookup(&self, key: &WorkerKey) -> Option<Arc<Partition>> {
        self.inner.lock().partitions.get(key.identity()).cloned()
    }

    fn partition(&self, key: &WorkerKey) -> Result<Arc<Partition>, PoolError> {
        let capacity = self.capacity_for(key);
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(PoolError::Closed);
        }
        let partition = inner
            .partitions
            .entry(key.identity().clone())
            .or_insert_with(|| Arc::new(Partition::new(capacity)));
        Ok(Arc::clone(partition))
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
