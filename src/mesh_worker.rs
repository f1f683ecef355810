//! Parallel mesh generation worker pool.
//!
//! An RPG world is a set of independent map grids; the pool meshes them
//! concurrently on the rayon pool and sends finished buffers back to the
//! main thread via crossbeam channels.

use crossbeam::channel::{bounded, Receiver, Sender};
use std::sync::Arc;

use crate::mesh_buffer::MeshBuffer;
use crate::mesh_builder::{MeshBuilder, MeshConfig};
use crate::tile_grid::TileGrid;

/// Fraction of detected CPUs to use for mesh worker threads (numerator).
const THREAD_CPU_NUMERATOR: usize = 3;
/// Fraction of detected CPUs to use for mesh worker threads (denominator).
const THREAD_CPU_DENOMINATOR: usize = 4;
/// Minimum number of mesh worker threads.
const MIN_WORKER_THREADS: usize = 2;
/// Minimum batch size for processing mesh requests.
const MIN_BATCH_SIZE: usize = 16;
/// Default channel capacity for mesh request/result channels.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Identifies one map region within the larger world
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapCoord {
    pub x: i32,
    pub z: i32,
}

impl MapCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Request sent from main thread to workers
pub struct MeshRequest {
    pub coord: MapCoord,
    pub grid: Arc<TileGrid>,
    pub config: MeshConfig,
}

/// Finished mesh for one map region
pub struct MeshResult {
    pub coord: MapCoord,
    pub buffer: MeshBuffer,
}

/// Worker pool for parallel mesh generation
pub struct MeshWorkerPool {
    thread_count: usize,
    request_tx: Sender<MeshRequest>,
    request_rx: Receiver<MeshRequest>,
    result_tx: Sender<MeshResult>,
    result_rx: Receiver<MeshResult>,
}

impl MeshWorkerPool {
    pub fn new(num_threads: usize, channel_capacity: usize) -> Self {
        let detected_cpus = num_cpus::get();
        let threads = if num_threads == 0 {
            ((detected_cpus * THREAD_CPU_NUMERATOR) / THREAD_CPU_DENOMINATOR)
                .max(MIN_WORKER_THREADS)
        } else {
            num_threads
        };

        let (request_tx, request_rx) = bounded(channel_capacity);
        let (result_tx, result_rx) = bounded(channel_capacity);

        Self {
            thread_count: threads,
            request_tx,
            request_rx,
            result_tx,
            result_rx,
        }
    }

    pub fn request_sender(&self) -> Sender<MeshRequest> {
        self.request_tx.clone()
    }

    pub fn result_receiver(&self) -> Receiver<MeshResult> {
        self.result_rx.clone()
    }

    pub fn process_requests(&self) {
        let batch_size = rayon::current_num_threads().max(MIN_BATCH_SIZE);
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.request_rx.try_recv() {
                Ok(req) => batch.push(req),
                Err(_) => break,
            }
        }

        if batch.is_empty() {
            return;
        }

        let result_tx = self.result_tx.clone();

        rayon::scope(|scope| {
            for request in batch {
                let tx = result_tx.clone();
                scope.spawn(move |_| {
                    let mesh = generate_mesh_for_request(&request);
                    let _ = tx.try_send(mesh);
                });
            }
        });
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn shutdown(&mut self) {
        while self.request_rx.try_recv().is_ok() {}
        while self.result_rx.try_recv().is_ok() {}
    }
}

impl Default for MeshWorkerPool {
    fn default() -> Self {
        Self::new(0, DEFAULT_CHANNEL_CAPACITY)
    }
}

fn generate_mesh_for_request(request: &MeshRequest) -> MeshResult {
    let buffer = MeshBuilder::new(request.config).build(&request.grid);
    MeshResult {
        coord: request.coord,
        buffer,
    }
}
