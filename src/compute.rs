// OgmaNeo Rust port - compute systems (per-slot dispatch)

use rayon::prelude::*;

use crate::error::Result;

/// Dispatches a per-slot function over an index space.
///
/// Every slot must be computable independently of every other slot in the
/// same dispatch. A dispatch returns only once all slots are done, so
/// consecutive dispatches are ordered.
pub trait ComputeSystem {
    /// Evaluate `f` for every index in `0..len`, collecting results in order.
    fn map_range<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;

    /// Split `data` into `chunk_size` pieces and hand each, with its chunk
    /// index, to `f`.
    fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_size: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send;
}

/// Runs every slot on the calling thread, in index order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialSystem;

impl ComputeSystem for SerialSystem {
    fn map_range<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        (0..len).map(f).collect()
    }

    fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_size: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        data.chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(i, chunk)| f(i, chunk));
    }
}

/// Spreads slots over rayon workers.
///
/// Uses the global rayon pool unless built with
/// [`with_num_threads`](Self::with_num_threads).
#[derive(Debug, Default)]
pub struct ParallelSystem {
    pool: Option<rayon::ThreadPool>,
}

impl ParallelSystem {
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Dedicated pool with `num_threads` workers (0 lets rayon decide).
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        let system = Self { pool: Some(pool) };
        log::debug!("[COMPUTE] dedicated rayon pool: {} threads", system.num_threads());

        Ok(system)
    }

    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl ComputeSystem for ParallelSystem {
    fn map_range<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let run = || -> Vec<T> { (0..len).into_par_iter().map(&f).collect() };

        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_size: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| {
                data.par_chunks_mut(chunk_size)
                    .enumerate()
                    .for_each(|(i, chunk)| f(i, chunk))
            }),
            None => data
                .par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk)),
        }
    }
}
