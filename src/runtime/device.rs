use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Condvar, Mutex, MutexGuard, OnceLock, PoisonError},
};

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use super::{Runtime, RuntimeError, RuntimeResult};
use crate::{
    config::Config,
    device::{Dim3, Idx3, Thread},
    kernel::{Kernel, LaunchConfig},
};

/// Launch configuration limits that a [`Device`] enforces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceLimits {
    pub max_threads_per_block: usize,
    /// Largest block shape, per dimension
    pub max_block_dim: Dim3,
    /// Largest grid shape, per dimension
    pub max_grid_dim: Dim3,
    /// Bytes of dynamic shared memory per block
    pub max_shared_bytes: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_threads_per_block: 1024,
            max_block_dim: Dim3 {
                x: 1024,
                y: 1024,
                z: 64,
            },
            max_grid_dim: Dim3 {
                x: 0x7fff_ffff,
                y: 65535,
                z: 65535,
            },
            max_shared_bytes: 48 * 1024,
        }
    }
}

impl DeviceLimits {
    fn validate(&self, config: &LaunchConfig) -> Result<(), String> {
        if config.grid.is_empty() {
            return Err(format!("grid {} is empty", config.grid));
        }

        if config.block.is_empty() {
            return Err(format!("block {} is empty", config.block));
        }

        // shapes are bounded before any of their sizes are computed
        if exceeds(config.block, self.max_block_dim) {
            return Err(format!(
                "block {} exceeds the maximum block shape {}",
                config.block, self.max_block_dim
            ));
        }

        if exceeds(config.grid, self.max_grid_dim) {
            return Err(format!(
                "grid {} exceeds the maximum grid shape {}",
                config.grid, self.max_grid_dim
            ));
        }

        if config.block.size() > self.max_threads_per_block {
            return Err(format!(
                "block {} has more than {} threads",
                config.block, self.max_threads_per_block
            ));
        }

        if config.shared_bytes > self.max_shared_bytes {
            return Err(format!(
                "{}B of shared memory exceed the maximum of {}B",
                config.shared_bytes, self.max_shared_bytes
            ));
        }

        Ok(())
    }
}

const fn exceeds(dim: Dim3, max: Dim3) -> bool {
    dim.x > max.x || dim.y > max.y || dim.z > max.z
}

/// Accelerator device that executes the blocks of a grid in parallel on a
/// pool of worker threads. The threads of one block run in order on the same
/// worker.
///
/// A launch returns once its grid has completed. Failures are never returned
/// by the launch, they are recorded as the device's last error, which
/// [`Runtime::synchronize`] reports and [`Runtime::last_error`] fetches and
/// clears.
///
/// Kernels must not launch grids on, or synchronize, the device that runs
/// them.
pub struct Device {
    pool: Option<ThreadPool>,
    limits: DeviceLimits,
    last_error: Mutex<Option<RuntimeError>>,
    in_flight: Mutex<usize>,
    idle: Condvar,
}

impl Device {
    /// Creates a device with its own pool of `config.worker_threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::NotInitialized`] iff the worker pool cannot be
    /// spawned.
    pub fn try_new(config: &Config) -> RuntimeResult<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("hemi-device-{i}"));

        if let Some(worker_threads) = config.worker_threads {
            builder = builder.num_threads(worker_threads.get());
        }

        let pool = builder
            .build()
            .map_err(|err| RuntimeError::NotInitialized(err.to_string()))?;

        Ok(Self::with_pool(Some(pool)))
    }

    /// Like [`Device::try_new`], but falls back to the global worker pool if
    /// a dedicated pool cannot be spawned.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::try_new(config).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to the global worker pool");

            Self::with_pool(None)
        })
    }

    /// The process-wide device that [`launch!`](crate::launch) and
    /// [`check_async_errors`](crate::check::check_async_errors) use,
    /// created from the global [`Config`] on first use.
    #[must_use]
    pub fn current() -> &'static Self {
        static CURRENT: OnceLock<Device> = OnceLock::new();

        CURRENT.get_or_init(|| Self::new(crate::config::global()))
    }

    /// Replaces the enforced launch limits.
    #[must_use]
    pub fn with_limits(mut self, limits: DeviceLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn limits(&self) -> &DeviceLimits {
        &self.limits
    }

    fn with_pool(pool: Option<ThreadPool>) -> Self {
        Self {
            pool,
            limits: DeviceLimits::default(),
            last_error: Mutex::new(None),
            in_flight: Mutex::new(0),
            idle: Condvar::new(),
        }
    }

    fn install_parallelism<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn begin(&self) -> InFlight<'_> {
        *lock(&self.in_flight) += 1;

        InFlight { device: self }
    }

    fn record(&self, err: RuntimeError) {
        tracing::debug!(%err, "recording device error");

        *lock(&self.last_error) = Some(err);
    }
}

impl Runtime for Device {
    fn launch<Args: Sync, K: Kernel<Args> + ?Sized>(
        &self,
        name: &'static str,
        config: &LaunchConfig,
        kernel: &K,
        args: &Args,
    ) {
        let _in_flight = self.begin();

        if let Err(reason) = self.limits.validate(config) {
            self.record(RuntimeError::InvalidConfiguration {
                kernel: name,
                reason,
            });
            return;
        }

        let LaunchConfig { grid, block, .. } = *config;

        tracing::debug!(
            kernel = name,
            %grid,
            %block,
            shared_bytes = config.shared_bytes,
            stream = %config.stream,
            "dispatching grid"
        );

        let result = self.install_parallelism(|| {
            (0..grid.size())
                .into_par_iter()
                .try_for_each(|block_id| {
                    let block_idx = Idx3::from_id(block_id, &grid);

                    (0..block.size()).try_for_each(|thread_id| {
                        let thread =
                            Thread::device(Idx3::from_id(thread_id, &block), block_idx, block, grid);

                        panic::catch_unwind(AssertUnwindSafe(|| kernel.invoke(&thread, args)))
                            .map_err(|payload| RuntimeError::LaunchFailure {
                                kernel: name,
                                block: block_idx,
                                thread: thread.idx(),
                                message: panic_message(payload.as_ref()),
                            })
                    })
                })
        });

        if let Err(err) = result {
            self.record(err);
        }
    }

    fn synchronize(&self) -> RuntimeResult {
        let mut in_flight = lock(&self.in_flight);

        while *in_flight > 0 {
            in_flight = self
                .idle
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }

        std::mem::drop(in_flight);

        self.peek_error()
    }

    fn last_error(&self) -> RuntimeResult {
        lock(&self.last_error).take().map_or(Ok(()), Err)
    }

    fn peek_error(&self) -> RuntimeResult {
        lock(&self.last_error).clone().map_or(Ok(()), Err)
    }
}

struct InFlight<'a> {
    device: &'a Device,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut in_flight = lock(&self.device.in_flight);

        *in_flight -= 1;

        if *in_flight == 0 {
            self.device.idle.notify_all();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        String::from(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("kernel panicked")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Device, DeviceLimits};
    use crate::{
        config::Config,
        device::{Dim3, Thread},
        kernel::{LaunchConfig, StreamId},
        runtime::{Runtime, RuntimeError},
    };

    fn device() -> Device {
        Device::new(&Config::default())
    }

    fn config(grid: u32, block: u32) -> LaunchConfig {
        LaunchConfig::new(Dim3::linear(grid), Dim3::linear(block), 0, StreamId::DEFAULT)
    }

    #[test]
    fn every_thread_of_the_grid_runs_once() {
        let device = device();
        let counter = AtomicUsize::new(0);

        let count = |_thread: &Thread, counter: &AtomicUsize| {
            counter.fetch_add(1, Ordering::Relaxed);
        };

        device.launch("count", &config(3, 7), &count, &(&counter,));

        assert_eq!(counter.load(Ordering::Relaxed), 21);
        assert_eq!(device.synchronize(), Ok(()));
    }

    #[test]
    fn empty_block_is_an_invalid_configuration() {
        let device = device();

        device.launch("noop", &config(1, 0), &|_: &Thread| (), &());

        assert!(matches!(
            device.last_error(),
            Err(RuntimeError::InvalidConfiguration { kernel: "noop", .. })
        ));
        assert_eq!(device.last_error(), Ok(()));
    }

    #[test]
    fn limits_are_enforced() {
        let device = device().with_limits(DeviceLimits {
            max_threads_per_block: 64,
            ..DeviceLimits::default()
        });

        device.launch("noop", &config(1, 128), &|_: &Thread| (), &());
        assert!(device.peek_error().is_err());
        assert!(device.last_error().is_err());

        let shared = LaunchConfig::new(Dim3::ONE, Dim3::ONE, 1 << 20, StreamId::DEFAULT);
        device.launch("noop", &shared, &|_: &Thread| (), &());
        assert!(device.last_error().is_err());

        let deep_block = LaunchConfig::new(
            Dim3::ONE,
            Dim3 { x: 1, y: 1, z: 65 },
            0,
            StreamId::DEFAULT,
        );
        device.launch("noop", &deep_block, &|_: &Thread| (), &());
        assert!(matches!(
            device.last_error(),
            Err(RuntimeError::InvalidConfiguration { reason, .. })
                if reason.contains("maximum block shape")
        ));

        let tall_grid = LaunchConfig::new(
            Dim3 {
                x: 1,
                y: 65536,
                z: 1,
            },
            Dim3::ONE,
            0,
            StreamId::DEFAULT,
        );
        device.launch("noop", &tall_grid, &|_: &Thread| (), &());
        assert!(matches!(
            device.last_error(),
            Err(RuntimeError::InvalidConfiguration { reason, .. })
                if reason.contains("maximum grid shape")
        ));

        assert_eq!(device.synchronize(), Ok(()));
    }

    #[test]
    fn overflowing_grid_is_an_invalid_configuration() {
        let device = device();
        let config = LaunchConfig::new(
            Dim3 {
                x: u32::MAX,
                y: u32::MAX,
                z: 2,
            },
            Dim3::ONE,
            0,
            StreamId::DEFAULT,
        );

        device.launch("huge", &config, &|_: &Thread| (), &());

        assert!(matches!(
            device.last_error(),
            Err(RuntimeError::InvalidConfiguration { kernel: "huge", .. })
        ));
    }

    #[test]
    #[expect(clippy::panic)]
    fn panicking_thread_is_a_launch_failure() {
        let device = device();

        let fault = |thread: &Thread| {
            if thread.index() == 5 {
                panic!("fault in thread five");
            }
        };

        device.launch("fault", &config(2, 4), &fault, &());

        match device.synchronize() {
            Err(RuntimeError::LaunchFailure {
                kernel, message, ..
            }) => {
                assert_eq!(kernel, "fault");
                assert_eq!(message, "fault in thread five");
            },
            other => panic!("expected a launch failure, got {other:?}"),
        }

        assert!(device.last_error().is_err());
        assert_eq!(device.synchronize(), Ok(()));
    }
}
