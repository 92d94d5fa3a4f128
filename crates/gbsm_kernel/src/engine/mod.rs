//! Batch pricing engine with interchangeable execution backends.
//!
//! One kernel, several iteration strategies: the closed form lives in
//! `gbsm_models::analytical::price_with` and every backend routes through
//! it. Backends differ only in how they walk the batch: a plain loop,
//! a zipped columnar sweep, disjoint chunks on a rayon worker pool, or a
//! CUDA grid. That is what makes their outputs interchangeable.

mod cpu;
#[cfg(feature = "cuda")]
mod gpu;

use gbsm_core::math::CdfKind;
use gbsm_core::types::PricingError;
use thiserror::Error;

use crate::batch::OptionBatch;

/// Default threshold below which the parallel backend runs sequentially.
pub const DEFAULT_MIN_OPTIONS_PER_THREAD: usize = 1024;

/// Execution strategy for a batch.
///
/// All strategies compute the same per-element function; the choice trades
/// dispatch overhead against throughput for the batch size at hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionBackend {
    /// One element at a time, in order. Correctness baseline.
    #[default]
    Sequential,
    /// Zipped columnar sweep; elementwise independence lets the optimiser
    /// unroll and vectorise the loop.
    Vectorized,
    /// Static partition into contiguous chunks over the rayon worker pool.
    /// Each worker writes a disjoint output range, so no synchronisation is
    /// needed.
    Parallel,
    /// Whole batch staged to a CUDA device, one thread per element.
    #[cfg(feature = "cuda")]
    Gpu,
}

/// Engine configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_options_per_thread` must be at least 1.
    #[error("min_options_per_thread must be at least 1")]
    ZeroThreshold,

    /// The requested backend cannot evaluate the requested CDF strategy.
    #[error("backend {backend} only supports the Abramowitz-Stegun CDF")]
    UnsupportedCdf {
        /// Name of the offending backend.
        backend: &'static str,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Immutable engine configuration.
///
/// Use [`EngineConfig::builder`] to construct instances.
///
/// # Examples
/// ```
/// use gbsm_kernel::engine::{EngineConfig, ExecutionBackend};
///
/// let config = EngineConfig::builder()
///     .backend(ExecutionBackend::Parallel)
///     .chunk_size(4096)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.backend(), ExecutionBackend::Parallel);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    backend: ExecutionBackend,
    cdf: CdfKind,
    chunk_size: usize,
    min_options_per_thread: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: ExecutionBackend::default(),
            cdf: CdfKind::default(),
            chunk_size: 0,
            min_options_per_thread: DEFAULT_MIN_OPTIONS_PER_THREAD,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the execution backend.
    #[inline]
    pub fn backend(&self) -> ExecutionBackend {
        self.backend
    }

    /// Returns the normal-CDF strategy.
    #[inline]
    pub fn cdf(&self) -> CdfKind {
        self.cdf
    }

    /// Returns the parallel chunk size (0 = auto).
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the sequential-fallback threshold for the parallel backend.
    #[inline]
    pub fn min_options_per_thread(&self) -> usize {
        self.min_options_per_thread
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// - [`ConfigError::ZeroThreshold`] if `min_options_per_thread` is 0
    /// - [`ConfigError::UnsupportedCdf`] if the GPU backend is combined with
    ///   the exact CDF (the device kernel embeds the pinned approximation)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_options_per_thread == 0 {
            return Err(ConfigError::ZeroThreshold);
        }

        #[cfg(feature = "cuda")]
        if self.backend == ExecutionBackend::Gpu && self.cdf == CdfKind::Exact {
            return Err(ConfigError::UnsupportedCdf { backend: "Gpu" });
        }

        Ok(())
    }

    /// Determines whether a batch of `n` options should be parallelised.
    #[inline]
    fn should_parallelise(&self, n: usize) -> bool {
        n >= self.min_options_per_thread * rayon::current_num_threads()
    }

    /// Computes the effective chunk size for a batch of `n` options.
    #[inline]
    fn effective_chunk_size(&self, n: usize) -> usize {
        if self.chunk_size > 0 {
            self.chunk_size
        } else {
            // Auto: one contiguous chunk per worker
            n.div_ceil(rayon::current_num_threads()).max(1)
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineConfigBuilder {
    backend: Option<ExecutionBackend>,
    cdf: Option<CdfKind>,
    chunk_size: Option<usize>,
    min_options_per_thread: Option<usize>,
}

impl EngineConfigBuilder {
    /// Sets the execution backend.
    #[inline]
    pub fn backend(mut self, backend: ExecutionBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the normal-CDF strategy.
    #[inline]
    pub fn cdf(mut self, cdf: CdfKind) -> Self {
        self.cdf = Some(cdf);
        self
    }

    /// Sets the parallel chunk size (0 = one chunk per worker).
    #[inline]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Sets the sequential-fallback threshold for the parallel backend.
    #[inline]
    pub fn min_options_per_thread(mut self, min: usize) -> Self {
        self.min_options_per_thread = Some(min);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// See [`EngineConfig::validate`].
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            backend: self.backend.unwrap_or(defaults.backend),
            cdf: self.cdf.unwrap_or(defaults.cdf),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            min_options_per_thread: self
                .min_options_per_thread
                .unwrap_or(defaults.min_options_per_thread),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Batch pricer: dispatches a validated batch to the configured backend.
///
/// Stateless between calls: the pricer holds configuration (and, for the
/// GPU backend, the device context) but retains no reference to any batch
/// or result.
///
/// # Examples
/// ```
/// use gbsm_core::types::Flavor;
/// use gbsm_kernel::batch::OptionBatch;
/// use gbsm_kernel::engine::BatchPricer;
///
/// let batch = OptionBatch::new(
///     Flavor::Call.into(),
///     100.0.into(),
///     100.0.into(),
///     1.0.into(),
///     0.05.into(),
///     0.2.into(),
///     0.05.into(),
/// )
/// .unwrap();
///
/// let pricer = BatchPricer::default_config().unwrap();
/// let prices = pricer.price(&batch).unwrap();
/// assert!((prices[0] - 10.4506).abs() < 1e-3);
/// ```
#[derive(Debug)]
pub struct BatchPricer {
    config: EngineConfig,
    #[cfg(feature = "cuda")]
    gpu: Option<gpu::GpuContext>,
}

impl BatchPricer {
    /// Creates a pricer for the given configuration.
    ///
    /// For the GPU backend this acquires the device and compiles the kernel
    /// once, up front, so per-batch calls only move data.
    ///
    /// # Errors
    /// - [`PricingError::InvalidInput`] for an invalid configuration
    /// - [`PricingError::BackendFailure`] when the CUDA device or kernel
    ///   cannot be initialised
    pub fn new(config: EngineConfig) -> Result<Self, PricingError> {
        config.validate()?;

        #[cfg(feature = "cuda")]
        let gpu = match config.backend {
            ExecutionBackend::Gpu => Some(gpu::GpuContext::new(0)?),
            _ => None,
        };

        Ok(Self {
            config,
            #[cfg(feature = "cuda")]
            gpu,
        })
    }

    /// Creates a pricer with the default configuration (sequential, exact
    /// CDF).
    pub fn default_config() -> Result<Self, PricingError> {
        Self::new(EngineConfig::default())
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Prices every option in the batch.
    ///
    /// Returns one price per element, index-aligned with the batch.
    /// Degenerate rows (zero expiry or volatility) follow IEEE-754
    /// propagation and may hold ±intrinsic values or NaN; they never abort
    /// the rest of the batch.
    ///
    /// # Errors
    /// [`PricingError::BackendFailure`] when a GPU transfer or launch fails.
    /// CPU backends cannot fail on a validated batch.
    pub fn price(&self, batch: &OptionBatch) -> Result<Vec<f64>, PricingError> {
        let n = batch.len();

        #[cfg(feature = "cuda")]
        if self.config.backend == ExecutionBackend::Gpu {
            let ctx = self.gpu.as_ref().ok_or_else(|| {
                PricingError::BackendFailure("CUDA context not initialised".to_string())
            })?;
            return ctx.price(batch);
        }

        let mut out = vec![0.0; n];
        match self.config.backend {
            ExecutionBackend::Sequential => cpu::price_sequential(batch, self.config.cdf, &mut out),
            ExecutionBackend::Vectorized => cpu::price_vectorized(batch, self.config.cdf, &mut out),
            ExecutionBackend::Parallel => {
                if self.config.should_parallelise(n) {
                    let chunk = self.config.effective_chunk_size(n);
                    cpu::price_parallel(batch, self.config.cdf, chunk, &mut out);
                } else {
                    // Too small to amortise the fork-join; run the columnar sweep
                    cpu::price_vectorized(batch, self.config.cdf, &mut out);
                }
            }
            #[cfg(feature = "cuda")]
            ExecutionBackend::Gpu => unreachable!("handled above"),
        }

        Ok(out)
    }
}
