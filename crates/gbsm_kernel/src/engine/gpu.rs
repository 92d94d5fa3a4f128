//! CUDA execution strategy.
//!
//! The device kernel is the closed form transcribed statement for statement
//! from `gbsm_models::analytical::price_with`, with the normal CDF built on
//! the same Abramowitz & Stegun 7.1.26 erf coefficients as
//! `gbsm_core::math::fast_norm_cdf`. Keep the two copies in lockstep: the
//! coefficient set is the cross-backend agreement contract.
//!
//! The whole batch is staged to device memory before the launch and the
//! price array is copied back afterwards; the context holds no batch state
//! between calls.

use std::sync::Arc;

use cudarc::driver::{CudaDevice, CudaSlice, DriverError, LaunchAsync, LaunchConfig};
use cudarc::nvrtc::compile_ptx;

use gbsm_core::types::PricingError;

use crate::batch::OptionBatch;

const MODULE_NAME: &str = "gbsm";
const KERNEL_NAME: &str = "gbsm_price_kernel";

const KERNEL_SRC: &str = r#"
// Abramowitz & Stegun 7.1.26 erf, |error| <= 1.5e-7. The coefficients
// mirror the host-side approximation; both copies must stay identical.
extern "C" __device__ double erf_approx(double x) {
    const double a1 = 0.254829592;
    const double a2 = -0.284496736;
    const double a3 = 1.421413741;
    const double a4 = -1.453152027;
    const double a5 = 1.061405429;
    const double p = 0.3275911;

    double abs_x = fabs(x);
    double t = 1.0 / (1.0 + p * abs_x);
    double poly = ((((a5 * t + a4) * t + a3) * t + a2) * t + a1) * t;
    double y = 1.0 - poly * exp(-abs_x * abs_x);

    return x < 0.0 ? -y : y;
}

extern "C" __device__ double norm_cdf(double x) {
    // Phi(x) = 0.5 * (1 + erf(x / sqrt(2)))
    return 0.5 * (1.0 + erf_approx(x * 0.7071067811865476));
}

// One thread per option. flavor: 1 = Call, 0 = Put.
extern "C" __global__ void gbsm_price_kernel(
    const int *flavor,
    const double *spot,
    const double *strike,
    const double *expiry,
    const double *rate,
    const double *volatility,
    const double *carry,
    double *price,
    int n
) {
    int i = blockIdx.x * blockDim.x + threadIdx.x;
    if (i >= n) return;

    double s = spot[i];
    double k = strike[i];
    double t = expiry[i];
    double r = rate[i];
    double sigma = volatility[i];
    double b = carry[i];

    double sqrt_t = sqrt(t);
    double d1 = (log(s / k) + (b + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    double d2 = d1 - sigma * sqrt_t;

    double carry_df = exp((b - r) * t);
    double discount = exp(-r * t);

    price[i] = flavor[i] == 1
        ? s * carry_df * norm_cdf(d1) - k * discount * norm_cdf(d2)
        : k * discount * norm_cdf(-d2) - s * carry_df * norm_cdf(-d1);
}
"#;

fn driver_err(err: DriverError) -> PricingError {
    PricingError::BackendFailure(format!("CUDA driver error: {err:?}"))
}

/// A CUDA device with the pricing kernel compiled and loaded.
pub(crate) struct GpuContext {
    device: Arc<CudaDevice>,
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("ordinal", &self.device.ordinal())
            .finish()
    }
}

impl GpuContext {
    /// Acquires the device at `ordinal` and JIT-compiles the kernel.
    pub(crate) fn new(ordinal: usize) -> Result<Self, PricingError> {
        let device = CudaDevice::new(ordinal).map_err(driver_err)?;

        let ptx = compile_ptx(KERNEL_SRC).map_err(|err| {
            PricingError::BackendFailure(format!("NVRTC compilation failed: {err:?}"))
        })?;
        device
            .load_ptx(ptx, MODULE_NAME, &[KERNEL_NAME])
            .map_err(driver_err)?;

        Ok(Self { device })
    }

    /// Prices the batch on the device, one thread per element.
    pub(crate) fn price(&self, batch: &OptionBatch) -> Result<Vec<f64>, PricingError> {
        let n = batch.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let tags: Vec<i32> = batch.flavors().iter().map(|f| f.tag() as i32).collect();

        let flavor_dev = self.device.htod_copy(tags).map_err(driver_err)?;
        let spot_dev = self.to_device(batch.spots())?;
        let strike_dev = self.to_device(batch.strikes())?;
        let expiry_dev = self.to_device(batch.expiries())?;
        let rate_dev = self.to_device(batch.rates())?;
        let vol_dev = self.to_device(batch.volatilities())?;
        let carry_dev = self.to_device(batch.carries())?;
        let mut price_dev = self.device.alloc_zeros::<f64>(n).map_err(driver_err)?;

        let kernel = self
            .device
            .get_func(MODULE_NAME, KERNEL_NAME)
            .ok_or_else(|| {
                PricingError::BackendFailure(format!("kernel {KERNEL_NAME} not loaded"))
            })?;
        let cfg = LaunchConfig::for_num_elems(n as u32);

        unsafe {
            kernel.launch(
                cfg,
                (
                    &flavor_dev,
                    &spot_dev,
                    &strike_dev,
                    &expiry_dev,
                    &rate_dev,
                    &vol_dev,
                    &carry_dev,
                    &mut price_dev,
                    n as i32,
                ),
            )
        }
        .map_err(driver_err)?;

        self.device.dtoh_sync_copy(&price_dev).map_err(driver_err)
    }

    fn to_device(&self, values: &[f64]) -> Result<CudaSlice<f64>, PricingError> {
        self.device.htod_copy(values.to_vec()).map_err(driver_err)
    }
}
