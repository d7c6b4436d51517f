//─────────────────────────────────────────────────────────────────────────────
// reporting metrics derived from MSE (PSNR, RMSE)
//─────────────────────────────────────────────────────────────────────────────

/// peak sample value for 8-bit channels
pub const PSNR_PEAK_U8: f64 = 255.0;

/// PSNR (peak signal-to-noise ratio) in decibels.
/// higher is better; identical images are capped by the 1e-12 MSE floor.
/// typical ranges for painterly approximations sit well below 30 dB.
#[inline]
pub fn psnr_from_mse(mse: f64, peak: f64) -> f64 {
    let mse = mse.max(1e-12);
    10.0 * ((peak * peak) / mse).log10()
}

/// metrics snapshot for logs and the run report
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub mse: f64,
    pub rmse: f64,
    pub psnr: f64,
}

impl MetricsSnapshot {
    pub fn from_mse(mse: f64) -> Self {
        Self {
            mse,
            rmse: mse.sqrt(),
            psnr: psnr_from_mse(mse, PSNR_PEAK_U8),
        }
    }
}
