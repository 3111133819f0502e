// src/processing/snr.rs
use ndarray::{Array, Array1, Array2, ArrayD, ArrayView3, Axis, Dimension, IxDyn, Zip};
use rayon::prelude::*;

use crate::config::ZeroVariance;
use crate::error::{Result, SnrError};
use crate::processing::stats::RunningStats;

/// Per-band statistics over every pixel of the band.
pub fn spatial_stats(cube: ArrayView3<'_, f32>) -> Array1<RunningStats> {
    let bands = cube.len_of(Axis(2));

    let stats: Vec<RunningStats> = (0..bands)
        .into_par_iter()
        .map(|b| {
            let band = cube.index_axis(Axis(2), b);
            RunningStats::from_values(band.iter().copied())
        })
        .collect();

    Array1::from(stats)
}

/// Per-pixel statistics over the band axis.
pub fn spectral_stats(cube: ArrayView3<'_, f32>) -> Array2<RunningStats> {
    let (height, width, _) = cube.dim();
    let mut result = Array2::from_elem((height, width), RunningStats::new());

    Zip::from(&mut result)
        .and(cube.lanes(Axis(2)))
        .par_for_each(|stats, spectrum| {
            *stats = RunningStats::from_values(spectrum.iter().copied());
        });

    result
}

/// Statistics reduced along an arbitrary set of axes.
///
/// The output keeps the remaining axes in their original order: `&[0, 1]`
/// gives one entry per band, `&[2]` one per pixel and `&[0, 1, 2]` a 0-d
/// array covering the whole cube.
pub fn batch_stats(cube: ArrayView3<'_, f32>, axes: &[usize]) -> Result<ArrayD<RunningStats>> {
    let ndim = cube.ndim();
    if axes.is_empty() {
        return Err(SnrError::NoAxes);
    }

    let mut reduced = vec![false; ndim];
    for &axis in axes {
        if axis >= ndim {
            return Err(SnrError::AxisOutOfRange { axis, ndim });
        }
        if reduced[axis] {
            return Err(SnrError::DuplicateAxis(axis));
        }
        reduced[axis] = true;
    }

    let kept: Vec<usize> = (0..ndim).filter(|&axis| !reduced[axis]).collect();
    let kept_shape: Vec<usize> = kept.iter().map(|&axis| cube.len_of(Axis(axis))).collect();
    let lane_len: usize = axes.iter().map(|&axis| cube.len_of(Axis(axis))).product();

    // Kept axes first, reduced axes last: each output element then owns one
    // contiguous lane of the flattened, permuted cube.
    let order: Vec<usize> = kept.iter().chain(axes.iter()).copied().collect();
    let permuted = cube.into_dyn().permuted_axes(order);
    let flat: Vec<f32> = permuted.iter().copied().collect();

    let stats: Vec<RunningStats> = if lane_len == 0 {
        vec![RunningStats::new(); kept_shape.iter().product()]
    } else {
        flat.par_chunks(lane_len)
            .map(|lane| RunningStats::from_values(lane.iter().copied()))
            .collect()
    };

    Ok(ArrayD::from_shape_vec(IxDyn(&kept_shape), stats)?)
}

/// Spatial-domain SNR: one value per band, reducing over every pixel of the band.
pub fn spatial_snr(cube: ArrayView3<'_, f32>, policy: ZeroVariance) -> Array1<f64> {
    to_snr(&spatial_stats(cube), policy)
}

/// Spectral-domain SNR: one value per pixel, reducing over the band axis.
pub fn spectral_snr(cube: ArrayView3<'_, f32>, policy: ZeroVariance) -> Array2<f64> {
    to_snr(&spectral_stats(cube), policy)
}

/// SNR reduced along an arbitrary set of axes; see [`batch_stats`].
pub fn batch_snr(
    cube: ArrayView3<'_, f32>,
    axes: &[usize],
    policy: ZeroVariance,
) -> Result<ArrayD<f64>> {
    Ok(to_snr(&batch_stats(cube, axes)?, policy))
}

/// Map lane statistics to SNR values under `policy`.
pub fn to_snr<D: Dimension>(stats: &Array<RunningStats, D>, policy: ZeroVariance) -> Array<f64, D> {
    stats.map(|s| s.snr(policy))
}

/// Number of lanes whose standard deviation is zero.
pub fn zero_variance_lanes<D: Dimension>(stats: &Array<RunningStats, D>) -> usize {
    stats.iter().filter(|s| s.has_zero_variance()).count()
}

/// Arithmetic mean of the finite entries; NaN sentinels are skipped.
pub fn average_snr<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0usize), |(sum, count), &v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
