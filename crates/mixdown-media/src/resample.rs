//! Sample-rate conversion for interleaved stereo buffers.

use mixdown_core::{MixdownError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample an interleaved stereo buffer to `target_rate`.
///
/// Returns the input unchanged when the rates already match.
pub fn resample_stereo(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let channels = 2usize;
    let input_frames = samples.len() / channels;
    let resample_ratio = target_rate as f64 / source_rate as f64;

    // Deinterleave into per-channel buffers for rubato.
    let mut input_channels = vec![Vec::with_capacity(input_frames); channels];
    for frame_idx in 0..input_frames {
        for ch in 0..channels {
            input_channels[ch].push(samples[frame_idx * channels + ch]);
        }
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, input_frames, channels)
        .map_err(|e| MixdownError::Resample(e.to_string()))?;

    let output_channels = resampler
        .process(&input_channels, None)
        .map_err(|e| MixdownError::Resample(e.to_string()))?;

    // Reinterleave.
    let output_frames = output_channels[0].len();
    let mut output = Vec::with_capacity(output_frames * channels);
    for frame_idx in 0..output_frames {
        for ch in 0..channels {
            output.push(output_channels[ch][frame_idx]);
        }
    }

    Ok(output)
}
