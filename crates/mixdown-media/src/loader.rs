//! Waveform source loading.

use std::fs::File;
use std::path::Path;

use mixdown_core::{MixdownError, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::resample::resample_stereo;

/// Decode an audio file to interleaved stereo f32 at `target_rate`.
///
/// Mono sources are duplicated to both channels; sources with more than two
/// channels are rejected. The returned buffer is what a clip's waveform
/// cache holds, so its length is always even.
pub fn load_waveform(path: &Path, target_rate: u32) -> Result<Vec<f32>> {
    let (samples, channels, source_rate) = decode_file(path)?;

    let interleaved = match channels {
        1 => {
            let mut stereo = Vec::with_capacity(samples.len() * 2);
            for s in &samples {
                stereo.push(*s);
                stereo.push(*s);
            }
            stereo
        }
        2 => samples,
        n => {
            return Err(MixdownError::UnsupportedFormat(format!(
                "{}: {} channels (only mono and stereo sources are supported)",
                path.display(),
                n
            )))
        }
    };

    if source_rate == target_rate {
        return Ok(interleaved);
    }

    debug!(
        "resampling {} from {} Hz to {} Hz",
        path.display(),
        source_rate,
        target_rate
    );
    resample_stereo(&interleaved, source_rate, target_rate)
}

/// Decode a file to interleaved f32 in its native channel layout and rate.
fn decode_file(path: &Path) -> Result<(Vec<f32>, usize, u32)> {
    let file = File::open(path)
        .map_err(|e| MixdownError::NotFound(format!("{}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| MixdownError::Decode(format!("{}: {}", path.display(), e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| MixdownError::Decode(format!("{}: no default track", path.display())))?;

    let source_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| MixdownError::Decode(format!("{}: {}", path.display(), e)))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(MixdownError::Decode(format!("{}: {}", path.display(), e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| MixdownError::Decode(format!("{}: {}", path.display(), e)))?;
        let spec = *decoded.spec();
        let duration = decoded.capacity() as u64;

        let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    debug!(
        "decoded {}: {} samples, {} ch, {} Hz",
        path.display(),
        samples.len(),
        channels,
        source_rate
    );

    Ok((samples, channels, source_rate))
}
