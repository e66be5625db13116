use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::AudioData;
use crate::error::{Error, Result};

const AMIN: f32 = 1e-10;

#[derive(Clone, Debug)]
pub struct MelParams {
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub fmin: f32,
    pub fmax: f32,
}

impl Default for MelParams {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            fmin: 0.0,
            fmax: 8000.0,
        }
    }
}

impl MelParams {
    /// Reject parameters the STFT and filterbank cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.n_fft < 2 || self.n_fft % 2 != 0 {
            return Err(Error::invalid_config("n_fft", format!("must be an even number >= 2, got {}", self.n_fft)));
        }
        if self.hop_length == 0 {
            return Err(Error::invalid_config("hop_length", "must be at least 1"));
        }
        if self.n_mels == 0 {
            return Err(Error::invalid_config("n_mels", "must be at least 1"));
        }
        if !(self.fmin >= 0.0 && self.fmax > self.fmin) {
            return Err(Error::invalid_config(
                "fmax",
                format!("must exceed fmin ({}), got {}", self.fmin, self.fmax),
            ));
        }
        Ok(())
    }
}

/// `n_mels × n_frames` matrix, row-major by mel band. Row 0 is the lowest band.
#[derive(Clone, Debug)]
pub struct MelSpectrogram {
    pub n_mels: usize,
    pub n_frames: usize,
    pub data: Vec<f32>,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

impl MelSpectrogram {
    pub fn get(&self, mel: usize, frame: usize) -> f32 {
        self.data[mel * self.n_frames + frame]
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Convert power to decibels referenced to the peak power, floored at
    /// `peak - top_db`.
    pub fn power_to_db(&self, top_db: Option<f32>) -> MelSpectrogram {
        let peak = self.data.iter().copied().fold(0.0f32, f32::max);
        let reference = 10.0 * peak.max(AMIN).log10();

        let mut data: Vec<f32> = self
            .data
            .iter()
            .map(|&p| 10.0 * p.max(AMIN).log10() - reference)
            .collect();

        if let Some(top_db) = top_db {
            let max_db = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let floor = max_db - top_db;
            for v in &mut data {
                *v = v.max(floor);
            }
        }

        MelSpectrogram {
            data,
            ..self.clone()
        }
    }
}

pub fn mel_spectrogram(audio: &AudioData, params: &MelParams) -> Result<MelSpectrogram> {
    params.validate()?;
    let sr = audio.sample_rate;
    let n_fft = params.n_fft;
    let n_bins = n_fft / 2 + 1;
    let fmax = params.fmax.min(sr as f32 / 2.0);

    let power = stft_power(&audio.samples, n_fft, params.hop_length);
    let n_frames = power.len() / n_bins;
    let filters = mel_filterbank(sr, n_fft, params.n_mels, params.fmin, fmax);

    log::info!(
        "Mel spectrogram: {} bands x {} frames (fmax={:.0}Hz)",
        params.n_mels,
        n_frames,
        fmax
    );

    let mut data = vec![0.0f32; params.n_mels * n_frames];
    for (m, weights) in filters.chunks(n_bins).enumerate() {
        for t in 0..n_frames {
            let column = &power[t * n_bins..(t + 1) * n_bins];
            data[m * n_frames + t] = weights
                .iter()
                .zip(column.iter())
                .map(|(w, p)| w * p)
                .sum();
        }
    }

    Ok(MelSpectrogram {
        n_mels: params.n_mels,
        n_frames,
        data,
        sample_rate: sr,
        duration_secs: audio.duration_secs(),
    })
}

/// Centered STFT power, frame-major (`n_frames × (n_fft/2 + 1)`).
/// Expects an even `n_fft` and a non-zero `hop`.
fn stft_power(samples: &[f32], n_fft: usize, hop: usize) -> Vec<f32> {
    let pad = n_fft / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let n_frames = 1 + (padded.len() - n_fft) / hop;
    let n_bins = n_fft / 2 + 1;
    let window = hann_window(n_fft);

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let mut power = Vec::with_capacity(n_frames * n_bins);
    let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); n_fft];
    for frame in 0..n_frames {
        let start = frame * hop;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(padded[start + i] * window[i], 0.0);
        }
        fft.process(&mut buffer);
        power.extend(buffer[..n_bins].iter().map(|c| c.norm_sqr()));
    }
    power
}

/// Triangular filters on the Slaney mel scale with area normalization.
/// Returned row-major, `n_mels × (n_fft/2 + 1)`.
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize, fmin: f32, fmax: f32) -> Vec<f32> {
    let n_bins = n_fft / 2 + 1;
    let fft_freqs: Vec<f32> = (0..n_bins)
        .map(|i| i as f32 * sample_rate as f32 / n_fft as f32)
        .collect();

    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);
    let mel_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32))
        .collect();

    let mut weights = vec![0.0f32; n_mels * n_bins];
    for m in 0..n_mels {
        let (lo, center, hi) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
        let enorm = 2.0 / (hi - lo);
        for (k, &f) in fft_freqs.iter().enumerate() {
            let lower = (f - lo) / (center - lo);
            let upper = (hi - f) / (hi - center);
            weights[m * n_bins + k] = lower.min(upper).max(0.0) * enorm;
        }
    }
    weights
}

const F_SP: f32 = 200.0 / 3.0;
const MIN_LOG_HZ: f32 = 1000.0;
const MIN_LOG_MEL: f32 = MIN_LOG_HZ / F_SP;

fn log_step() -> f32 {
    6.4f32.ln() / 27.0
}

pub fn hz_to_mel(hz: f32) -> f32 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f32) -> f32 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> AudioData {
        let n = (sample_rate as f32 * secs) as usize;
        AudioData {
            samples: (0..n)
                .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
                .collect(),
            sample_rate,
        }
    }

    #[test]
    fn mel_scale_round_trips() {
        for hz in [0.0f32, 440.0, 1000.0, 4000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 0.05, "{hz}");
        }
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn filterbank_is_non_negative_and_covers_bands() {
        let fb = mel_filterbank(22_050, 2048, 128, 0.0, 8000.0);
        assert_eq!(fb.len(), 128 * 1025);
        assert!(fb.iter().all(|&w| w >= 0.0));
        for row in fb.chunks(1025).skip(10) {
            assert!(row.iter().any(|&w| w > 0.0));
        }
    }

    #[test]
    fn frame_count_matches_centered_stft() {
        let audio = sine(440.0, 8000, 1.0);
        let spec = mel_spectrogram(&audio, &MelParams::default()).unwrap();
        assert_eq!(spec.n_frames, 1 + 8000 / 512);
        assert_eq!(spec.data.len(), 128 * spec.n_frames);
    }

    #[test]
    fn sine_energy_lands_in_matching_band() {
        let audio = sine(1000.0, 16_000, 1.0);
        let params = MelParams::default();
        let spec = mel_spectrogram(&audio, &params).unwrap();
        let mid = spec.n_frames / 2;
        let loudest = (0..spec.n_mels)
            .max_by(|&a, &b| spec.get(a, mid).partial_cmp(&spec.get(b, mid)).unwrap())
            .unwrap();

        let mel_max = hz_to_mel(params.fmax);
        let expected = (hz_to_mel(1000.0) / mel_max * (params.n_mels + 1) as f32) as i64 - 1;
        assert!((loudest as i64 - expected).abs() <= 2, "{loudest} vs {expected}");
    }

    #[test]
    fn degenerate_params_are_rejected() {
        let silence = AudioData { samples: Vec::new(), sample_rate: 8000 };
        let cases = [
            ("hop_length", MelParams { hop_length: 0, ..Default::default() }),
            ("n_fft", MelParams { n_fft: 2047, ..Default::default() }),
            ("n_fft", MelParams { n_fft: 0, ..Default::default() }),
            ("n_mels", MelParams { n_mels: 0, ..Default::default() }),
            ("fmax", MelParams { fmax: 0.0, ..Default::default() }),
        ];
        for (expected, params) in cases {
            match mel_spectrogram(&silence, &params) {
                Err(Error::InvalidConfig { key, .. }) => assert_eq!(key, expected),
                other => panic!("{expected}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn empty_audio_still_yields_one_frame() {
        let silence = AudioData { samples: Vec::new(), sample_rate: 8000 };
        let spec = mel_spectrogram(&silence, &MelParams::default()).unwrap();
        assert_eq!(spec.n_frames, 1);
    }

    #[test]
    fn db_is_referenced_to_peak_and_floored() {
        let spec = MelSpectrogram {
            n_mels: 1,
            n_frames: 3,
            data: vec![1.0, 0.1, 0.0],
            sample_rate: 8000,
            duration_secs: 1.0,
        };
        let db = spec.power_to_db(Some(80.0));
        assert!((db.data[0] - 0.0).abs() < 1e-4);
        assert!((db.data[1] + 10.0).abs() < 1e-4);
        assert!((db.data[2] + 80.0).abs() < 1e-4);
        assert_eq!(db.min_max(), (db.data[2], db.data[0]));
    }
}
