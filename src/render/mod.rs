pub mod colormap;
pub mod composite;
pub mod crossfade;
pub mod glitch;
pub mod resize;
pub mod sequence;
pub mod smear;
pub mod spectrogram;
