pub mod decode;
pub mod fingerprint;
pub mod mel;
