use std::path::Path;

use crate::error::{Error, Result};
use crate::process::{run_checked, ProcessRunner};

pub const FFMPEG: &str = "ffmpeg";

#[derive(Clone, Copy, Debug)]
pub struct TranscodeSettings {
    pub fps: u32,
    pub duration_secs: u32,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            duration_secs: 8,
        }
    }
}

pub fn ensure_ffmpeg<R: ProcessRunner + ?Sized>(runner: &R) -> Result<()> {
    if runner.probe(FFMPEG, "-version") {
        Ok(())
    } else {
        Err(Error::MissingTool(FFMPEG.into()))
    }
}

/// Arguments turning an animation into a streaming-friendly, even-sized
/// yuv420p MP4 of fixed rate and length.
pub fn transcode_args(input: &Path, output: &Path, settings: &TranscodeSettings) -> Vec<String> {
    vec![
        "-i".into(),
        input.display().to_string(),
        "-movflags".into(),
        "+faststart".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-vf".into(),
        "scale=trunc(iw/2)*2:trunc(ih/2)*2".into(),
        "-r".into(),
        settings.fps.to_string(),
        "-t".into(),
        settings.duration_secs.to_string(),
        "-y".into(),
        output.display().to_string(),
    ]
}

pub fn transcode<R: ProcessRunner + ?Sized>(
    runner: &R,
    input: &Path,
    output: &Path,
    settings: &TranscodeSettings,
) -> Result<()> {
    log::info!("Converting {} to MP4...", input.display());
    run_checked(runner, FFMPEG, &transcode_args(input, output, settings))?;
    log::info!("FFmpeg encoding complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ToolOutput;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        fail: bool,
    }

    impl ProcessRunner for Recorder {
        fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
            self.calls.borrow_mut().push((program.to_string(), args.to_vec()));
            Ok(ToolOutput {
                success: !self.fail,
                status: "exit status: 1".into(),
                stderr: "Invalid data found when processing input".into(),
            })
        }

        fn probe(&self, _program: &str, _version_arg: &str) -> bool {
            !self.fail
        }
    }

    #[test]
    fn fixed_argument_set() {
        let args = transcode_args(
            Path::new("out/a.gif"),
            Path::new("out/a.mp4"),
            &TranscodeSettings::default(),
        );
        assert_eq!(
            args,
            vec![
                "-i", "out/a.gif",
                "-movflags", "+faststart",
                "-pix_fmt", "yuv420p",
                "-vf", "scale=trunc(iw/2)*2:trunc(ih/2)*2",
                "-r", "30",
                "-t", "8",
                "-y", "out/a.mp4",
            ]
        );
    }

    #[test]
    fn transcode_invokes_ffmpeg_once() {
        let runner = Recorder::default();
        transcode(&runner, Path::new("a.gif"), Path::new("a.mp4"), &TranscodeSettings::default())
            .unwrap();
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ffmpeg");
    }

    #[test]
    fn failure_is_typed() {
        let runner = Recorder { fail: true, ..Default::default() };
        let err = transcode(&runner, Path::new("a.gif"), Path::new("a.mp4"), &TranscodeSettings::default())
            .unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
        assert!(matches!(ensure_ffmpeg(&runner), Err(Error::MissingTool(_))));
    }
}
