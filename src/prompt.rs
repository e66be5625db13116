use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const MIN_SATURATION: f32 = 0.0;
pub const MAX_SATURATION: f32 = 2.0;

/// Ask a question on `output` and read one line from `input`.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> std::io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Dropped-in paths often arrive wrapped in single quotes.
pub fn clean_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches('\''))
}

pub fn clamp_saturation(value: f32) -> f32 {
    value.clamp(MIN_SATURATION, MAX_SATURATION)
}

/// Empty input means `default`, unparseable input falls back to `default`
/// with a warning, anything else is clamped into range.
pub fn parse_saturation(raw: &str, default: f32) -> f32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() => clamp_saturation(v),
        _ => {
            log::warn!("Invalid saturation value {:?}, using default ({})", raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn strips_quotes_and_newline() {
        assert_eq!(clean_path("'/music/My Song.wav'\n"), PathBuf::from("/music/My Song.wav"));
        assert_eq!(clean_path("cover.png"), PathBuf::from("cover.png"));
    }

    #[test]
    fn saturation_defaults_and_clamps() {
        assert_eq!(parse_saturation("", 1.0), 1.0);
        assert_eq!(parse_saturation("  \n", 0.7), 0.7);
        assert_eq!(parse_saturation("0.5", 1.0), 0.5);
        assert_eq!(parse_saturation("9", 1.0), 2.0);
        assert_eq!(parse_saturation("-1", 1.0), 0.0);
        assert_eq!(parse_saturation("vivid", 1.0), 1.0);
        assert_eq!(parse_saturation("NaN", 1.0), 1.0);
        assert_eq!(clamp_saturation(3.5), 2.0);
    }

    #[test]
    fn ask_writes_question_and_reads_line() {
        let mut input = Cursor::new(b"'a.png'\nrest".to_vec());
        let mut output = Vec::new();
        let answer = ask(&mut input, &mut output, "Path: ").unwrap();
        assert_eq!(output, b"Path: ");
        assert_eq!(clean_path(&answer), PathBuf::from("a.png"));
    }
}
