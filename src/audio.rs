use clap::ValueEnum;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Cursor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

/// Joins the parts of a batch into one file, in input order.
///
/// MP3 is a bare frame stream, so the parts are appended byte for byte. WAV
/// carries a RIFF header with the data length, so the samples are re-encoded
/// into a single file using the first part's spec.
pub fn combine<B: AsRef<[u8]>>(format: AudioFormat, parts: &[B]) -> Result<Vec<u8>, hound::Error> {
    match format {
        AudioFormat::Mp3 => Ok(concat_bytes(parts)),
        AudioFormat::Wav => merge_wav(parts),
    }
}

pub fn concat_bytes<B: AsRef<[u8]>>(parts: &[B]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part.as_ref());
    }
    out
}

fn merge_wav<B: AsRef<[u8]>>(parts: &[B]) -> Result<Vec<u8>, hound::Error> {
    let Some(first) = parts.first() else {
        return Ok(Vec::new());
    };
    let spec = WavReader::new(Cursor::new(first.as_ref()))?.spec();

    let mut out = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut out, spec)?;
        for part in parts {
            let mut reader = WavReader::new(Cursor::new(part.as_ref()))?;
            if reader.spec() != spec {
                return Err(hound::Error::Unsupported);
            }
            match spec.sample_format {
                SampleFormat::Int => {
                    for sample in reader.samples::<i32>() {
                        writer.write_sample(sample?)?;
                    }
                }
                SampleFormat::Float => {
                    for sample in reader.samples::<f32>() {
                        writer.write_sample(sample?)?;
                    }
                }
            }
        }
        writer.finalize()?;
    }
    Ok(out.into_inner())
}

pub fn wav_duration_seconds(bytes: &[u8]) -> Result<f64, hound::Error> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    let duration = frames / spec.sample_rate as f64;
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavSpec;

    fn wav(samples: &[i16]) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn mp3_parts_are_appended_in_order() {
        let parts = vec![b"ID3abc".to_vec(), b"def".to_vec(), Vec::new(), b"g".to_vec()];
        let combined = combine(AudioFormat::Mp3, &parts).unwrap();
        assert_eq!(combined, b"ID3abcdefg");
    }

    #[test]
    fn wav_parts_merge_into_one_header() {
        let a = wav(&[1, 2, 3]);
        let b = wav(&[4, 5]);
        let combined = combine(AudioFormat::Wav, &[a, b]).unwrap();

        let mut reader = WavReader::new(Cursor::new(&combined)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1, 2, 3, 4, 5]);
        assert_eq!(&combined[..4], b"RIFF");
    }

    #[test]
    fn wav_with_mismatched_spec_is_rejected() {
        let a = wav(&[1, 2]);
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        assert!(combine(AudioFormat::Wav, &[a, cursor.into_inner()]).is_err());
    }

    #[test]
    fn duration_of_one_second_clip() {
        let clip = wav(&[0; 8000]);
        let secs = wav_duration_seconds(&clip).unwrap();
        assert!((secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mime_and_extension() {
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }
}
