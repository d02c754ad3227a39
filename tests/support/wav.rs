use std::path::Path;

#[allow(dead_code)]
pub fn write_test_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

#[allow(dead_code)]
pub fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| 0.5 * (2.0 * std::f64::consts::PI * freq_hz * n as f64 / sample_rate).sin())
        .collect()
}
