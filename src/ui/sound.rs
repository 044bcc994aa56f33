/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink; the
/// simulation never waits on audio.
///
/// Compile with `--no-default-features` or without the "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_dot: Arc<Vec<u8>>,
        sfx_pellet: Arc<Vec<u8>>,
        sfx_fruit: Arc<Vec<u8>>,
        sfx_eat: Arc<Vec<u8>>,
        sfx_caught: Arc<Vec<u8>>,
        sfx_level: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let sfx_dot = Arc::new(make_wav(&gen_dot()));
            let sfx_pellet = Arc::new(make_wav(&gen_pellet()));
            let sfx_fruit = Arc::new(make_wav(&gen_fruit()));
            let sfx_eat = Arc::new(make_wav(&gen_eat()));
            let sfx_caught = Arc::new(make_wav(&gen_caught()));
            let sfx_level = Arc::new(make_wav(&gen_level()));
            let sfx_game_over = Arc::new(make_wav(&gen_game_over()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_dot,
                sfx_pellet,
                sfx_fruit,
                sfx_eat,
                sfx_caught,
                sfx_level,
                sfx_game_over,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_dot(&self) { self.play(&self.sfx_dot); }
        pub fn play_pellet(&self) { self.play(&self.sfx_pellet); }
        pub fn play_fruit(&self) { self.play(&self.sfx_fruit); }
        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_caught(&self) { self.play(&self.sfx_caught); }
        pub fn play_level(&self) { self.play(&self.sfx_level); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Simple sine blip at given frequency and duration
    fn blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32); // linear fade out
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * volume
            })
            .collect()
    }

    /// Ascending run of square-ish notes with a retro envelope.
    fn run(notes: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Dot munch: the classic short 440 Hz tick.
    fn gen_dot() -> Vec<f32> {
        blip(440.0, 0.05, 0.2)
    }

    /// Power pellet: rising two-note alarm.
    fn gen_pellet() -> Vec<f32> {
        run(&[523.0, 784.0], 0.08, 0.25)
    }

    /// Fruit: quick major arpeggio.
    fn gen_fruit() -> Vec<f32> {
        run(&[659.0, 831.0, 988.0], 0.05, 0.25)
    }

    /// Pursuer eaten: a gulp sweeping downward.
    fn gen_eat() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.18) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let frac = i as f32 / n as f32;
                let freq = 900.0 - 600.0 * frac;
                let env = 1.0 - frac;
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.3
            })
            .collect()
    }

    /// Player caught: slow descending groan.
    fn gen_caught() -> Vec<f32> {
        run(&[440.0, 349.0, 262.0, 196.0], 0.12, 0.3)
    }

    /// Level cleared: triumphant ascending run.
    fn gen_level() -> Vec<f32> {
        run(&[523.0, 659.0, 784.0, 1047.0], 0.09, 0.3)
    }

    /// Game over: long minor descent.
    fn gen_game_over() -> Vec<f32> {
        run(&[392.0, 311.0, 262.0, 196.0, 131.0], 0.16, 0.3)
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoding
    // ════════════════════════════════════════════════════════════

    /// Wrap mono f32 samples into a 16-bit PCM WAV buffer.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::with_capacity(44 + samples.len() * 2);

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        out.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        out.extend_from_slice(&2u16.to_le_bytes()); // block align
        out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            out.extend_from_slice(&v.to_le_bytes());
        }

        out
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

/// Stub engine when the "sound" feature is disabled.
#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }

    pub fn play_dot(&self) {}
    pub fn play_pellet(&self) {}
    pub fn play_fruit(&self) {}
    pub fn play_eat(&self) {}
    pub fn play_caught(&self) {}
    pub fn play_level(&self) {}
    pub fn play_game_over(&self) {}
}
