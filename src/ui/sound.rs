/// Sound engine: procedural chiptune effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// One effect per kind of noteworthy event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Chomp,
    Power,
    Capture,
    Caught,
    Cleared,
}

/// Which effect, if any, an event triggers. Alarm and calm transitions are
/// silent; the power pellet itself already announces them.
pub fn sfx_for(event: &GameEvent) -> Option<Sfx> {
    match event {
        GameEvent::PelletEaten { .. } => Some(Sfx::Chomp),
        GameEvent::PowerPelletEaten { .. } => Some(Sfx::Power),
        GameEvent::PursuerCaptured { .. } => Some(Sfx::Capture),
        GameEvent::PlayerCaught { .. } => Some(Sfx::Caught),
        GameEvent::MazeCleared => Some(Sfx::Cleared),
        GameEvent::PursuerAlarmed { .. } | GameEvent::PursuerCalmed { .. } => None,
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::cell::Cell;
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        chomp: [Arc<Vec<u8>>; 2],
        power: Arc<Vec<u8>>,
        capture: Arc<Vec<u8>>,
        caught: Arc<Vec<u8>>,
        cleared: Arc<Vec<u8>>,
        /// Alternates the two chomp pitches.
        chomp_phase: Cell<bool>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                chomp: [Arc::new(make_wav(&gen_chomp(420.0))), Arc::new(make_wav(&gen_chomp(300.0)))],
                power: Arc::new(make_wav(&gen_power())),
                capture: Arc::new(make_wav(&gen_capture())),
                caught: Arc::new(make_wav(&gen_caught())),
                cleared: Arc::new(make_wav(&gen_cleared())),
                chomp_phase: Cell::new(false),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match sfx {
                Sfx::Chomp => {
                    let phase = self.chomp_phase.get();
                    self.chomp_phase.set(!phase);
                    &self.chomp[phase as usize]
                }
                Sfx::Power => &self.power,
                Sfx::Capture => &self.capture,
                Sfx::Caught => &self.caught,
                Sfx::Cleared => &self.cleared,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn sample_count(seconds: f32) -> usize {
        (SAMPLE_RATE as f32 * seconds) as usize
    }

    /// Pellet: very short square-ish blip with a downward bend
    fn gen_chomp(freq: f32) -> Vec<f32> {
        let n = sample_count(0.05);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let f = freq * (1.0 - t * 0.3);
                let wave = (ti * f * TAU).sin().signum() * 0.5 + (ti * f * TAU).sin() * 0.5;
                wave * (1.0 - t) * 0.15
            })
            .collect()
    }

    /// Power pellet: rising warble
    fn gen_power() -> Vec<f32> {
        let n = sample_count(0.35);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let wobble = (ti * 18.0 * TAU).sin() * 60.0;
                let f = 250.0 + t * 500.0 + wobble;
                (ti * f * TAU).sin() * (1.0 - t).powf(0.5) * 0.3
            })
            .collect()
    }

    /// Pursuer captured: quick ascending arpeggio
    fn gen_capture() -> Vec<f32> {
        let notes = [784.0_f32, 988.0, 1175.0, 1568.0]; // G5 B5 D6 G6
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = sample_count(0.04);
            for i in 0..n {
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (ti * freq * TAU).sin() * 0.7 + (ti * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Player caught: long falling slide
    fn gen_caught() -> Vec<f32> {
        let n = sample_count(0.9);
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let f = 700.0 * (1.0 - t * 0.8);
                phase += f / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - t).powf(0.7) * 0.3
            })
            .collect()
    }

    /// Maze cleared: fanfare with a held final note
    fn gen_cleared() -> Vec<f32> {
        let notes = [(523.0_f32, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.35)]; // C5 E5 G5 C6
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            let n = sample_count(dur);
            for i in 0..n {
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = (ti * freq * TAU).sin() * 0.6
                    + (ti * freq * 2.0 * TAU).sin() * 0.3
                    + (ti * freq * 3.0 * TAU).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let wav = make_wav(&gen_capture());
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
            assert_eq!(wav.len(), 44 + data_size);
        }

        #[test]
        fn generators_stay_in_range() {
            for samples in [gen_chomp(420.0), gen_power(), gen_capture(), gen_caught(), gen_cleared()] {
                assert!(!samples.is_empty());
                assert!(samples.iter().all(|s| s.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

impl SoundEngine {
    pub fn play_events(&self, events: &[GameEvent]) {
        for sfx in events.iter().filter_map(sfx_for) {
            self.play(sfx);
        }
    }
}
