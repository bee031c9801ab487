//! Freeverb reverberation core
//!
//! Mono Freeverb network used by the room simulator:
//! - 8 parallel lowpass-feedback comb filters
//! - 4 series allpass filters for diffusion

// ============================================================================
// Freeverb Constants
// ============================================================================

/// Reference sample rate for Freeverb delays
const REFERENCE_SAMPLE_RATE: f64 = 44100.0;

/// Comb filter delays at 44100 Hz (8 filters)
const COMB_DELAYS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass filter delays at 44100 Hz (4 filters)
const ALLPASS_DELAYS: [usize; 4] = [556, 441, 341, 225];

/// Fixed gain for allpass filters (standard Freeverb value)
const ALLPASS_GAIN: f32 = 0.5;

/// Input attenuation ahead of the comb bank
const FIXED_INPUT_GAIN: f32 = 0.015;

/// Scale factor for room size parameter to feedback
const ROOM_SCALE: f32 = 0.28;

/// Offset for room size parameter to feedback
const ROOM_OFFSET: f32 = 0.7;

/// Scale factor for damping parameter
const DAMP_SCALE: f32 = 0.4;

// ============================================================================
// Filter Components
// ============================================================================

/// Low-pass comb filter
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    mask: usize,
    delay: usize,
    filter_state: f32,
    feedback: f32,
    damp1: f32,
    damp2: f32,
}

impl CombFilter {
    fn new(delay: usize, feedback: f32, damping: f32) -> Self {
        // Power of 2 size for mask wrapping
        let size = delay.next_power_of_two();
        Self {
            buffer: vec![0.0; size],
            write_pos: 0,
            mask: size - 1,
            delay,
            filter_state: 0.0,
            feedback,
            damp1: damping,
            damp2: 1.0 - damping,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let read_pos = (self.write_pos + self.mask + 1 - self.delay) & self.mask;
        let output = self.buffer[read_pos];

        self.filter_state = output * self.damp2 + self.filter_state * self.damp1;
        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) & self.mask;

        output
    }
}

/// Allpass diffuser
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    mask: usize,
    delay: usize,
}

impl AllpassFilter {
    fn new(delay: usize) -> Self {
        let size = delay.next_power_of_two();
        Self {
            buffer: vec![0.0; size],
            write_pos: 0,
            mask: size - 1,
            delay,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let read_pos = (self.write_pos + self.mask + 1 - self.delay) & self.mask;
        let delayed = self.buffer[read_pos];

        let output = delayed - ALLPASS_GAIN * input;
        self.buffer[self.write_pos] = input + ALLPASS_GAIN * output;
        self.write_pos = (self.write_pos + 1) & self.mask;

        output
    }
}

// ============================================================================
// Reverb network
// ============================================================================

/// Mono Freeverb network producing the fully wet signal
#[derive(Debug, Clone)]
pub struct Freeverb {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl Freeverb {
    /// Build a network for `sample_rate`
    ///
    /// `room_size` and `damping` are in 0..=1 and are clamped.
    pub fn new(sample_rate: u32, room_size: f32, damping: f32) -> Self {
        let scale = sample_rate as f64 / REFERENCE_SAMPLE_RATE;
        let feedback = room_size.clamp(0.0, 1.0) * ROOM_SCALE + ROOM_OFFSET;
        let damp = damping.clamp(0.0, 1.0) * DAMP_SCALE;

        let combs = COMB_DELAYS
            .iter()
            .map(|&d| CombFilter::new(((d as f64 * scale) as usize).max(1), feedback, damp))
            .collect();
        let allpasses = ALLPASS_DELAYS
            .iter()
            .map(|&d| AllpassFilter::new(((d as f64 * scale) as usize).max(1)))
            .collect();

        Self { combs, allpasses }
    }

    /// Process one sample, returning the wet output
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let scaled = input * FIXED_INPUT_GAIN;
        let mut out: f32 = self.combs.iter_mut().map(|c| c.process(scaled)).sum();
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }
}
