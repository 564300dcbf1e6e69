//! Audio mixer: sums fully decoded tracks into one clamped output window.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use reelcut_core::{micros_to_sample_frames, AudioSample, IdAllocator, Micros, TrackId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Default output channel count.
pub const DEFAULT_CHANNELS: u16 = 2;

/// One track of decoded PCM placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    pub id: TrackId,
    /// Timeline position of the first sample.
    pub position: Micros,
    pub pcm: AudioSample,
    /// Volume (0.0 to 1.0).
    pub volume: f32,
    pub muted: bool,
}

impl AudioTrack {
    /// Playback length at the track's own sample rate.
    pub fn duration(&self) -> Micros {
        self.pcm.duration_us()
    }

    /// True if this track is heard at all.
    #[inline]
    pub fn is_audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

/// Output format of mixed windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

#[derive(Debug)]
struct MixerState {
    tracks: BTreeMap<TrackId, AudioTrack>,
    ids: IdAllocator,
    master_volume: f32,
    format: OutputFormat,
}

/// Audio mixer that combines tracks into interleaved 16-bit output.
#[derive(Debug)]
pub struct AudioMixer {
    state: Mutex<MixerState>,
}

impl AudioMixer {
    /// Create a mixer producing `format` output at unity master volume.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            state: Mutex::new(MixerState {
                tracks: BTreeMap::new(),
                ids: IdAllocator::new(),
                master_volume: 1.0,
                format,
            }),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.state.lock().format
    }

    /// Place decoded PCM on the timeline at `position`.
    pub fn add_track(&self, position: Micros, pcm: AudioSample) -> TrackId {
        let mut state = self.state.lock();
        let id = TrackId(state.ids.next_raw());
        info!(
            track = %id,
            position,
            sample_rate = pcm.sample_rate,
            channels = pcm.channels,
            duration_us = pcm.duration_us(),
            "Added audio track"
        );
        state.tracks.insert(
            id,
            AudioTrack {
                id,
                position,
                pcm,
                volume: 1.0,
                muted: false,
            },
        );
        id
    }

    pub fn remove_track(&self, id: TrackId) -> bool {
        let removed = self.state.lock().tracks.remove(&id).is_some();
        if removed {
            info!(track = %id, "Removed audio track");
        }
        removed
    }

    /// Set track volume, clamped to `[0, 1]`. Non-finite volumes are
    /// rejected and the track keeps its gain.
    pub fn set_volume(&self, id: TrackId, volume: f32) -> bool {
        if !volume.is_finite() {
            warn!(track = %id, volume, "Rejected non-finite track volume");
            return false;
        }
        let mut state = self.state.lock();
        let Some(track) = state.tracks.get_mut(&id) else {
            return false;
        };
        track.volume = volume.clamp(0.0, 1.0);
        debug!(track = %id, volume = track.volume, "Set track volume");
        true
    }

    pub fn set_muted(&self, id: TrackId, muted: bool) -> bool {
        let mut state = self.state.lock();
        let Some(track) = state.tracks.get_mut(&id) else {
            return false;
        };
        track.muted = muted;
        debug!(track = %id, muted, "Set track mute");
        true
    }

    /// Set master volume, clamped to `[0, 1]`. Returns `false`, leaving the
    /// gain alone, for NaN or infinities.
    pub fn set_master_volume(&self, volume: f32) -> bool {
        if !volume.is_finite() {
            warn!(volume, "Rejected non-finite master volume");
            return false;
        }
        let mut state = self.state.lock();
        state.master_volume = volume.clamp(0.0, 1.0);
        debug!(master_volume = state.master_volume, "Set master volume");
        true
    }

    pub fn master_volume(&self) -> f32 {
        self.state.lock().master_volume
    }

    pub fn track(&self, id: TrackId) -> Option<AudioTrack> {
        self.state.lock().tracks.get(&id).cloned()
    }

    pub fn track_count(&self) -> usize {
        self.state.lock().tracks.len()
    }

    /// Drop every track. Ids keep counting up.
    pub fn clear(&self) {
        self.state.lock().tracks.clear();
        info!("Cleared audio mixer");
    }

    /// Mix the window `[position, position + duration)`.
    ///
    /// Each audible track overlapping the window contributes its samples,
    /// copied index for index with no resampling, scaled by track and
    /// master gain. Contributions accumulate at 32 bits and are clamped to
    /// the 16-bit range once at the end.
    pub fn get_mixed_audio(&self, position: Micros, duration: Micros) -> AudioSample {
        let state = self.state.lock();
        let format = state.format;
        let out_channels = format.channels as usize;
        let len = micros_to_sample_frames(duration, format.sample_rate) * out_channels;
        let mut acc = vec![0i32; len];
        let window_end = position.saturating_add(duration.max(0));

        for track in state.tracks.values() {
            if !track.is_audible() {
                continue;
            }
            let track_end = track.position.saturating_add(track.duration());
            if track.position >= window_end || track_end <= position {
                continue;
            }

            let channels = track.pcm.channels as usize;
            let (src_offset, dst_offset) = if track.position <= position {
                let into_track = position - track.position;
                let frames = micros_to_sample_frames(into_track, track.pcm.sample_rate);
                (frames * channels, 0)
            } else {
                let lead = track.position - position;
                let frames = micros_to_sample_frames(lead, format.sample_rate);
                (0, frames * out_channels)
            };

            let gain = track.volume * state.master_volume;
            let source = track.pcm.samples.get(src_offset..).unwrap_or(&[]);
            let dest = acc.get_mut(dst_offset..).unwrap_or(&mut []);
            for (out, &sample) in dest.iter_mut().zip(source) {
                *out += (sample as f32 * gain) as i32;
            }
        }

        let samples = acc
            .into_iter()
            .map(|v| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16)
            .collect();
        AudioSample {
            samples,
            sample_rate: format.sample_rate,
            channels: format.channels,
            timestamp_us: position,
        }
    }
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
