//! RTTTL tune parsing and a buzzer player for the close warning.
//!
//! Ring Tone Text Transfer Language packs a short melody into one line:
//!
//! ```text
//! name:d=4,o=5,b=100:e,e,e,8c,16p,16g
//! ```
//!
//! The middle section sets the default note duration (`d`), octave (`o`) and
//! tempo in beats per minute (`b`). Each note is
//! `[duration]letter[#][.][octave][.]`, where `p` is a pause.
//!
//! [`BuzzerPlayer`] steps an active buzzer through a parsed [`Tune`] against a
//! [`Clock`] without blocking. Call [`WarningPlayer::poll`] from the main loop.
//!
//! # Example
//!
//! ```rust
//! use rs_garage::rtttl::Tune;
//!
//! let tune = Tune::parse("beep:d=4,o=5,b=120:c,8p,c").unwrap();
//! assert_eq!(tune.notes().len(), 3);
//! // Quarter note at 120 bpm = 500ms, eighth = 250ms
//! assert_eq!(tune.duration_ms(), 1_250);
//! ```

use alloc::vec::Vec;
use embedded_hal::digital::OutputPin;

use crate::error::{HardwareError, RtttlError, Signal};
use crate::traits::{Clock, WarningPlayer};

/// Close warning tune used when none is configured.
pub const DEFAULT_WARNING_TUNE: &str = "Imperial:d=4, o=5, b=100:e, e, e, 8c, 16p, 16g, e, 8c, 16p, 16g, e, p, b, b, b, 8c6, 16p, 16g, d#, 8c, 16p, 16g, e, 8p";

// Octave 4 frequencies in Hz, C through B.
const OCTAVE_4_HZ: [u16; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// A single note or pause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Tone frequency, `None` for a pause.
    pub frequency_hz: Option<u16>,
    /// How long the note lasts.
    pub duration_ms: u32,
}

/// A parsed RTTTL melody.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tune {
    notes: Vec<Note>,
    duration_ms: u32,
}

impl Tune {
    /// Parse RTTTL text. Whitespace around fields is ignored.
    pub fn parse(text: &str) -> Result<Self, RtttlError> {
        let mut sections = text.splitn(3, ':');
        let _name = sections.next().ok_or(RtttlError::Sections)?;
        let defaults = sections.next().ok_or(RtttlError::Sections)?;
        let body = sections.next().ok_or(RtttlError::Sections)?;

        let mut default_duration = 4u32;
        let mut default_octave = 6u8;
        let mut bpm = 63u32;
        for setting in defaults.split(',') {
            let setting = setting.trim();
            if setting.is_empty() {
                continue;
            }
            let (key, value) = setting.split_once('=').ok_or(RtttlError::Default)?;
            let value = value.trim();
            match key.trim() {
                "d" => default_duration = value.parse().map_err(|_| RtttlError::Default)?,
                "o" => default_octave = value.parse().map_err(|_| RtttlError::Default)?,
                "b" => bpm = value.parse().map_err(|_| RtttlError::Default)?,
                _ => return Err(RtttlError::Default),
            }
        }
        if !is_valid_duration(default_duration) || bpm == 0 || !(3..=8).contains(&default_octave) {
            return Err(RtttlError::Default);
        }

        let whole_note_ms = 60_000 * 4 / bpm;
        let mut notes = Vec::new();
        for (index, raw) in body.split(',').enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let note = parse_note(raw, default_duration, default_octave, whole_note_ms)
                .ok_or(RtttlError::Note(index))?;
            notes.push(note);
        }
        if notes.is_empty() {
            return Err(RtttlError::Sections);
        }

        let duration_ms = notes.iter().map(|n| n.duration_ms).sum();
        Ok(Self { notes, duration_ms })
    }

    /// Notes in play order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Total play time.
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// The note sounding `elapsed_ms` after the start, with the time already spent in it.
    pub fn note_at(&self, elapsed_ms: u32) -> Option<(Note, u32)> {
        let mut start = 0u32;
        for note in &self.notes {
            let end = start + note.duration_ms;
            if elapsed_ms < end {
                return Some((*note, elapsed_ms - start));
            }
            start = end;
        }
        None
    }
}

fn is_valid_duration(d: u32) -> bool {
    matches!(d, 1 | 2 | 4 | 8 | 16 | 32)
}

fn parse_note(raw: &str, default_duration: u32, default_octave: u8, whole_note_ms: u32) -> Option<Note> {
    let bytes = raw.as_bytes();
    let mut i = 0;

    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let duration = if digits > 0 {
        raw[..digits].parse().ok()?
    } else {
        default_duration
    };
    if !is_valid_duration(duration) {
        return None;
    }
    i += digits;

    let semitone = match bytes.get(i)?.to_ascii_lowercase() {
        b'c' => Some(0),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' => Some(11),
        b'p' => None,
        _ => return None,
    };
    i += 1;

    let mut sharp = false;
    if bytes.get(i) == Some(&b'#') {
        sharp = true;
        i += 1;
    }

    let mut dotted = false;
    if bytes.get(i) == Some(&b'.') {
        dotted = true;
        i += 1;
    }

    let mut octave = default_octave;
    if let Some(b) = bytes.get(i) {
        if b.is_ascii_digit() {
            octave = b - b'0';
            i += 1;
        }
    }

    if bytes.get(i) == Some(&b'.') {
        dotted = true;
        i += 1;
    }
    if i != bytes.len() || !(3..=8).contains(&octave) {
        return None;
    }

    let mut duration_ms = whole_note_ms / duration;
    if dotted {
        duration_ms += duration_ms / 2;
    }

    let frequency_hz = semitone.map(|s| {
        let index = (s + sharp as usize) % 12;
        let base = OCTAVE_4_HZ[index] as u32;
        let hz = if octave >= 4 {
            base << (octave - 4)
        } else {
            base >> (4 - octave)
        };
        hz.min(u16::MAX as u32) as u16
    });

    Some(Note {
        frequency_hz,
        duration_ms,
    })
}

/// Plays a [`Tune`] on an active (fixed pitch) buzzer.
///
/// Tones switch the pin high for the first 90% of the note so repeated
/// notes stay distinct; pauses hold it low.
pub struct BuzzerPlayer<P: OutputPin, C: Clock> {
    pin: P,
    clock: C,
    tune: Option<Tune>,
    started_ms: u64,
    pin_high: bool,
}

impl<P: OutputPin, C: Clock> BuzzerPlayer<P, C> {
    /// Create a silent player.
    pub fn new(pin: P, clock: C) -> Self {
        Self {
            pin,
            clock,
            tune: None,
            started_ms: 0,
            pin_high: false,
        }
    }

    /// Release the pin and clock.
    pub fn into_inner(self) -> (P, C) {
        (self.pin, self.clock)
    }

    fn elapsed_ms(&self) -> u32 {
        let elapsed = self.clock.now_ms().saturating_sub(self.started_ms);
        elapsed.min(u32::MAX as u64) as u32
    }

    fn drive(&mut self, high: bool) -> Result<(), HardwareError> {
        if high == self.pin_high {
            return Ok(());
        }
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| HardwareError::Write(Signal::Buzzer))?;
        self.pin_high = high;
        Ok(())
    }
}

impl<P: OutputPin, C: Clock> WarningPlayer for BuzzerPlayer<P, C> {
    type Error = HardwareError;

    fn play(&mut self, tune: &str) -> Result<(), HardwareError> {
        let parsed = Tune::parse(tune).map_err(HardwareError::Tune)?;
        log::debug!("playing warning tune ({}ms)", parsed.duration_ms());
        self.tune = Some(parsed);
        self.started_ms = self.clock.now_ms();
        self.poll()
    }

    fn stop(&mut self) -> Result<(), HardwareError> {
        self.tune = None;
        self.drive(false)
    }

    fn is_playing(&self) -> bool {
        match &self.tune {
            Some(tune) => self.elapsed_ms() < tune.duration_ms(),
            None => false,
        }
    }

    fn poll(&mut self) -> Result<(), HardwareError> {
        let elapsed = self.elapsed_ms();
        let high = match self.tune.as_ref().and_then(|t| t.note_at(elapsed)) {
            Some((note, into)) => {
                note.frequency_hz.is_some() && into < note.duration_ms - note.duration_ms / 10
            }
            None => {
                self.tune = None;
                false
            }
        };
        self.drive(high)
    }
}
