use chrono::Timelike;

/// Seconds from which the display turns red.
const HIGHLIGHT_FROM: u32 = 55;
/// Seconds on which the tick beep sounds.
const BEEP_SECONDS: [u32; 2] = [58, 59];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// `HH:MM:SS`, 24-hour, zero padded.
    pub text: String,
    pub highlight_seconds: bool,
    pub beep: bool,
}

/// 1 Hz wall clock display.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockFace;

impl ClockFace {
    pub fn reading<T: Timelike>(time: &T) -> ClockReading {
        let seconds = time.second();
        ClockReading {
            text: format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), seconds),
            highlight_seconds: seconds >= HIGHLIGHT_FROM,
            beep: BEEP_SECONDS.contains(&seconds),
        }
    }
}
