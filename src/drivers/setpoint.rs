use core::fmt;

use crate::config::{DEFAULT_REFERENCE_HZ, SETPOINT_LINE_CAP, SETPOINT_MAX_HZ, SETPOINT_MIN_HZ};

/// Target oscillation frequency, always within `[SETPOINT_MIN_HZ, SETPOINT_MAX_HZ]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint(f32);

const _: () = assert!(DEFAULT_REFERENCE_HZ >= SETPOINT_MIN_HZ && DEFAULT_REFERENCE_HZ <= SETPOINT_MAX_HZ);

impl Setpoint {
    /// Reference in effect before any setpoint has been received.
    pub const DEFAULT: Setpoint = Setpoint(DEFAULT_REFERENCE_HZ);

    pub fn new(hz: f32) -> Result<Self, SetpointError> {
        if (SETPOINT_MIN_HZ..=SETPOINT_MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(SetpointError::OutOfRange(hz))
        }
    }

    /// Parses a decimal frequency in Hz, surrounding whitespace ignored.
    pub fn parse(text: &str) -> Result<Self, SetpointError> {
        let hz: f32 = text.trim().parse().map_err(|_| SetpointError::Malformed)?;
        Self::new(hz)
    }

    pub fn hz(self) -> f32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetpointError {
    /// Not a number, not ASCII, or longer than the line buffer
    Malformed,
    OutOfRange(f32),
    /// A previous setpoint has not been consumed yet; the new one is dropped
    ChannelFull(Setpoint),
}

impl fmt::Display for SetpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed setpoint"),
            Self::OutOfRange(hz) => write!(
                f,
                "setpoint {:.2} Hz outside [{:.1}, {:.1}] Hz",
                hz, SETPOINT_MIN_HZ, SETPOINT_MAX_HZ
            ),
            Self::ChannelFull(sp) => write!(f, "setpoint channel full, dropped {:.2} Hz", sp.hz()),
        }
    }
}

/// Assembles setpoint lines from serial bytes.
///
/// A line ends at `\n` or `\r`. Bytes are kept across reads, so a line may
/// arrive in several pieces; an unterminated line ends only when the caller
/// reports that the serial line went idle. Blank lines are skipped.
pub struct SetpointParser {
    buffer: heapless::Vec<u8, SETPOINT_LINE_CAP>,
    overflowed: bool,
}

impl SetpointParser {
    pub fn new() -> Self {
        Self {
            buffer: heapless::Vec::new(),
            overflowed: false,
        }
    }

    pub fn push_byte(&mut self, b: u8) -> Option<Result<Setpoint, SetpointError>> {
        if b == b'\n' || b == b'\r' {
            return self.finish_line();
        }
        if self.buffer.push(b).is_err() {
            self.overflowed = true;
        }
        None
    }

    /// Ends the pending line, if any. Call when the line has been idle for a
    /// full read timeout.
    pub fn on_idle(&mut self) -> Option<Result<Setpoint, SetpointError>> {
        self.finish_line()
    }

    fn finish_line(&mut self) -> Option<Result<Setpoint, SetpointError>> {
        let overflowed = core::mem::replace(&mut self.overflowed, false);
        let result = if overflowed {
            Some(Err(SetpointError::Malformed))
        } else {
            match core::str::from_utf8(&self.buffer) {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(Setpoint::parse(line)),
                Err(_) => Some(Err(SetpointError::Malformed)),
            }
        };
        self.buffer.clear();
        result
    }
}

impl Default for SetpointParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_inclusive() {
        assert_eq!(Setpoint::parse("2.0").unwrap().hz(), 2.0);
        assert_eq!(Setpoint::parse(" 10 ").unwrap().hz(), 10.0);
        assert_eq!(Setpoint::parse("6.25\t").unwrap().hz(), 6.25);
    }

    #[test]
    fn rejects_malformed_and_out_of_range() {
        assert_eq!(Setpoint::parse("abc"), Err(SetpointError::Malformed));
        assert_eq!(Setpoint::parse(""), Err(SetpointError::Malformed));
        assert_eq!(Setpoint::parse("15.0"), Err(SetpointError::OutOfRange(15.0)));
        assert_eq!(Setpoint::parse("1.99"), Err(SetpointError::OutOfRange(1.99)));
        assert!(matches!(Setpoint::parse("NaN"), Err(SetpointError::OutOfRange(_))));
        assert!(Setpoint::new(f32::INFINITY).is_err());
    }

    #[test]
    fn splits_lines_and_flushes_on_idle() {
        let mut parser = SetpointParser::new();
        let mut got = heapless::Vec::<Result<Setpoint, SetpointError>, 8>::new();
        for b in b"5.5\r\n\nabc\n7" {
            if let Some(r) = parser.push_byte(*b) {
                got.push(r).unwrap();
            }
        }
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].unwrap().hz(), 5.5);
        assert_eq!(got[1], Err(SetpointError::Malformed));

        // "7" is only complete once the line goes idle
        let last = parser.on_idle().unwrap().unwrap();
        assert_eq!(last.hz(), 7.0);
        assert!(parser.on_idle().is_none());
    }

    #[test]
    fn line_survives_split_reads() {
        let mut parser = SetpointParser::new();
        for b in b"6." {
            assert!(parser.push_byte(*b).is_none());
        }
        let mut done = None;
        for b in b"5\n" {
            done = done.or(parser.push_byte(*b));
        }
        assert_eq!(done, Some(Ok(Setpoint::new(6.5).unwrap())));
        assert!(parser.on_idle().is_none());
    }

    #[test]
    fn overlong_line_is_malformed() {
        let mut parser = SetpointParser::new();
        for _ in 0..(SETPOINT_LINE_CAP + 5) {
            assert!(parser.push_byte(b'5').is_none());
        }
        assert_eq!(parser.push_byte(b'\n'), Some(Err(SetpointError::Malformed)));
        // next line is clean again
        for b in b"3.0" {
            parser.push_byte(*b);
        }
        assert_eq!(parser.on_idle().unwrap().unwrap().hz(), 3.0);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let mut parser = SetpointParser::new();
        parser.push_byte(0xFF);
        assert_eq!(parser.on_idle(), Some(Err(SetpointError::Malformed)));
    }
}
