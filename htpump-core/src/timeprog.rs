//! Weekly time programs
//!
//! A time program assigns a state to every minute of every day: each day is
//! a sequence of periods that tiles the interval `[0, 1440)` contiguously,
//! with adjacent periods carrying different states. The device stores each
//! day as a fixed grid of `entries_per_day` slots (`ST`/`BEG`/`END`
//! fields); unused trailing slots hold a zero-length sentinel. The codec in
//! this module maps between the grid and the tiling model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HtpError, HtpResult};

/// Number of minutes in a device day; period end times may equal it.
pub const MINUTES_PER_DAY: u16 = 1440;

fn schedule_err(msg: impl Into<String>) -> HtpError {
    HtpError::InvalidSchedule(msg.into())
}

/// Render a minute-of-day as `HH:MM`; minute 1440 renders as `24:00`.
pub fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Parse a `HH:MM` (or `H:M`) field into a minute-of-day in `0..=1440`.
pub fn parse_minute(s: &str) -> HtpResult<u16> {
    let invalid = || HtpError::InvalidData(format!("invalid time of day {s:?}"));
    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let h: u16 = h.trim().parse().map_err(|_| invalid())?;
    let m: u16 = m.trim().parse().map_err(|_| invalid())?;
    if h > 24 || m > 59 {
        return Err(invalid());
    }
    let minute = h * 60 + m;
    if minute > MINUTES_PER_DAY {
        return Err(invalid());
    }
    Ok(minute)
}

/// One period of a time program day
///
/// A period is non-empty (`start < end`); the zero-length slots the device
/// uses as padding are represented as `None` at the codec boundary, never
/// as a `TimeProgPeriod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeProgPeriod {
    state: u8,
    start: u16,
    end: u16,
}

impl TimeProgPeriod {
    /// Create a period; `start` and `end` are minutes of day with
    /// `start < end <= 1440`.
    pub fn new(state: u8, start: u16, end: u16) -> HtpResult<Self> {
        if end > MINUTES_PER_DAY {
            return Err(schedule_err(format!(
                "period end {} is past the end of the day",
                format_minute(end.min(u16::MAX))
            )));
        }
        if start >= end {
            return Err(schedule_err(format!(
                "period start {} is not before its end {}",
                format_minute(start),
                format_minute(end)
            )));
        }
        Ok(Self { state, start, end })
    }

    /// Build a period from the wire fields of a `PRE` response.
    ///
    /// Returns `None` for the zero-length sentinel the device pads unused
    /// slots with.
    pub fn from_wire(state: &str, begin: &str, end: &str) -> HtpResult<Option<Self>> {
        let state: u8 = state
            .trim()
            .parse()
            .map_err(|_| HtpError::InvalidData(format!("invalid period state {state:?}")))?;
        let begin = parse_minute(begin)?;
        let end = parse_minute(end)?;
        if begin == end {
            return Ok(None);
        }
        Self::new(state, begin, end).map(Some)
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn start_minute(&self) -> u16 {
        self.start
    }

    pub fn end_minute(&self) -> u16 {
        self.end
    }

    /// `BEG` wire field, e.g. `03:30`.
    pub fn start_str(&self) -> String {
        format_minute(self.start)
    }

    /// `END` wire field, e.g. `22:00`.
    pub fn end_str(&self) -> String {
        format_minute(self.end)
    }
}

impl fmt::Display for TimeProgPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state {} ({}-{})",
            self.state,
            self.start_str(),
            self.end_str()
        )
    }
}

/// A weekly schedule of the heat pump
///
/// The header fields (`EAD`, `NOS`, `STE`, `NOD` on the wire) describe the
/// device-side storage: slots per day, number of distinct states, time
/// resolution in minutes and number of days. `days` holds the decoded
/// period sequences; a program read without entries has all days empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeProgram {
    index: u32,
    name: String,
    entries_per_day: u16,
    number_of_states: u16,
    step: u16,
    days: Vec<Vec<TimeProgPeriod>>,
}

impl TimeProgram {
    /// Create a program with the given header data and no entries.
    pub fn new(
        index: u32,
        name: impl Into<String>,
        entries_per_day: u16,
        number_of_states: u16,
        step: u16,
        number_of_days: u16,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            entries_per_day,
            number_of_states,
            step,
            days: vec![Vec::new(); number_of_days as usize],
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries_per_day(&self) -> u16 {
        self.entries_per_day
    }

    pub fn number_of_states(&self) -> u16 {
        self.number_of_states
    }

    pub fn step(&self) -> u16 {
        self.step
    }

    pub fn number_of_days(&self) -> u16 {
        self.days.len() as u16
    }

    /// Whether any day carries entries.
    pub fn has_entries(&self) -> bool {
        self.days.iter().any(|d| !d.is_empty())
    }

    /// The periods of one day, time-ordered.
    pub fn day(&self, day: usize) -> HtpResult<&[TimeProgPeriod]> {
        self.days
            .get(day)
            .map(Vec::as_slice)
            .ok_or_else(|| schedule_err(format!("day {day} out of range")))
    }

    /// Replace the periods of one day; the day must satisfy the tiling
    /// invariants.
    pub fn set_day(&mut self, day: usize, periods: Vec<TimeProgPeriod>) -> HtpResult<()> {
        if day >= self.days.len() {
            return Err(schedule_err(format!("day {day} out of range")));
        }
        Self::validate_day(day, &periods, self.entries_per_day)?;
        self.days[day] = periods;
        Ok(())
    }

    /// Check every day against the tiling invariants.
    ///
    /// Each day must cover `[0, 1440)` with contiguous, time-ordered
    /// periods; adjacent periods carry different states and the slot
    /// capacity of the device is respected.
    pub fn validate(&self) -> HtpResult<()> {
        for (day, periods) in self.days.iter().enumerate() {
            Self::validate_day(day, periods, self.entries_per_day)?;
        }
        Ok(())
    }

    fn validate_day(day: usize, periods: &[TimeProgPeriod], capacity: u16) -> HtpResult<()> {
        if periods.len() > capacity as usize {
            return Err(schedule_err(format!(
                "day {day} has {} periods, device stores at most {capacity}",
                periods.len()
            )));
        }
        let Some(first) = periods.first() else {
            return Err(schedule_err(format!("day {day} has no periods")));
        };
        if first.start != 0 {
            return Err(schedule_err(format!(
                "day {day} starts at {} instead of 00:00",
                first.start_str()
            )));
        }
        for pair in periods.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.start != prev.end {
                return Err(schedule_err(format!(
                    "day {day}: period starting {} does not continue at {}",
                    next.start_str(),
                    prev.end_str()
                )));
            }
            if next.state == prev.state {
                return Err(schedule_err(format!(
                    "day {day}: consecutive periods share state {}",
                    next.state
                )));
            }
        }
        let last = &periods[periods.len() - 1];
        if last.end != MINUTES_PER_DAY {
            return Err(schedule_err(format!(
                "day {day} ends at {} instead of 24:00",
                last.end_str()
            )));
        }
        Ok(())
    }

    /// Rebuild a program from the device's day-major slot grid.
    ///
    /// `slots` holds `number_of_days * entries_per_day` elements in
    /// day-major order; `None` marks a sentinel slot. Sentinels are
    /// dropped and the resulting days are validated.
    pub fn from_slots(
        index: u32,
        name: impl Into<String>,
        entries_per_day: u16,
        number_of_states: u16,
        step: u16,
        number_of_days: u16,
        slots: &[Option<TimeProgPeriod>],
    ) -> HtpResult<Self> {
        let expected = number_of_days as usize * entries_per_day as usize;
        if slots.len() != expected {
            return Err(schedule_err(format!(
                "expected {expected} slots ({number_of_days} days x {entries_per_day}), got {}",
                slots.len()
            )));
        }
        let mut prog = Self::new(
            index,
            name,
            entries_per_day,
            number_of_states,
            step,
            number_of_days,
        );
        for day in 0..number_of_days as usize {
            let base = day * entries_per_day as usize;
            let periods: Vec<TimeProgPeriod> = slots[base..base + entries_per_day as usize]
                .iter()
                .flatten()
                .copied()
                .collect();
            prog.set_day(day, periods)?;
        }
        Ok(prog)
    }

    /// Flatten this program into the device's day-major slot grid.
    ///
    /// Validates the tiling invariants first, so an invalid schedule is
    /// rejected before anything is written to the device. Days are padded
    /// to `entries_per_day` with `None` sentinels.
    pub fn to_slots(&self) -> HtpResult<Vec<Option<TimeProgPeriod>>> {
        self.validate()?;
        let mut slots = Vec::with_capacity(self.days.len() * self.entries_per_day as usize);
        for periods in &self.days {
            slots.extend(periods.iter().copied().map(Some));
            slots.extend(std::iter::repeat_n(
                None,
                self.entries_per_day as usize - periods.len(),
            ));
        }
        Ok(slots)
    }
}

impl fmt::Display for TimeProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time program #{} {:?} ({} days, {} slots/day)",
            self.index,
            self.name,
            self.days.len(),
            self.entries_per_day
        )
    }
}
