//! Round-trip date and time grammar.
//!
//! Accepted forms:
//!
//! ```text
//! YYYY-MM-DD
//! YYYY-MM-DDTHH:MM
//! YYYY-MM-DDTHH:MM:SS
//! YYYY-MM-DDTHH:MM:SS.fffffff      (1 to 16 fraction digits)
//! ```
//!
//! Any form with a time part may end in `Z` or `±HH:MM`. Fraction digits
//! beyond nanosecond precision are truncated. Calendar validity (month
//! lengths, leap years) is checked by `chrono`.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

const MAX_FRACTION_DIGITS: usize = 16;

/// A parsed timestamp and the offset it was written with, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestamp {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Timestamp {
    /// The value as a date-time without an offset.
    ///
    /// A timestamp written with an offset is normalized to UTC; `None` if
    /// that moves it outside the representable range.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self.offset {
            Some(offset) => self
                .local
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc()))),
            None => Some(self.local),
        }
    }

    /// The value with its offset; a timestamp written without one is UTC.
    pub fn to_offset(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset.unwrap_or_else(|| Utc.fix());
        offset.from_local_datetime(&self.local).single()
    }
}

/// Parses `text` as a timestamp, returning a message describing the first problem.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, &'static str> {
    let mut cursor = Cursor {
        bytes: text.as_bytes(),
        position: 0,
    };

    let year = cursor.number(4).ok_or("expected a four-digit year")?;
    cursor.expect(b'-').ok_or("expected '-' after the year")?;
    let month = cursor.number(2).ok_or("expected a two-digit month")?;
    cursor.expect(b'-').ok_or("expected '-' after the month")?;
    let day = cursor.number(2).ok_or("expected a two-digit day")?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or("date is out of range")?;

    if cursor.is_done() {
        return Ok(Timestamp {
            local: date.and_time(NaiveTime::MIN),
            offset: None,
        });
    }

    cursor.expect(b'T').ok_or("expected 'T' between date and time")?;
    let hour = cursor.number(2).ok_or("expected a two-digit hour")?;
    cursor.expect(b':').ok_or("expected ':' after the hour")?;
    let minute = cursor.number(2).ok_or("expected a two-digit minute")?;

    let mut second = 0;
    let mut nanos = 0;
    if cursor.eat(b':') {
        second = cursor.number(2).ok_or("expected two-digit seconds")?;
        if cursor.eat(b'.') {
            nanos = cursor.fraction().ok_or("expected 1 to 16 fraction digits")?;
        }
    }

    // Leap seconds are not representable in the round-trip form.
    if second > 59 {
        return Err("seconds are out of range");
    }
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
        .ok_or("time of day is out of range")?;

    let offset = match cursor.peek() {
        None => None,
        Some(b'Z') => {
            cursor.position += 1;
            Some(Utc.fix())
        }
        Some(sign @ (b'+' | b'-')) => {
            cursor.position += 1;
            let hours = cursor.number(2).ok_or("expected a two-digit offset hour")?;
            cursor.expect(b':').ok_or("expected ':' in offset")?;
            let minutes = cursor.number(2).ok_or("expected a two-digit offset minute")?;
            if hours > 14 || minutes > 59 {
                return Err("offset is out of range");
            }
            let seconds = (hours * 3600 + minutes * 60) as i32;
            let seconds = if sign == b'-' { -seconds } else { seconds };
            Some(FixedOffset::east_opt(seconds).ok_or("offset is out of range")?)
        }
        Some(_) => return Err("unexpected character after the time"),
    };

    if !cursor.is_done() {
        return Err("unexpected characters after the timestamp");
    }

    Ok(Timestamp {
        local: date.and_time(time),
        offset,
    })
}

/// Parses `text` as a date-time without an offset, normalizing to UTC.
pub fn parse_date_time(text: &str) -> Result<NaiveDateTime, &'static str> {
    parse_timestamp(text)?
        .to_naive()
        .ok_or("date is out of range for its offset")
}

/// Parses `text` as a date-time with an offset, defaulting to UTC.
pub fn parse_date_time_offset(text: &str) -> Result<DateTime<FixedOffset>, &'static str> {
    parse_timestamp(text)?
        .to_offset()
        .ok_or("date is out of range for its offset")
}

struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn is_done(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.eat(byte).then_some(())
    }

    /// Exactly `width` ASCII digits.
    fn number(&mut self, width: usize) -> Option<u32> {
        let digits = self.bytes.get(self.position..self.position + width)?;
        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.position += width;
        Some(
            digits
                .iter()
                .fold(0, |acc, &d| acc * 10 + u32::from(d - b'0')),
        )
    }

    /// 1 to 16 fraction digits, truncated to nanoseconds.
    fn fraction(&mut self) -> Option<u32> {
        let start = self.position;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        let digits = &self.bytes[start..self.position];
        if digits.is_empty() || digits.len() > MAX_FRACTION_DIGITS {
            return None;
        }

        let nanos = digits
            .iter()
            .chain(std::iter::repeat(&b'0'))
            .take(9)
            .fold(0, |acc, &d| acc * 10 + u32::from(d - b'0'));
        Some(nanos)
    }
}
