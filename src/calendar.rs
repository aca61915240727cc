use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
    },
    OutOfRange {
        date: NaiveDate,
        range_start: NaiveDate,
        range_end: NaiveDate,
    },
    EmptyWorkWeek,
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidRange { start, end } => {
                write!(f, "range start {start} is after range end {end}")
            }
            CalendarError::OutOfRange {
                date,
                range_start,
                range_end,
            } => write!(
                f,
                "date {date} is outside the materialized calendar range [{range_start}, {range_end}]"
            ),
            CalendarError::EmptyWorkWeek => {
                write!(f, "calendar has no working weekday; every walk would diverge")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

/// Why a particular date is non-working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonWorkingReason {
    Weekend,
    Holiday(String),
}

impl fmt::Display for NonWorkingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonWorkingReason::Weekend => write!(f, "weekend"),
            NonWorkingReason::Holiday(name) => write!(f, "holiday: {name}"),
        }
    }
}

/// Working/non-working day lookup over a materialized date range.
///
/// A date is non-working when its weekday is in the weekend set or it is a
/// listed holiday. The calendar never changes after construction; an analysis
/// run that needs a different window builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    range_start: NaiveDate,
    range_end: NaiveDate,
    weekend: HashSet<Weekday>,
    holidays: BTreeMap<NaiveDate, String>,
    assume_regular_beyond_range: bool,
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Build a calendar for `[range_start, range_end]` with an explicit
    /// weekend weekday set and named holidays.
    pub fn new<I, J>(
        range_start: NaiveDate,
        range_end: NaiveDate,
        weekend: I,
        holidays: J,
    ) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = (NaiveDate, String)>,
    {
        if range_start > range_end {
            return Err(CalendarError::InvalidRange {
                start: range_start,
                end: range_end,
            });
        }

        let weekend: HashSet<Weekday> = weekend.into_iter().collect();
        if Self::ALL_WEEKDAYS.iter().all(|day| weekend.contains(day)) {
            return Err(CalendarError::EmptyWorkWeek);
        }

        Ok(Self {
            range_start,
            range_end,
            weekend,
            holidays: holidays.into_iter().collect(),
            assume_regular_beyond_range: false,
        })
    }

    /// Saturday/Sunday weekend, no holidays.
    pub fn standard(range_start: NaiveDate, range_end: NaiveDate) -> Result<Self, CalendarError> {
        Self::new(range_start, range_end, [Weekday::Sat, Weekday::Sun], [])
    }

    /// Treat dates beyond the materialized range as a regular calendar:
    /// weekend status is extrapolated from the weekday rule, but holidays are
    /// only known inside the range, so a holiday beyond it reads as working.
    /// Callers opting in accept that asymmetry.
    pub fn with_regular_calendar_beyond_range(mut self) -> Self {
        self.assume_regular_beyond_range = true;
        self
    }

    pub fn range_start(&self) -> NaiveDate {
        self.range_start
    }

    pub fn range_end(&self) -> NaiveDate {
        self.range_end
    }

    pub fn extrapolates_beyond_range(&self) -> bool {
        self.assume_regular_beyond_range
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    fn out_of_range(&self, date: NaiveDate) -> CalendarError {
        CalendarError::OutOfRange {
            date,
            range_start: self.range_start,
            range_end: self.range_end,
        }
    }

    /// Whether `date` is a non-working day. Fails with `OutOfRange` for dates
    /// outside the materialized window unless extrapolation is enabled.
    pub fn is_non_working(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        if !self.in_range(date) {
            if !self.assume_regular_beyond_range {
                return Err(self.out_of_range(date));
            }
            return Ok(self.weekend.contains(&date.weekday()));
        }
        Ok(self.weekend.contains(&date.weekday()) || self.holidays.contains_key(&date))
    }

    pub fn is_working(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        Ok(!self.is_non_working(date)?)
    }

    /// The reason `date` is non-working, or `None` for a working day.
    /// A holiday name wins over the weekend label when both apply.
    pub fn non_working_reason(
        &self,
        date: NaiveDate,
    ) -> Result<Option<NonWorkingReason>, CalendarError> {
        if !self.is_non_working(date)? {
            return Ok(None);
        }
        if self.in_range(date) {
            if let Some(name) = self.holidays.get(&date) {
                return Ok(Some(NonWorkingReason::Holiday(name.clone())));
            }
        }
        Ok(Some(NonWorkingReason::Weekend))
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Ordered, deduplicated non-working dates in `[start, end]`.
    pub fn non_working_days_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }

        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if self.is_non_working(current)? {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        Ok(days)
    }

    /// First working day on or after `date`.
    pub fn first_working_on_or_after(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        let mut current = date;
        while self.is_non_working(current)? {
            current = current + Duration::days(1);
        }
        Ok(current)
    }

    /// The date reached by walking `count` working days forward from `from`,
    /// skipping non-working days without counting them. `from` itself is not
    /// counted.
    pub fn add_working_days(
        &self,
        from: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, CalendarError> {
        let mut current = from;
        let mut walked = 0;
        while walked < count {
            current = current + Duration::days(1);
            if self.is_working(current)? {
                walked += 1;
            }
        }
        Ok(current)
    }

    /// Number of working days in `[start, end]`.
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> Result<i64, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }

        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working(current)? {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        Ok(count)
    }

    /// Named US federal holidays for a year range (inclusive), suitable for
    /// passing to [`WorkCalendar::new`]. Convenience only; any explicit
    /// holiday table works.
    pub fn united_states_holidays(start_year: i32, end_year: i32) -> Vec<(NaiveDate, String)> {
        let mut holidays = Vec::new();
        for year in start_year..=end_year {
            holidays.push((ymd(year, 1, 1), "New Year's Day".to_string()));
            holidays.push((
                nth_weekday(year, 1, Weekday::Mon, 3),
                "Martin Luther King Jr. Day".to_string(),
            ));
            holidays.push((
                nth_weekday(year, 2, Weekday::Mon, 3),
                "Presidents' Day".to_string(),
            ));
            holidays.push((
                last_weekday(year, 5, Weekday::Mon),
                "Memorial Day".to_string(),
            ));
            holidays.push((ymd(year, 6, 19), "Juneteenth".to_string()));
            holidays.push((ymd(year, 7, 4), "Independence Day".to_string()));
            holidays.push((
                nth_weekday(year, 9, Weekday::Mon, 1),
                "Labor Day".to_string(),
            ));
            holidays.push((
                nth_weekday(year, 10, Weekday::Mon, 2),
                "Columbus Day".to_string(),
            ));
            holidays.push((ymd(year, 11, 11), "Veterans Day".to_string()));
            holidays.push((
                nth_weekday(year, 11, Weekday::Thu, 4),
                "Thanksgiving".to_string(),
            ));
            holidays.push((ymd(year, 12, 25), "Christmas".to_string()));
        }
        holidays
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Find the nth occurrence of a weekday in a month. Only called with n <= 4,
/// which every month has.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
    let mut date = ymd(year, month, 1);
    let mut count = 0;
    loop {
        if date.weekday() == weekday {
            count += 1;
            if count == n {
                return date;
            }
        }
        date = date + Duration::days(1);
    }
}

/// Find the last occurrence of a weekday in a month.
fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    let mut date = if month == 12 {
        ymd(year + 1, 1, 1)
    } else {
        ymd(year, month + 1, 1)
    };
    date = date - Duration::days(1);
    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    date
}
