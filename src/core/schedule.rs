use crate::domain::model::{ParsedSchedule, Weekday};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<start>\d{1,2}(?::\d{2})?(?:\s*[ap]\.?m\.?)?)\s*(?:-|–|—|\bto\b)\s*(?P<end>\d{1,2}(?::\d{2})?(?:\s*[ap]\.?m\.?)?)",
    )
    .expect("time range pattern is valid")
});

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?:(?P<meridiem>[ap])\.?m\.?)?$")
        .expect("clock time pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy)]
struct ClockTime {
    hour: u16,
    minute: u16,
    meridiem: Option<Meridiem>,
}

impl ClockTime {
    fn parse(token: &str) -> Option<Self> {
        let caps = CLOCK_TIME.captures(token.trim())?;
        let hour = caps["hour"].parse().ok()?;
        let minute = caps
            .name("minute")
            .map_or(Some(0), |m| m.as_str().parse().ok())?;
        let meridiem = caps.name("meridiem").map(|m| {
            if m.as_str().eq_ignore_ascii_case("a") {
                Meridiem::Am
            } else {
                Meridiem::Pm
            }
        });

        Some(Self {
            hour,
            minute,
            meridiem,
        })
    }

    fn minutes_with(self, meridiem: Option<Meridiem>) -> Option<u16> {
        if self.minute >= 60 {
            return None;
        }
        let hour = match meridiem {
            None if self.hour < 24 => self.hour,
            Some(_) if !(1..=12).contains(&self.hour) => return None,
            Some(Meridiem::Am) => self.hour % 12,
            Some(Meridiem::Pm) => self.hour % 12 + 12,
            None => return None,
        };
        Some(hour * 60 + self.minute)
    }

    fn minutes(self) -> Option<u16> {
        self.minutes_with(self.meridiem)
    }
}

/// 將時間字串（"10:00"、"2:30 PM"）轉換為午夜起算的分鐘數
pub fn time_to_minutes(token: &str) -> Option<u16> {
    ClockTime::parse(token)?.minutes()
}

/// 解析課程時間字串，例如 "Mon/Wed 10:00-11:15"、"MWF 9:00 AM - 9:50 AM"、"TTh 2:00-3:15 PM"。
///
/// 無法解析時回傳 `None`；呼叫端將其視為沒有時間限制的課程。
pub fn parse_schedule(input: &str) -> Option<ParsedSchedule> {
    let range = TIME_RANGE.captures(input)?;
    let whole = range.get(0)?;

    let start = ClockTime::parse(&range["start"])?;
    let end = ClockTime::parse(&range["end"])?;
    let (start_minute, end_minute) = resolve_range(start, end)?;

    let day_text = format!("{} {}", &input[..whole.start()], &input[whole.end()..]);
    let days = parse_days(&day_text)?;

    Some(ParsedSchedule {
        days,
        start_minute,
        end_minute,
    })
}

// "2:00-3:15 PM" 的起始時間沿用結束時間的上下午標記
fn resolve_range(start: ClockTime, end: ClockTime) -> Option<(u16, u16)> {
    let end_minute = match (end.meridiem, start.meridiem) {
        (None, Some(inherited)) => end.minutes_with(Some(inherited))?,
        _ => end.minutes()?,
    };

    let start_minute = match (start.meridiem, end.meridiem) {
        (None, Some(inherited)) => match start.minutes_with(Some(inherited)) {
            Some(minute) if minute < end_minute => minute,
            _ => start.minutes_with(Some(Meridiem::Am))?,
        },
        _ => start.minutes()?,
    };

    (start_minute < end_minute).then_some((start_minute, end_minute))
}

fn parse_days(text: &str) -> Option<BTreeSet<Weekday>> {
    let mut days = BTreeSet::new();

    for token in text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_ascii_lowercase();
        if lower == "and" {
            continue;
        }
        if lower == "weekdays" {
            days.extend([
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]);
            continue;
        }
        match day_name(&lower) {
            Some(day) => {
                days.insert(day);
            }
            None => days.extend(compact_days(&lower)?),
        }
    }

    (!days.is_empty()).then_some(days)
}

fn day_name(token: &str) -> Option<Weekday> {
    let day = match token {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "weds" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

// Letter runs such as "mwf", "tth", "mtwrf"
fn compact_days(token: &str) -> Option<Vec<Weekday>> {
    let mut days = Vec::new();
    let mut rest = token;

    while !rest.is_empty() {
        let (day, consumed) = if rest.starts_with("th") {
            (Weekday::Thu, 2)
        } else if rest.starts_with("tu") {
            (Weekday::Tue, 2)
        } else if rest.starts_with("sa") {
            (Weekday::Sat, 2)
        } else if rest.starts_with("su") {
            (Weekday::Sun, 2)
        } else {
            let day = match rest.as_bytes()[0] {
                b'm' => Weekday::Mon,
                b't' => Weekday::Tue,
                b'w' => Weekday::Wed,
                b'r' => Weekday::Thu,
                b'f' => Weekday::Fri,
                b'u' => Weekday::Sun,
                _ => return None,
            };
            (day, 1)
        };
        days.push(day);
        rest = &rest[consumed..];
    }

    Some(days)
}
