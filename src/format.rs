use crate::model::{Birth, Death, GenoDate};
use chrono::Datelike;

pub trait DateFormatter: Sync {
    fn format(&self, date: &GenoDate) -> String;
}

pub trait AgeFormatter: Sync {
    fn format(&self, birth: Option<&Birth>, death: Option<&Death>) -> Option<String>;
}

/// "12 Mar 1945" style; month and day are dropped when the date does not
/// carry them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayMonthYearFormatter;

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl DateFormatter for DayMonthYearFormatter {
    fn format(&self, date: &GenoDate) -> String {
        let month = date
            .month
            .filter(|m| (1..=12).contains(m))
            .map(|m| MONTH_ABBREVS[(m - 1) as usize]);
        match (date.day, month) {
            (Some(day), Some(month)) => format!("{day} {month} {}", date.year),
            (_, Some(month)) => format!("{month} {}", date.year),
            _ => date.year.to_string(),
        }
    }
}

/// Whole years from birth to death when the death is dated, otherwise to a
/// fixed reference date, so repeated renders of the same document agree.
#[derive(Debug, Clone, Copy)]
pub struct YearsAgeFormatter {
    reference: GenoDate,
}

impl YearsAgeFormatter {
    pub fn new(reference: GenoDate) -> Self {
        YearsAgeFormatter { reference }
    }

    pub fn from_today() -> Self {
        let today = chrono::Local::now().date_naive();
        YearsAgeFormatter {
            reference: GenoDate {
                year: today.year(),
                month: Some(today.month() as u8),
                day: Some(today.day() as u8),
            },
        }
    }
}

impl AgeFormatter for YearsAgeFormatter {
    fn format(&self, birth: Option<&Birth>, death: Option<&Death>) -> Option<String> {
        let born = birth?.date?;
        let until = death.and_then(|death| death.date).unwrap_or(self.reference);
        years_between(born, until).map(|years| years.to_string())
    }
}

fn years_between(from: GenoDate, to: GenoDate) -> Option<i32> {
    let mut years = to.year - from.year;
    if let (Some(from_month), Some(to_month)) = (from.month, to.month) {
        if to_month < from_month {
            years -= 1;
        } else if to_month == from_month {
            if let (Some(from_day), Some(to_day)) = (from.day, to.day) {
                if to_day < from_day {
                    years -= 1;
                }
            }
        }
    }
    (years >= 0).then_some(years)
}
