//! French public holidays and religious feast days.
//!
//! Movable feasts derive from Easter Sunday, computed with the anonymous
//! Gregorian algorithm. The Ramadan window is an approximation anchored on
//! 2024 and drifting 11 days per year; callers should treat it as advisory.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// First day of Ramadan in the anchor year (11 March 2024).
const RAMADAN_ANCHOR_YEAR: i32 = 2024;
const RAMADAN_ANCHOR_MONTH: u32 = 3;
const RAMADAN_ANCHOR_DAY: u32 = 11;
/// Days the lunar calendar drifts back each solar year.
const RAMADAN_DRIFT_DAYS: i64 = 11;
const RAMADAN_LENGTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    National,
    Religious,
    Seasonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HolidayCategory {
    NewYear,
    Labor,
    Victory,
    Bastille,
    Catholic,
    Armistice,
    Christmas,
    Easter,
    EasterMonday,
    Ramadan,
    Lent,
}

/// A dated holiday or feast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
    pub kind: HolidayKind,
    pub category: HolidayCategory,
}

impl Holiday {
    fn new(name: &str, date: NaiveDate, kind: HolidayKind, category: HolidayCategory) -> Self {
        Self {
            name: name.to_string(),
            date,
            kind,
            category,
        }
    }
}

/// Approximate Ramadan window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RamadanWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RamadanWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Easter Sunday for `year`.
pub fn easter_date(year: i32) -> NaiveDate {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;

    ymd(year, month as u32, day as u32)
}

pub fn ramadan_window(year: i32) -> RamadanWindow {
    let anchor = ymd(year, RAMADAN_ANCHOR_MONTH, RAMADAN_ANCHOR_DAY);
    let drift = (i64::from(year) - i64::from(RAMADAN_ANCHOR_YEAR)) * RAMADAN_DRIFT_DAYS;
    let start = shift_days(anchor, -drift);
    RamadanWindow {
        start,
        end: shift_days(start, RAMADAN_LENGTH_DAYS - 1),
    }
}

/// Ash Wednesday: 40 days of Lent plus the 6 Sundays before Easter.
pub fn lent_start(year: i32) -> NaiveDate {
    shift_days(easter_date(year), -46)
}

/// All holidays and feast days of `year`, fixed dates first.
pub fn french_holidays(year: i32) -> Vec<Holiday> {
    use HolidayCategory as C;
    use HolidayKind::{National, Religious};

    let mut holidays = vec![
        Holiday::new("Jour de l'An", ymd(year, 1, 1), National, C::NewYear),
        Holiday::new("Fête du Travail", ymd(year, 5, 1), National, C::Labor),
        Holiday::new("Victoire 1945", ymd(year, 5, 8), National, C::Victory),
        Holiday::new("Fête Nationale", ymd(year, 7, 14), National, C::Bastille),
        Holiday::new("Assomption", ymd(year, 8, 15), Religious, C::Catholic),
        Holiday::new("Toussaint", ymd(year, 11, 1), Religious, C::Catholic),
        Holiday::new("Armistice 1918", ymd(year, 11, 11), National, C::Armistice),
        Holiday::new("Noël", ymd(year, 12, 25), Religious, C::Christmas),
    ];

    let easter = easter_date(year);
    holidays.push(Holiday::new("Pâques", easter, Religious, C::Easter));
    holidays.push(Holiday::new(
        "Lundi de Pâques",
        shift_days(easter, 1),
        Religious,
        C::EasterMonday,
    ));
    holidays.push(Holiday::new("Ascension", shift_days(easter, 39), Religious, C::Catholic));
    holidays.push(Holiday::new("Pentecôte", shift_days(easter, 49), Religious, C::Catholic));

    let ramadan = ramadan_window(year);
    holidays.push(Holiday::new("Début du Ramadan", ramadan.start, Religious, C::Ramadan));
    holidays.push(Holiday::new("Fin du Ramadan", ramadan.end, Religious, C::Ramadan));

    holidays.push(Holiday::new("Début du Carême", lent_start(year), Religious, C::Lent));

    holidays
}

/// Every holiday falling on `date`, fixed dates first.
///
/// Computed against the holidays of the date's own year, so a Ramadan window
/// drifting across the year boundary is only reported in the year it was
/// computed for.
pub fn holidays_on(date: NaiveDate) -> Vec<Holiday> {
    french_holidays(date.year())
        .into_iter()
        .filter(|h| h.date == date)
        .collect()
}

/// The holiday shown for `date`: the first of [`holidays_on`], so a fixed
/// holiday wins over a movable feast on the same day (Ascension on 1 May).
pub fn holiday_on(date: NaiveDate) -> Option<Holiday> {
    holidays_on(date).into_iter().next()
}

// Years outside chrono's representable range clamp to its bounds.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn easter_known_years() {
        assert_eq!(easter_date(2024), date(2024, 3, 31));
        assert_eq!(easter_date(2025), date(2025, 4, 20));
        assert_eq!(easter_date(2026), date(2026, 4, 5));
        assert_eq!(easter_date(2000), date(2000, 4, 23));
        assert_eq!(easter_date(1818), date(1818, 3, 22));
        assert_eq!(easter_date(2038), date(2038, 4, 25));
    }

    #[test]
    fn movable_feasts_follow_easter() {
        let holidays = french_holidays(2026);
        let find = |name: &str| holidays.iter().find(|h| h.name == name).unwrap().date;
        assert_eq!(find("Lundi de Pâques"), date(2026, 4, 6));
        assert_eq!(find("Ascension"), date(2026, 5, 14));
        assert_eq!(find("Pentecôte"), date(2026, 5, 24));
        assert_eq!(find("Début du Carême"), date(2026, 2, 18));
    }

    #[test]
    fn lent_starts_on_ash_wednesday() {
        for year in [2024, 2025, 2026, 2027] {
            assert_eq!(lent_start(year).weekday(), Weekday::Wed);
        }
    }

    #[test]
    fn ramadan_anchor_and_drift() {
        let anchor = ramadan_window(2024);
        assert_eq!(anchor.start, date(2024, 3, 11));
        assert_eq!(anchor.end, date(2024, 4, 9));

        let next = ramadan_window(2025);
        assert_eq!(next.start, date(2025, 2, 28));
        assert_eq!((next.end - next.start).num_days(), 29);
        assert!(next.contains(date(2025, 3, 15)));
        assert!(!next.contains(date(2025, 3, 30)));
    }

    #[test]
    fn holiday_on_finds_fixed_and_movable() {
        assert_eq!(
            holiday_on(date(2026, 7, 14)).map(|h| h.category),
            Some(HolidayCategory::Bastille)
        );
        assert_eq!(
            holiday_on(date(2026, 4, 5)).map(|h| h.category),
            Some(HolidayCategory::Easter)
        );
        assert!(holiday_on(date(2026, 7, 15)).is_none());
    }

    #[test]
    fn shared_day_lists_every_holiday() {
        // Easter 2008 is 23 March, so Ascension falls on 1 May.
        let both: Vec<HolidayCategory> = holidays_on(date(2008, 5, 1)).iter().map(|h| h.category).collect();
        assert_eq!(both, vec![HolidayCategory::Labor, HolidayCategory::Catholic]);
        assert_eq!(
            holiday_on(date(2008, 5, 1)).map(|h| h.category),
            Some(HolidayCategory::Labor)
        );
        assert!(holidays_on(date(2008, 5, 2)).is_empty());
    }

    #[test]
    fn holiday_serializes_with_kebab_category() {
        let json = serde_json::to_value(Holiday::new(
            "Lundi de Pâques",
            date(2026, 4, 6),
            HolidayKind::Religious,
            HolidayCategory::EasterMonday,
        ))
        .unwrap();
        assert_eq!(json["category"], "easter-monday");
        assert_eq!(json["kind"], "religious");
        assert_eq!(json["date"], "2026-04-06");
    }

    proptest! {
        #[test]
        fn easter_is_always_a_sunday(year in 1583i32..4000) {
            prop_assert_eq!(easter_date(year).weekday(), Weekday::Sun);
        }

        #[test]
        fn exactly_one_easter_entry(year in 1583i32..4000) {
            let count = french_holidays(year)
                .iter()
                .filter(|h| h.category == HolidayCategory::Easter)
                .count();
            prop_assert_eq!(count, 1);
        }
    }
}
