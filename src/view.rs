//! Render model for the habit list
//!
//! Front ends hold no state of their own: after every change they fetch a
//! fresh snapshot from the store and rebuild the list from a [`ListView`].

use chrono::{DateTime, TimeZone, Utc};

use crate::habit::Habit;

/// One rendered habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    pub id: String,
    pub name: String,
    /// e.g. "Done 3 times • Last: Mar 9"
    pub stats: String,
}

impl HabitRow {
    pub fn new<Tz: TimeZone>(habit: &Habit, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: habit.id.to_string(),
            name: habit.name.clone(),
            stats: format!(
                "{} • Last: {}",
                done_label(habit.count),
                format_last_done(habit.last_done, tz)
            ),
        }
    }
}

/// What the list area should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// No habits yet: show the empty-state placeholder
    Empty,
    Rows(Vec<HabitRow>),
}

impl ListView {
    pub fn from_habits<Tz: TimeZone>(habits: &[Habit], tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        if habits.is_empty() {
            ListView::Empty
        } else {
            ListView::Rows(habits.iter().map(|h| HabitRow::new(h, tz)).collect())
        }
    }
}

/// "Done 1 time" / "Done 4 times"
pub fn done_label(count: u32) -> String {
    let unit = if count == 1 { "time" } else { "times" };
    format!("Done {count} {unit}")
}

/// Short month and day in `tz` ("Mar 9"), or "Never"
pub fn format_last_done<Tz: TimeZone>(last_done: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match last_done {
        Some(at) => at.with_timezone(tz).format("%b %-d").to_string(),
        None => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap()
    }

    #[test]
    fn test_done_label_pluralizes() {
        assert_eq!(done_label(0), "Done 0 times");
        assert_eq!(done_label(1), "Done 1 time");
        assert_eq!(done_label(12), "Done 12 times");
    }

    #[test]
    fn test_format_last_done() {
        assert_eq!(format_last_done(None, &Utc), "Never");
        assert_eq!(format_last_done(Some(stamp()), &Utc), "Mar 9");
        // Already the next day further east
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(format_last_done(Some(stamp()), &tokyo), "Mar 10");
    }

    #[test]
    fn test_rows_follow_list_order() {
        let fresh = Habit::new("b".into(), "Walk");
        let done = Habit::new("a".into(), "Read").completed(stamp());
        let view = ListView::from_habits(&[fresh, done], &Utc);

        let ListView::Rows(rows) = view else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Walk");
        assert_eq!(rows[0].stats, "Done 0 times • Last: Never");
        assert_eq!(rows[1].id, "a");
        assert_eq!(rows[1].stats, "Done 1 time • Last: Mar 9");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(ListView::from_habits(&[], &Utc), ListView::Empty);
    }
}
