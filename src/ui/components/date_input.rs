use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn placeholder(self) -> &'static str {
        match self {
            DatePart::Year => "[YYYY]",
            DatePart::Month => "[MM]",
            DatePart::Day => "[DD]",
        }
    }

    fn digits(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }
}

/// Segment-based editor for a calendar date: the year, month, and day
/// are typed as digit groups, Left/Right moves between segments.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    buffer: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            buffer: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.date_part = DatePart::Year;
        self.buffer.clear();
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.buffer.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.buffer.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                if self.buffer.len() == self.date_part.digits() {
                    self.commit_buffer();
                }
            }
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Apply the typed segment if it produces a real calendar date. The
    // day is clamped to the target month's length so switching the year
    // or month never strands the editor on an invalid date.
    fn commit_buffer(&mut self) {
        let typed = self.buffer.clone();
        self.buffer.clear();

        match self.date_part {
            DatePart::Year => {
                if let Ok(year) = typed.parse::<i32>() {
                    if (1900..=2100).contains(&year) {
                        self.set_ymd(year, self.date.month(), self.date.day());
                    }
                }
            }
            DatePart::Month => {
                if let Ok(month) = typed.parse::<u32>() {
                    if (1..=12).contains(&month) {
                        self.set_ymd(self.date.year(), month, self.date.day());
                    }
                }
            }
            DatePart::Day => {
                if let Ok(day) = typed.parse::<u32>() {
                    if day >= 1 {
                        self.set_ymd(self.date.year(), self.date.month(), day);
                    }
                }
            }
        }
    }

    fn set_ymd(&mut self, year: i32, month: u32, day: u32) {
        let day = day.min(last_day_of_month(year, month));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.date = date;
        }
    }

    /// The value as shown in the form, with the active segment replaced
    /// by the pending digits (or a placeholder) while editing.
    pub fn display(&self) -> String {
        if !self.editing {
            return self.date.format("%Y-%m-%d").to_string();
        }

        let segment = |part: DatePart, value: String| {
            if part == self.date_part {
                if self.buffer.is_empty() {
                    format!("{}{}", value, part.placeholder())
                } else {
                    format!("{}[{}]", value, self.buffer)
                }
            } else {
                value
            }
        };

        format!(
            "{}-{}-{}",
            segment(DatePart::Year, format!("{:04}", self.date.year())),
            segment(DatePart::Month, format!("{:02}", self.date.month())),
            segment(DatePart::Day, format!("{:02}", self.date.day())),
        )
    }
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(y: i32, m: u32, d: u32) -> DateInputState {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        state.toggle_editing();
        state
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_four_digits_sets_the_year() {
        let mut state = state(2024, 6, 15);
        type_digits(&mut state, "2030");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2030, 6, 15).unwrap());
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let mut state = state(2024, 6, 15);
        state.next_date_part();
        type_digits(&mut state, "13");
        assert_eq!(state.date.month(), 6);
    }

    #[test]
    fn day_clamps_to_month_length() {
        let mut state = state(2024, 2, 10);
        state.next_date_part();
        state.next_date_part();
        type_digits(&mut state, "31");
        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn backspace_drops_a_pending_digit() {
        let mut state = state(2024, 6, 15);
        type_digits(&mut state, "19");
        state.handle_input(KeyCode::Backspace);
        type_digits(&mut state, "930");
        assert_eq!(state.date.year(), 1930);
    }

    #[test]
    fn display_marks_the_active_segment() {
        let mut state = state(2024, 6, 15);
        assert_eq!(state.display(), "2024[YYYY]-06-15");
        state.next_date_part();
        type_digits(&mut state, "1");
        assert_eq!(state.display(), "2024-06[1]-15");
        state.stop_editing();
        assert_eq!(state.display(), "2024-06-15");
    }

    #[test]
    fn february_last_day_tracks_leap_years() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2025, 2), 28);
        assert_eq!(last_day_of_month(2024, 12), 31);
    }
}
