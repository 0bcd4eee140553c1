use chrono::NaiveDate;

/// How close a project's end date is, from the signed day difference
/// between the end date and the current calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueToday,
    OneDayLeft,
    Urgent,
    Approaching,
    Comfortable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaysRemaining {
    pub days: i64,
    pub urgency: Option<Urgency>,
}

/// Classify a project's end date against `today`.
///
/// Works on whole calendar days, so the result does not depend on the
/// caller's time of day or timezone offset. A missing end date yields
/// zero days with no urgency; the card renders that as "N/A".
pub fn days_remaining(end_date: Option<NaiveDate>, today: NaiveDate) -> DaysRemaining {
    let Some(end) = end_date else {
        return DaysRemaining {
            days: 0,
            urgency: None,
        };
    };

    let days = (end - today).num_days();
    let urgency = match days {
        d if d < 0 => Urgency::Overdue,
        0 => Urgency::DueToday,
        1 => Urgency::OneDayLeft,
        2..=7 => Urgency::Urgent,
        8..=30 => Urgency::Approaching,
        _ => Urgency::Comfortable,
    };

    DaysRemaining {
        days,
        urgency: Some(urgency),
    }
}

impl DaysRemaining {
    /// Badge text, matching the card wording: "N days overdue",
    /// "Due today", "1 day left", "N days left".
    pub fn label(&self) -> String {
        match self.urgency {
            None => "N/A".to_string(),
            Some(Urgency::Overdue) => format!("{} days overdue", self.days.abs()),
            Some(Urgency::DueToday) => "Due today".to_string(),
            Some(Urgency::OneDayLeft) => "1 day left".to_string(),
            Some(_) => format!("{} days left", self.days),
        }
    }
}
