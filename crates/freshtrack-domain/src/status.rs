//! Expiry status - how fresh a product is relative to today

use chrono::NaiveDate;

/// Number of days ahead (inclusive) that still counts as "expiring"
pub const EXPIRING_WINDOW_DAYS: i64 = 3;

/// Freshness of a product on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpiryStatus {
    /// The expiry date is in the past
    Expired,
    /// Expires today or within the next few days
    Expiring,
    /// Comfortably within date
    Fresh,
}

impl ExpiryStatus {
    /// Classify an expiry date against `today`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use freshtrack_domain::ExpiryStatus;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    /// let tomorrow = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    /// assert_eq!(ExpiryStatus::classify(tomorrow, today), ExpiryStatus::Expiring);
    /// ```
    pub fn classify(expiry: NaiveDate, today: NaiveDate) -> Self {
        let days = days_until(expiry, today);
        if days < 0 {
            ExpiryStatus::Expired
        } else if days <= EXPIRING_WINDOW_DAYS {
            ExpiryStatus::Expiring
        } else {
            ExpiryStatus::Fresh
        }
    }

    /// Short machine name, used by filters
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::Expiring => "expiring",
            ExpiryStatus::Fresh => "fresh",
        }
    }

    /// Parse a machine name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expired" => Some(ExpiryStatus::Expired),
            "expiring" => Some(ExpiryStatus::Expiring),
            "fresh" => Some(ExpiryStatus::Fresh),
            _ => None,
        }
    }
}

/// Whole days from `today` until `expiry` (negative once expired)
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Human label for a product's remaining shelf life
pub fn status_label(expiry: NaiveDate, today: NaiveDate) -> String {
    let days = days_until(expiry, today);
    match days {
        d if d < 0 => "Expired".to_string(),
        0 => "Expires Today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{} days left", d),
    }
}
