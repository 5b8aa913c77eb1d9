use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString as _};

use crate::model::reminder::Trigger;

/// Amount with two decimals and thousands separators (`1,234.50`).
///
/// Rounds the way `{:.2}` does. A value that rounds to zero never gets a
/// minus sign.
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let whole = whole
        .parse::<u64>()
        .map(|w| w.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| whole.to_string());
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, whole, cents)
}

pub fn format_currency(symbol: &str, amount: f64) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-{}{}", symbol, rest),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Odometer figure with thousands separators.
pub fn format_miles(miles: u32) -> String {
    miles.to_formatted_string(&Locale::en)
}

/// Signed mile distance (`-1,200`).
pub fn format_signed_miles(miles: i64) -> String {
    miles.to_formatted_string(&Locale::en)
}

/// `Dec 15, 2023`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Percentage with one decimal (`68.4%`).
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share)
}

/// Human description of a reminder trigger. The recurrence is shown only
/// for recurring triggers.
pub fn trigger_label(trigger: &Trigger) -> String {
    match *trigger {
        Trigger::Mileage { at, every } => {
            let base = format!("At {} miles", format_miles(at));
            match every {
                Some(step) => format!("{} (every {} miles)", base, format_miles(step)),
                None => base,
            }
        }
        Trigger::Date { on, every } => {
            let base = format!("On {}", format_date(on));
            match every {
                Some(period) => format!("{} ({})", base, period.label()),
                None => base,
            }
        }
    }
}

/// Relative distance to a trigger, e.g. `in 12 days` or `3 days ago`.
pub fn days_phrase(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d > 0 => format!("in {} days", d),
        d => format!("{} days ago", -d),
    }
}

pub fn miles_phrase(miles: i64) -> String {
    if miles >= 0 {
        format!("{} miles to go", format_signed_miles(miles))
    } else {
        format!("{} miles past", format_signed_miles(-miles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::reminder::Period;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn amounts() {
        assert_eq!(format_amount(290.99), "290.99");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(1650.5), "1,650.50");
        assert_eq!(format_amount(-12.3), "-12.30");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(f64::NAN), "0.00");
    }

    #[test]
    fn currency() {
        assert_eq!(format_currency("$", 290.99), "$290.99");
        assert_eq!(format_currency("€", -5.0), "-€5.00");
    }

    #[test]
    fn dates_and_miles() {
        assert_eq!(format_date(d(2023, 12, 15)), "Dec 15, 2023");
        assert_eq!(format_date(d(2024, 4, 1)), "Apr 1, 2024");
        assert_eq!(format_miles(48000), "48,000");
        assert_eq!(format_miles(950), "950");
    }

    #[test]
    fn trigger_labels() {
        let one_shot = Trigger::Mileage {
            at: 48000,
            every: None,
        };
        insta::assert_snapshot!(trigger_label(&one_shot), @"At 48,000 miles");

        let recurring = Trigger::Mileage {
            at: 48000,
            every: Some(3000),
        };
        insta::assert_snapshot!(trigger_label(&recurring), @"At 48,000 miles (every 3,000 miles)");

        let yearly = Trigger::Date {
            on: d(2024, 6, 15),
            every: Some(Period::Year),
        };
        insta::assert_snapshot!(trigger_label(&yearly), @"On Jun 15, 2024 (yearly)");

        let half = Trigger::Date {
            on: d(2024, 6, 15),
            every: Some(Period::HalfYear),
        };
        insta::assert_snapshot!(trigger_label(&half), @"On Jun 15, 2024 (every 6 months)");
    }

    #[test]
    fn relative_phrases() {
        assert_eq!(days_phrase(0), "today");
        assert_eq!(days_phrase(12), "in 12 days");
        assert_eq!(days_phrase(-3), "3 days ago");
        assert_eq!(miles_phrase(2711), "2,711 miles to go");
        assert_eq!(miles_phrase(-1200), "1,200 miles past");
    }
}
