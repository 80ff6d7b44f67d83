use common::Language;
use time::OffsetDateTime;

/// Long-form relative time for listings. Anything a week or older is shown
/// as a calendar date instead.
pub fn time_ago(timestamp: OffsetDateTime, now: OffsetDateTime, language: Language) -> String {
    let seconds = (now - timestamp).whole_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    match language {
        Language::En => {
            if minutes < 1 {
                "just now".to_string()
            } else if hours < 1 {
                plural(minutes, "minute")
            } else if days < 1 {
                plural(hours, "hour")
            } else if days < 7 {
                plural(days, "day")
            } else {
                let date = timestamp.date();
                format!("{} {}, {}", date.month(), date.day(), date.year())
            }
        }
        Language::Ko => {
            if minutes < 1 {
                "방금 전".to_string()
            } else if hours < 1 {
                format!("{}분 전", minutes)
            } else if days < 1 {
                format!("{}시간 전", hours)
            } else if days < 7 {
                format!("{}일 전", days)
            } else {
                let date = timestamp.date();
                format!("{}년 {}월 {}일", date.year(), u8::from(date.month()), date.day())
            }
        }
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Cuts `text` to at most `max_chars` characters, appending `...` when
/// anything was removed.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
    }
}
