use common::Language;
use serde::Serialize;
use time::OffsetDateTime;

/// Below this age an event is shown with the `LIVE` badge.
pub const LIVE_TIER_SECONDS: i64 = 10;
/// Below this age an event counts as live activity. Deliberately wider than
/// [`LIVE_TIER_SECONDS`].
pub const LIVE_ACTIVITY_SECONDS: i64 = 30;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessTier {
    Live,
    Fresh,
    Recent,
    Old,
}

impl FreshnessTier {
    pub fn badge(self) -> &'static str {
        match self {
            FreshnessTier::Live => "LIVE",
            FreshnessTier::Fresh => "Fresh",
            FreshnessTier::Recent => "Recent",
            FreshnessTier::Old => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessResult {
    pub display_text: String,
    pub badge_label: &'static str,
    pub tier: FreshnessTier,
    pub age_seconds: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessClassifier {
    language: Language,
}

enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl FreshnessClassifier {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Whole seconds from `timestamp` to `now`. Future timestamps clamp to 0.
    pub fn age_seconds(timestamp: OffsetDateTime, now: OffsetDateTime) -> i64 {
        (now - timestamp).whole_seconds().max(0)
    }

    pub fn classify(&self, timestamp: OffsetDateTime, now: OffsetDateTime) -> FreshnessResult {
        self.classify_age(Self::age_seconds(timestamp, now))
    }

    pub fn classify_now(&self, timestamp: OffsetDateTime) -> FreshnessResult {
        self.classify(timestamp, OffsetDateTime::now_utc())
    }

    pub fn classify_age(&self, age_seconds: i64) -> FreshnessResult {
        let age = age_seconds.max(0);
        let (tier, display_text) = if age < LIVE_TIER_SECONDS {
            (FreshnessTier::Live, self.just_now().to_string())
        } else if age < MINUTE {
            (FreshnessTier::Fresh, self.offset(age, Unit::Seconds))
        } else if age < 10 * MINUTE {
            (FreshnessTier::Fresh, self.offset(age / MINUTE, Unit::Minutes))
        } else if age < HOUR {
            (FreshnessTier::Recent, self.offset(age / MINUTE, Unit::Minutes))
        } else if age < DAY {
            (FreshnessTier::Recent, self.offset(age / HOUR, Unit::Hours))
        } else {
            (FreshnessTier::Old, self.offset(age / DAY, Unit::Days))
        };

        FreshnessResult {
            display_text,
            badge_label: tier.badge(),
            tier,
            age_seconds: age,
        }
    }

    pub fn is_live_activity(timestamp: OffsetDateTime, now: OffsetDateTime) -> bool {
        Self::age_seconds(timestamp, now) < LIVE_ACTIVITY_SECONDS
    }

    pub fn is_live_activity_now(timestamp: OffsetDateTime) -> bool {
        Self::is_live_activity(timestamp, OffsetDateTime::now_utc())
    }

    fn just_now(&self) -> &'static str {
        match self.language {
            Language::Ko => "방금 전",
            Language::En => "just now",
        }
    }

    fn offset(&self, value: i64, unit: Unit) -> String {
        match self.language {
            Language::En => {
                let suffix = match unit {
                    Unit::Seconds => "s",
                    Unit::Minutes => "m",
                    Unit::Hours => "h",
                    Unit::Days => "d",
                };
                format!("{}{} ago", value, suffix)
            }
            Language::Ko => {
                let suffix = match unit {
                    Unit::Seconds => "초",
                    Unit::Minutes => "분",
                    Unit::Hours => "시간",
                    Unit::Days => "일",
                };
                format!("{}{} 전", value, suffix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    fn en() -> FreshnessClassifier {
        FreshnessClassifier::new(Language::En)
    }

    #[test]
    fn test_live_tier() {
        let result = en().classify_age(5);
        assert_eq!(result.tier, FreshnessTier::Live);
        assert_eq!(result.badge_label, "LIVE");
        assert_eq!(result.display_text, "just now");
        assert_eq!(FreshnessClassifier::new(Language::Ko).classify_age(0).display_text, "방금 전");
    }

    #[test]
    fn test_fresh_seconds_and_minutes() {
        let result = en().classify_age(45);
        assert_eq!(result.tier, FreshnessTier::Fresh);
        assert_eq!(result.display_text, "45s ago");
        assert_eq!(result.badge_label, "Fresh");

        assert_eq!(en().classify_age(10).tier, FreshnessTier::Fresh);
        assert_eq!(en().classify_age(10).display_text, "10s ago");

        let nine_minutes = en().classify_age(9 * 60 + 59);
        assert_eq!(nine_minutes.tier, FreshnessTier::Fresh);
        assert_eq!(nine_minutes.display_text, "9m ago");
    }

    #[test]
    fn test_boundaries_belong_to_upper_bucket() {
        assert_eq!(en().classify_age(59).display_text, "59s ago");
        assert_eq!(en().classify_age(60).display_text, "1m ago");

        let ten_minutes = en().classify_age(600);
        assert_eq!(ten_minutes.tier, FreshnessTier::Recent);
        assert_eq!(ten_minutes.badge_label, "Recent");
        assert_eq!(ten_minutes.display_text, "10m ago");

        assert_eq!(en().classify_age(3600).display_text, "1h ago");
        assert_eq!(en().classify_age(86_400).tier, FreshnessTier::Old);
    }

    #[test]
    fn test_hours_and_days() {
        let hours = en().classify_age(23 * 3600 + 3599);
        assert_eq!(hours.tier, FreshnessTier::Recent);
        assert_eq!(hours.display_text, "23h ago");

        let days = en().classify_age(2 * 86_400 + 100);
        assert_eq!(days.tier, FreshnessTier::Old);
        assert_eq!(days.display_text, "2d ago");
        assert_eq!(days.badge_label, "");
    }

    #[test]
    fn test_korean_offsets() {
        let ko = FreshnessClassifier::new(Language::Ko);
        assert_eq!(ko.classify_age(45).display_text, "45초 전");
        assert_eq!(ko.classify_age(9 * 60).display_text, "9분 전");
        assert_eq!(ko.classify_age(23 * 3600).display_text, "23시간 전");
        assert_eq!(ko.classify_age(2 * 86_400).display_text, "2일 전");
    }

    #[test]
    fn test_future_timestamp_clamps_to_zero() {
        let now = datetime!(2026-10-16 12:00 UTC);
        let result = en().classify(now + Duration::minutes(5), now);
        assert_eq!(result.age_seconds, 0);
        assert_eq!(result.tier, FreshnessTier::Live);
        assert!(FreshnessClassifier::is_live_activity(now + Duration::hours(1), now));
    }

    #[test]
    fn test_classify_uses_elapsed_floor() {
        let now = datetime!(2026-10-16 12:00 UTC);
        let result = en().classify(now - Duration::milliseconds(119_900), now);
        assert_eq!(result.age_seconds, 119);
        assert_eq!(result.display_text, "1m ago");
    }

    #[test]
    fn test_live_activity_threshold_differs_from_live_tier() {
        let now = datetime!(2026-10-16 12:00 UTC);
        assert!(FreshnessClassifier::is_live_activity(now - Duration::seconds(29), now));
        assert!(!FreshnessClassifier::is_live_activity(now - Duration::seconds(30), now));
        // 20s old: live activity, but no longer in the LIVE tier.
        assert_eq!(en().classify(now - Duration::seconds(20), now).tier, FreshnessTier::Fresh);
        assert!(FreshnessClassifier::is_live_activity(now - Duration::seconds(20), now));
    }

    #[test]
    fn test_result_serializes_for_presentation() {
        let json = serde_json::to_value(en().classify_age(45)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "displayText": "45s ago",
                "badgeLabel": "Fresh",
                "tier": "fresh",
                "ageSeconds": 45
            })
        );
    }
}
