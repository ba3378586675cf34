use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

/// Which contact fields a provider record actually populated.
#[derive(Debug, Clone, Default)]
pub struct ContactSignals {
    pub has_email: bool,
    pub has_phone: bool,
    pub has_organization: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Point weights and thresholds turning `ContactSignals` into a `Confidence`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub email_weight: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub phone_weight: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub organization_weight: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub recency_weight: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub recency_window_days: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub high_threshold: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub medium_threshold: u8,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            email_weight: 3,
            phone_weight: 2,
            organization_weight: 1,
            recency_weight: 1,
            recency_window_days: 30,
            high_threshold: 4,
            medium_threshold: 2,
        }
    }
}

impl ConfidencePolicy {
    pub fn score(&self, signals: &ContactSignals, now: DateTime<Utc>) -> u8 {
        let mut score = 0u8;
        if signals.has_email {
            score = score.saturating_add(self.email_weight);
        }
        if signals.has_phone {
            score = score.saturating_add(self.phone_weight);
        }
        if signals.has_organization {
            score = score.saturating_add(self.organization_weight);
        }
        if let Some(updated_at) = signals.updated_at {
            if now - updated_at < Duration::days(self.recency_window_days) {
                score = score.saturating_add(self.recency_weight);
            }
        }
        score
    }

    pub fn label(&self, score: u8) -> Confidence {
        if score >= self.high_threshold {
            Confidence::High
        } else if score >= self.medium_threshold {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn assess(&self, signals: &ContactSignals, now: DateTime<Utc>) -> Confidence {
        self.label(self.score(signals, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn email_alone_is_medium() {
        let policy = ConfidencePolicy::default();
        let signals = ContactSignals {
            has_email: true,
            ..Default::default()
        };
        assert_eq!(policy.score(&signals, now()), 3);
        assert_eq!(policy.assess(&signals, now()), Confidence::Medium);
    }

    #[test]
    fn email_and_organization_is_high() {
        let policy = ConfidencePolicy::default();
        let signals = ContactSignals {
            has_email: true,
            has_organization: true,
            ..Default::default()
        };
        assert_eq!(policy.assess(&signals, now()), Confidence::High);
    }

    #[test]
    fn recency_bonus_only_inside_window() {
        let policy = ConfidencePolicy::default();
        let mut signals = ContactSignals {
            has_organization: true,
            updated_at: Some(now() - Duration::days(3)),
            ..Default::default()
        };
        assert_eq!(policy.score(&signals, now()), 2);
        assert_eq!(policy.assess(&signals, now()), Confidence::Medium);

        signals.updated_at = Some(now() - Duration::days(45));
        assert_eq!(policy.score(&signals, now()), 1);
        assert_eq!(policy.assess(&signals, now()), Confidence::Low);
    }

    #[test]
    fn nothing_is_low() {
        let policy = ConfidencePolicy::default();
        assert_eq!(
            policy.assess(&ContactSignals::default(), now()),
            Confidence::Low
        );
    }

    #[test]
    fn thresholds_are_configurable() {
        let policy: ConfidencePolicy =
            serde_json::from_str(r#"{"high_threshold": "7", "medium_threshold": 4}"#).unwrap();
        assert_eq!(policy.email_weight, 3);
        assert_eq!(policy.label(6), Confidence::Medium);
        assert_eq!(policy.label(7), Confidence::High);
        assert_eq!(policy.label(3), Confidence::Low);
    }
}
