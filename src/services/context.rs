use crate::models::{Context, TimeOfDay, UserSegment};

/// Hours strictly below this are Lunch, the rest Dinner. A deliberately
/// coarse two-bucket split: the multiplier tables are learned on the same
/// buckets, so more granularity here would have nothing to match against.
pub const LUNCH_CUTOFF_HOUR: u32 = 17;

/// Pure mapping from raw boundary signals to canonical context categories.
///
/// Total function: there is no invalid input. Out-of-range hours fold into
/// a day, and any segment label outside the closed set maps to `Unknown`.
pub struct ContextResolver;

impl ContextResolver {
    pub fn resolve(hour_of_day: u32, raw_segment: &str) -> Context {
        Context {
            time_of_day: Self::resolve_time_of_day(hour_of_day),
            user_segment: Self::resolve_segment(raw_segment),
        }
    }

    fn resolve_time_of_day(hour_of_day: u32) -> TimeOfDay {
        if hour_of_day % 24 < LUNCH_CUTOFF_HOUR {
            TimeOfDay::Lunch
        } else {
            TimeOfDay::Dinner
        }
    }

    fn resolve_segment(raw_segment: &str) -> UserSegment {
        match raw_segment.trim() {
            "Premium" => UserSegment::Premium,
            "Standard" => UserSegment::Standard,
            _ => UserSegment::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lunch_dinner_split() {
        assert_eq!(
            ContextResolver::resolve(14, "Premium").time_of_day,
            TimeOfDay::Lunch
        );
        assert_eq!(
            ContextResolver::resolve(16, "Premium").time_of_day,
            TimeOfDay::Lunch
        );
        assert_eq!(
            ContextResolver::resolve(17, "Premium").time_of_day,
            TimeOfDay::Dinner
        );
        assert_eq!(
            ContextResolver::resolve(20, "Premium").time_of_day,
            TimeOfDay::Dinner
        );
        assert_eq!(
            ContextResolver::resolve(0, "Premium").time_of_day,
            TimeOfDay::Lunch
        );
    }

    #[test]
    fn test_out_of_range_hour_folds_into_day() {
        assert_eq!(
            ContextResolver::resolve(25, "Premium").time_of_day,
            TimeOfDay::Lunch
        );
        assert_eq!(
            ContextResolver::resolve(41, "Premium").time_of_day,
            TimeOfDay::Dinner
        );
    }

    #[test]
    fn test_segment_closed_set() {
        assert_eq!(
            ContextResolver::resolve(12, "Premium").user_segment,
            UserSegment::Premium
        );
        assert_eq!(
            ContextResolver::resolve(12, " Standard ").user_segment,
            UserSegment::Standard
        );
        assert_eq!(
            ContextResolver::resolve(12, "premium").user_segment,
            UserSegment::Unknown
        );
        assert_eq!(
            ContextResolver::resolve(12, "VIP").user_segment,
            UserSegment::Unknown
        );
        assert_eq!(
            ContextResolver::resolve(12, "").user_segment,
            UserSegment::Unknown
        );
    }
}
