use crate::plan::SubscriptionPlan;

/// Non-finite and non-positive values (including `-0.0`) become `0.0`.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub fn normalize_price(value: f64) -> f64 {
    non_negative(value)
}

pub fn normalize_goal(value: f64) -> f64 {
    non_negative(value)
}

pub fn normalize_conversion_rate(value: f64) -> f64 {
    non_negative(value).min(100.0)
}

pub fn normalize_plan(plan: &mut SubscriptionPlan) {
    plan.yearly_price = normalize_price(plan.yearly_price);
    plan.monthly_price = normalize_price(plan.monthly_price);
    plan.weekly_price = normalize_price(plan.weekly_price);
}
