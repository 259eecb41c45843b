use anyhow::Result;
use serde::Serialize;

/// Pretty JSON. Non-finite numbers (unreachable tiers) serialize as `null`.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::calculator::breakdown::revenue_breakdown;
    use crate::output::json::render_json;
    use crate::plan::SubscriptionPlan;

    #[test]
    fn unreachable_users_render_as_null() {
        let plan = SubscriptionPlan::new("Pro", 0.0, 12.0, 3.0);
        let rendered = render_json(&revenue_breakdown(&plan, 1_000.0)).expect("json");
        let value: Value = serde_json::from_str(&rendered).expect("valid json");
        assert!(value["yearly"]["users_needed"].is_null());
        assert_eq!(value["monthly"]["users_needed"], 7.0);
    }
}
