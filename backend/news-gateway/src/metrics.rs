use prometheus::IntCounterVec;

lazy_static::lazy_static! {
    pub static ref AGGREGATE_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "aggregate_requests_total",
        "News detail aggregations by outcome",
        &["outcome"]
    ).expect("failed to register aggregate_requests_total");

    pub static ref POLICY_DECISIONS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "policy_decisions_total",
        "Moderation gate decisions",
        &["decision"]
    ).expect("failed to register policy_decisions_total");
}

pub fn record_aggregate_outcome(outcome: &str) {
    AGGREGATE_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_policy_decision(decision: &str) {
    POLICY_DECISIONS_TOTAL.with_label_values(&[decision]).inc();
}
