use prometheus::IntCounterVec;

lazy_static::lazy_static! {
    pub static ref MODERATION_OUTCOMES_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "moderation_outcomes_total",
        "Moderation worker outcomes",
        &["outcome"]
    ).expect("failed to register moderation_outcomes_total");
}

pub fn record_moderation_outcome(outcome: &str) {
    MODERATION_OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();
}
