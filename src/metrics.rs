use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static::lazy_static! {
    pub static ref INGESTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "flatknn_ingestions_total", "Dataset ingestions", &["source", "status"]
    ).unwrap();
    pub static ref SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "flatknn_searches_total", "Search calls", &["kind", "status"]
    ).unwrap();
    pub static ref SEARCH_DURATION: HistogramVec = register_histogram_vec!(
        "flatknn_search_duration_seconds", "Search duration", &["kind"],
        vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).unwrap();
}

pub fn init() {
    lazy_static::initialize(&INGESTIONS_TOTAL);
    lazy_static::initialize(&SEARCHES_TOTAL);
    lazy_static::initialize(&SEARCH_DURATION);
}

pub(crate) fn status_label<T, E>(result: &std::result::Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "rejected"
    }
}
