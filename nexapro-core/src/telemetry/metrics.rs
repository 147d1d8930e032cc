//! Metric names and descriptions
//!
//! No recorder is installed here; a host application that wants the numbers
//! installs its own exporter before calling [`super::init`].

use metrics::{counter, describe_counter};

pub const HTTP_REQUESTS_TOTAL: &str = "nexapro_http_requests_total";
pub const TOKEN_REFRESH_TOTAL: &str = "nexapro_token_refresh_total";
pub const SESSION_EXPIRED_TOTAL: &str = "nexapro_session_expired_total";
pub const GUARD_REDIRECTS_TOTAL: &str = "nexapro_guard_redirects_total";

/// Register metric descriptions and emit initial zero values.
pub fn describe_metrics() {
    describe_counter!(
        HTTP_REQUESTS_TOTAL,
        "Total number of backend requests by method and status"
    );
    describe_counter!(
        TOKEN_REFRESH_TOTAL,
        "Total number of access token refresh attempts by result"
    );
    describe_counter!(
        SESSION_EXPIRED_TOTAL,
        "Total number of forced logouts after an unrecoverable refresh failure"
    );
    describe_counter!(
        GUARD_REDIRECTS_TOTAL,
        "Total number of navigations redirected by the route guard"
    );

    counter!(TOKEN_REFRESH_TOTAL, "result" => "success").absolute(0);
    counter!(SESSION_EXPIRED_TOTAL).absolute(0);
    counter!(GUARD_REDIRECTS_TOTAL, "stage" => "auth").absolute(0);
}

#[cfg(test)]
pub(crate) mod testing {
    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use std::sync::{Mutex, MutexGuard};

    /// Recorder that remembers every registered counter key
    #[derive(Default)]
    pub(crate) struct CapturingRecorder {
        keys: Mutex<Vec<Key>>,
    }

    impl CapturingRecorder {
        /// Label keys of every registration of the counter `name`
        pub(crate) fn label_keys(&self, name: &str) -> Vec<String> {
            self.keys()
                .iter()
                .filter(|k| k.name() == name)
                .flat_map(|k| k.labels().map(|l| l.key().to_string()))
                .collect()
        }

        fn keys(&self) -> MutexGuard<'_, Vec<Key>> {
            self.keys.lock().unwrap_or_else(|p| p.into_inner())
        }
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            self.keys().push(key.clone());
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CapturingRecorder;
    use super::*;

    #[test]
    fn test_guard_redirect_series_labelled_by_stage() {
        let recorder = CapturingRecorder::default();
        metrics::with_local_recorder(&recorder, describe_metrics);

        assert_eq!(
            recorder.label_keys(GUARD_REDIRECTS_TOTAL),
            vec!["stage".to_string()]
        );
    }
}
