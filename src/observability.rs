use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("gemchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemchat.client.request_duration_seconds");

pub(crate) static PROBE_FAILURES: Counter = Counter::new("gemchat.probe.failures");
pub(crate) static PROBE_LATENCY: Moments = Moments::new("gemchat.probe.latency_seconds");

pub(crate) static REPLAY_DISCARDED_SUBMISSIONS: Counter =
    Counter::new("gemchat.replay.discarded_submissions");
pub(crate) static REPLAY_DIRECT_INSERTIONS: Counter =
    Counter::new("gemchat.replay.direct_insertions");
pub(crate) static REPLAY_FAILURES: Counter = Counter::new("gemchat.replay.failures");

pub(crate) static SESSION_TURNS: Counter = Counter::new("gemchat.session.turns");
pub(crate) static SESSION_RESETS: Counter = Counter::new("gemchat.session.resets");
pub(crate) static PRESENTER_TOKENS: Counter = Counter::new("gemchat.presenter.tokens");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&PROBE_FAILURES);
    collector.register_moments(&PROBE_LATENCY);

    collector.register_counter(&REPLAY_DISCARDED_SUBMISSIONS);
    collector.register_counter(&REPLAY_DIRECT_INSERTIONS);
    collector.register_counter(&REPLAY_FAILURES);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_RESETS);
    collector.register_counter(&PRESENTER_TOKENS);
}
