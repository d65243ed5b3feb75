//! Logging setup for applications and tests.

use tracing_subscriber::EnvFilter;

/// Setup logging of events reported by ldap-dn.
///
/// Use the RUST_LOG environment variable to override the defaults.
///
/// E.g. To enable debug level logging, which reports `pop` and `shift`
/// calls asking for more components than a name has:
///   RUST_LOG=DEBUG
///
/// Or to see every component added to a builder:
///   RUST_LOG=ldap_dn::dn::builder=TRACE
///
/// Calling this more than once, or after another subscriber has been
/// installed, has no effect.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_ids(true)
        .without_time()
        .try_init()
        .ok();
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn init_twice() {
        init_logging();
        init_logging();
        tracing::debug!("logging initialized");
    }
}
