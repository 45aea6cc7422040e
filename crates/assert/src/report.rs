//! Failure message assembly and delivery.

use std::panic::Location;

use crate::config::Config;
use crate::context::{Failure, TestContext};
use crate::log;

fn shell(code: u8) -> String {
    format!("\x1b[{}m", code)
}

/// Builds failure messages and hands them to the test host.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    config: Config,
}

impl Reporter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The message body: `label`, then the caller's `context`, then the
    /// `detail`, separated by blank lines.
    pub fn compose(&self, label: &str, context: Option<&str>, detail: Option<&str>) -> String {
        let mut body = label.to_string();
        for part in [context, detail].into_iter().flatten() {
            body.push_str("\n\n");
            body.push_str(part);
        }
        body
    }

    /// Prefixes the `FAIL!` banner, colored when enabled.
    pub fn banner(&self, body: &str) -> String {
        if self.config.use_color() {
            format!(
                "{}{}{}FAIL!{}{} {}{}",
                shell(1),
                shell(97),
                shell(41),
                shell(0),
                shell(1),
                body,
                shell(0)
            )
        } else {
            format!("FAIL! {}", body)
        }
    }

    /// Delivers one failure to `ctx`.
    ///
    /// # Panics
    ///
    /// If the host refuses the report. A lost failure would let a broken
    /// test pass.
    pub fn report<C: TestContext + ?Sized>(
        &self,
        ctx: &C,
        location: &'static Location<'static>,
        label: &str,
        context: Option<&str>,
        detail: Option<&str>,
    ) {
        let message = self.banner(&self.compose(label, context, detail));
        log::debug(self.config.log, &format!("assertion failed at {}", location));
        let failure = Failure {
            location,
            label: label.to_string(),
            message,
        };
        if let Err(e) = ctx.error(failure) {
            panic!("could not report assertion failure at {}: {}", location, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, LogLevel};
    use crate::context::{HostError, Recorder};

    fn plain() -> Reporter {
        Reporter::new(Config::default().color(ColorChoice::Never).log(LogLevel::Off))
    }

    #[test]
    fn compose_orders_label_context_detail() {
        let r = plain();
        assert_eq!(r.compose("label", None, None), "label");
        assert_eq!(r.compose("label", Some("ctx"), None), "label\n\nctx");
        assert_eq!(r.compose("label", None, Some("detail")), "label\n\ndetail");
        assert_eq!(
            r.compose("label", Some("ctx"), Some("detail")),
            "label\n\nctx\n\ndetail"
        );
    }

    #[test]
    fn banner_is_colored_only_when_enabled() {
        assert_eq!(plain().banner("oops"), "FAIL! oops");
        let colored = Reporter::new(Config::default().color(ColorChoice::Always));
        assert_eq!(
            colored.banner("oops"),
            "\x1b[1m\x1b[97m\x1b[41mFAIL!\x1b[0m\x1b[1m oops\x1b[0m"
        );
    }

    #[test]
    fn report_delivers_to_host() {
        let t = Recorder::new();
        plain().report(&t, Location::caller(), "label", Some("ctx"), None);
        let failure = t.last().unwrap();
        assert_eq!(failure.label, "label");
        assert_eq!(failure.message, "FAIL! label\n\nctx");
    }

    struct Closed;

    impl TestContext for Closed {
        fn error(&self, _failure: Failure) -> Result<(), HostError> {
            Err(HostError::Finished)
        }

        fn cleanup(&self, _f: Box<dyn FnOnce()>) -> Result<(), HostError> {
            Err(HostError::Finished)
        }
    }

    #[test]
    #[should_panic(expected = "test has already finished")]
    fn host_errors_are_not_swallowed() {
        plain().report(&Closed, Location::caller(), "late", None, None);
    }
}
