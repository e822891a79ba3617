use tracing::debug;

/// Result of asking a single provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> ProviderOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            ProviderOutcome::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Tracks what each provider in a chain answered so the chain can report
/// "nobody knew" separately from "everybody broke".
#[derive(Debug, Default)]
pub struct FallbackLog {
    saw_not_found: bool,
    last_failure: Option<String>,
}

impl FallbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value when the provider found one.
    pub fn attempt<T>(&mut self, provider: &str, outcome: ProviderOutcome<T>) -> Option<T> {
        match outcome {
            ProviderOutcome::Found(v) => {
                debug!(provider, "provider answered");
                Some(v)
            }
            ProviderOutcome::NotFound => {
                debug!(provider, "provider had no match");
                self.saw_not_found = true;
                None
            }
            ProviderOutcome::Failed(reason) => {
                debug!(provider, %reason, "provider failed");
                self.last_failure = Some(format!("{}: {}", provider, reason));
                None
            }
        }
    }

    pub fn finish<T>(self) -> ProviderOutcome<T> {
        if self.saw_not_found {
            return ProviderOutcome::NotFound;
        }

        ProviderOutcome::Failed(
            self.last_failure
                .unwrap_or_else(|| "no providers configured".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_wins_over_failures() {
        let mut log = FallbackLog::new();
        assert_eq!(log.attempt::<u8>("a", ProviderOutcome::Failed("timeout".into())), None);
        assert_eq!(log.attempt::<u8>("b", ProviderOutcome::NotFound), None);

        assert_eq!(log.finish::<u8>(), ProviderOutcome::NotFound);
    }

    #[test]
    fn reports_last_failure_when_everything_broke() {
        let mut log = FallbackLog::new();
        log.attempt::<u8>("a", ProviderOutcome::Failed("timeout".into()));
        log.attempt::<u8>("b", ProviderOutcome::Failed("503".into()));

        assert_eq!(log.finish::<u8>(), ProviderOutcome::Failed("b: 503".into()));
        assert_eq!(
            FallbackLog::new().finish::<u8>(),
            ProviderOutcome::Failed("no providers configured".into())
        );
    }
}
