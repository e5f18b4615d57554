//! Results of calls whose failure must not stop the caller.

use std::future::Future;

use crate::YukihanaError;

/// Either the real value, or a stand-in plus the error that forced it.
#[derive(Debug)]
pub enum BestEffort<T> {
    Ok(T),
    Degraded(T, YukihanaError),
}

impl<T> BestEffort<T> {
    /// Await `fut`, substituting `fallback` if it fails.
    /// Failures are logged at warn level under `what`.
    pub async fn run<F>(what: &str, fut: F, fallback: T) -> Self
    where
        F: Future<Output = Result<T, YukihanaError>>,
    {
        match fut.await {
            Ok(value) => Self::Ok(value),
            Err(error) => {
                tracing::warn!("Could not {what}: {error}");
                Self::Degraded(fallback, error)
            }
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Ok(value) | Self::Degraded(value, _) => value,
        }
    }

    pub fn error(&self) -> Option<&YukihanaError> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded(_, error) => Some(error),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn success_keeps_the_value() {
        let result = BestEffort::run("count", async { Ok(3) }, 0).await;

        assert_eq!(*result.value(), 3);
        assert!(result.error().is_none());
    }

    #[tokio::test]
    async fn failure_uses_fallback_and_keeps_error() {
        let result = BestEffort::run(
            "count",
            async {
                Err(YukihanaError::Spotify {
                    reason: "rate limited".to_string(),
                })
            },
            0,
        )
        .await;

        assert_eq!(*result.value(), 0);
        assert!(matches!(
            result.error(),
            Some(YukihanaError::Spotify { reason }) if reason == "rate limited"
        ));
    }
}
