//! One-shot geolocation sources.

use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use tracing::debug;

use crate::error::LocationError;
use crate::models::Coordinate;

/// Produces the user's position once per request
pub trait Geolocator {
    fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>>;
}

impl<G: Geolocator + ?Sized> Geolocator for Box<G> {
    fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>> {
        (**self).locate()
    }
}

/// Always reports the same coordinate (e.g. from command-line flags)
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl Geolocator for FixedLocation {
    fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>> {
        let coordinate = self.0;
        async move { Ok(coordinate) }.boxed_local()
    }
}

/// No location source is available on this host
#[derive(Debug, Clone)]
pub struct Unsupported {
    reason: String,
}

impl Unsupported {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Geolocator for Unsupported {
    fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>> {
        let reason = self.reason.clone();
        async move { Err(LocationError::Unsupported(reason)) }.boxed_local()
    }
}

/// Bounds another source with a deadline; expiry is [`LocationError::Timeout`]
pub struct WithTimeout<G> {
    inner: G,
    timeout: Duration,
}

impl<G: Geolocator> WithTimeout<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<G: Geolocator> Geolocator for WithTimeout<G> {
    fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>> {
        async move {
            match tokio::time::timeout(self.timeout, self.inner.locate()).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Location request exceeded {:?}", self.timeout);
                    Err(LocationError::Timeout)
                }
            }
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Never;

    impl Geolocator for Never {
        fn locate(&self) -> LocalBoxFuture<'_, Result<Coordinate, LocationError>> {
            futures::future::pending().boxed_local()
        }
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let here = Coordinate::new(77.21, 28.61).unwrap();
        assert_eq!(FixedLocation(here).locate().await, Ok(here));
    }

    #[tokio::test]
    async fn test_unsupported() {
        let result = Unsupported::new("no GPS").locate().await;
        assert_eq!(result, Err(LocationError::Unsupported("no GPS".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_expires() {
        let source = WithTimeout::new(Never, Duration::from_secs(5));
        assert_eq!(source.locate().await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_timeout_passes_through() {
        let here = Coordinate::new(2.35, 48.85).unwrap();
        let source = WithTimeout::new(FixedLocation(here), Duration::from_secs(5));
        assert_eq!(source.locate().await, Ok(here));
    }
}
