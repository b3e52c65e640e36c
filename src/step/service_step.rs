use tower::{Service, ServiceExt};

use super::Step;

/// Adapts a [`tower::Service`] into a step that ignores the receiver.
///
/// The service is cloned for every call and driven to readiness first.
#[derive(Debug, Clone)]
pub struct ServiceStep<Svc> {
    service: Svc,
}

impl<Svc> ServiceStep<Svc> {
    pub const fn new(service: Svc) -> Self {
        Self { service }
    }
}

impl<R, T, Svc> Step<R, T> for ServiceStep<Svc>
where
    R: Send,
    T: Send,
    Svc: Service<T> + Clone + Send + Sync,
    Svc::Future: Send,
{
    type Output = Svc::Response;

    type Error = Svc::Error;

    async fn call(&self, _receiver: &mut R, input: T) -> Result<Self::Output, Self::Error> {
        let mut service = self.service.clone();

        service.ready().await?;

        service.call(input).await
    }
}
