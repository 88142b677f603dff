//! Trusted-subnet filtering on `X-Real-IP`

use crate::core::codec::REAL_IP_HEADER;
use crate::utils::error::MetricsError;
use crate::utils::net::IpNet;
use actix_web::ResponseError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures::future::{LocalBoxFuture, Ready, ready};
use std::net::IpAddr;
use tracing::debug;

/// Rejects callers outside the configured network
///
/// Without a network every request passes. With one, a missing or malformed
/// `X-Real-IP` is a bad request and an address outside the block is forbidden.
#[derive(Debug, Clone, Copy)]
pub struct TrustedSubnet {
    net: Option<IpNet>,
}

impl TrustedSubnet {
    pub fn new(net: Option<IpNet>) -> Self {
        Self { net }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TrustedSubnet
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TrustedSubnetService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrustedSubnetService {
            service,
            net: self.net,
        }))
    }
}

/// Service implementation for the trusted-subnet middleware
pub struct TrustedSubnetService<S> {
    service: S,
    net: Option<IpNet>,
}

impl<S, B> Service<ServiceRequest> for TrustedSubnetService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(net) = self.net {
            if let Err(e) = check_caller(&req, &net) {
                debug!("Rejected {} from untrusted caller: {}", req.path(), e);
                let response = req.into_response(e.error_response()).map_into_right_body();
                return Box::pin(ready(Ok(response)));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

fn check_caller(req: &ServiceRequest, net: &IpNet) -> Result<(), MetricsError> {
    let header = req
        .headers()
        .get(REAL_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| MetricsError::bad_request("missing X-Real-IP header"))?;

    let ip: IpAddr = header
        .parse()
        .map_err(|_| MetricsError::bad_request(format!("invalid X-Real-IP header: {}", header)))?;

    if !net.contains(&ip) {
        return Err(MetricsError::forbidden(format!("{} is outside {}", ip, net)));
    }
    Ok(())
}
