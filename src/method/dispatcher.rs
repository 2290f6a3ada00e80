use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::auth::Authenticator;
use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::handlers::{HandlerError, HandlerRegistry, MethodReply};
use crate::method::{Context, MethodEnvelope};
use crate::store::Store;
use crate::validation::ValidatedRequest;

/// Routes one method call through envelope validation, the token check,
/// handler lookup, argument validation and finally the handler itself.
///
/// A single pass per call with no retries. Handler failures, including
/// panics, stop here and become a bare 500.
#[derive(Debug)]
pub struct Dispatcher {
    auth: Authenticator,
    handlers: HandlerRegistry,
}

impl Dispatcher {
    pub fn new(auth: AuthConfig, handlers: HandlerRegistry) -> Self {
        Self { auth: Authenticator::new(auth), handlers }
    }

    /// Dispatcher serving the standard method set
    pub fn standard(auth: AuthConfig) -> Self {
        let handlers = HandlerRegistry::standard(&auth);
        Self::new(auth, handlers)
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn dispatch(&self, body: Value, ctx: &mut Context, store: &dyn Store) -> Result<MethodReply, ApiError> {
        self.dispatch_at(body, ctx, store, Local::now())
    }

    pub fn dispatch_at(
        &self,
        body: Value,
        ctx: &mut Context,
        store: &dyn Store,
        now: DateTime<Local>,
    ) -> Result<MethodReply, ApiError> {
        let envelope = MethodEnvelope::parse(body, &self.auth.config().admin_login)?;

        if !self.auth.check_at(&envelope, now) {
            tracing::warn!("Token rejected for login '{}'", envelope.login());
            return Err(ApiError::Forbidden);
        }

        let handler = self.handlers.get(envelope.method()).ok_or_else(|| {
            tracing::info!("Unknown method '{}'", envelope.method());
            ApiError::method_not_found()
        })?;

        let mut arguments = ValidatedRequest::new(handler.schema(), envelope.arguments());
        if !arguments.is_valid() {
            return Err(ApiError::invalid_request(arguments.error_message()));
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            handler.handle(&envelope, &arguments, ctx, store)
        }));

        match outcome {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(err)) => {
                tracing::error!("Method '{}' failed: {}", handler.name(), err);
                Err(ApiError::Internal)
            }
            Err(payload) => {
                let err = HandlerError::Internal(panic_message(payload.as_ref()));
                tracing::error!("Method '{}' panicked: {}", handler.name(), err);
                Err(ApiError::Internal)
            }
        }
    }

    /// Dispatch and fold failures into a reply, for transports that only
    /// need a status code and a payload
    pub fn respond(&self, body: Value, ctx: &mut Context, store: &dyn Store) -> MethodReply {
        self.dispatch(body, ctx, store).unwrap_or_else(MethodReply::from)
    }
}

impl From<ApiError> for MethodReply {
    fn from(err: ApiError) -> Self {
        let payload = match &err {
            ApiError::InvalidRequest(_) | ApiError::NotFound(Some(_)) => Value::from(err.message()),
            _ => Value::Null,
        };
        MethodReply { payload, code: err.status_code() }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
