// handlers/clients_interests.rs - interests lookup for a list of clients

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use super::{HandlerError, MethodHandler, MethodReply};
use crate::method::{Context, MethodEnvelope};
use crate::store::Store;
use crate::validation::{FieldKind, FieldSpec, Schema, ValidatedRequest};

pub static CLIENTS_INTERESTS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("clients_interests")
        .field(FieldSpec::new("client_ids", FieldKind::ClientIds).required())
        .field(FieldSpec::new("date", FieldKind::Date).nullable())
});

/// `clients_interests`: maps every requested client id to its interests
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientsInterestsHandler;

impl MethodHandler for ClientsInterestsHandler {
    fn name(&self) -> &'static str {
        "clients_interests"
    }

    fn schema(&self) -> &Schema {
        &CLIENTS_INTERESTS_SCHEMA
    }

    fn handle(
        &self,
        _envelope: &MethodEnvelope,
        arguments: &ValidatedRequest<'_>,
        ctx: &mut Context,
        store: &dyn Store,
    ) -> Result<MethodReply, HandlerError> {
        let client_ids = arguments.client_ids("client_ids").unwrap_or_default();
        ctx.insert("nclients", client_ids.len());

        let mut interests = Map::new();
        for &cid in client_ids {
            interests.insert(cid.to_string(), Value::from(store.interests(cid)?));
        }

        Ok(MethodReply::ok(Value::Object(interests)))
    }
}
