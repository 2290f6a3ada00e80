// handlers/online_score.rs - score lookup for a client identity

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::{HandlerError, MethodHandler, MethodReply};
use crate::method::{Context, MethodEnvelope};
use crate::store::{ScoreQuery, Store};
use crate::validation::{CompositeRule, FieldKind, FieldSpec, Schema, ValidatedRequest};

pub static ONLINE_SCORE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new("online_score")
        .field(FieldSpec::new("first_name", FieldKind::Text).nullable())
        .field(FieldSpec::new("last_name", FieldKind::Text).nullable())
        .field(FieldSpec::new("email", FieldKind::Email).nullable())
        .field(FieldSpec::new("phone", FieldKind::Phone).nullable())
        .field(FieldSpec::new("birthday", FieldKind::BirthDate).nullable())
        .field(FieldSpec::new("gender", FieldKind::Gender).nullable())
        .rule(CompositeRule::any_pair(
            "Needed one of phone-email, first_name-last_name, gender-birthday",
            &[("phone", "email"), ("first_name", "last_name"), ("gender", "birthday")],
        ))
});

/// `online_score`: admins get a fixed score, everyone else is scored by the store
#[derive(Debug, Clone)]
pub struct OnlineScoreHandler {
    admin_score: i64,
}

impl OnlineScoreHandler {
    pub fn new(admin_score: i64) -> Self {
        Self { admin_score }
    }
}

fn score_query(arguments: &ValidatedRequest<'_>) -> ScoreQuery {
    let text = |name: &str| arguments.text(name).map(str::to_string);
    ScoreQuery {
        phone: text("phone"),
        email: text("email"),
        birthday: arguments.date("birthday"),
        gender: arguments.gender("gender"),
        first_name: text("first_name"),
        last_name: text("last_name"),
    }
}

impl MethodHandler for OnlineScoreHandler {
    fn name(&self) -> &'static str {
        "online_score"
    }

    fn schema(&self) -> &Schema {
        &ONLINE_SCORE_SCHEMA
    }

    fn handle(
        &self,
        envelope: &MethodEnvelope,
        arguments: &ValidatedRequest<'_>,
        ctx: &mut Context,
        store: &dyn Store,
    ) -> Result<MethodReply, HandlerError> {
        let score = if envelope.is_admin() {
            Value::from(self.admin_score)
        } else {
            Value::from(store.score(&score_query(arguments))?)
        };

        ctx.insert("has", arguments.present_fields());

        Ok(MethodReply::ok(json!({ "score": score })))
    }
}
