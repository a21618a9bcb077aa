//! Save and delete for a single model.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{Meta, Model};
use crate::driver::{Filter, RawDocument, UpdateOutcome, UpdateSpec};
use crate::{env, Collection, Context, DocumentError, WriteResult};

const ID: &str = "id";
const VERSION: &str = "version";
const CREATED_ON: &str = "createdOn";
const UPDATED_ON: &str = "updatedOn";

/// Upsert `model` into `collection`.
///
/// Inserts and updates are one store operation against `{id}`: domain
/// fields are overwritten, `version` is incremented by one and `createdOn`
/// is only written when the operation creates the document. On success the
/// model's id, version and timestamps reflect the stored document.
pub(crate) fn save<M: Model>(
    collection: &Collection<M>,
    model: &mut M,
    ctx: &Context,
) -> Result<WriteResult, DocumentError> {
    let handle = collection.resolve_handle(ctx)?;

    if model.id().is_empty() {
        let id = collection.engine().new_identity();
        model.meta_mut().assign_id(id)?;
    }
    let id = model.id().to_string();
    let now = env::now(ctx);
    let update = build_update(model, &id, now)?;

    ctx.ensure_active()?;
    let filter = Filter::by_id(id.as_str());
    let outcome = handle
        .update_one(&filter, &update, true)
        .map_err(|err| err.wrap("error saving model"))?;

    record_save(model.meta_mut(), &outcome, now);
    match handle.find_one(&filter) {
        Ok(Some(stored)) => refresh(model.meta_mut(), stored),
        Ok(None) => log::warn!("saved model {} vanished before refresh", id),
        Err(err) => log::warn!("could not refresh saved model {}: {}", id, err),
    }

    let result = WriteResult::from_update(&outcome);
    log::debug!("saved {}:{} ({})", collection.name(), id, result);
    Ok(result)
}

/// Delete the stored document for `model`. Deleting an absent document is
/// not an error; it reports `deleted = 0`.
pub(crate) fn delete<M: Model>(
    collection: &Collection<M>,
    model: &M,
    ctx: &Context,
) -> Result<WriteResult, DocumentError> {
    if model.id().is_empty() {
        return Err(DocumentError::Precondition(
            "cannot delete model with no id".into(),
        ));
    }
    let result = collection.delete_one(&Filter::by_id(model.id()), ctx)?;
    log::debug!("deleted {}:{} ({})", collection.name(), model.id(), result);
    Ok(result)
}

fn build_update<M: Model>(
    model: &M,
    id: &str,
    now: DateTime<Utc>,
) -> Result<UpdateSpec, DocumentError> {
    let mut fields = match serde_json::to_value(model)? {
        Value::Object(fields) => fields,
        other => {
            return Err(DocumentError::Serde(format!(
                "model must serialize to an object, got {}",
                other
            )))
        }
    };
    fields.remove(VERSION);
    fields.remove(CREATED_ON);
    fields.insert(ID.to_string(), Value::String(id.to_string()));
    fields.insert(UPDATED_ON.to_string(), serde_json::to_value(now)?);

    Ok(UpdateSpec::new()
        .set_all(fields)
        .inc(VERSION, 1)
        .set_on_insert(CREATED_ON, serde_json::to_value(now)?))
}

fn record_save(meta: &mut Meta, outcome: &UpdateOutcome, now: DateTime<Utc>) {
    meta.updated_on = Some(now);
    if outcome.upserted > 0 {
        meta.created_on = Some(now);
        meta.version = 1;
    } else {
        meta.version += 1;
    }
}

fn refresh(meta: &mut Meta, stored: RawDocument) {
    match serde_json::from_value::<Meta>(Value::Object(stored)) {
        Ok(fresh) => {
            meta.version = fresh.version;
            meta.created_on = fresh.created_on;
            meta.updated_on = fresh.updated_on;
        }
        Err(err) => log::warn!("could not decode stored metadata: {}", err),
    }
}
