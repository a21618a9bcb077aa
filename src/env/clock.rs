use chrono::{DateTime, Utc};

use super::Context;

/// Current time for `ctx`.
///
/// Returns the context's fixed clock when it carries a parseable RFC 3339
/// override, otherwise wall-clock time.
pub fn now(ctx: &Context) -> DateTime<Utc> {
    let Some(raw) = ctx.now_override() else {
        return Utc::now();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(fixed) => fixed.with_timezone(&Utc),
        Err(err) => {
            log::warn!("ignoring unparseable clock override {:?}: {}", raw, err);
            Utc::now()
        }
    }
}
