use crate::level::Severity;
use crate::record::Cause;
use serde::ser::{SerializeSeq, Serializer};
use std::error::Error;

pub(crate) fn level<S: Serializer, L: Severity>(level: &L, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.label())
}

pub(crate) fn cause<S: Serializer>(cause: &Option<Cause>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut next = cause.as_deref().map(|cause| cause as &(dyn Error + 'static));
    let mut model = serializer.serialize_seq(None)?;
    while let Some(current) = next {
        model.serialize_element(&current.to_string())?;
        next = current.source();
    }
    model.end()
}

cfg_chrono! {
    use chrono::{DateTime, Utc};

    pub(crate) fn timestamp<S: Serializer>(
        timestamp: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.to_rfc3339())
    }
}
