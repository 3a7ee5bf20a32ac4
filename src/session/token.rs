//! The value stored in the session cookie and how it is serialized.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::session::SessionUser;

mod datetime_format {
    //! Serializes an [time::OffsetDateTime] with two digit hours.
    //!
    //! The default serializer writes midnight as "0:00:00.0", which the
    //! default deserializer then rejects.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the session expiry, e.g. "2021-01-01 00:00:00.0 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The logged in user and when their session ends.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SessionToken {
    pub user: SessionUser,

    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}
