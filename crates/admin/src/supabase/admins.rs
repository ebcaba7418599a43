//! PostgREST operations on the `admins` table.

use serde::Serialize;

use souk_sparkle_core::UserId;

use crate::models::AdminRecord;

use super::{SupabaseClient, SupabaseError};

/// Row-level security means reads work with the anon key, while inserts
/// need the freshly signed-up user's own token.
const TABLE: &str = "admins";

/// Insert payload for a new admin row.
#[derive(Debug, Serialize)]
pub struct NewAdmin {
    /// Identity reference from the auth service.
    pub user_id: UserId,
    /// Display name shown in the back office.
    pub username: String,
    /// Whether the account may manage other admins.
    pub is_super_admin: bool,
}

/// Typed access to the `admins` table.
pub struct AdminsTable<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AdminsTable<'a> {
    /// Borrow the client for table operations.
    #[must_use]
    pub const fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Find the admin row for an identity, if any.
    ///
    /// `access_token` scopes the query to the caller's row-level-security
    /// context; `None` falls back to the anon key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn find_by_user_id(
        &self,
        user_id: UserId,
        access_token: Option<&str>,
    ) -> Result<Option<AdminRecord>, SupabaseError> {
        let url = self.client.rest_endpoint(TABLE);
        let bearer = access_token.unwrap_or_else(|| self.client.anon_key());

        let response = self
            .client
            .http()
            .get(&url)
            .bearer_auth(bearer)
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("select", "*".to_owned()),
            ])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let mut rows: Vec<AdminRecord> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Insert a new admin row and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected (row-level security,
    /// duplicate user) or the response cannot be decoded.
    pub async fn insert(
        &self,
        new_admin: &NewAdmin,
        access_token: &str,
    ) -> Result<AdminRecord, SupabaseError> {
        let url = self.client.rest_endpoint(TABLE);

        let response = self
            .client
            .http()
            .post(&url)
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            .json(&[new_admin])
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let mut rows: Vec<AdminRecord> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Parse(e.to_string()))?;
        if rows.is_empty() {
            return Err(SupabaseError::Parse(
                "insert returned no representation".to_owned(),
            ));
        }
        Ok(rows.swap_remove(0))
    }

    /// Exact number of admin rows.
    ///
    /// Uses PostgREST's `count=exact` preference with a zero-width range
    /// so no row data crosses the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the `Content-Range`
    /// header is missing or malformed.
    pub async fn count(&self) -> Result<u64, SupabaseError> {
        let url = self.client.rest_endpoint(TABLE);

        let response = self
            .client
            .http()
            .get(&url)
            .bearer_auth(self.client.anon_key())
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await?;
        let status = response.status();

        // 206 Partial Content is normal for ranged reads.
        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| SupabaseError::Parse("missing Content-Range header".to_owned()))?;

        parse_exact_count(content_range)
            .ok_or_else(|| SupabaseError::Parse(format!("bad Content-Range: {content_range}")))
    }
}

/// Extract the total from a `Content-Range` value such as `0-0/17` or `*/0`.
fn parse_exact_count(content_range: &str) -> Option<u64> {
    let (_, total) = content_range.split_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_exact_count;

    #[test]
    fn test_parse_exact_count() {
        assert_eq!(parse_exact_count("0-0/17"), Some(17));
        assert_eq!(parse_exact_count("*/0"), Some(0));
        assert_eq!(parse_exact_count("0-0/*"), None);
        assert_eq!(parse_exact_count("garbage"), None);
    }
}
