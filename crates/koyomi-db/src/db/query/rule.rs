//! Query composition for `rule`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::rule;
use crate::model::rule::{NewRule, Rule};

/// ## Summary
/// Inserts a rule and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new_rule: &NewRule<'_>) -> QueryResult<Rule> {
    diesel::insert_into(rule::table)
        .values(new_rule)
        .returning(Rule::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Finds a rule by its primary key.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Rule>> {
    rule::table
        .find(id)
        .select(Rule::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists all rules ordered by name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(conn: &mut DbConnection<'_>) -> QueryResult<Vec<Rule>> {
    rule::table
        .select(Rule::as_select())
        .order(rule::name.asc())
        .load(conn)
        .await
}

/// ## Summary
/// Replaces the serialized parameter text of a rule.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_params(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    params: Option<&str>,
) -> QueryResult<usize> {
    diesel::update(rule::table.find(id))
        .set((rule::params.eq(params), rule::updated_at.eq(diesel::dsl::now)))
        .execute(conn)
        .await
}

/// ## Summary
/// Deletes a rule.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(rule::table.find(id)).execute(conn).await
}
