use model::{place::Place, status::Status, Page, Pagination, WithId};
use sqlx::{Executor, PgConnection, Postgres};
use utility::{id::Id, let_also::LetAlso};

use discovery::database::Result;

use crate::data_model::{place::PlaceRow, with_id, with_ids};

use super::{contains_pattern, convert_error, limit_offset, order_by, status_filter};

pub async fn get<'c, E>(executor: E, id: &Id<Place>) -> Result<WithId<Place>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, PlaceRow>(
        "
        SELECT
            id, region_id, name, description, address, status,
            latitude, longitude, created_at
        FROM
            places
        WHERE id = $1;
        ",
    )
    .bind(id.raw_ref::<str>())
    .fetch_one(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|row: PlaceRow| with_id(row))
}

/// Keyword matches on the place name or its address.
pub async fn find_by_keyword_and_status<'c, E>(
    executor: E,
    keyword: Option<&str>,
    status: Option<Status>,
) -> Result<Vec<WithId<Place>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, region_id, name, description, address, status,
            latitude, longitude, created_at
        FROM
            places
        WHERE
            ($1::TEXT IS NULL OR name ILIKE $1 OR address ILIKE $1)
            AND ($2::TEXT IS NULL OR status = $2);
        ",
    )
    .bind(contains_pattern(keyword))
    .bind(status_filter(status))
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<PlaceRow>| with_ids(rows))
}

pub async fn find_page_by_keyword_and_status(
    conn: &mut PgConnection,
    keyword: Option<&str>,
    status: Option<Status>,
    pagination: &Pagination,
) -> Result<Page<WithId<Place>>> {
    let pattern = contains_pattern(keyword);
    let status = status_filter(status);

    let count: i64 = sqlx::query_scalar(
        "
        SELECT COUNT(*)
        FROM
            places
        WHERE
            ($1::TEXT IS NULL OR name ILIKE $1 OR address ILIKE $1)
            AND ($2::TEXT IS NULL OR status = $2);
        ",
    )
    .bind(&pattern)
    .bind(status)
    .fetch_one(&mut *conn)
    .await
    .map_err(convert_error)?;

    let Some((limit, offset)) = limit_offset(pagination) else {
        return Ok(Page::new(Vec::new(), count as usize, pagination));
    };

    let query = format!(
        "
        SELECT
            id, region_id, name, description, address, status,
            latitude, longitude, created_at
        FROM
            places
        WHERE
            ($1::TEXT IS NULL OR name ILIKE $1 OR address ILIKE $1)
            AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY {}
        LIMIT $3 OFFSET $4;
        ",
        order_by(pagination.sort())
    );
    let rows: Vec<PlaceRow> = sqlx::query_as(&query)
        .bind(&pattern)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(convert_error)?;

    Ok(Page::new(with_ids(rows)?, count as usize, pagination))
}
