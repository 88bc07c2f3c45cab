use discovery::database::DatabaseError;
use model::{status::Status, Pagination, Sort};

pub mod checkin;
pub mod place;
pub mod region;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        _ => DatabaseError::Other(Box::new(why)),
    }
}

/// `ORDER BY` clause for a listing. The id breaks ties so that pages are
/// stable between requests.
pub(crate) fn order_by(sort: Sort) -> &'static str {
    match sort {
        Sort::Newest => "created_at DESC, id ASC",
        Sort::Oldest => "created_at ASC, id ASC",
        Sort::NameAsc => "name ASC, id ASC",
        Sort::NameDesc => "name DESC, id ASC",
    }
}

/// `ILIKE` pattern matching names that contain `keyword`.
pub(crate) fn contains_pattern(keyword: Option<&str>) -> Option<String> {
    keyword.map(|keyword| {
        let escaped = keyword
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

/// `LIMIT` and `OFFSET` values, or `None` when the page starts beyond what
/// Postgres can address. Such a page is past the end of every listing.
pub(crate) fn limit_offset(pagination: &Pagination) -> Option<(i64, i64)> {
    let limit = i64::try_from(pagination.limit()).ok()?;
    let offset = i64::try_from(pagination.offset()).ok()?;
    Some((limit, offset))
}

pub(crate) fn status_filter(status: Option<Status>) -> Option<&'static str> {
    status.map(|status| status.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(contains_pattern(None), None);
        assert_eq!(contains_pattern(Some("ramen")).as_deref(), Some("%ramen%"));
        assert_eq!(
            contains_pattern(Some("100%_off")).as_deref(),
            Some("%100\\%\\_off%")
        );
    }

    #[test]
    fn every_order_breaks_ties_by_id() {
        for sort in [Sort::Newest, Sort::Oldest, Sort::NameAsc, Sort::NameDesc] {
            assert!(order_by(sort).ends_with("id ASC"));
        }
    }

    #[test]
    fn offsets_beyond_postgres_range_are_empty_pages() {
        let first = Pagination::new(1, 20, Sort::Newest).unwrap();
        assert_eq!(limit_offset(&first), Some((20, 0)));

        let third = Pagination::new(3, 20, Sort::NameAsc).unwrap();
        assert_eq!(limit_offset(&third), Some((20, 40)));

        let huge = Pagination::new(usize::MAX / 2, 20, Sort::Newest).unwrap();
        assert_eq!(limit_offset(&huge), None);
    }
}
