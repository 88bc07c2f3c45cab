//! Keyword and proximity search over regions and places.
//!
//! Without a location the repository sorts and paginates. With a location the
//! repository only narrows candidates by keyword and status; the remaining
//! work happens here:
//!
//! 1. drop candidates without a coordinate or outside the bounding box,
//! 2. drop candidates farther than the radius by exact distance,
//! 3. order by distance (nearest first, regardless of the requested sort),
//! 4. cut out the requested page.

use std::{env, fmt::Debug};

use model::{
    status::Status, Locatable, LocationFilter, Page, Pagination, WithDistance, WithId,
};
use serde::Serialize;
use utility::{id::HasId, let_also::LetAlso};

use crate::{database::CandidateRepo, RequestResult};

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub location: Option<LocationFilter>,
    pub status: Option<Status>,
    pub pagination: Pagination,
}

impl SearchQuery {
    /// Trimmed keyword; blank keywords count as no keyword.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// Defaults applied to incoming search requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub radius_km: f64,
}

impl SearchDefaults {
    /// Reads `SEARCH_DEFAULT_RADIUS_KM`, falling back to the built-in default
    /// when unset or not a positive number.
    pub fn from_env() -> Self {
        let radius_km = env::var("SEARCH_DEFAULT_RADIUS_KM")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
        Self { radius_km }
    }
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_SEARCH_RADIUS_KM,
        }
    }
}

pub async fn search<T, R>(
    repo: &mut R,
    query: &SearchQuery,
) -> RequestResult<Page<WithDistance<WithId<T>>>>
where
    T: Serialize + HasId + Locatable + Send,
    T::IdType: Debug + Clone + Serialize,
    R: CandidateRepo<T> + Send,
{
    let keyword = query.keyword();

    let Some(location) = query.location else {
        return repo
            .find_page_by_keyword_and_status(keyword, query.status, &query.pagination)
            .await?
            .map(WithDistance::unranked)
            .let_owned(Ok);
    };

    repo.find_by_keyword_and_status(keyword, query.status)
        .await?
        .let_owned(|candidates| rank_by_distance(candidates, &location))
        .let_owned(|ranked| Ok(Page::slice(ranked, &query.pagination)))
}

/// Keeps the candidates inside the filter's radius, nearest first.
///
/// Candidates without a coordinate never match. Candidates at equal distance
/// keep their input order.
pub fn rank_by_distance<C: Locatable>(
    candidates: Vec<C>,
    location: &LocationFilter,
) -> Vec<WithDistance<C>> {
    let bounding_box = location.bounding_box();
    let center = location.center();
    let radius_meters = location.radius_meters();
    let total = candidates.len();

    let boxed = candidates
        .into_iter()
        .filter_map(|candidate| {
            let coordinate = candidate.coordinate()?;
            coordinate
                .is_within(&bounding_box)
                .then_some((coordinate, candidate))
        })
        .collect::<Vec<_>>();
    let in_box = boxed.len();

    let mut ranked = boxed
        .into_iter()
        .map(|(coordinate, candidate)| (coordinate.distance_to(&center), candidate))
        .filter(|(distance, _)| *distance <= radius_meters)
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    log::debug!(
        "location search: {} candidates, {} in bounding box, {} within {} km",
        total,
        in_box,
        ranked.len(),
        location.radius_km()
    );

    ranked
        .into_iter()
        .map(|(distance, candidate)| WithDistance::new(distance, candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::memory::{place, region, MemoryDatabase};
    use model::{place::Place, region::Region, Coordinate, Sort};

    fn center(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    fn within(latitude: f64, longitude: f64, radius_km: f64) -> Option<LocationFilter> {
        Some(LocationFilter::new(center(latitude, longitude), radius_km).unwrap())
    }

    fn ids<T>(page: &Page<WithDistance<WithId<T>>>) -> Vec<String>
    where
        T: HasId<IdType = String>,
    {
        page.items.iter().map(|item| item.content.id.raw()).collect()
    }

    #[test]
    fn ranks_only_candidates_in_radius() {
        // three candidates at increasing distance north of the center, seven far away
        let candidates = vec![
            region("far-1", Some((36.0, 135.0))),
            region("near-3", Some((35.0 + 0.040, 135.0))),
            region("far-2", Some((34.0, 135.0))),
            region("near-1", Some((35.0 + 0.005, 135.0))),
            region("far-3", Some((35.0, 136.0))),
            region("far-4", Some((35.0, 134.0))),
            region("near-2", Some((35.0 + 0.020, 135.0))),
            region("far-5", Some((-35.0, 135.0))),
            region("far-6", Some((35.0, -45.0))),
            region("far-7", None),
        ];

        let ranked = rank_by_distance(candidates, &within(35.0, 135.0, 5.0).unwrap());

        let names = ranked
            .iter()
            .map(|item| item.content.id.raw())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["near-1", "near-2", "near-3"]);
        let distances = ranked
            .iter()
            .map(|item| item.distance_meters.unwrap())
            .collect::<Vec<_>>();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!((distances[0] - 556.0).abs() < 1.0);
    }

    #[test]
    fn candidates_without_coordinate_never_match() {
        let ranked = rank_by_distance(
            vec![region("nowhere", None)],
            &within(0.0, 0.0, 20_000.0).unwrap(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn finds_candidates_across_antimeridian() {
        let candidates = vec![
            region("east", Some((0.0, 179.99))),
            region("west", Some((0.0, -179.99))),
            region("greenwich", Some((0.0, 0.0))),
        ];
        let ranked = rank_by_distance(candidates, &within(0.0, -179.995, 5.0).unwrap());
        let names = ranked
            .iter()
            .map(|item| item.content.id.raw())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["west", "east"]);
    }

    #[tokio::test]
    async fn kyoto_search_excludes_tokyo_and_unlocated() {
        let database = MemoryDatabase::default();
        database.add_region(region("1", Some((35.0116, 135.7681))));
        database.add_region(region("2", Some((35.6762, 139.6503))));
        database.add_region(region("3", None));

        let query = SearchQuery {
            location: within(35.0116, 135.7681, 10.0),
            ..Default::default()
        };
        let page = search::<Region, _>(&mut database.auto(), &query).await.unwrap();

        assert_eq!(ids(&page), vec!["1"]);
        assert_eq!(page.count, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items[0].distance_meters, Some(0.0));
    }

    #[tokio::test]
    async fn location_search_paginates_filtered_set() {
        let database = MemoryDatabase::default();
        for i in 0..7 {
            database.add_place(place(
                &format!("p{i}"),
                "cafe",
                Some((35.0 + 0.001 * (7 - i) as f64, 135.0)),
            ));
        }
        database.add_place(place("far", "cafe", Some((40.0, 135.0))));

        let mut counts = vec![];
        let mut seen = vec![];
        for page_number in 1..=4 {
            let query = SearchQuery {
                location: within(35.0, 135.0, 2.0),
                pagination: Pagination::new(page_number, 3, Sort::NameAsc).unwrap(),
                ..Default::default()
            };
            let page = search::<Place, _>(&mut database.auto(), &query).await.unwrap();
            assert!(page.items.len() <= 3);
            assert_eq!(page.current_page, page_number);
            counts.push(page.count);
            seen.extend(ids(&page));
        }

        assert!(counts.iter().all(|count| *count == 7));
        // nearest first, the requested name sort is ignored
        assert_eq!(seen, vec!["p6", "p5", "p4", "p3", "p2", "p1", "p0"]);
    }

    #[tokio::test]
    async fn keyword_search_is_delegated_to_repository() {
        let database = MemoryDatabase::default();
        database.add_place(place("a", "Ramen Alley", Some((35.0, 135.0))));
        database.add_place(place("b", "Tea House", Some((35.0, 135.0))));
        database.add_place(place("c", "ramen bar", None));

        let query = SearchQuery {
            keyword: Some("  ramen ".to_owned()),
            pagination: Pagination::new(1, 10, Sort::NameAsc).unwrap(),
            ..Default::default()
        };
        let page = search::<Place, _>(&mut database.auto(), &query).await.unwrap();

        assert_eq!(ids(&page), vec!["a", "c"]);
        assert!(page.items.iter().all(|item| item.distance_meters.is_none()));
        assert_eq!(database.paged_fetches(), 1);
        assert_eq!(database.full_fetches(), 0);
    }

    #[tokio::test]
    async fn keyword_and_location_combine() {
        let database = MemoryDatabase::default();
        database.add_place(place("a", "Ramen Alley", Some((35.0, 135.0))));
        database.add_place(place("b", "Tea House", Some((35.0, 135.0))));
        database.add_place(place("c", "Ramen Far", Some((36.0, 135.0))));

        let query = SearchQuery {
            keyword: Some("ramen".to_owned()),
            location: within(35.0, 135.0, 1.0),
            ..Default::default()
        };
        let page = search::<Place, _>(&mut database.auto(), &query).await.unwrap();

        assert_eq!(ids(&page), vec!["a"]);
        assert_eq!(database.full_fetches(), 1);
        assert_eq!(database.paged_fetches(), 0);
    }

    #[tokio::test]
    async fn status_filter_is_passed_to_repository() {
        let database = MemoryDatabase::default();
        database.add_region(region("shown", Some((35.0, 135.0))));
        let mut hidden = region("hidden", Some((35.0, 135.0)));
        hidden.content.status = Status::Hidden;
        database.add_region(hidden);

        let query = SearchQuery {
            location: within(35.0, 135.0, 1.0),
            status: Some(Status::Published),
            ..Default::default()
        };
        let page = search::<Region, _>(&mut database.auto(), &query).await.unwrap();
        assert_eq!(ids(&page), vec!["shown"]);
    }

    #[test]
    fn blank_keyword_is_no_keyword() {
        let query = SearchQuery {
            keyword: Some("   ".to_owned()),
            ..Default::default()
        };
        assert_eq!(query.keyword(), None);
    }
}
