// tests/resolver_tests.rs

mod test_utils;

use std::sync::Arc;

use chrono::{Duration, Utc};

use clipbot_common::models::ClipQuery;
use clipbot_core::services::clips::{
    ClipMatch, ClipResolver, Matcher, Resolution, ResolverConfig, Strategy,
};
use clipbot_core::Error;
use test_utils::{clip, day, page, StubCatalog};

fn resolver(catalog: &StubCatalog) -> ClipResolver {
    ClipResolver::new(Arc::new(catalog.clone()), ResolverConfig::default())
}

fn bounded_query() -> ClipQuery {
    ClipQuery::new("1234").with_bounds(Some(day(2020, 5, 1)), Some(day(2020, 6, 30)))
}

#[tokio::test]
async fn test_most_popular_keeps_first_of_equal_counts() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(
        vec![
            clip("a", "warmup", "alice", 5),
            clip("b", "clutch", "bob", 20),
            clip("c", "clutch again", "carol", 20),
            clip("d", "ending", "dave", 3),
        ],
        None,
    )]);

    let found = resolver(&catalog)
        .find_most_popular_clip(&bounded_query(), &Matcher::title_and_creator())
        .await?;

    assert_eq!(found.clip().map(|c| c.id.as_str()), Some("b"));
    Ok(())
}

#[tokio::test]
async fn test_most_popular_ignores_zero_view_clips() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![clip("a", "t", "alice", 0)], None)]);
    let query = bounded_query();

    let found = resolver(&catalog)
        .find_most_popular_clip(&query, &Matcher::title_and_creator())
        .await?;

    assert_eq!(found, ClipMatch::NotFound(query));
    Ok(())
}

#[tokio::test]
async fn test_find_clip_not_found_returns_query_unchanged() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(
        vec![clip("a", "warmup", "alice", 5), clip("b", "clutch", "bob", 20)],
        None,
    )]);
    let query = ClipQuery::new("1234")
        .with_title("ace")
        .with_creator("alice")
        .with_bounds(Some(day(2020, 5, 1)), None);

    let found = resolver(&catalog)
        .find_clip(&query, &Matcher::title_and_creator())
        .await?;

    assert!(!found.is_found());
    assert_eq!(found, ClipMatch::NotFound(query));
    Ok(())
}

#[tokio::test]
async fn test_find_clip_stops_at_first_match() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![
        page(vec![clip("a", "Big ACE round", "Alice", 5)], Some("cursor-1")),
        page(vec![clip("b", "ace again", "alice", 50)], None),
    ]);
    let query = bounded_query().with_title("ace").with_creator("ALICE");

    let found = resolver(&catalog)
        .find_clip(&query, &Matcher::title_and_creator())
        .await?;

    assert_eq!(found.clip().map(|c| c.id.as_str()), Some("a"));
    assert_eq!(catalog.recorded().await.len(), 1, "second page must not be requested");
    Ok(())
}

#[tokio::test]
async fn test_pagination_follows_cursor_and_reads_last_page() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![
        page(vec![clip("a", "t", "x", 1)], Some("cursor-1")),
        page(vec![clip("b", "t", "x", 2)], Some("cursor-2")),
        page(vec![clip("c", "t", "x", 99)], None),
    ]);

    let found = resolver(&catalog)
        .find_most_popular_clip(&bounded_query(), &Matcher::title_and_creator())
        .await?;
    assert_eq!(found.clip().map(|c| c.id.as_str()), Some("c"));

    let requests = catalog.recorded().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].after, None);
    assert_eq!(requests[1].after.as_deref(), Some("cursor-1"));
    assert_eq!(requests[2].after.as_deref(), Some("cursor-2"));
    assert!(requests.iter().all(|r| r.first == 100 && r.broadcaster_id == "1234"));
    Ok(())
}

#[tokio::test]
async fn test_empty_first_page_is_not_found() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![], Some("ignored"))]);
    let query = bounded_query();

    let found = resolver(&catalog)
        .find_most_popular_clip(&query, &Matcher::title_and_creator())
        .await?;

    assert_eq!(found, ClipMatch::NotFound(query));
    assert_eq!(catalog.recorded().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_fetch_error_aborts_resolution() {
    let catalog = StubCatalog::with_pages(vec![page(
        vec![clip("a", "t", "x", 10)],
        Some("cursor-1"),
    )]);
    catalog
        .push_error(Error::Platform("HTTP 500 Internal Server Error => oops".into()))
        .await;

    let result = resolver(&catalog)
        .find_most_popular_clip(&bounded_query(), &Matcher::title_and_creator())
        .await;

    assert!(matches!(result, Err(Error::Platform(_))));
}

async fn catalog_failing_on_second_page() -> StubCatalog {
    let catalog = StubCatalog::with_pages(vec![page(
        vec![clip("a", "ace", "alice", 10), clip("b", "ace", "alice", 40)],
        Some("cursor-1"),
    )]);
    catalog
        .push_error(Error::Platform("HTTP 503 Service Unavailable => ".into()))
        .await;
    catalog
}

#[tokio::test]
async fn test_top_n_returns_no_partial_list_on_fetch_error() {
    let catalog = catalog_failing_on_second_page().await;

    let result = resolver(&catalog)
        .find_most_popular_clips(&bounded_query(), &Matcher::title_and_creator(), 5)
        .await;

    assert!(matches!(result, Err(Error::Platform(_))), "got {:?}", result);
    assert_eq!(catalog.recorded().await.len(), 2);
}

#[tokio::test]
async fn test_find_clip_fails_when_a_later_page_errors() {
    let catalog = catalog_failing_on_second_page().await;
    let query = bounded_query().with_title("nothing here").with_creator("alice");

    let result = resolver(&catalog)
        .find_clip(&query, &Matcher::title_and_creator())
        .await;

    assert!(matches!(result, Err(Error::Platform(_))), "got {:?}", result);
    assert_eq!(catalog.recorded().await.len(), 2);
}

#[tokio::test]
async fn test_resolve_top_propagates_fetch_error() {
    let catalog = catalog_failing_on_second_page().await;

    let result = resolver(&catalog)
        .resolve(Strategy::Top(3), &bounded_query(), &Matcher::title_and_creator())
        .await;

    assert!(result.is_err(), "page-1 matches must not leak as a result: {:?}", result);
}

#[tokio::test]
async fn test_top_n_orders_truncates_and_keeps_ties_stable() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![
        page(
            vec![
                clip("a", "t", "x", 10),
                clip("b", "t", "x", 50),
                clip("c", "t", "x", 10),
            ],
            Some("cursor-1"),
        ),
        page(
            vec![clip("d", "t", "x", 30), clip("e", "t", "x", 10), clip("f", "t", "x", 1)],
            None,
        ),
    ]);

    let top = resolver(&catalog)
        .find_most_popular_clips(&bounded_query(), &Matcher::title_and_creator(), 4)
        .await?;

    let ids: Vec<&str> = top.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "a", "c"]);
    Ok(())
}

#[tokio::test]
async fn test_top_n_with_fewer_matches_than_n() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(
        vec![clip("a", "ace", "x", 3), clip("b", "miss", "x", 9), clip("c", "ACE!", "y", 7)],
        None,
    )]);
    let query = bounded_query().with_title("ace");

    let top = resolver(&catalog)
        .find_most_popular_clips(&query, &Matcher::title_and_creator(), 10)
        .await?;

    let ids: Vec<&str> = top.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
    Ok(())
}

#[tokio::test]
async fn test_top_zero_is_empty() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![clip("a", "t", "x", 3)], None)]);

    let resolution = resolver(&catalog)
        .resolve(Strategy::Top(0), &bounded_query(), &Matcher::title_and_creator())
        .await?;

    assert_eq!(resolution, Resolution::Top(vec![]));
    Ok(())
}

#[tokio::test]
async fn test_default_lookback_fills_missing_start() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![], None)]);
    let query = ClipQuery::new("1234");

    let before = Utc::now();
    let found = resolver(&catalog)
        .find_most_popular_clip(&query, &Matcher::title_and_creator())
        .await?;
    let after = Utc::now();

    assert_eq!(found, ClipMatch::NotFound(query), "query handed back without the lookback");

    let requests = catalog.recorded().await;
    let started_at = requests[0].started_at.expect("lookback start");
    assert!(started_at >= before - Duration::days(7));
    assert!(started_at <= after - Duration::days(7));
    let ended_at = requests[0].ended_at.expect("open end closed at now");
    assert!(ended_at >= before && ended_at <= after);
    Ok(())
}

#[tokio::test]
async fn test_explicit_bounds_pass_through() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![], None)]);

    resolver(&catalog)
        .find_clip(&bounded_query(), &Matcher::title_and_creator())
        .await?;

    let requests = catalog.recorded().await;
    assert_eq!(requests[0].started_at, Some(day(2020, 5, 1)));
    assert_eq!(requests[0].ended_at, Some(day(2020, 6, 30)));
    Ok(())
}

#[tokio::test]
async fn test_start_only_query_is_searched_up_to_now() -> Result<(), Error> {
    let catalog = StubCatalog::with_pages(vec![page(vec![], None)]);
    let query = ClipQuery::new("1234").with_bounds(Some(day(2020, 5, 1)), None);

    let before = Utc::now();
    let found = resolver(&catalog)
        .find_most_popular_clip(&query, &Matcher::title_and_creator())
        .await?;
    let after = Utc::now();

    assert_eq!(found, ClipMatch::NotFound(query));
    let requests = catalog.recorded().await;
    assert_eq!(requests[0].started_at, Some(day(2020, 5, 1)));
    let ended_at = requests[0].ended_at.expect("explicit end");
    assert!(ended_at >= before && ended_at <= after);
    Ok(())
}

#[test]
fn test_strategy_selection() {
    use clipbot_common::models::{ClipsCommand, SubCommand};

    let mut command = ClipsCommand {
        broadcaster: "streamer".into(),
        ..Default::default()
    };
    assert_eq!(Strategy::for_command(&command), Strategy::MostPopular);

    command.title = "ace".into();
    assert_eq!(Strategy::for_command(&command), Strategy::MostPopular);

    command.creator = "alice".into();
    assert_eq!(Strategy::for_command(&command), Strategy::FirstMatch);

    command.sub_command = Some(SubCommand::Top(3));
    assert_eq!(Strategy::for_command(&command), Strategy::Top(3));
}
