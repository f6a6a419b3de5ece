#![cfg(feature = "migration")]

mod common;

use bookings_seaorm_store::PageRequest;
use chrono::TimeDelta;

use common::{now, seed_booking, seed_flight, seed_reference_data, store};

/// Flights `PG0001`..`PG0025`, one hour apart, `PG0025` departing last.
async fn seeded_store() -> bookings_seaorm_store::BookingsStore {
    let store = store().await;
    seed_reference_data(&store).await;
    for n in 1..=25 {
        seed_flight(&store, &format!("PG{n:04}"), now() + TimeDelta::hours(n)).await;
    }
    store
}

#[tokio::test]
async fn second_page_holds_records_eleven_to_twenty() {
    let store = seeded_store().await;

    let page = store
        .flights()
        .search("", PageRequest::new(2, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(page.total_count, 25);
    assert_eq!(page.total_pages(), 3);
    assert!(page.has_previous());
    assert!(page.has_next());

    // Latest departure first, so the 11th record is PG0015.
    let numbers: Vec<_> = page.items.iter().map(|f| f.flight_no.clone()).collect();
    let expected: Vec<_> = (6..=15).rev().map(|n| format!("PG{n:04}")).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn last_page_is_partial_and_beyond_is_empty() {
    let store = seeded_store().await;
    let flights = store.flights();

    let last = flights.search("", PageRequest::new(3, 10).unwrap()).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_next());

    let beyond = flights.search("", PageRequest::new(4, 10).unwrap()).await.unwrap();
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_count, 25);
}

#[tokio::test]
async fn blank_term_matches_everything() {
    let store = seeded_store().await;
    let flights = store.flights();

    let empty = flights.search("", PageRequest::default()).await.unwrap();
    let blank = flights.search("   ", PageRequest::default()).await.unwrap();
    let stats = flights.statistics().await.unwrap();

    assert_eq!(empty.total_count, stats.total);
    assert_eq!(blank.total_count, stats.total);
    assert_eq!(empty.items.len(), PageRequest::DEFAULT_PAGE_SIZE as usize);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let store = seeded_store().await;
    let flights = store.flights();

    let page = flights.search("pg001", PageRequest::default()).await.unwrap();
    // PG0010..PG0019
    assert_eq!(page.total_count, 10);
    assert!(page.items.iter().all(|f| f.flight_no.starts_with("PG001")));

    let by_airport = flights.search("led", PageRequest::default()).await.unwrap();
    assert_eq!(by_airport.total_count, 25);

    let by_status = flights.search("sched", PageRequest::default()).await.unwrap();
    assert_eq!(by_status.total_count, 25);

    let nothing = flights.search("ZZZ", PageRequest::default()).await.unwrap();
    assert_eq!(nothing.total_count, 0);
    assert_eq!(nothing.total_pages(), 1);
}

#[tokio::test]
async fn like_wildcards_match_literally() {
    let store = store().await;
    seed_booking(&store, "00A1B2", 1000).await;
    seed_booking(&store, "00C3D4", 2000).await;

    let bookings = store.bookings();
    let all = bookings.search("", PageRequest::default()).await.unwrap();
    assert_eq!(all.total_count, 2);

    let wildcard = bookings.search("%", PageRequest::default()).await.unwrap();
    assert_eq!(wildcard.total_count, 0);

    let underscore = bookings.search("00_", PageRequest::default()).await.unwrap();
    assert_eq!(underscore.total_count, 0);

    let one = bookings.search("a1b", PageRequest::default()).await.unwrap();
    assert_eq!(one.total_count, 1);
    assert_eq!(one.items[0].book_ref, "00A1B2");
}

#[tokio::test]
async fn pages_do_not_overlap() {
    let store = seeded_store().await;
    let flights = store.flights();

    let mut seen = Vec::new();
    let mut request = PageRequest::new(1, 7).unwrap();
    loop {
        let page = flights.search("", request).await.unwrap();
        seen.extend(page.items.iter().map(|f| f.flight_id));
        if !page.has_next() {
            break;
        }
        request = request.next();
    }

    assert_eq!(seen.len(), 25);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn page_far_beyond_the_end_is_empty() {
    let store = seeded_store().await;

    let page = store
        .flights()
        .search("", PageRequest::new(u64::MAX / 2, 10).unwrap())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.total_count, 25);
    assert_eq!(page.page, u64::MAX / 2);
    assert!(!page.has_next());
}
