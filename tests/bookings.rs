#![cfg(feature = "migration")]

mod common;

use bookings_seaorm_store::{
    entity::booking, BoardingPassUpdate, BookingUpdate, ContactData, FareConditions,
    NewBoardingPass, NewBooking, NewTicket, NewTicketFlight, Page, PageRequest,
    TicketFlightUpdate, TicketUpdate,
};
use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use sea_orm::prelude::Decimal;

use common::{
    now, seed_booking, seed_flight, seed_reference_data, seed_segment, seed_ticket, store,
};

const TICKET_A: &str = "0005432000987";
const TICKET_B: &str = "0005432000988";
const TICKET_C: &str = "0005432000989";

fn refs(page: &Page<booking::Model>) -> Vec<&str> {
    page.items.iter().map(|b| b.book_ref.as_str()).collect()
}

#[tokio::test]
async fn booking_round_trip() {
    let store = store().await;
    let bookings = store.bookings();

    let created = bookings
        .create(
            NewBooking {
                book_ref: "00000f".to_string(),
                book_date: None,
                total_amount: Decimal::new(26500000, 2),
            },
            now(),
        )
        .await
        .unwrap();
    assert_eq!(created.book_ref, "00000F");
    assert_eq!(created.book_date, now());

    let loaded = bookings.get("00000F").await.unwrap().unwrap();
    assert_eq!(loaded.total_amount, Decimal::new(265000, 0));

    let updated = bookings
        .update(
            "00000F",
            BookingUpdate {
                total_amount: Some(Decimal::new(270000, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.total_amount, Decimal::new(270000, 0));
    assert_eq!(updated.book_date, now());

    assert!(bookings.exists("00000f").await.unwrap());
    assert!(bookings.delete("00000F").await.unwrap());
    assert!(!bookings.exists("00000F").await.unwrap());
}

#[tokio::test]
async fn booking_validation() {
    let store = store().await;
    let bookings = store.bookings();

    let zero = NewBooking {
        book_ref: "000010".to_string(),
        book_date: None,
        total_amount: Decimal::ZERO,
    };
    assert!(bookings.create(zero, now()).await.unwrap_err().is_invalid_input());

    let ancient = NewBooking {
        book_ref: "000010".to_string(),
        book_date: Some(Utc.with_ymd_and_hms(1999, 12, 31, 0, 0, 0).unwrap()),
        total_amount: Decimal::ONE,
    };
    assert!(bookings.create(ancient, now()).await.unwrap_err().is_invalid_input());

    let punctuation = NewBooking {
        book_ref: "00-010".to_string(),
        book_date: None,
        total_amount: Decimal::ONE,
    };
    assert!(bookings.create(punctuation, now()).await.unwrap_err().is_invalid_input());

    seed_booking(&store, "000010", 100).await;
    let duplicate = NewBooking {
        book_ref: "000010".to_string(),
        book_date: None,
        total_amount: Decimal::ONE,
    };
    assert!(bookings.create(duplicate, now()).await.unwrap_err().is_conflict());
}

#[tokio::test]
async fn booking_statistics_and_order() {
    let store = store().await;
    let bookings = store.bookings();
    for (book_ref, days, amount) in [("000001", 3, 100), ("000002", 1, 300), ("000003", 2, 200)] {
        bookings
            .create(
                NewBooking {
                    book_ref: book_ref.to_string(),
                    book_date: Some(now() - TimeDelta::days(days)),
                    total_amount: Decimal::new(amount, 0),
                },
                now(),
            )
            .await
            .unwrap();
    }

    let page = bookings.search("", PageRequest::default()).await.unwrap();
    assert_eq!(refs(&page), ["000002", "000003", "000001"]);

    let stats = bookings.statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.total_amount, Decimal::new(600, 0));
    assert_eq!(stats.average_amount, Some(Decimal::new(200, 0)));
    assert_eq!(stats.min_amount, Some(Decimal::new(100, 0)));
    assert_eq!(stats.max_amount, Some(Decimal::new(300, 0)));
    assert_eq!(stats.earliest, Some(now() - TimeDelta::days(3)));
    assert_eq!(stats.latest, Some(now() - TimeDelta::days(1)));
}

#[tokio::test]
async fn booking_statistics_are_aggregated_in_sql() {
    let store = store().await;
    let bookings = store.bookings();

    let empty = bookings.statistics().await.unwrap();
    assert_eq!(empty.total, 0);
    assert_eq!(empty.total_amount, Decimal::ZERO);
    assert_eq!(empty.average_amount, None);
    assert_eq!(empty.min_amount, None);
    assert_eq!(empty.earliest, None);

    seed_booking(&store, "000001", 100).await;
    seed_booking(&store, "000002", 100).await;
    seed_booking(&store, "000003", 101).await;

    let stats = bookings.statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.total_amount, Decimal::new(301, 0));
    assert_eq!(stats.average_amount, Some(Decimal::new(10033, 2)));
    assert_eq!(stats.min_amount, Some(Decimal::new(100, 0)));
    assert_eq!(stats.max_amount, Some(Decimal::new(101, 0)));
}

#[tokio::test]
async fn bookings_by_date_and_amount() {
    let store = store().await;
    let bookings = store.bookings();
    let day = |d, h| Utc.with_ymd_and_hms(2017, 8, d, h, 0, 0).unwrap();
    for (book_ref, date, amount) in [
        ("000004", day(14, 23), 500),
        ("000003", day(15, 9), 150),
        ("000001", day(15, 9), 900),
        ("000002", day(15, 0), 150),
        ("000005", day(16, 0), 700),
    ] {
        bookings
            .create(
                NewBooking {
                    book_ref: book_ref.to_string(),
                    book_date: Some(date),
                    total_amount: Decimal::new(amount, 0),
                },
                now(),
            )
            .await
            .unwrap();
    }
    let on_day = bookings
        .by_date(NaiveDate::from_ymd_opt(2017, 8, 15).unwrap(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(refs(&on_day), ["000002", "000001", "000003"]);

    let range = bookings
        .by_date_range(day(14, 23), day(15, 9), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(refs(&range), ["000004", "000002", "000001", "000003"]);

    let backwards = bookings
        .by_date_range(day(16, 0), day(15, 0), PageRequest::default())
        .await
        .unwrap_err();
    assert!(backwards.is_invalid_input());

    let pricey = bookings
        .by_min_amount(Decimal::new(500, 0), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(refs(&pricey), ["000001", "000005", "000004"]);

    let all = bookings
        .by_min_amount(Decimal::ZERO, PageRequest::new(2, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(all.total_count, 5);
    assert_eq!(refs(&all), ["000004", "000002"]);
}

#[tokio::test]
async fn ticket_round_trip() {
    let store = store().await;
    seed_booking(&store, "00A1B2", 12000).await;
    seed_booking(&store, "00C3D4", 9000).await;
    let tickets = store.tickets();

    let contacts = ContactData::new(Some("+70127117011"), Some(" ivanov@example.com "), None);
    let created = tickets
        .create(NewTicket {
            ticket_no: TICKET_A.to_string(),
            book_ref: "00a1b2".to_string(),
            passenger_id: "6617 569341".to_string(),
            passenger_name: " IVAN IVANOV ".to_string(),
            contact_data: Some(contacts.clone()),
        })
        .await
        .unwrap();
    assert_eq!(created.book_ref, "00A1B2");
    assert_eq!(created.passenger_name, "IVAN IVANOV");

    let loaded = tickets.get(TICKET_A).await.unwrap().unwrap();
    assert_eq!(loaded.contact_data, Some(contacts));

    let moved = tickets
        .update(
            TICKET_A,
            TicketUpdate {
                book_ref: Some("00C3D4".to_string()),
                contact_data: Some(ContactData::default()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.book_ref, "00C3D4");
    assert_eq!(moved.contact_data, None);

    let to_nowhere = TicketUpdate {
        book_ref: Some("FFFFFF".to_string()),
        ..Default::default()
    };
    assert!(tickets.update(TICKET_A, to_nowhere).await.unwrap_err().is_invalid_input());

    assert!(tickets.exists(TICKET_A).await.unwrap());
    assert!(tickets.delete(TICKET_A).await.unwrap());
    assert!(!tickets.exists(TICKET_A).await.unwrap());
}

#[tokio::test]
async fn ticket_requires_booking_and_unique_number() {
    let store = store().await;
    let tickets = store.tickets();
    let ticket = |book_ref: &str| NewTicket {
        ticket_no: TICKET_A.to_string(),
        book_ref: book_ref.to_string(),
        passenger_id: "6617 569341".to_string(),
        passenger_name: "IVAN IVANOV".to_string(),
        contact_data: None,
    };

    assert!(tickets.create(ticket("00A1B2")).await.unwrap_err().is_invalid_input());

    seed_booking(&store, "00A1B2", 12000).await;
    tickets.create(ticket("00A1B2")).await.unwrap();
    assert!(tickets.create(ticket("00A1B2")).await.unwrap_err().is_conflict());

    // The booking now has a ticket and is protected by the foreign key.
    assert!(store.bookings().delete("00A1B2").await.unwrap_err().is_conflict());
}

#[tokio::test]
async fn tickets_by_booking_and_search() {
    let store = store().await;
    seed_booking(&store, "00A1B2", 12000).await;
    seed_booking(&store, "00C3D4", 9000).await;
    seed_ticket(&store, TICKET_C, "00A1B2", "PETR PETROV").await;
    seed_ticket(&store, TICKET_A, "00A1B2", "IVAN IVANOV").await;
    seed_ticket(&store, TICKET_B, "00C3D4", "ANNA SMIRNOVA").await;
    let tickets = store.tickets();

    let page = tickets.by_booking("00a1b2", PageRequest::default()).await.unwrap();
    let numbers: Vec<_> = page.items.iter().map(|t| t.ticket_no.as_str()).collect();
    assert_eq!(numbers, [TICKET_A, TICKET_C]);

    let found = tickets.search("ivanov", PageRequest::default()).await.unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].ticket_no, TICKET_A);

    let by_ref = tickets.search("c3d", PageRequest::default()).await.unwrap();
    assert_eq!(by_ref.total_count, 1);
    assert_eq!(by_ref.items[0].passenger_name, "ANNA SMIRNOVA");

    assert_eq!(tickets.count_by_booking("00a1b2").await.unwrap(), 2);
    assert_eq!(tickets.count_by_booking("00C3D4").await.unwrap(), 1);
    assert_eq!(tickets.count_by_booking("FFFFFF").await.unwrap(), 0);
}

#[tokio::test]
async fn ticket_segments() {
    let store = store().await;
    seed_reference_data(&store).await;
    seed_booking(&store, "00A1B2", 12000).await;
    seed_ticket(&store, TICKET_A, "00A1B2", "IVAN IVANOV").await;
    let outbound = seed_flight(&store, "PG0001", now() + TimeDelta::hours(4)).await;
    let inbound = seed_flight(&store, "PG0002", now() + TimeDelta::days(3)).await;
    let segments = store.ticket_flights();

    seed_segment(&store, TICKET_A, outbound.flight_id, 6000).await;
    seed_segment(&store, TICKET_A, inbound.flight_id, 5500).await;

    let duplicate = NewTicketFlight {
        ticket_no: TICKET_A.to_string(),
        flight_id: outbound.flight_id,
        fare_conditions: FareConditions::Business,
        amount: Decimal::new(18000, 0),
    };
    assert!(segments.create(duplicate).await.unwrap_err().is_conflict());

    let negative = NewTicketFlight {
        ticket_no: TICKET_A.to_string(),
        flight_id: outbound.flight_id,
        fare_conditions: FareConditions::Economy,
        amount: Decimal::new(-1, 0),
    };
    assert!(segments.create(negative).await.unwrap_err().is_invalid_input());

    let no_flight = NewTicketFlight {
        ticket_no: TICKET_A.to_string(),
        flight_id: 9999,
        fare_conditions: FareConditions::Economy,
        amount: Decimal::ONE,
    };
    assert!(segments.create(no_flight).await.unwrap_err().is_invalid_input());

    assert_eq!(segments.total_by_ticket(TICKET_A).await.unwrap(), Decimal::new(11500, 0));
    assert_eq!(segments.total_by_ticket(TICKET_B).await.unwrap(), Decimal::ZERO);

    let upgraded = segments
        .update(
            TICKET_A,
            inbound.flight_id,
            TicketFlightUpdate {
                fare_conditions: Some(FareConditions::Comfort),
                amount: Some(Decimal::new(7000, 0)),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(upgraded.fare_conditions, FareConditions::Comfort);
    assert_eq!(segments.total_by_ticket(TICKET_A).await.unwrap(), Decimal::new(13000, 0));

    let itinerary = segments.by_ticket(TICKET_A, PageRequest::default()).await.unwrap();
    let flights: Vec<_> = itinerary.items.iter().map(|s| s.flight_id).collect();
    assert_eq!(flights, [outbound.flight_id, inbound.flight_id]);

    let manifest = segments.by_flight(outbound.flight_id, PageRequest::default()).await.unwrap();
    assert_eq!(manifest.total_count, 1);

    assert!(segments.delete(TICKET_A, inbound.flight_id).await.unwrap());
    assert!(segments.get(TICKET_A, inbound.flight_id).await.unwrap().is_none());
}

#[tokio::test]
async fn flight_revenue_and_fare_mix() {
    let store = store().await;
    seed_reference_data(&store).await;
    seed_booking(&store, "00A1B2", 12000).await;
    for ticket_no in [TICKET_A, TICKET_B, TICKET_C] {
        seed_ticket(&store, ticket_no, "00A1B2", "IVAN IVANOV").await;
    }
    let flight = seed_flight(&store, "PG0001", now() + TimeDelta::hours(4)).await;
    let empty = seed_flight(&store, "PG0002", now() + TimeDelta::hours(8)).await;
    let segments = store.ticket_flights();

    seed_segment(&store, TICKET_A, flight.flight_id, 6000).await;
    seed_segment(&store, TICKET_B, flight.flight_id, 6000).await;
    seed_segment(&store, TICKET_A, empty.flight_id, 3000).await;
    segments
        .create(NewTicketFlight {
            ticket_no: TICKET_C.to_string(),
            flight_id: flight.flight_id,
            fare_conditions: FareConditions::Business,
            amount: Decimal::new(1850050, 2),
        })
        .await
        .unwrap();
    assert!(segments.delete(TICKET_A, empty.flight_id).await.unwrap());

    assert_eq!(
        segments.total_by_flight(flight.flight_id).await.unwrap(),
        Decimal::new(3050050, 2)
    );
    assert_eq!(segments.total_by_flight(empty.flight_id).await.unwrap(), Decimal::ZERO);

    let mix = segments.fare_statistics(flight.flight_id).await.unwrap();
    assert_eq!(mix.get(&FareConditions::Economy), Some(&2));
    assert_eq!(mix.get(&FareConditions::Business), Some(&1));
    assert_eq!(mix.get(&FareConditions::Comfort), None);
    assert!(segments.fare_statistics(empty.flight_id).await.unwrap().is_empty());

    let mid = segments
        .by_amount_range(Decimal::new(6000, 0), Decimal::new(18505, 0), PageRequest::default())
        .await
        .unwrap();
    let keys: Vec<_> = mid.items.iter().map(|s| s.ticket_no.as_str()).collect();
    assert_eq!(keys, [TICKET_A, TICKET_B, TICKET_C]);

    let cheap = segments
        .by_amount_range(Decimal::ZERO, Decimal::new(5999, 0), PageRequest::default())
        .await
        .unwrap();
    assert!(cheap.is_empty());

    let inverted = segments
        .by_amount_range(Decimal::new(100, 0), Decimal::new(99, 0), PageRequest::default())
        .await
        .unwrap_err();
    assert!(inverted.is_invalid_input());
}

#[tokio::test]
async fn boarding_passes() {
    let store = store().await;
    seed_reference_data(&store).await;
    seed_booking(&store, "00A1B2", 12000).await;
    let flight = seed_flight(&store, "PG0001", now() + TimeDelta::hours(1)).await;
    for ticket_no in [TICKET_A, TICKET_B, TICKET_C] {
        seed_ticket(&store, ticket_no, "00A1B2", "IVAN IVANOV").await;
    }
    seed_segment(&store, TICKET_A, flight.flight_id, 6000).await;
    seed_segment(&store, TICKET_B, flight.flight_id, 6000).await;
    let passes = store.boarding_passes();
    let pass = |ticket_no: &str, boarding_no: i32, seat_no: &str| NewBoardingPass {
        ticket_no: ticket_no.to_string(),
        flight_id: flight.flight_id,
        boarding_no,
        seat_no: seat_no.to_string(),
    };

    let first = passes.create(pass(TICKET_A, 1, "12a")).await.unwrap();
    assert_eq!(first.seat_no, "12A");
    assert_eq!(first.seat_row(), "12");
    assert_eq!(first.seat_letter(), Some('A'));

    // Same boarding number or seat on the same flight.
    assert!(passes.create(pass(TICKET_B, 1, "12B")).await.unwrap_err().is_conflict());
    assert!(passes.create(pass(TICKET_B, 2, "12A")).await.unwrap_err().is_conflict());
    // The ticket does not hold this flight.
    assert!(passes.create(pass(TICKET_C, 3, "14C")).await.unwrap_err().is_invalid_input());
    // Malformed input.
    assert!(passes.create(pass(TICKET_B, 0, "12B")).await.unwrap_err().is_invalid_input());
    assert!(passes.create(pass(TICKET_B, 2, "B12")).await.unwrap_err().is_invalid_input());

    passes.create(pass(TICKET_B, 3, "12B")).await.unwrap();
    assert_eq!(
        passes.available_boarding_numbers(flight.flight_id, 5).await.unwrap(),
        [2, 4, 5]
    );

    let taken_seat = BoardingPassUpdate {
        seat_no: Some("12A".to_string()),
        ..Default::default()
    };
    assert!(passes
        .update(TICKET_B, flight.flight_id, taken_seat)
        .await
        .unwrap_err()
        .is_conflict());

    let reseated = passes
        .update(
            TICKET_B,
            flight.flight_id,
            BoardingPassUpdate {
                boarding_no: Some(2),
                seat_no: Some("14C".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reseated.boarding_no, 2);
    assert_eq!(reseated.seat_no, "14C");

    // Keeping its own seat is not a conflict.
    let same = passes
        .update(
            TICKET_A,
            flight.flight_id,
            BoardingPassUpdate {
                seat_no: Some("12A".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(same, first);

    let boarding = passes.by_flight(flight.flight_id, PageRequest::default()).await.unwrap();
    let order: Vec<_> = boarding.items.iter().map(|p| p.boarding_no).collect();
    assert_eq!(order, [1, 2]);

    let mine = passes.by_ticket(TICKET_B, PageRequest::default()).await.unwrap();
    assert_eq!(mine.total_count, 1);
    assert_eq!(mine.items[0].seat_no, "14C");
    assert!(passes.by_ticket(TICKET_C, PageRequest::default()).await.unwrap().is_empty());

    assert!(passes.delete(TICKET_A, flight.flight_id).await.unwrap());
    assert_eq!(
        passes.available_boarding_numbers(flight.flight_id, 3).await.unwrap(),
        [1, 3]
    );
}
