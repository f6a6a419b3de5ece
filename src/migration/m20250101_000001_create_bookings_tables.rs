use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AircraftsData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AircraftsData::AircraftCode)
                            .char_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AircraftsData::Model).json_binary().not_null())
                    .col(ColumnDef::new(AircraftsData::Range).integer().not_null())
                    .check(Expr::col(AircraftsData::Range).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AirportsData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AirportsData::AirportCode)
                            .char_len(3)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AirportsData::AirportName).json_binary().not_null())
                    .col(ColumnDef::new(AirportsData::City).json_binary().not_null())
                    .col(ColumnDef::new(AirportsData::Longitude).double().not_null())
                    .col(ColumnDef::new(AirportsData::Latitude).double().not_null())
                    .col(ColumnDef::new(AirportsData::Timezone).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flights::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Flights::FlightId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Flights::FlightNo).char_len(6).not_null())
                    .col(
                        ColumnDef::new(Flights::ScheduledDeparture)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Flights::ScheduledArrival)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Flights::DepartureAirport).char_len(3).not_null())
                    .col(ColumnDef::new(Flights::ArrivalAirport).char_len(3).not_null())
                    .col(ColumnDef::new(Flights::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Flights::AircraftCode).char_len(3).not_null())
                    .col(ColumnDef::new(Flights::ActualDeparture).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Flights::ActualArrival).timestamp_with_time_zone().null())
                    .check(
                        Expr::col(Flights::ScheduledArrival)
                            .gt(Expr::col(Flights::ScheduledDeparture)),
                    )
                    .check(
                        Expr::col(Flights::ActualArrival)
                            .is_null()
                            .or(Expr::col(Flights::ActualDeparture).is_null())
                            .or(Expr::col(Flights::ActualArrival)
                                .gt(Expr::col(Flights::ActualDeparture))),
                    )
                    .check(Expr::col(Flights::Status).is_in([
                        "Scheduled",
                        "On Time",
                        "Delayed",
                        "Departed",
                        "Arrived",
                        "Cancelled",
                    ]))
                    .check(
                        Expr::col(Flights::DepartureAirport)
                            .ne(Expr::col(Flights::ArrivalAirport)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("flights_aircraft_code_fkey")
                            .from(Flights::Table, Flights::AircraftCode)
                            .to(AircraftsData::Table, AircraftsData::AircraftCode),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("flights_departure_airport_fkey")
                            .from(Flights::Table, Flights::DepartureAirport)
                            .to(AirportsData::Table, AirportsData::AirportCode),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("flights_arrival_airport_fkey")
                            .from(Flights::Table, Flights::ArrivalAirport)
                            .to(AirportsData::Table, AirportsData::AirportCode),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("flights_flight_no_scheduled_departure_key")
                    .table(Flights::Table)
                    .col(Flights::FlightNo)
                    .col(Flights::ScheduledDeparture)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Seats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Seats::AircraftCode).char_len(3).not_null())
                    .col(ColumnDef::new(Seats::SeatNo).string_len(4).not_null())
                    .col(ColumnDef::new(Seats::FareConditions).string_len(10).not_null())
                    .primary_key(Index::create().col(Seats::AircraftCode).col(Seats::SeatNo))
                    .check(Expr::col(Seats::FareConditions).is_in(FARE_CONDITIONS))
                    .foreign_key(
                        ForeignKey::create()
                            .name("seats_aircraft_code_fkey")
                            .from(Seats::Table, Seats::AircraftCode)
                            .to(AircraftsData::Table, AircraftsData::AircraftCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::BookRef)
                            .char_len(6)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Bookings::BookDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::TotalAmount).decimal_len(10, 2).not_null())
                    .check(Expr::col(Bookings::TotalAmount).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::TicketNo)
                            .char_len(13)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::BookRef).char_len(6).not_null())
                    .col(ColumnDef::new(Tickets::PassengerId).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::PassengerName).text().not_null())
                    .col(ColumnDef::new(Tickets::ContactData).json_binary().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("tickets_book_ref_fkey")
                            .from(Tickets::Table, Tickets::BookRef)
                            .to(Bookings::Table, Bookings::BookRef),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TicketFlights::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TicketFlights::TicketNo).char_len(13).not_null())
                    .col(ColumnDef::new(TicketFlights::FlightId).integer().not_null())
                    .col(ColumnDef::new(TicketFlights::FareConditions).string_len(10).not_null())
                    .col(ColumnDef::new(TicketFlights::Amount).decimal_len(10, 2).not_null())
                    .primary_key(
                        Index::create()
                            .col(TicketFlights::TicketNo)
                            .col(TicketFlights::FlightId),
                    )
                    .check(Expr::col(TicketFlights::Amount).gte(0))
                    .check(Expr::col(TicketFlights::FareConditions).is_in(FARE_CONDITIONS))
                    .foreign_key(
                        ForeignKey::create()
                            .name("ticket_flights_ticket_no_fkey")
                            .from(TicketFlights::Table, TicketFlights::TicketNo)
                            .to(Tickets::Table, Tickets::TicketNo),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("ticket_flights_flight_id_fkey")
                            .from(TicketFlights::Table, TicketFlights::FlightId)
                            .to(Flights::Table, Flights::FlightId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BoardingPasses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BoardingPasses::TicketNo).char_len(13).not_null())
                    .col(ColumnDef::new(BoardingPasses::FlightId).integer().not_null())
                    .col(ColumnDef::new(BoardingPasses::BoardingNo).integer().not_null())
                    .col(ColumnDef::new(BoardingPasses::SeatNo).string_len(4).not_null())
                    .primary_key(
                        Index::create()
                            .col(BoardingPasses::TicketNo)
                            .col(BoardingPasses::FlightId),
                    )
                    .check(Expr::col(BoardingPasses::BoardingNo).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("boarding_passes_ticket_no_fkey")
                            .from(
                                BoardingPasses::Table,
                                (BoardingPasses::TicketNo, BoardingPasses::FlightId),
                            )
                            .to(
                                TicketFlights::Table,
                                (TicketFlights::TicketNo, TicketFlights::FlightId),
                            ),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("boarding_passes_flight_id_boarding_no_key")
                    .table(BoardingPasses::Table)
                    .col(BoardingPasses::FlightId)
                    .col(BoardingPasses::BoardingNo)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("boarding_passes_flight_id_seat_no_key")
                    .table(BoardingPasses::Table)
                    .col(BoardingPasses::FlightId)
                    .col(BoardingPasses::SeatNo)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BoardingPasses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TicketFlights::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seats::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Flights::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AirportsData::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AircraftsData::Table).if_exists().to_owned())
            .await
    }
}

const FARE_CONDITIONS: [&str; 3] = ["Economy", "Comfort", "Business"];

#[derive(DeriveIden)]
enum AircraftsData {
    Table,
    AircraftCode,
    Model,
    Range,
}

#[derive(DeriveIden)]
enum AirportsData {
    Table,
    AirportCode,
    AirportName,
    City,
    Longitude,
    Latitude,
    Timezone,
}

#[derive(DeriveIden)]
enum Flights {
    Table,
    FlightId,
    FlightNo,
    ScheduledDeparture,
    ScheduledArrival,
    DepartureAirport,
    ArrivalAirport,
    Status,
    AircraftCode,
    ActualDeparture,
    ActualArrival,
}

#[derive(DeriveIden)]
enum Seats {
    Table,
    AircraftCode,
    SeatNo,
    FareConditions,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    BookRef,
    BookDate,
    TotalAmount,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    TicketNo,
    BookRef,
    PassengerId,
    PassengerName,
    ContactData,
}

#[derive(DeriveIden)]
enum TicketFlights {
    Table,
    TicketNo,
    FlightId,
    FareConditions,
    Amount,
}

#[derive(DeriveIden)]
enum BoardingPasses {
    Table,
    TicketNo,
    FlightId,
    BoardingNo,
    SeatNo,
}
