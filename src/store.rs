use sea_orm::DatabaseConnection;

use crate::service::{
    AircraftService, AirportService, BoardingPassService, BookingService, FlightService,
    SeatService, TicketFlightService, TicketService,
};

/// Entry point bundling every service over one connection pool.
///
/// Cloning is cheap; all clones share the pool.
///
/// ```no_run
/// use bookings_seaorm_store::{BookingsStore, DatabaseConfig, PageRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = DatabaseConfig::from_env()?.connect().await?;
/// let store = BookingsStore::new(conn);
///
/// let flights = store.flights().search("SVO", PageRequest::default()).await?;
/// for flight in &flights.items {
///     println!("{}", flight.summary());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BookingsStore {
    conn: DatabaseConnection,
}

impl BookingsStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn aircraft(&self) -> AircraftService {
        AircraftService::new(self.conn.clone())
    }

    pub fn airports(&self) -> AirportService {
        AirportService::new(self.conn.clone())
    }

    pub fn flights(&self) -> FlightService {
        FlightService::new(self.conn.clone())
    }

    pub fn seats(&self) -> SeatService {
        SeatService::new(self.conn.clone())
    }

    pub fn bookings(&self) -> BookingService {
        BookingService::new(self.conn.clone())
    }

    pub fn tickets(&self) -> TicketService {
        TicketService::new(self.conn.clone())
    }

    pub fn ticket_flights(&self) -> TicketFlightService {
        TicketFlightService::new(self.conn.clone())
    }

    pub fn boarding_passes(&self) -> BoardingPassService {
        BoardingPassService::new(self.conn.clone())
    }

    /// Applies pending schema migrations.
    #[cfg(feature = "migration")]
    pub async fn migrate(&self) -> Result<(), sea_orm::DbErr> {
        use sea_orm_migration::MigratorTrait;

        crate::migration::Migrator::up(&self.conn, None).await?;
        tracing::info!("bookings schema is up to date");
        Ok(())
    }
}
