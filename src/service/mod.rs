//! One service per table. Each service owns a cloned
//! [`DatabaseConnection`](sea_orm::DatabaseConnection) and exposes async
//! create/read/update/delete operations plus paginated listings.

mod aircraft;
mod airport;
mod boarding_pass;
mod booking;
mod flight;
mod seat;
mod ticket;
mod ticket_flight;

pub use aircraft::{AircraftService, AircraftUpdate, NewAircraft};
pub use airport::{AirportService, AirportUpdate, NewAirport};
pub use boarding_pass::{BoardingPassService, BoardingPassUpdate, NewBoardingPass};
pub use booking::{BookingService, BookingStatistics, BookingUpdate, NewBooking};
pub use flight::{FlightDetails, FlightService, FlightStatistics, FlightUpdate, NewFlight};
pub use seat::{NewSeat, SeatService};
pub use ticket::{NewTicket, TicketService, TicketUpdate};
pub use ticket_flight::{NewTicketFlight, TicketFlightService, TicketFlightUpdate};
