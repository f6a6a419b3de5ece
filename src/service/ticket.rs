use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::booking::Entity as BookingEntity;
use crate::entity::ticket::{self, ActiveModel as TicketActiveModel, Entity as TicketEntity};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, search_condition, Page, PageRequest};
use crate::validate;
use crate::value::ContactData;

const PASSENGER_ID_MAX_LEN: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub ticket_no: String,
    pub book_ref: String,
    pub passenger_id: String,
    pub passenger_name: String,
    pub contact_data: Option<ContactData>,
}

/// Changes to a ticket. An empty [`ContactData`] clears the stored contacts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub book_ref: Option<String>,
    pub passenger_id: Option<String>,
    pub passenger_name: Option<String>,
    pub contact_data: Option<ContactData>,
}

#[derive(Debug, Clone)]
pub struct TicketService {
    conn: DatabaseConnection,
}

impl TicketService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Issues a ticket under an existing booking.
    pub async fn create(&self, new: NewTicket) -> Result<ticket::Model> {
        let ticket_no = validate::ticket_no(&new.ticket_no)?;
        let book_ref = validate::book_ref(&new.book_ref)?;
        let passenger_id =
            validate::bounded("passenger id", &new.passenger_id, PASSENGER_ID_MAX_LEN)?;
        let passenger_name = validate::non_blank("passenger name", &new.passenger_name)?;
        let contact_data = new.contact_data.filter(|c| !c.is_empty());

        let txn = self.conn.begin().await?;

        if TicketEntity::find_by_id(ticket_no.clone()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("ticket {ticket_no} already exists")));
        }
        if BookingEntity::find_by_id(book_ref.clone()).one(&txn).await?.is_none() {
            return Err(StoreError::invalid(format!("booking {book_ref} does not exist")));
        }

        let model = TicketActiveModel {
            ticket_no: Set(ticket_no),
            book_ref: Set(book_ref),
            passenger_id: Set(passenger_id),
            passenger_name: Set(passenger_name),
            contact_data: Set(contact_data),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(ticket_no = %model.ticket_no, book_ref = %model.book_ref, "ticket created");
        Ok(model)
    }

    pub async fn get(&self, ticket_no: &str) -> Result<Option<ticket::Model>> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(None);
        };
        Ok(TicketEntity::find_by_id(ticket_no).one(&self.conn).await?)
    }

    pub async fn exists(&self, ticket_no: &str) -> Result<bool> {
        Ok(self.get(ticket_no).await?.is_some())
    }

    pub async fn update(
        &self,
        ticket_no: &str,
        changes: TicketUpdate,
    ) -> Result<Option<ticket::Model>> {
        let Some(existing) = self.get(ticket_no).await? else {
            return Ok(None);
        };

        let mut active_model = existing.clone().into_active_model();
        if let Some(book_ref) = changes.book_ref {
            let book_ref = validate::book_ref(&book_ref)?;
            if BookingEntity::find_by_id(book_ref.clone())
                .one(&self.conn)
                .await?
                .is_none()
            {
                return Err(StoreError::invalid(format!("booking {book_ref} does not exist")));
            }
            active_model.book_ref = Set(book_ref);
        }
        if let Some(passenger_id) = changes.passenger_id {
            active_model.passenger_id = Set(validate::bounded(
                "passenger id",
                &passenger_id,
                PASSENGER_ID_MAX_LEN,
            )?);
        }
        if let Some(name) = changes.passenger_name {
            active_model.passenger_name = Set(validate::non_blank("passenger name", &name)?);
        }
        if let Some(contact_data) = changes.contact_data {
            active_model.contact_data = Set(Some(contact_data).filter(|c| !c.is_empty()));
        }
        if !active_model.is_changed() {
            return Ok(Some(existing));
        }

        let updated = active_model.update(&self.conn).await?;
        tracing::info!(ticket_no = %updated.ticket_no, "ticket updated");
        Ok(Some(updated))
    }

    pub async fn delete(&self, ticket_no: &str) -> Result<bool> {
        let Ok(ticket_no) = validate::ticket_no(ticket_no) else {
            return Ok(false);
        };
        let res = TicketEntity::delete_by_id(ticket_no).exec(&self.conn).await?;
        Ok(res.rows_affected > 0)
    }

    /// Tickets whose number, booking reference, passenger id or passenger
    /// name contains `term`, ordered by ticket number.
    pub async fn search(&self, term: &str, request: PageRequest) -> Result<Page<ticket::Model>> {
        let mut select = TicketEntity::find();
        if let Some(condition) = search_condition(
            term,
            &[
                ticket::Column::TicketNo,
                ticket::Column::BookRef,
                ticket::Column::PassengerId,
                ticket::Column::PassengerName,
            ],
        ) {
            select = select.filter(condition);
        }
        fetch_page(
            select.order_by_asc(ticket::Column::TicketNo),
            request,
            &self.conn,
        )
        .await
    }

    /// Tickets issued under one booking.
    pub async fn by_booking(
        &self,
        book_ref: &str,
        request: PageRequest,
    ) -> Result<Page<ticket::Model>> {
        let select = TicketEntity::find()
            .filter(ticket::Column::BookRef.eq(book_ref.trim().to_uppercase()))
            .order_by_asc(ticket::Column::TicketNo);
        fetch_page(select, request, &self.conn).await
    }

    pub async fn count_by_booking(&self, book_ref: &str) -> Result<u64> {
        Ok(TicketEntity::find()
            .filter(ticket::Column::BookRef.eq(book_ref.trim().to_uppercase()))
            .count(&self.conn)
            .await?)
    }
}
