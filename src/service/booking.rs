use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use sea_orm::{
    prelude::Decimal,
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::booking::{self, ActiveModel as BookingActiveModel, Entity as BookingEntity};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, search_condition, Page, PageRequest};
use crate::validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub book_ref: String,
    /// Defaults to the creation time when omitted.
    pub book_date: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub book_date: Option<DateTime<Utc>>,
    pub total_amount: Option<Decimal>,
}

/// Aggregates over all bookings. Amount fields are `None` when there are no
/// bookings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStatistics {
    pub total: u64,
    pub total_amount: Decimal,
    pub average_amount: Option<Decimal>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct BookingService {
    conn: DatabaseConnection,
}

impl BookingService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Records a booking made at `new.book_date`, or at `now` when no date
    /// is given.
    pub async fn create(&self, new: NewBooking, now: DateTime<Utc>) -> Result<booking::Model> {
        let book_ref = validate::book_ref(&new.book_ref)?;
        let total_amount = validate::positive_amount("total amount", new.total_amount)?;
        let book_date = validate::book_date(new.book_date.unwrap_or(now))?;

        let txn = self.conn.begin().await?;

        if BookingEntity::find_by_id(book_ref.clone()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("booking {book_ref} already exists")));
        }

        let model = BookingActiveModel {
            book_ref: Set(book_ref),
            book_date: Set(book_date),
            total_amount: Set(total_amount),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(book_ref = %model.book_ref, amount = %model.total_amount, "booking created");
        Ok(model)
    }

    pub async fn get(&self, book_ref: &str) -> Result<Option<booking::Model>> {
        let Ok(book_ref) = validate::book_ref(book_ref) else {
            return Ok(None);
        };
        Ok(BookingEntity::find_by_id(book_ref).one(&self.conn).await?)
    }

    pub async fn exists(&self, book_ref: &str) -> Result<bool> {
        Ok(self.get(book_ref).await?.is_some())
    }

    pub async fn update(
        &self,
        book_ref: &str,
        changes: BookingUpdate,
    ) -> Result<Option<booking::Model>> {
        let Some(existing) = self.get(book_ref).await? else {
            return Ok(None);
        };

        let mut active_model = existing.clone().into_active_model();
        if let Some(date) = changes.book_date {
            active_model.book_date = Set(validate::book_date(date)?);
        }
        if let Some(amount) = changes.total_amount {
            active_model.total_amount = Set(validate::positive_amount("total amount", amount)?);
        }
        if !active_model.is_changed() {
            return Ok(Some(existing));
        }

        let updated = active_model.update(&self.conn).await?;
        tracing::info!(book_ref = %updated.book_ref, "booking updated");
        Ok(Some(updated))
    }

    /// Deleting a booking that still has tickets fails with
    /// [`StoreError::Conflict`].
    pub async fn delete(&self, book_ref: &str) -> Result<bool> {
        let Ok(book_ref) = validate::book_ref(book_ref) else {
            return Ok(false);
        };
        let res = BookingEntity::delete_by_id(book_ref.clone())
            .exec(&self.conn)
            .await?;
        if res.rows_affected > 0 {
            tracing::info!(%book_ref, "booking deleted");
        }
        Ok(res.rows_affected > 0)
    }

    /// Bookings whose reference contains `term`, newest first.
    pub async fn search(&self, term: &str, request: PageRequest) -> Result<Page<booking::Model>> {
        let mut select = BookingEntity::find();
        if let Some(condition) = search_condition(term, &[booking::Column::BookRef]) {
            select = select.filter(condition);
        }
        let select = select
            .order_by_desc(booking::Column::BookDate)
            .order_by_asc(booking::Column::BookRef);
        fetch_page(select, request, &self.conn).await
    }

    /// Bookings made on `date` (UTC calendar day), earliest first.
    pub async fn by_date(
        &self,
        date: NaiveDate,
        request: PageRequest,
    ) -> Result<Page<booking::Model>> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let select = BookingEntity::find()
            .filter(booking::Column::BookDate.gte(start))
            .filter(booking::Column::BookDate.lt(start + TimeDelta::days(1)))
            .order_by_asc(booking::Column::BookDate)
            .order_by_asc(booking::Column::BookRef);
        fetch_page(select, request, &self.conn).await
    }

    /// Bookings made between `start` and `end`, both inclusive.
    pub async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        request: PageRequest,
    ) -> Result<Page<booking::Model>> {
        if end < start {
            return Err(StoreError::invalid("date range ends before it starts"));
        }
        let select = BookingEntity::find()
            .filter(booking::Column::BookDate.between(start, end))
            .order_by_asc(booking::Column::BookDate)
            .order_by_asc(booking::Column::BookRef);
        fetch_page(select, request, &self.conn).await
    }

    /// Bookings worth at least `min_amount`, most expensive first.
    pub async fn by_min_amount(
        &self,
        min_amount: Decimal,
        request: PageRequest,
    ) -> Result<Page<booking::Model>> {
        let select = BookingEntity::find()
            .filter(booking::Column::TotalAmount.gte(min_amount))
            .order_by_desc(booking::Column::TotalAmount)
            .order_by_asc(booking::Column::BookRef);
        fetch_page(select, request, &self.conn).await
    }

    pub async fn statistics(&self) -> Result<BookingStatistics> {
        type Row = (
            i64,
            Option<Decimal>,
            Option<Decimal>,
            Option<Decimal>,
            Option<Decimal>,
        );

        let amount = || Expr::col(booking::Column::TotalAmount.as_column_ref());
        let (total, total_amount, average_amount, min_amount, max_amount): Row =
            BookingEntity::find()
                .select_only()
                .column_as(booking::Column::BookRef.count(), "total")
                .column_as(booking::Column::TotalAmount.sum(), "total_amount")
                .column_as(SimpleExpr::from(Func::avg(amount())), "average_amount")
                .column_as(booking::Column::TotalAmount.min(), "min_amount")
                .column_as(booking::Column::TotalAmount.max(), "max_amount")
                .into_tuple()
                .one(&self.conn)
                .await?
                .unwrap_or_default();

        let earliest = BookingEntity::find()
            .order_by_asc(booking::Column::BookDate)
            .one(&self.conn)
            .await?;
        let latest = BookingEntity::find()
            .order_by_desc(booking::Column::BookDate)
            .one(&self.conn)
            .await?;

        Ok(BookingStatistics {
            total: total.max(0) as u64,
            total_amount: total_amount.unwrap_or_default().round_dp(2),
            average_amount: average_amount.map(|avg| avg.round_dp(2)),
            min_amount,
            max_amount,
            earliest: earliest.map(|b| b.book_date),
            latest: latest.map(|b| b.book_date),
        })
    }
}
