use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::airport::{self, ActiveModel as AirportActiveModel, Entity as AirportEntity};
use crate::error::{Result, StoreError};
use crate::pagination::{fetch_page, search_condition, Page, PageRequest};
use crate::validate;
use crate::value::LocalizedText;

/// Values for a new airport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAirport {
    pub airport_code: String,
    pub airport_name: LocalizedText,
    pub city: LocalizedText,
    pub longitude: f64,
    pub latitude: f64,
    pub timezone: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AirportUpdate {
    pub airport_name: Option<LocalizedText>,
    pub city: Option<LocalizedText>,
    /// `(longitude, latitude)` in degrees.
    pub coordinates: Option<(f64, f64)>,
    pub timezone: Option<String>,
}

/// CRUD and search over `airports_data`.
#[derive(Debug, Clone)]
pub struct AirportService {
    conn: DatabaseConnection,
}

impl AirportService {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a new airport after checking the code, the coordinates and
    /// the time zone.
    pub async fn create(&self, new: NewAirport) -> Result<airport::Model> {
        let code = validate::code("airport code", &new.airport_code, 3)?;
        let (longitude, latitude) = validate::coordinates(new.longitude, new.latitude)?;
        let timezone = validate::non_blank("timezone", &new.timezone)?;

        let txn = self.conn.begin().await?;

        if AirportEntity::find_by_id(code.clone()).one(&txn).await?.is_some() {
            return Err(StoreError::conflict(format!("airport {code} already exists")));
        }

        let model = AirportActiveModel {
            airport_code: Set(code),
            airport_name: Set(new.airport_name),
            city: Set(new.city),
            longitude: Set(longitude),
            latitude: Set(latitude),
            timezone: Set(timezone),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(airport_code = %model.airport_code, "airport created");
        Ok(model)
    }

    pub async fn get(&self, airport_code: &str) -> Result<Option<airport::Model>> {
        let Ok(code) = validate::code("airport code", airport_code, 3) else {
            return Ok(None);
        };
        Ok(AirportEntity::find_by_id(code).one(&self.conn).await?)
    }

    pub async fn exists(&self, airport_code: &str) -> Result<bool> {
        Ok(self.get(airport_code).await?.is_some())
    }

    pub async fn update(
        &self,
        airport_code: &str,
        changes: AirportUpdate,
    ) -> Result<Option<airport::Model>> {
        let Some(existing) = self.get(airport_code).await? else {
            return Ok(None);
        };

        let mut active_model = existing.clone().into_active_model();
        if let Some(name) = changes.airport_name {
            active_model.airport_name = Set(name);
        }
        if let Some(city) = changes.city {
            active_model.city = Set(city);
        }
        if let Some((longitude, latitude)) = changes.coordinates {
            let (longitude, latitude) = validate::coordinates(longitude, latitude)?;
            active_model.longitude = Set(longitude);
            active_model.latitude = Set(latitude);
        }
        if let Some(timezone) = changes.timezone {
            active_model.timezone = Set(validate::non_blank("timezone", &timezone)?);
        }
        if !active_model.is_changed() {
            return Ok(Some(existing));
        }

        let updated = active_model.update(&self.conn).await?;
        tracing::info!(airport_code = %updated.airport_code, "airport updated");
        Ok(Some(updated))
    }

    /// Returns `false` when no airport has this code. Airports still used by
    /// flights are protected by the foreign keys and yield
    /// [`StoreError::Conflict`].
    pub async fn delete(&self, airport_code: &str) -> Result<bool> {
        let Ok(code) = validate::code("airport code", airport_code, 3) else {
            return Ok(false);
        };
        let res = AirportEntity::delete_by_id(code.clone())
            .exec(&self.conn)
            .await?;
        if res.rows_affected > 0 {
            tracing::info!(airport_code = %code, "airport deleted");
        }
        Ok(res.rows_affected > 0)
    }

    /// Airports whose code contains `term`, ordered by code.
    pub async fn search(&self, term: &str, request: PageRequest) -> Result<Page<airport::Model>> {
        let mut select = AirportEntity::find();
        if let Some(condition) = search_condition(term, &[airport::Column::AirportCode]) {
            select = select.filter(condition);
        }
        fetch_page(
            select.order_by_asc(airport::Column::AirportCode),
            request,
            &self.conn,
        )
        .await
    }
}
