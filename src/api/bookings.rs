// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use clap::ValueEnum;
use inflector::Inflector as _;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{classify::Context, error, gateway::Request};

use super::{display_option, Executor};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum Status {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl Status {
    pub(crate) const fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Booking {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) user_id: Option<u64>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) restaurant_id: Option<u64>,
    #[serde(default)]
    #[tabled(rename = "Restaurant", display_with = "display_option")]
    pub(crate) restaurant_name: Option<String>,
    #[tabled(rename = "When")]
    pub(crate) booking_date_time: NaiveDateTime,
    #[tabled(rename = "Guests")]
    pub(crate) number_of_people: u32,
    #[serde(default)]
    #[tabled(rename = "Requests", display_with = "display_option")]
    pub(crate) special_requests: Option<String>,
    #[tabled(rename = "Status")]
    pub(crate) status: Status,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewBooking {
    pub(crate) user_id: u64,
    pub(crate) restaurant_id: u64,
    pub(crate) booking_date_time: NaiveDateTime,
    pub(crate) number_of_people: u32,
    pub(crate) special_requests: String,
}

pub(crate) struct GetAll;

impl From<GetAll> for Request {
    fn from(_: GetAll) -> Self {
        Self::get("/bookings").with_context(Context::Booking)
    }
}

impl Executor for GetAll {
    type Response = Vec<Booking>;
}

pub(crate) struct ForUser {
    pub(crate) user_id: u64,
}

impl From<ForUser> for Request {
    fn from(value: ForUser) -> Self {
        Self::get(format!("/bookings/user/{}", value.user_id)).with_context(Context::Booking)
    }
}

impl Executor for ForUser {
    type Response = Vec<Booking>;
}

pub(crate) struct ForRestaurant {
    pub(crate) restaurant_id: u64,
}

impl From<ForRestaurant> for Request {
    fn from(value: ForRestaurant) -> Self {
        Self::get(format!("/bookings/restaurant/{}", value.restaurant_id))
            .with_context(Context::Booking)
    }
}

impl Executor for ForRestaurant {
    type Response = Vec<Booking>;
}

pub(crate) struct Create {
    pub(crate) booking: NewBooking,
}

impl TryFrom<Create> for Request {
    type Error = error::Error;

    fn try_from(value: Create) -> Result<Self, Self::Error> {
        Ok(Self::post("/bookings")
            .with_json(&value.booking)?
            .with_context(Context::Booking))
    }
}

impl Executor for Create {
    type Response = Booking;
}

pub(crate) struct UpdateStatus {
    pub(crate) booking_id: u64,
    pub(crate) status: Status,
}

impl From<UpdateStatus> for Request {
    fn from(value: UpdateStatus) -> Self {
        Self::put(format!("/bookings/{}/status", value.booking_id))
            .with_query("status", value.status.as_wire())
            .with_context(Context::Booking)
    }
}

impl Executor for UpdateStatus {
    type Response = Booking;
}

pub(crate) struct Cancel {
    pub(crate) booking_id: u64,
}

impl From<Cancel> for Request {
    fn from(value: Cancel) -> Self {
        Self::delete(format!("/bookings/{}", value.booking_id)).with_context(Context::Booking)
    }
}

impl Executor for Cancel {
    type Response = ();
}

pub(crate) struct Availability {
    pub(crate) restaurant_id: u64,
    pub(crate) booking_date_time: NaiveDateTime,
}

impl From<Availability> for Request {
    fn from(value: Availability) -> Self {
        Self::get("/bookings/availability")
            .with_query("restaurantId", value.restaurant_id)
            .with_query(
                "bookingDateTime",
                value.booking_date_time.format("%Y-%m-%dT%H:%M:%S"),
            )
            .with_context(Context::Booking)
    }
}

impl Executor for Availability {
    type Response = bool;
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{
        bus::Bus,
        error::{Error, Result},
        gateway::{Config, Gateway, DEFAULT_TIMEOUT},
        session::Store,
        storage,
    };

    use super::*;

    fn evening() -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2025, 1, 31)
            .and_then(|date| date.and_hms_opt(19, 30, 0))
            .ok_or(Error::Command)
    }

    async fn gateway(server: &MockServer) -> Result<Gateway> {
        Gateway::new(
            &Config {
                base_url: format!("{}/api", server.uri()).parse()?,
                timeout: DEFAULT_TIMEOUT,
            },
            Store::new(storage::Memory::new()),
            Bus::new(),
        )
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Confirmed.to_string(), "Confirmed");
        assert_eq!(Status::Cancelled.as_wire(), "CANCELLED");
    }

    #[tokio::test]
    async fn creates_bookings_with_iso_date_times() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .and(body_json(serde_json::json!({
                "userId": 2,
                "restaurantId": 7,
                "bookingDateTime": "2025-01-31T19:30:00",
                "numberOfPeople": 4,
                "specialRequests": "window seat",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 11,
                "userId": 2,
                "restaurantId": 7,
                "restaurantName": "Ministry of Crab",
                "bookingDateTime": "2025-01-31T19:30:00",
                "numberOfPeople": 4,
                "specialRequests": "window seat",
                "status": "CONFIRMED",
                "createdAt": "2025-01-20T08:00:00.123456",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let booking = Create {
            booking: NewBooking {
                user_id: 2,
                restaurant_id: 7,
                booking_date_time: evening()?,
                number_of_people: 4,
                special_requests: "window seat".to_owned(),
            },
        }
        .execute(&gateway(&server).await?)
        .await?;

        assert_eq!(booking.id, 11);
        assert_eq!(booking.status, Status::Confirmed);
        assert_eq!(booking.booking_date_time, evening()?);
        Ok(())
    }

    #[tokio::test]
    async fn checks_availability() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings/availability"))
            .and(query_param("restaurantId", "7"))
            .and(query_param("bookingDateTime", "2025-01-31T19:30:00"))
            .respond_with(ResponseTemplate::new(200).set_body_string("false"))
            .mount(&server)
            .await;

        let available = Availability {
            restaurant_id: 7,
            booking_date_time: evening()?,
        }
        .execute(&gateway(&server).await?)
        .await?;
        assert!(!available);
        Ok(())
    }

    #[tokio::test]
    async fn updates_status_through_the_query() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/bookings/11/status"))
            .and(query_param("status", "COMPLETED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 11,
                "bookingDateTime": "2025-01-31T19:30:00",
                "numberOfPeople": 4,
                "status": "COMPLETED",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let booking = UpdateStatus {
            booking_id: 11,
            status: Status::Completed,
        }
        .execute(&gateway(&server).await?)
        .await?;
        assert_eq!(booking.status, Status::Completed);
        assert_eq!(booking.restaurant_name, None);
        Ok(())
    }
}
