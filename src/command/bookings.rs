// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::NaiveDateTime;
use clap::Subcommand;

use crate::{
    api::{
        bookings::{self, NewBooking, Status},
        Executor as _,
    },
    classify::Context,
    error::Result,
};

use super::{print_table, App};

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn parse_date_time(value: &str) -> Result<NaiveDateTime, String> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("expected a date and time like 2025-01-31T19:30, got {value}"))
}

/// Make and manage reservations.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Book a table.
    Create {
        restaurant_id: u64,

        /// When, for example 2025-01-31T19:30.
        #[arg(value_parser = parse_date_time)]
        when: NaiveDateTime,

        /// The size of the party.
        #[arg(long, short = 'n', default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=20))]
        people: u32,

        #[arg(long, default_value = "")]
        special_requests: String,
    },
    /// Your own bookings.
    Mine,
    /// Every booking. Requires an administrator account.
    List,
    /// Bookings at one restaurant. Requires an administrator account.
    ForRestaurant { restaurant_id: u64 },
    /// Move a booking to a new status. Requires an administrator account.
    Status {
        booking_id: u64,
        #[arg(value_enum)]
        status: Status,
    },
    /// Cancel a booking.
    Cancel { booking_id: u64 },
    /// Check whether a restaurant can take a booking at a given time.
    Availability {
        restaurant_id: u64,
        #[arg(value_parser = parse_date_time)]
        when: NaiveDateTime,
    },
}

#[async_trait]
impl super::Command for Command {
    fn context(&self) -> Context {
        Context::Booking
    }

    async fn execute(self, app: &App) -> Result<()> {
        let gateway = &app.gateway;
        match self {
            Self::Create {
                restaurant_id,
                when,
                people,
                special_requests,
            } => {
                let session = gateway.require_session(Context::Booking).await?;
                let booking = bookings::Create {
                    booking: NewBooking {
                        user_id: session.user.id,
                        restaurant_id,
                        booking_date_time: when,
                        number_of_people: people,
                        special_requests,
                    },
                }
                .execute(gateway)
                .await?;
                print_table([booking], "");
            }
            Self::Mine => {
                let session = gateway.require_session(Context::Booking).await?;
                print_table(
                    bookings::ForUser {
                        user_id: session.user.id,
                    }
                    .execute(gateway)
                    .await?,
                    "You have no bookings",
                );
            }
            Self::List => {
                let _ = gateway.require_admin(Context::Booking).await?;
                print_table(bookings::GetAll.execute(gateway).await?, "No bookings");
            }
            Self::ForRestaurant { restaurant_id } => {
                let _ = gateway.require_admin(Context::Booking).await?;
                print_table(
                    bookings::ForRestaurant { restaurant_id }
                        .execute(gateway)
                        .await?,
                    "No bookings",
                );
            }
            Self::Status { booking_id, status } => {
                let _ = gateway.require_admin(Context::Booking).await?;
                let booking = bookings::UpdateStatus { booking_id, status }
                    .execute(gateway)
                    .await?;
                print_table([booking], "");
            }
            Self::Cancel { booking_id } => {
                let _ = gateway.require_session(Context::Booking).await?;
                bookings::Cancel { booking_id }.execute(gateway).await?;
                println!("Cancelled booking {booking_id}");
            }
            Self::Availability {
                restaurant_id,
                when,
            } => {
                let available = bookings::Availability {
                    restaurant_id,
                    booking_date_time: when,
                }
                .execute(gateway)
                .await?;
                if available {
                    println!("Available at {when}");
                } else {
                    println!("Fully booked at {when}");
                }
            }
        }
        Ok(())
    }
}
