// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use core::num;

use async_trait::async_trait;
use clap::{Args, Subcommand};
use log::warn;

use crate::{
    api::{
        favorites,
        restaurants::{self, Restaurant},
        Executor as _,
    },
    classify::Context,
    error::Result,
};

use super::{print_table, App};

/// Fields of a restaurant record as given on the command line.
#[derive(Debug, Args)]
pub(crate) struct Fields {
    #[clap()]
    name: String,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    cuisine: Option<String>,

    /// From 1 (inexpensive) to 4 (fine dining).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    price_range: Option<u8>,

    #[arg(long)]
    phone_number: Option<String>,

    #[arg(long)]
    website: Option<String>,

    #[arg(long)]
    image_url: Option<String>,
}

impl From<Fields> for Restaurant {
    fn from(value: Fields) -> Self {
        Self {
            name: value.name,
            description: value.description,
            address: value.address,
            city: value.city,
            cuisine: value.cuisine,
            price_range: value.price_range,
            phone_number: value.phone_number,
            website: value.website,
            image_url: value.image_url,
            is_active: Some(true),
            ..Self::default()
        }
    }
}

/// Browse and manage restaurants.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List every restaurant.
    List {
        /// The number of restaurants to show.
        #[arg(short, long)]
        count: Option<num::NonZeroUsize>,
    },
    /// Show a single restaurant.
    Show { id: u64 },
    /// Search by free text, or by city, cuisine, and rating.
    Search {
        /// Free text to match against names and descriptions.
        #[clap()]
        query: Option<String>,

        #[arg(long, conflicts_with = "query")]
        city: Option<String>,

        #[arg(long, conflicts_with = "query")]
        cuisine: Option<String>,

        #[arg(long, conflicts_with = "query")]
        min_rating: Option<f64>,
    },
    /// The best rated restaurants.
    TopRated,
    /// The most booked restaurants.
    MostBooked,
    /// Add a restaurant. Requires an administrator account.
    Create(Fields),
    /// Replace a restaurant's details. Requires an administrator account.
    Update {
        id: u64,
        #[command(flatten)]
        fields: Fields,
    },
    /// Remove a restaurant. Requires an administrator account.
    Delete { id: u64 },
}

fn show(restaurants: Vec<Restaurant>, count: Option<num::NonZeroUsize>) {
    print_table(
        restaurants
            .into_iter()
            .take(count.map_or(usize::MAX, num::NonZeroUsize::get)),
        "No restaurants found",
    );
}

#[async_trait]
impl super::Command for Command {
    fn context(&self) -> Context {
        Context::Restaurants
    }

    async fn execute(self, app: &App) -> Result<()> {
        let gateway = &app.gateway;
        match self {
            Self::List { count } => show(restaurants::GetAll.execute(gateway).await?, count),
            Self::Show { id } => {
                let restaurant = restaurants::Get { id }.execute(gateway).await?;
                let favorite = match gateway.store().load().await {
                    Some(session) => favorites::IsFavorited {
                        user_id: session.user.id,
                        restaurant_id: id,
                    }
                    .execute(gateway)
                    .await
                    .unwrap_or_else(|e| {
                        warn!("We could not check your favorites: {}", e);
                        false
                    }),
                    None => false,
                };
                if let Some(ref description) = restaurant.description {
                    println!("{description}");
                }
                if favorite {
                    println!("One of your favorites");
                }
                print_table([restaurant], "");
            }
            Self::Search {
                query: Some(query),
                ..
            } => show(
                restaurants::SearchText { query }.execute(gateway).await?,
                None,
            ),
            Self::Search {
                query: None,
                city,
                cuisine,
                min_rating,
            } => show(
                restaurants::Search {
                    city,
                    cuisine,
                    min_rating,
                }
                .execute(gateway)
                .await?,
                None,
            ),
            Self::TopRated => show(restaurants::TopRated.execute(gateway).await?, None),
            Self::MostBooked => show(restaurants::MostBooked.execute(gateway).await?, None),
            Self::Create(fields) => {
                let _ = gateway.require_admin(Context::Restaurants).await?;
                let restaurant = restaurants::Create {
                    restaurant: fields.into(),
                }
                .execute(gateway)
                .await?;
                print_table([restaurant], "");
            }
            Self::Update { id, fields } => {
                let _ = gateway.require_admin(Context::Restaurants).await?;
                let restaurant = restaurants::Update {
                    id,
                    restaurant: fields.into(),
                }
                .execute(gateway)
                .await?;
                print_table([restaurant], "");
            }
            Self::Delete { id } => {
                let _ = gateway.require_admin(Context::Restaurants).await?;
                restaurants::Delete { id }.execute(gateway).await?;
                println!("Deleted restaurant {id}");
            }
        }
        Ok(())
    }
}
