// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    api::{
        reviews::{self, NewReview},
        Executor as _,
    },
    classify::Context,
    error::Result,
    session::Session,
};

use super::{print_table, App};

fn parse_rating(value: &str) -> Result<f64, String> {
    let rating: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if (1.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(format!("ratings go from 1 to 5, got {rating}"))
    }
}

#[derive(Debug, Args)]
pub(crate) struct Fields {
    restaurant_id: u64,

    /// From 1 to 5.
    #[arg(value_parser = parse_rating)]
    rating: f64,

    /// What you thought of the visit.
    #[arg(default_value = "")]
    text: String,
}

impl Fields {
    fn into_review(self, session: &Session) -> NewReview {
        NewReview {
            user_id: session.user.id,
            restaurant_id: self.restaurant_id,
            rating: self.rating,
            review_text: self.text,
        }
    }
}

/// Read and write reviews.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Every review.
    List,
    /// Reviews of one restaurant.
    ForRestaurant { restaurant_id: u64 },
    /// Reviews you have written.
    Mine,
    /// Review a restaurant.
    Create(Fields),
    /// Rewrite one of your reviews.
    Update {
        review_id: u64,
        #[command(flatten)]
        fields: Fields,
    },
    /// Delete one of your reviews.
    Delete { review_id: u64 },
}

#[async_trait]
impl super::Command for Command {
    fn context(&self) -> Context {
        Context::Reviews
    }

    async fn execute(self, app: &App) -> Result<()> {
        let gateway = &app.gateway;
        match self {
            Self::List => print_table(reviews::GetAll.execute(gateway).await?, "No reviews"),
            Self::ForRestaurant { restaurant_id } => print_table(
                reviews::ForRestaurant { restaurant_id }
                    .execute(gateway)
                    .await?,
                "No reviews yet",
            ),
            Self::Mine => {
                let session = gateway.require_session(Context::Reviews).await?;
                print_table(
                    reviews::ForUser {
                        user_id: session.user.id,
                    }
                    .execute(gateway)
                    .await?,
                    "You have not written any reviews",
                );
            }
            Self::Create(fields) => {
                let session = gateway.require_session(Context::Reviews).await?;
                let review = reviews::Create {
                    review: fields.into_review(&session),
                }
                .execute(gateway)
                .await?;
                print_table([review], "");
            }
            Self::Update { review_id, fields } => {
                let session = gateway.require_session(Context::Reviews).await?;
                let review = reviews::Update {
                    review_id,
                    review: fields.into_review(&session),
                }
                .execute(gateway)
                .await?;
                print_table([review], "");
            }
            Self::Delete { review_id } => {
                let _ = gateway.require_session(Context::Reviews).await?;
                reviews::Delete { review_id }.execute(gateway).await?;
                println!("Deleted review {review_id}");
            }
        }
        Ok(())
    }
}
