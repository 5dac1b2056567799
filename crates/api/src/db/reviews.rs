//! Review repository.
//!
//! Every mutation (add, update, delete) recomputes the owning product's
//! rating aggregate from scratch: load all ratings, average, write back. At
//! this catalog's scale the O(n) recompute is simpler than maintaining the
//! aggregate incrementally and cannot drift.

use sqlx::PgPool;

use techhub_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::{MyReviewView, Review, ReviewView};

const REVIEW_COLUMNS: &str = "id, user_id, product_id, rating, review_text, created_at, updated_at";

/// Repository for review records.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a review and refresh the product aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i32,
        review_text: &str,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (user_id, product_id, rating, review_text)
             VALUES ($1, $2, $3, $4)
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(rating)
        .bind(review_text)
        .fetch_one(self.pool)
        .await?;

        self.recompute_product_rating(product_id).await?;

        Ok(review)
    }

    /// Update a review, scoped to its owner, and refresh the aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist or
    /// does not belong to `user_id` (the two are indistinguishable on
    /// purpose).
    pub async fn update(
        &self,
        review_id: ReviewId,
        user_id: UserId,
        rating: i32,
        review_text: &str,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET rating = $3, review_text = $4, updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(review_id)
        .bind(user_id)
        .bind(rating)
        .bind(review_text)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.recompute_product_rating(review.product_id).await?;

        Ok(review)
    }

    /// Delete a review, scoped to its owner, and refresh the aggregate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist or
    /// does not belong to `user_id`.
    pub async fn delete(&self, review_id: ReviewId, user_id: UserId) -> Result<(), RepositoryError> {
        let product_id = sqlx::query_scalar::<_, i32>(
            "DELETE FROM reviews WHERE id = $1 AND user_id = $2 RETURNING product_id",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.recompute_product_rating(ProductId::new(product_id)).await?;

        Ok(())
    }

    /// Reviews for a product with reviewer details, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewView>(
            "SELECT r.id, r.rating, r.review_text,
                    u.name AS reviewer_name, u.email AS reviewer_email,
                    r.created_at, r.updated_at
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.product_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// A user's reviews with product details, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<MyReviewView>, RepositoryError> {
        let reviews = sqlx::query_as::<_, MyReviewView>(
            "SELECT r.id, r.product_id, p.product_name, p.price, r.rating, r.review_text,
                    r.created_at, r.updated_at
             FROM reviews r
             JOIN products p ON p.id = r.product_id
             WHERE r.user_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Recompute a product's rating aggregate from its current reviews.
    ///
    /// The average is rounded to one decimal place; a product with no
    /// remaining reviews drops back to 0 / 0.
    async fn recompute_product_rating(&self, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE products SET
                 rating = COALESCE(
                     (SELECT ROUND(AVG(rating)::numeric, 1) FROM reviews WHERE product_id = $1),
                     0),
                 review_count = (SELECT COUNT(*) FROM reviews WHERE product_id = $1)
             WHERE id = $1",
        )
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
