//! Catalog repository: categories and products.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use techhub_core::{CategoryId, ProductId, discounted_price};

use super::RepositoryError;
use crate::models::{Category, CategoryInput, CategoryWithCount, Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, product_name, description, category_id, price, old_price, \
     discount, brand, model, specifications, in_stock, total_sold, images, rating, review_count, \
     created_at, updated_at";

/// Default page size for product listings.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Filters and pagination for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: ProductSort,
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Allow-listed sort orders for product listings.
///
/// Parsed from the wire form the SPA sends (`-createdAt`, `price`, ...); a
/// leading `-` means descending. Unknown keys fall back to newest-first
/// rather than erroring, and the column list is closed so the sort parameter
/// can never reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    /// Parse the wire form; anything unrecognized is newest-first.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "createdAt" => Self::CreatedAsc,
            "price" => Self::PriceAsc,
            "-price" => Self::PriceDesc,
            "rating" => Self::RatingAsc,
            "-rating" => Self::RatingDesc,
            "productName" => Self::NameAsc,
            "-productName" => Self::NameDesc,
            _ => Self::CreatedDesc,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_at DESC",
            Self::CreatedAsc => "created_at ASC",
            Self::PriceAsc => "price ASC",
            Self::PriceDesc => "price DESC",
            Self::RatingAsc => "rating ASC",
            Self::RatingDesc => "rating DESC",
            Self::NameAsc => "product_name ASC",
            Self::NameDesc => "product_name DESC",
        }
    }
}

/// A page of products plus the numbers the pagination envelope needs.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_items: i64,
}

/// Repository for catalog records.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (category_name, images)
             VALUES ($1, $2)
             RETURNING id, category_name, images, created_at, updated_at",
        )
        .bind(&input.category_name)
        .bind(&input.images)
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// List all categories with their live product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.category_name, c.images, COUNT(p.id) AS product_count
             FROM categories c
             LEFT JOIN products p ON p.category_id = c.id
             GROUP BY c.id
             ORDER BY c.category_name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, category_name, images, created_at, updated_at
             FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Update a category. An empty image list keeps the stored images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such category exists.
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories
             SET category_name = $2,
                 images = CASE WHEN cardinality($3::text[]) > 0 THEN $3 ELSE images END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING id, category_name, images, created_at, updated_at",
        )
        .bind(id)
        .bind(&input.category_name)
        .bind(&input.images)
        .fetch_optional(self.pool)
        .await?;

        category.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such category exists, or
    /// `RepositoryError::Conflict` if products still reference it.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_fk_violation(e, "Category still has products")
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_categories(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product. The selling price is derived from the list price and
    /// discount here, at write time. Callers validate the category reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let (price, old_price) = discounted_price(input.price, input.discount);

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (product_name, description, category_id, price, old_price,
                 discount, brand, model, specifications, in_stock, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.product_name)
        .bind(input.description.as_deref())
        .bind(input.category)
        .bind(price)
        .bind(old_price)
        .bind(i32::try_from(input.discount).unwrap_or(i32::MAX))
        .bind(&input.brand)
        .bind(input.model.as_deref())
        .bind(sqlx::types::Json(&input.specifications))
        .bind(input.in_stock)
        .bind(&input.images)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// List products matching the query, with the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> Result<ProductPage, RepositoryError> {
        let limit = if query.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            query.limit
        };
        let page = query.page.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filters(&mut count_builder, query);
        let total_items: i64 = count_builder
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filters(&mut builder, query);
        builder.push(" ORDER BY ");
        builder.push(query.sort.order_clause());
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(limit));
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(ProductPage {
            products,
            total_items,
        })
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product, re-deriving the selling price. An empty image list
    /// keeps the stored images. Callers validate the category reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let (price, old_price) = discounted_price(input.price, input.discount);

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products
             SET product_name = $2, description = $3, category_id = $4, price = $5,
                 old_price = $6, discount = $7, brand = $8, model = $9, specifications = $10,
                 in_stock = $11,
                 images = CASE WHEN cardinality($12::text[]) > 0 THEN $12 ELSE images END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.product_name)
        .bind(input.description.as_deref())
        .bind(input.category)
        .bind(price)
        .bind(old_price)
        .bind(i32::try_from(input.discount).unwrap_or(i32::MAX))
        .bind(&input.brand)
        .bind(input.model.as_deref())
        .bind(sqlx::types::Json(&input.specifications))
        .bind(input.in_stock)
        .bind(&input.images)
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists, or
    /// `RepositoryError::Conflict` if existing orders reference it.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_fk_violation(e, "Product has existing orders")
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

/// Append the listing filters to a query. Shared between the page query and
/// the count query so they can never disagree.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductListQuery) {
    builder.push(" WHERE TRUE");

    if let Some(category) = query.category {
        builder.push(" AND category_id = ");
        builder.push_bind(category);
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        builder.push(" AND (product_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR brand ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR model ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(min_price) = query.min_price {
        builder.push(" AND price >= ");
        builder.push_bind(min_price);
    }

    if let Some(max_price) = query.max_price {
        builder.push(" AND price <= ");
        builder.push_bind(max_price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parses_wire_forms() {
        assert_eq!(ProductSort::parse("-createdAt"), ProductSort::CreatedDesc);
        assert_eq!(ProductSort::parse("createdAt"), ProductSort::CreatedAsc);
        assert_eq!(ProductSort::parse("price"), ProductSort::PriceAsc);
        assert_eq!(ProductSort::parse("-price"), ProductSort::PriceDesc);
        assert_eq!(ProductSort::parse("-rating"), ProductSort::RatingDesc);
        assert_eq!(ProductSort::parse("productName"), ProductSort::NameAsc);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_newest() {
        assert_eq!(
            ProductSort::parse("price; DROP TABLE products"),
            ProductSort::CreatedDesc
        );
        assert_eq!(ProductSort::parse(""), ProductSort::CreatedDesc);
    }

    #[test]
    fn test_order_clause_is_closed_set() {
        // Every variant maps to a fixed column expression; nothing user-supplied
        for sort in [
            ProductSort::CreatedDesc,
            ProductSort::CreatedAsc,
            ProductSort::PriceAsc,
            ProductSort::PriceDesc,
            ProductSort::RatingAsc,
            ProductSort::RatingDesc,
            ProductSort::NameAsc,
            ProductSort::NameDesc,
        ] {
            let clause = sort.order_clause();
            assert!(clause.ends_with("ASC") || clause.ends_with("DESC"));
        }
    }
}
