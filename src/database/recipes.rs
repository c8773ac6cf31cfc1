// ABOUTME: Recipe content database operations: recipes, shared ingredients, and images
// ABOUTME: Multi-row writes run in one transaction so failures leave no partial recipe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Error as SqlxError, QueryBuilder, Row, Sqlite, SqliteConnection};

use super::errors::{database_error, is_foreign_key_violation};
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::filters::{fold_case, RecipeFilter};
use crate::models::{
    Difficulty, Ingredient, IngredientInput, NewRecipe, Recipe, RecipeChanges, RecipeDetail,
    RecipeImage, RecipeSummary,
};
use crate::pagination::PageRequest;
use crate::permissions::Subject;

const RECIPE_COLUMNS: &str =
    "id, title, description, cook_time, difficulty, author_id, category_id, created_at";

const RECIPE_SUMMARY_SELECT: &str = r"
    SELECT r.id, r.title, r.cook_time, r.difficulty, r.author_id, u.username AS author_username,
           r.category_id, c.name AS category_name,
           (SELECT i.image FROM recipe_images i WHERE i.recipe_id = r.id ORDER BY i.id LIMIT 1) AS image,
           (SELECT COUNT(*) FROM liked_recipes l WHERE l.recipe_id = r.id) AS likes_count,
           (SELECT COUNT(*) FROM saved_recipes sv WHERE sv.recipe_id = r.id) AS saves_count
    FROM recipes r
    JOIN users u ON u.id = r.author_id
    JOIN categories c ON c.id = r.category_id
";

const RECIPE_COUNT_SELECT: &str = r"
    SELECT COUNT(*)
    FROM recipes r
    JOIN users u ON u.id = r.author_id
    JOIN categories c ON c.id = r.category_id
";

/// Map a category foreign key failure to a 404
fn category_fk_error(action: &'static str) -> impl FnOnce(SqlxError) -> AppError {
    move |error| {
        if is_foreign_key_violation(&error) {
            AppError::not_found("Category")
        } else {
            database_error(action)(error)
        }
    }
}

impl Database {
    /// Create a recipe with its ordered ingredient list
    ///
    /// Recipe row, ingredient rows, and associations are written in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the category does not exist
    pub async fn create_recipe(&self, author_id: i64, recipe: &NewRecipe) -> AppResult<Recipe> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database_error("begin recipe transaction"))?;

        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO recipes (title, title_folded, description, cook_time, difficulty, author_id, category_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&recipe.title)
        .bind(fold_case(&recipe.title))
        .bind(&recipe.description)
        .bind(&recipe.cook_time)
        .bind(recipe.difficulty.as_str())
        .bind(author_id)
        .bind(recipe.category_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(category_fk_error("create recipe"))?;

        let recipe_id = result.last_insert_rowid();
        Self::link_ingredients(&mut *tx, recipe_id, &recipe.ingredients).await?;

        tx.commit()
            .await
            .map_err(database_error("commit recipe transaction"))?;

        Ok(Recipe {
            id: recipe_id,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            cook_time: recipe.cook_time.clone(),
            difficulty: recipe.difficulty,
            author_id,
            category_id: recipe.category_id,
            created_at,
        })
    }

    /// Apply a partial update; a supplied ingredient list replaces the
    /// whole association set
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe or the new category is missing
    pub async fn update_recipe(&self, recipe_id: i64, changes: &RecipeChanges) -> AppResult<Recipe> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database_error("begin recipe transaction"))?;

        let result = sqlx::query(
            r"
            UPDATE recipes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                cook_time = COALESCE($4, cook_time),
                difficulty = COALESCE($5, difficulty),
                category_id = COALESCE($6, category_id),
                title_folded = COALESCE($7, title_folded)
            WHERE id = $1
            ",
        )
        .bind(recipe_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.cook_time)
        .bind(changes.difficulty.map(|d| d.as_str()))
        .bind(changes.category_id)
        .bind(changes.title.as_deref().map(fold_case))
        .execute(&mut *tx)
        .await
        .map_err(category_fk_error("update recipe"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()));
        }

        if let Some(ingredients) = &changes.ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(database_error("clear recipe ingredients"))?;
            Self::link_ingredients(&mut *tx, recipe_id, ingredients).await?;
        }

        let query = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(recipe_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error("reload recipe"))?;
        let recipe = Self::row_to_recipe(&row)?;

        tx.commit()
            .await
            .map_err(database_error("commit recipe transaction"))?;
        Ok(recipe)
    }

    /// Delete a recipe; associations, images, likes, and saves cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete recipe"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a recipe's scalar fields
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let query = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get recipe"))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Check whether a recipe exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recipe_exists(&self, recipe_id: i64) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1)")
                .bind(recipe_id)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error("check recipe"))?;
        Ok(exists)
    }

    /// Get a recipe with author, category, ingredients, images, and live counts
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get_recipe_detail(&self, recipe_id: i64) -> AppResult<Option<RecipeDetail>> {
        let row = sqlx::query(
            r"
            SELECT r.id, r.title, r.description, r.cook_time, r.difficulty, r.author_id,
                   r.category_id, r.created_at,
                   u.username AS author_username, c.name AS category_name,
                   (SELECT COUNT(*) FROM liked_recipes l WHERE l.recipe_id = r.id) AS likes_count,
                   (SELECT COUNT(*) FROM saved_recipes sv WHERE sv.recipe_id = r.id) AS saves_count
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            JOIN categories c ON c.id = r.category_id
            WHERE r.id = $1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("get recipe detail"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(RecipeDetail {
            recipe: Self::row_to_recipe(&row)?,
            author_username: row.get("author_username"),
            category_name: row.get("category_name"),
            ingredients: self.list_recipe_ingredients(recipe_id).await?,
            images: self.list_recipe_images(recipe_id).await?,
            likes_count: row.get("likes_count"),
            saves_count: row.get("saves_count"),
        }))
    }

    /// List a recipe's ingredients in recipe order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipe_ingredients(&self, recipe_id: i64) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.name, i.quantity, i.unit
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.position
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list recipe ingredients"))?;

        Ok(rows
            .iter()
            .map(|r| Ingredient {
                id: r.get("id"),
                name: r.get("name"),
                quantity: r.get("quantity"),
                unit: r.get("unit"),
            })
            .collect())
    }

    /// List recipes matching a filter, ordered by id
    ///
    /// Returns the page of summaries and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        subject: Option<&Subject>,
        page: PageRequest,
    ) -> AppResult<(Vec<RecipeSummary>, i64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new(RECIPE_COUNT_SELECT);
        count_query.push(" WHERE 1 = 1");
        filter.push_predicates(&mut count_query, subject);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("count recipes"))?;

        let mut list_query = QueryBuilder::<Sqlite>::new(RECIPE_SUMMARY_SELECT);
        list_query.push(" WHERE 1 = 1");
        filter.push_predicates(&mut list_query, subject);
        list_query
            .push(" ORDER BY r.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list recipes"))?;

        let recipes = rows
            .iter()
            .map(Self::row_to_recipe_summary)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((recipes, total))
    }

    /// Attach an image reference to a recipe
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist
    pub async fn add_recipe_image(&self, recipe_id: i64, image: &str) -> AppResult<RecipeImage> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO recipe_images (recipe_id, image, created_at) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(image)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("Recipe").with_resource_id(recipe_id.to_string())
            } else {
                database_error("add recipe image")(e)
            }
        })?;

        Ok(RecipeImage {
            id: result.last_insert_rowid(),
            recipe_id,
            image: image.to_owned(),
            created_at,
        })
    }

    /// Get an image by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_recipe_image(&self, image_id: i64) -> AppResult<Option<RecipeImage>> {
        let row = sqlx::query(
            "SELECT id, recipe_id, image, created_at FROM recipe_images WHERE id = $1",
        )
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("get recipe image"))?;

        Ok(row.map(|r| Self::row_to_image(&r)))
    }

    /// List a recipe's images in upload order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_recipe_images(&self, recipe_id: i64) -> AppResult<Vec<RecipeImage>> {
        let rows = sqlx::query(
            "SELECT id, recipe_id, image, created_at FROM recipe_images WHERE recipe_id = $1 ORDER BY id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error("list recipe images"))?;

        Ok(rows.iter().map(Self::row_to_image).collect())
    }

    /// Delete an image
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails
    pub async fn delete_recipe_image(&self, image_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipe_images WHERE id = $1")
            .bind(image_id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete recipe image"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Link ingredients to a recipe in the given order
    async fn link_ingredients(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        ingredients: &[IngredientInput],
    ) -> AppResult<()> {
        for (position, ingredient) in ingredients.iter().enumerate() {
            let ingredient_id = Self::get_or_create_ingredient(conn, ingredient).await?;
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, position) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .execute(&mut *conn)
            .await
            .map_err(database_error("link ingredient"))?;
        }
        Ok(())
    }

    /// Find the ingredient row with the same `(name, quantity, unit)` or insert it
    async fn get_or_create_ingredient(
        conn: &mut SqliteConnection,
        ingredient: &IngredientInput,
    ) -> AppResult<i64> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM ingredients WHERE name = $1 AND quantity = $2 AND unit = $3 ORDER BY id LIMIT 1",
        )
        .bind(&ingredient.name)
        .bind(ingredient.quantity)
        .bind(&ingredient.unit)
        .fetch_optional(&mut *conn)
        .await
        .map_err(database_error("find ingredient"))?;

        if let Some(id) = existing {
            return Ok(id);
        }

        let result =
            sqlx::query("INSERT INTO ingredients (name, quantity, unit) VALUES ($1, $2, $3)")
                .bind(&ingredient.name)
                .bind(ingredient.quantity)
                .bind(&ingredient.unit)
                .execute(&mut *conn)
                .await
                .map_err(database_error("create ingredient"))?;
        Ok(result.last_insert_rowid())
    }

    fn parse_difficulty(row: &SqliteRow) -> AppResult<Difficulty> {
        let difficulty: String = row.get("difficulty");
        difficulty
            .parse()
            .map_err(|e: AppError| AppError::database(e.message))
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        Ok(Recipe {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            cook_time: row.get("cook_time"),
            difficulty: Self::parse_difficulty(row)?,
            author_id: row.get("author_id"),
            category_id: row.get("category_id"),
            created_at: row.get("created_at"),
        })
    }

    fn row_to_recipe_summary(row: &SqliteRow) -> AppResult<RecipeSummary> {
        Ok(RecipeSummary {
            id: row.get("id"),
            title: row.get("title"),
            cook_time: row.get("cook_time"),
            difficulty: Self::parse_difficulty(row)?,
            author_id: row.get("author_id"),
            author_username: row.get("author_username"),
            category_id: row.get("category_id"),
            category_name: row.get("category_name"),
            image: row.get("image"),
            likes_count: row.get("likes_count"),
            saves_count: row.get("saves_count"),
        })
    }

    fn row_to_image(row: &SqliteRow) -> RecipeImage {
        RecipeImage {
            id: row.get("id"),
            recipe_id: row.get("recipe_id"),
            image: row.get("image"),
            created_at: row.get("created_at"),
        }
    }
}
