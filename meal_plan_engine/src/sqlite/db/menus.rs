use chrono::{NaiveDate, Utc};
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{MealType, Menu, NewMenu};

pub async fn insert_menu(menu: NewMenu, conn: &mut SqliteConnection) -> Result<Menu, sqlx::Error> {
    let menu: Menu = sqlx::query_as(
        r#"
            INSERT INTO menus (menu_type, menu_date, menu_items, rate_per_meal, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(menu.menu_type)
    .bind(menu.menu_date)
    .bind(Json(menu.menu_items))
    .bind(menu.rate_per_meal)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Menu #{} saved for {} {}", menu.id, menu.menu_date, menu.menu_type);
    Ok(menu)
}

/// Returns the most recently created menu for the date and meal slot.
pub async fn fetch_latest_menu(
    date: NaiveDate,
    meal_type: MealType,
    conn: &mut SqliteConnection,
) -> Result<Option<Menu>, sqlx::Error> {
    let menu = sqlx::query_as(
        r#"
            SELECT * FROM menus
            WHERE menu_date = $1 AND menu_type = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        "#,
    )
    .bind(date)
    .bind(meal_type)
    .fetch_optional(conn)
    .await?;
    Ok(menu)
}
