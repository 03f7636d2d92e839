use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::MenuEntry;
use crate::domain::ports::MenuRepository;
use crate::schema::menus;

use super::models::MenuRow;

/// Read-only access to the menu catalog.
pub struct DieselMenuRepository {
    pool: DbPool,
}

impl DieselMenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl MenuRepository for DieselMenuRepository {
    fn list_active(&self) -> Result<Vec<MenuEntry>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(menus::table
            .filter(menus::is_active.eq(true))
            .select(MenuRow::as_select())
            .order(menus::name.asc())
            .load(&mut conn)?
            .into_iter()
            .map(MenuEntry::from)
            .collect())
    }

    fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<MenuEntry>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(menus::table
            .filter(menus::id.eq_any(ids.to_vec()))
            .select(MenuRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(MenuEntry::from)
            .collect())
    }
}
