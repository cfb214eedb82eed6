use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter, QueryOrder, Select,
};
use std::marker::PhantomData;
use std::str::FromStr;

/// Generic repository that works with any SeaORM entity.
///
/// Every call takes the connection explicitly, so the same code runs against a
/// `DatabaseConnection` or inside a caller-owned `DatabaseTransaction`.
pub struct Repository<E, C>
where
    E: EntityTrait,
    C: ColumnTrait + FromStr + 'static,
{
    _phantom: PhantomData<(E, C)>,
}

impl<E, C> Repository<E, C>
where
    E: EntityTrait,
    E::Model: Sync + Send + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: ColumnTrait + FromStr + 'static,
    C::Err: std::fmt::Display,
{
    /// Applies a `"field,-field"` sort specification. Unknown columns are skipped.
    pub fn apply_sorting(mut query: Select<E>, sort_by: Option<&str>) -> Select<E> {
        let Some(sort_param) = sort_by else {
            return query;
        };

        for sort in sort_param.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (field, asc) = match sort.strip_prefix('-') {
                Some(field) => (field, false),
                None => (sort, true),
            };

            match C::from_str(field) {
                Ok(column) if asc => query = query.order_by_asc(column),
                Ok(column) => query = query.order_by_desc(column),
                Err(e) => log::debug!("Ignoring sort on unknown column '{}': {}", field, e),
            }
        }

        query
    }

    pub async fn create<Conn>(db: &Conn, active_model: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        Conn: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    /// Deletes every row matching `condition` and returns how many went.
    ///
    /// An empty condition is refused rather than wiping the table.
    pub async fn delete<Conn>(db: &Conn, condition: Condition) -> Result<u64, DbErr>
    where
        Conn: ConnectionTrait,
    {
        if condition.is_empty() {
            return Err(DbErr::Custom(
                "Refusing to delete without a condition.".to_string(),
            ));
        }

        let res = E::delete_many().filter(condition).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn find_by_id<Conn>(
        db: &Conn,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr>
    where
        Conn: ConnectionTrait,
    {
        E::find_by_id(id).one(db).await
    }

    pub async fn find_one<Conn>(
        db: &Conn,
        condition: Condition,
        sort_by: Option<&str>,
    ) -> Result<Option<E::Model>, DbErr>
    where
        Conn: ConnectionTrait,
    {
        let query = Self::apply_sorting(E::find().filter(condition), sort_by);
        query.one(db).await
    }

    pub async fn find_all<Conn>(
        db: &Conn,
        condition: Condition,
        sort_by: Option<&str>,
    ) -> Result<Vec<E::Model>, DbErr>
    where
        Conn: ConnectionTrait,
    {
        let query = Self::apply_sorting(E::find().filter(condition), sort_by);
        query.all(db).await
    }
}
