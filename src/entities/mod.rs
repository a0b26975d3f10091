pub mod session_entry;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::entities::session_entry::Entity as SessionEntry;

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_session_table = schema.create_table_from_entity(SessionEntry);
    create_session_table.if_not_exists();

    db.execute(backend.build(&create_session_table)).await?;
    Ok(())
}
