use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FilmActors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmActors::FilmId).integer().not_null())
                    .col(ColumnDef::new(FilmActors::ActorId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_film_actors")
                            .col(FilmActors::FilmId)
                            .col(FilmActors::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actors_film_id")
                            .from(FilmActors::Table, FilmActors::FilmId)
                            .to(Films::Table, Films::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actors_actor_id")
                            .from(FilmActors::Table, FilmActors::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookups (actor -> films) cannot use the composite primary key.
        manager
            .create_index(
                Index::create()
                    .name("idx_film_actors_actor_id")
                    .table(FilmActors::Table)
                    .col(FilmActors::ActorId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilmActors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FilmActors {
    Table,
    FilmId,
    ActorId,
}
