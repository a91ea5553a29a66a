pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_accounts_table;
mod m20250810_000002_create_categories_table;
mod m20250810_000003_create_locations_table;
mod m20250810_000004_create_posts_table;
mod m20250810_000005_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_accounts_table::Migration),
            Box::new(m20250810_000002_create_categories_table::Migration),
            Box::new(m20250810_000003_create_locations_table::Migration),
            Box::new(m20250810_000004_create_posts_table::Migration),
            Box::new(m20250810_000005_create_comments_table::Migration),
        ]
    }
}
