use sea_orm_migration::prelude::*;

use folio_contact_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
