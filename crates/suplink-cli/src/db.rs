//! `db` subcommand handlers.

use suplink_core::AppConfig;

pub(crate) async fn run_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = suplink_db::connect_pool_from_config(config).await?;
    suplink_db::ping(&pool).await?;
    println!("database reachable");
    Ok(())
}

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = suplink_db::connect_pool_from_config(config).await?;
    let applied = suplink_db::run_migrations(&pool).await?;
    if applied == 0 {
        println!("migrations already up to date");
    } else {
        println!("applied {applied} migration(s)");
    }
    Ok(())
}
