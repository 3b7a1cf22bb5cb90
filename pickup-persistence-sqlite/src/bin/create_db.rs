use pickup_persistence_sqlite::{create_db_pool, init_schema};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("PICKUP_DB").expect("PICKUP_DB env var not set");

    let pool = create_db_pool(&db_path)
        .await
        .expect("Failed to create pool");

    init_schema(&pool)
        .await
        .expect("Failed to create database tables");

    pool.close().await;
    println!("Created database tables in {}", db_path);
}
