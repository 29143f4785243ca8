//! Database seeder for Bankd development and testing.
//!
//! Seeds a staff user, a demo customer, and one demo account so a fresh
//! environment is usable immediately.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use bankd_core::auth::hash_password;
use bankd_db::entities::{
    accounts,
    sea_orm_active_enums::{AccountStatus, AccountType, UserRole},
    users,
};

/// Staff user ID (consistent for all seeds)
const STAFF_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo customer ID (consistent for all seeds)
const CUSTOMER_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo account ID (consistent for all seeds)
const DEMO_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = bankd_db::connect(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    println!("Seeding staff user...");
    seed_user(
        &db,
        STAFF_USER_ID,
        "admin",
        "admin@bankd.dev",
        "admin123",
        "Bankd Admin",
        UserRole::Staff,
    )
    .await;

    println!("Seeding demo customer...");
    seed_user(
        &db,
        CUSTOMER_USER_ID,
        "demo",
        "demo@bankd.dev",
        "demo123",
        "Demo Customer",
        UserRole::Customer,
    )
    .await;

    println!("Seeding demo account...");
    seed_demo_account(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

/// Seeds a user with the given credentials, skipping if it already exists.
async fn seed_user(
    db: &DatabaseConnection,
    id: &str,
    username: &str,
    email: &str,
    password: &str,
    full_name: &str,
    role: UserRole,
) {
    if users::Entity::find_by_id(fixed_id(id))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  User {username} already exists, skipping...");
        return;
    }

    let password_hash = hash_password(password).expect("Failed to hash seed password");
    let now = Utc::now().into();
    let user = users::ActiveModel {
        id: Set(fixed_id(id)),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert user {username}: {e}");
    } else {
        println!("  Created user: {username} / {password}");
    }
}

/// Seeds one active zero-balance savings account for the demo customer.
async fn seed_demo_account(db: &DatabaseConnection) {
    if accounts::Entity::find_by_id(fixed_id(DEMO_ACCOUNT_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo account already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let account = accounts::ActiveModel {
        id: Set(fixed_id(DEMO_ACCOUNT_ID)),
        user_id: Set(fixed_id(CUSTOMER_USER_ID)),
        account_number: Set(bankd_core::account::generate_account_number()),
        account_holder_name: Set("Demo Customer".to_string()),
        email: Set("demo@bankd.dev".to_string()),
        phone: Set("555-0100".to_string()),
        account_type: Set(AccountType::Savings),
        balance: Set(Decimal::ZERO),
        status: Set(AccountStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = account.insert(db).await {
        eprintln!("Failed to insert demo account: {e}");
    } else {
        println!("  Created demo account");
    }
}
