use crate::db::connect;
use crate::{cart, cart_item, category, product, user, user_credentials};
use sea_orm::{DatabaseConnection, EntityTrait, ActiveModelTrait, Set, QueryFilter, ColumnTrait};
use anyhow::Result;
use migration::MigratorTrait;
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;

    // Run migrations if needed
    migration::Migrator::up(&db, None).await?;

    Ok(db)
}

/// Test category CRUD operations
#[tokio::test]
async fn test_category_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    // Test Create
    let category_name = format!("test_category_{}", Uuid::new_v4());
    let created = category::create(&db, &category_name).await?;

    assert_eq!(created.name, category_name);

    println!("Created category: {:?}", created);

    // Test Read
    let found = category::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, category_name);

    // Test existence check
    assert!(category::exists(&db, created.id).await?);
    assert!(!category::exists(&db, i32::MAX).await?);

    // Test find by name
    let found_by_name = category::Entity::find()
        .filter(category::Column::Name.eq(category_name.clone()))
        .one(&db)
        .await?;
    assert!(found_by_name.is_some());
    assert_eq!(found_by_name.unwrap().id, created.id);

    // Test Delete
    category::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(!category::exists(&db, created.id).await?);

    println!("Category CRUD test completed successfully");
    Ok(())
}

/// Test product CRUD operations, including the category nullify policy
#[tokio::test]
async fn test_product_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    // Create a category first
    let category_name = format!("product_test_category_{}", Uuid::new_v4());
    let test_category = category::create(&db, &category_name).await?;

    // Test Create Product
    let title = format!("Test Shoe {}", Uuid::new_v4());
    let created = product::create(&db, product::NewProduct {
        title: title.clone(),
        price: 4999,
        old_price: Some(5999),
        description: "a test shoe".into(),
        image: None,
        rating: Some(4.5),
        category_id: Some(test_category.id),
    }).await?;

    assert_eq!(created.title, title);
    assert_eq!(created.price, 4999);
    assert_eq!(created.category_id, Some(test_category.id));
    assert_eq!(created.image_url(), "/static/images/products/default.jpg");

    println!("Created product: {:?}", created);

    // Test Read
    let found = product::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    let found = found.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.old_price, Some(5999));

    // Test Update
    let mut am: product::ActiveModel = found.into();
    am.image = Set(Some("shoe.jpg".into()));
    am.updated_at = Set(chrono::Utc::now().into());
    let updated = am.update(&db).await?;
    assert_eq!(updated.image_url(), "/static/images/products/shoe.jpg");

    // Deleting the category must nullify the product reference
    category::Entity::delete_by_id(test_category.id).exec(&db).await?;
    let orphaned = product::Entity::find_by_id(created.id).one(&db).await?.unwrap();
    assert_eq!(orphaned.category_id, None);

    // Test Delete
    product::Entity::delete_by_id(created.id).exec(&db).await?;
    let gone = product::Entity::find_by_id(created.id).one(&db).await?;
    assert!(gone.is_none());

    println!("Product CRUD test completed successfully");
    Ok(())
}

/// Test user CRUD operations
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    // Test Create User
    let username = format!("user_{}", Uuid::new_v4());
    let email = format!("test_{}@example.com", Uuid::new_v4());

    let created = user::create(&db, &username, &email, "Test User", user::ROLE_USER).await?;

    assert_eq!(created.username, username);
    assert_eq!(created.email, email);
    assert!(created.is_active);

    println!("Created user: {:?}", created);

    // Test Read
    let found = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().email, email);

    // Test find by email
    let found_by_email = user::find_by_email(&db, &email).await?;
    assert!(found_by_email.is_some());
    assert_eq!(found_by_email.unwrap().id, created.id);

    // Credentials upsert twice keeps a single row per user
    let cred = user_credentials::upsert_password(&db, created.id, "hash-one".into(), "argon2").await?;
    let cred2 = user_credentials::upsert_password(&db, created.id, "hash-two".into(), "argon2").await?;
    assert_eq!(cred.id, cred2.id);
    assert_eq!(cred2.password_hash, "hash-two");

    // Deleting the user cascades credentials
    user::Entity::delete_by_id(created.id).exec(&db).await?;
    let cred_after = user_credentials::find_by_user(&db, created.id).await?;
    assert!(cred_after.is_none());

    println!("User CRUD test completed successfully");
    Ok(())
}

/// Test cart CRUD operations and cascade behavior
#[tokio::test]
async fn test_cart_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    // Setup prerequisites
    let username = format!("cart_user_{}", Uuid::new_v4());
    let email = format!("cart_{}@example.com", Uuid::new_v4());
    let test_user = user::create(&db, &username, &email, "Cart User", user::ROLE_USER).await?;

    let test_product = product::create(&db, product::NewProduct {
        title: format!("Cart Product {}", Uuid::new_v4()),
        price: 1000,
        old_price: None,
        description: "for the cart".into(),
        image: None,
        rating: None,
        category_id: None,
    }).await?;

    // Test Create Cart with one item
    let cart_am = cart::ActiveModel {
        user_id: Set(test_user.id),
        total_amount: Set(3000),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    let created_cart = cart_am.insert(&db).await?;

    let item_am = cart_item::ActiveModel {
        cart_id: Set(created_cart.id),
        product_id: Set(test_product.id),
        quantity: Set(3),
        subtotal: Set(3000),
        ..Default::default()
    };
    let created_item = item_am.insert(&db).await?;

    assert_eq!(created_cart.user_id, test_user.id);
    assert_eq!(created_item.subtotal, 3000);

    println!("Created cart: {:?}", created_cart);

    // Test Read items by cart
    let items = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(created_cart.id))
        .all(&db)
        .await?;
    assert_eq!(items.len(), 1);

    // Deleting the cart cascades items
    cart::Entity::delete_by_id(created_cart.id).exec(&db).await?;
    let items_after = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(created_cart.id))
        .all(&db)
        .await?;
    assert!(items_after.is_empty());

    // Cleanup
    product::Entity::delete_by_id(test_product.id).exec(&db).await?;
    user::Entity::delete_by_id(test_user.id).exec(&db).await?;

    println!("Cart CRUD test completed successfully");
    Ok(())
}
