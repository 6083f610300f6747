use storefront_db::schema;
use storefront_db::{Database, Record, StoreConfig, StoreError, Value};

fn open_temp() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::with_config(StoreConfig::with_path(dir.path().join("test.db"))).unwrap();
    (dir, db)
}

#[tokio::test]
async fn test_insert_assigns_increasing_ids_per_collection() {
    let (_dir, db) = open_temp();

    let a = db
        .insert(schema::USERS, Record::new().with("name", "Ana"))
        .await
        .unwrap();
    let b = db
        .insert(schema::USERS, Record::new().with("name", "Bo"))
        .await
        .unwrap();
    let p = db
        .insert(schema::PRODUCTS, Record::new().with("name", "Widget"))
        .await
        .unwrap();

    assert_eq!(a, 1);
    assert_eq!(b, 2);
    // Counters are per collection.
    assert_eq!(p, 1);
}

#[tokio::test]
async fn test_ids_are_never_reused_after_delete() {
    let (_dir, db) = open_temp();

    db.insert(schema::USERS, Record::new().with("name", "Ana"))
        .await
        .unwrap();
    let second = db
        .insert(schema::USERS, Record::new().with("name", "Bo"))
        .await
        .unwrap();
    db.delete(schema::USERS, second).await.unwrap();

    let third = db
        .insert(schema::USERS, Record::new().with("name", "Cy"))
        .await
        .unwrap();
    assert!(third > second);
}

#[tokio::test]
async fn test_get_returns_the_stored_record() {
    let (_dir, db) = open_temp();

    let id = db
        .insert(
            schema::USERS,
            Record::new().with("name", "Ana").with("email", "ana@x.com"),
        )
        .await
        .unwrap();

    let record = db.get(schema::USERS, id).await.unwrap().unwrap();
    assert_eq!(record.id, Some(id));
    assert_eq!(record.get("name"), Some(&Value::Str("Ana".to_string())));
    assert_eq!(record.get("email"), Some(&Value::Str("ana@x.com".to_string())));

    assert!(db.get(schema::USERS, 999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_replaces_all_fields_and_preserves_id() {
    let (_dir, db) = open_temp();

    let id = db
        .insert(
            schema::ORDERS,
            Record::new()
                .with("userId", 1i64)
                .with("productId", 1i64)
                .with("quantity", 3i64),
        )
        .await
        .unwrap();

    let mut replacement = Record::new()
        .with("userId", 1i64)
        .with("productId", 1i64)
        .with("quantity", 5i64);
    replacement.id = Some(id);
    db.update(schema::ORDERS, replacement).await.unwrap();

    let orders = db.get_all(schema::ORDERS).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, Some(id));
    assert_eq!(orders[0].get("quantity"), Some(&Value::Int(5)));
    assert_eq!(orders[0].get("userId"), Some(&Value::Int(1)));
    assert_eq!(orders[0].get("productId"), Some(&Value::Int(1)));
}

#[tokio::test]
async fn test_update_of_missing_id_creates_the_record() {
    let (_dir, db) = open_temp();

    let mut record = Record::new().with("name", "Ghost");
    record.id = Some(42);
    db.update(schema::USERS, record).await.unwrap();

    let stored = db.get(schema::USERS, 42).await.unwrap().unwrap();
    assert_eq!(stored.get("name"), Some(&Value::Str("Ghost".to_string())));
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let (_dir, db) = open_temp();

    let err = db
        .update(schema::USERS, Record::new().with("name", "Ana"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidOperation(_)));
}

#[tokio::test]
async fn test_delete_of_missing_id_is_a_noop() {
    let (_dir, db) = open_temp();

    db.insert(schema::USERS, Record::new().with("name", "Ana"))
        .await
        .unwrap();
    db.delete(schema::USERS, 999).await.unwrap();

    assert_eq!(db.get_all(schema::USERS).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_all_returns_inserts_minus_deletes() {
    let (_dir, db) = open_temp();

    let n = 5;
    for i in 0..n {
        db.insert(
            schema::PRODUCTS,
            Record::new().with("name", format!("p{}", i)).with("price", 1.5),
        )
        .await
        .unwrap();
    }
    db.delete(schema::PRODUCTS, 2).await.unwrap();
    db.delete(schema::PRODUCTS, 4).await.unwrap();

    let products = db.get_all(schema::PRODUCTS).await.unwrap();
    assert_eq!(products.len(), n - 2);
}

#[tokio::test]
async fn test_cursor_yields_records_in_id_order() {
    let (_dir, db) = open_temp();

    for name in ["Ana", "Bo", "Cy"] {
        db.insert(schema::USERS, Record::new().with("name", name))
            .await
            .unwrap();
    }

    let ids: Vec<u64> = db
        .scan(schema::USERS)
        .unwrap()
        .map(|item| item.unwrap().id.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let buffered = db.get_all(schema::USERS).await.unwrap();
    assert_eq!(buffered.len(), 3);
}

#[tokio::test]
async fn test_unknown_collection_is_a_typed_error() {
    let (_dir, db) = open_temp();

    let err = db.get_all("invoices").await.unwrap_err();
    assert!(matches!(err, StoreError::CollectionNotFound(_)));
}

#[tokio::test]
async fn test_find_by_index_follows_updates_and_deletes() {
    let (_dir, db) = open_temp();

    let first = db
        .insert(
            schema::ORDERS,
            Record::new()
                .with("userId", 1i64)
                .with("productId", 7i64)
                .with("quantity", 2i64),
        )
        .await
        .unwrap();
    let second = db
        .insert(
            schema::ORDERS,
            Record::new()
                .with("userId", 1i64)
                .with("productId", 8i64)
                .with("quantity", 1i64),
        )
        .await
        .unwrap();

    let by_user = db.find_by_index(schema::ORDERS, "userId", 1).await.unwrap();
    assert_eq!(by_user.len(), 2);

    // Repointing an order moves its index entry.
    let mut moved = Record::new()
        .with("userId", 2i64)
        .with("productId", 8i64)
        .with("quantity", 1i64);
    moved.id = Some(second);
    db.update(schema::ORDERS, moved).await.unwrap();

    let by_user = db.find_by_index(schema::ORDERS, "userId", 1).await.unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].id, Some(first));

    db.delete(schema::ORDERS, first).await.unwrap();
    let by_user = db.find_by_index(schema::ORDERS, "userId", 1).await.unwrap();
    assert!(by_user.is_empty());

    let by_product = db
        .find_by_index(schema::ORDERS, "productId", 8)
        .await
        .unwrap();
    assert_eq!(by_product.len(), 1);
}

#[tokio::test]
async fn test_unindexed_field_is_a_typed_error() {
    let (_dir, db) = open_temp();

    let err = db
        .find_by_index(schema::ORDERS, "quantity", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::IndexNotFound(_, _)));
}

#[tokio::test]
async fn test_concurrent_updates_keep_record_and_index_in_agreement() {
    let (_dir, db) = open_temp();
    let db = std::sync::Arc::new(db);

    let id = db
        .insert(
            schema::ORDERS,
            Record::new()
                .with("userId", 1i64)
                .with("productId", 1i64)
                .with("quantity", 1i64),
        )
        .await
        .unwrap();

    // Two tasks race full-record replaces that flip the indexed foreign
    // key between two values.
    let mut tasks = Vec::new();
    for user in [1i64, 2i64] {
        let db = db.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..25 {
                let mut replacement = Record::new()
                    .with("userId", user)
                    .with("productId", 1i64)
                    .with("quantity", 1i64);
                replacement.id = Some(id);
                db.update(schema::ORDERS, replacement).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Whichever replace committed last, exactly one index entry exists
    // and it points at the bucket the stored record names.
    let stored = db.get(schema::ORDERS, id).await.unwrap().unwrap();
    let one = db.find_by_index(schema::ORDERS, "userId", 1).await.unwrap();
    let two = db.find_by_index(schema::ORDERS, "userId", 2).await.unwrap();
    assert_eq!(one.len() + two.len(), 1);
    if stored.get("userId") == Some(&Value::Int(1)) {
        assert_eq!(one.len(), 1);
    } else {
        assert_eq!(stored.get("userId"), Some(&Value::Int(2)));
        assert_eq!(two.len(), 1);
    }
}

#[tokio::test]
async fn test_records_and_counters_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.db");

    {
        let db = Database::with_config(StoreConfig::with_path(&path)).unwrap();
        db.insert(schema::USERS, Record::new().with("name", "Ana"))
            .await
            .unwrap();
        db.flush().unwrap();
    }

    let db = Database::with_config(StoreConfig::with_path(&path)).unwrap();
    let users = db.get_all(schema::USERS).await.unwrap();
    assert_eq!(users.len(), 1);

    // Reopening does not restart the id sequence.
    let next = db
        .insert(schema::USERS, Record::new().with("name", "Bo"))
        .await
        .unwrap();
    assert_eq!(next, 2);
}
