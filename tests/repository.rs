use pushkind_catalog::domain::cart::NewCart;
use pushkind_catalog::domain::product::{
    NewProduct, PriceSort, ProductListQuery, UpdateProduct,
};
use pushkind_catalog::repository::errors::RepositoryError;
use pushkind_catalog::repository::{
    CartReader, CartWriter, DieselRepository, ProductReader, ProductWriter,
};

mod common;

fn seed_catalog(repo: &DieselRepository) {
    let products = [
        NewProduct::new("Cafe Latte")
            .with_description("Espresso with steamed milk")
            .with_price(4.5)
            .with_stock(10)
            .with_category("drinks"),
        NewProduct::new("Espresso")
            .with_description("Short and strong CAFE")
            .with_price(2.0)
            .with_stock(0)
            .with_category("drinks"),
        NewProduct::new("Croissant")
            .with_description("Butter pastry")
            .with_price(3.0)
            .with_stock(4)
            .with_category("bakery"),
        NewProduct::new("Mocha")
            .with_description("Chocolate and coffee")
            .with_price(5.5)
            .with_stock(2)
            .with_category("drinks"),
        NewProduct::new("Muffin")
            .with_description("Blueberry")
            .with_price(2.5)
            .with_stock(6)
            .with_category("bakery"),
    ];

    for product in &products {
        repo.create_product(product).expect("seed product");
    }
}

fn titles(items: &[pushkind_catalog::domain::product::Product]) -> Vec<&str> {
    items
        .iter()
        .map(|product| product.title.as_deref().unwrap_or_default())
        .collect()
}

#[test]
fn test_product_repository_crud() {
    let test_db = common::TestDb::new("test_product_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_product(
            &NewProduct::new("Latte")
                .with_price(4.5)
                .with_stock(10)
                .with_thumbnail("latte.png")
                .with_code("LAT-1"),
        )
        .unwrap();
    assert!(created.id > 0);

    let fetched = repo.get_product_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.title.as_deref(), Some("Latte"));
    assert_eq!(fetched.price, Some(4.5));
    assert_eq!(fetched.stock, Some(10));
    assert_eq!(fetched.thumbnails, vec!["latte.png"]);
    assert!(fetched.description.is_none());
    assert!(fetched.category.is_none());

    let updated = repo
        .update_product(created.id, &UpdateProduct::new().price(5.0).category("drinks"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price, Some(5.0));
    assert_eq!(updated.category.as_deref(), Some("drinks"));
    assert_eq!(updated.title.as_deref(), Some("Latte"));
    assert_eq!(updated.stock, Some(10));
    assert_eq!(updated.thumbnails, vec!["latte.png"]);
    assert_eq!(updated.code.as_deref(), Some("LAT-1"));

    let err = repo
        .update_product(created.id + 100, &UpdateProduct::new().stock(1))
        .expect_err("expected update of a missing product to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    repo.delete_product(created.id).unwrap();
    assert!(repo.get_product_by_id(created.id).unwrap().is_none());

    let (total, items) = repo.list_products(ProductListQuery::new()).unwrap();
    assert_eq!(total, 0);
    assert!(items.is_empty());

    let err = repo
        .delete_product(created.id)
        .expect_err("expected delete of a missing product to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_identifiers_are_not_reused() {
    let test_db = common::TestDb::new("test_identifiers_are_not_reused.db");
    let repo = DieselRepository::new(test_db.pool());

    let first = repo.create_product(&NewProduct::new("First")).unwrap();
    repo.delete_product(first.id).unwrap();
    let second = repo.create_product(&NewProduct::new("Second")).unwrap();

    assert!(second.id > first.id);
}

#[test]
fn test_list_products_search_is_case_insensitive() {
    let test_db = common::TestDb::new("test_list_products_search.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_catalog(&repo);

    let (total, items) = repo
        .list_products(ProductListQuery::new().search("cafe"))
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(titles(&items), vec!["Cafe Latte", "Espresso"]);
}

#[test]
fn test_list_products_filters_category_and_availability() {
    let test_db = common::TestDb::new("test_list_products_filters.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_catalog(&repo);

    let (total, items) = repo
        .list_products(ProductListQuery::new().category("drinks"))
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(titles(&items), vec!["Cafe Latte", "Espresso", "Mocha"]);

    let (total, items) = repo
        .list_products(ProductListQuery::new().category("drinks").available_only())
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(titles(&items), vec!["Cafe Latte", "Mocha"]);

    let (total, _) = repo
        .list_products(ProductListQuery::new().category("Drinks"))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_list_products_sorts_and_paginates() {
    let test_db = common::TestDb::new("test_list_products_sorts.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_catalog(&repo);

    let (total, items) = repo
        .list_products(
            ProductListQuery::new()
                .sort_by_price(PriceSort::Desc)
                .paginate(1, 2),
        )
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(titles(&items), vec!["Mocha", "Cafe Latte"]);

    let (total, items) = repo
        .list_products(
            ProductListQuery::new()
                .sort_by_price(PriceSort::Asc)
                .paginate(2, 2),
        )
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(titles(&items), vec!["Croissant", "Cafe Latte"]);

    let (total, items) = repo
        .list_products(ProductListQuery::new().paginate(3, 2))
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(titles(&items), vec!["Muffin"]);
}

#[test]
fn test_cart_repository_tracks_total() {
    let test_db = common::TestDb::new("test_cart_repository_tracks_total.db");
    let repo = DieselRepository::new(test_db.pool());

    let latte = repo
        .create_product(&NewProduct::new("Latte").with_price(4.5))
        .unwrap();
    let muffin = repo
        .create_product(&NewProduct::new("Muffin").with_price(2.5))
        .unwrap();
    let sample = repo.create_product(&NewProduct::new("Sample")).unwrap();

    let cart = repo
        .create_cart(&NewCart::new().with_products([latte.id, sample.id]))
        .unwrap();
    assert_eq!(cart.products, vec![latte.id, sample.id]);
    assert_eq!(cart.total_price, 4.5);

    let cart = repo.add_product_to_cart(cart.id, muffin.id).unwrap();
    let cart = repo.add_product_to_cart(cart.id, latte.id).unwrap();
    assert_eq!(cart.products, vec![latte.id, sample.id, muffin.id, latte.id]);
    assert_eq!(cart.total_price, 11.5);

    let cart = repo.remove_product_from_cart(cart.id, latte.id).unwrap();
    assert_eq!(cart.products, vec![sample.id, muffin.id, latte.id]);
    assert_eq!(cart.total_price, 7.0);

    let err = repo
        .remove_product_from_cart(cart.id, latte.id + 100)
        .expect_err("expected removal of a missing reference to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .add_product_to_cart(cart.id + 100, latte.id)
        .expect_err("expected missing cart to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let stored = repo.get_cart_by_id(cart.id).unwrap().unwrap();
    assert_eq!(stored, cart);
}

#[test]
fn test_cart_keeps_stale_references() {
    let test_db = common::TestDb::new("test_cart_keeps_stale_references.db");
    let repo = DieselRepository::new(test_db.pool());

    let latte = repo
        .create_product(&NewProduct::new("Latte").with_price(4.5))
        .unwrap();
    let muffin = repo
        .create_product(&NewProduct::new("Muffin").with_price(2.5))
        .unwrap();
    let cart = repo
        .create_cart(&NewCart::new().with_products([latte.id, muffin.id]))
        .unwrap();

    repo.delete_product(latte.id).unwrap();

    let stored = repo.get_cart_by_id(cart.id).unwrap().unwrap();
    assert_eq!(stored.products, vec![latte.id, muffin.id]);

    // The total only changes on the next cart mutation.
    let cart = repo.add_product_to_cart(cart.id, muffin.id).unwrap();
    assert_eq!(cart.total_price, 5.0);
}

#[test]
fn test_cart_listing_and_deletion() {
    let test_db = common::TestDb::new("test_cart_listing_and_deletion.db");
    let repo = DieselRepository::new(test_db.pool());

    let latte = repo
        .create_product(&NewProduct::new("Latte").with_price(4.5))
        .unwrap();
    let first = repo.create_cart(&NewCart::new()).unwrap();
    let second = repo
        .create_cart(&NewCart::new().with_products([latte.id]))
        .unwrap();
    assert!(first.products.is_empty());
    assert_eq!(first.total_price, 0.0);

    let carts = repo.list_carts().unwrap();
    assert_eq!(carts.len(), 2);
    assert_eq!(carts[0].id, first.id);
    assert_eq!(carts[1].products, vec![latte.id]);

    repo.delete_cart(first.id).unwrap();
    assert!(repo.get_cart_by_id(first.id).unwrap().is_none());

    let err = repo
        .delete_cart(first.id)
        .expect_err("expected delete of a missing cart to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let carts = repo.list_carts().unwrap();
    assert_eq!(carts, vec![second]);
}

#[test]
fn test_list_products_search_matches_literal_text() {
    let test_db = common::TestDb::new("test_list_products_search_literal.db");
    let repo = DieselRepository::new(test_db.pool());

    for title in ["Mocha", "Latte 50% off", "Cold_brew", "Café crème"] {
        repo.create_product(&NewProduct::new(title)).unwrap();
    }

    let (total, items) = repo
        .list_products(ProductListQuery::new().search("_"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&items), vec!["Cold_brew"]);

    let (total, items) = repo
        .list_products(ProductListQuery::new().search("%"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&items), vec!["Latte 50% off"]);

    let (total, items) = repo
        .list_products(ProductListQuery::new().search("CAFÉ"))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(titles(&items), vec!["Café crème"]);

    let (total, _) = repo
        .list_products(ProductListQuery::new().search("c_ld"))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_list_products_page_past_sql_range_is_empty() {
    let test_db = common::TestDb::new("test_list_products_page_past_range.db");
    let repo = DieselRepository::new(test_db.pool());
    seed_catalog(&repo);

    let (total, items) = repo
        .list_products(ProductListQuery::new().paginate(3, 5_000_000_000_000_000_000))
        .unwrap();

    assert_eq!(total, 5);
    assert!(items.is_empty());
}

#[test]
fn test_create_products_is_all_or_nothing() {
    let test_db = common::TestDb::new("test_create_products_all_or_nothing.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_products(&[
            NewProduct::new("Latte").with_price(4.5),
            NewProduct::new("Muffin").with_price(2.5),
        ])
        .unwrap();
    assert_eq!(created, 2);

    repo.delete_product(1).unwrap();
    repo.delete_product(2).unwrap();

    // The stock check rejects the second entry after the first was written.
    let err = repo
        .create_products(&[
            NewProduct::new("Mocha").with_price(5.5),
            NewProduct::new("Broken").with_stock(-1),
        ])
        .expect_err("expected the batch to fail");
    assert!(matches!(err, RepositoryError::Database(_)));

    let (total, _) = repo.list_products(ProductListQuery::new()).unwrap();
    assert_eq!(total, 0);
}
