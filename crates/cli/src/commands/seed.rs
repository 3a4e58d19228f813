//! Seed the database with sample catalog data for local development.

use rust_decimal::Decimal;

use mirakle_core::{CurrencyCode, Price, VariantId};
use mirakle_server::db::{self, BannerRepository, ProductRepository};
use mirakle_server::db::products::ProductInput;
use mirakle_server::models::product::ProductVariant;

use super::CliError;

fn sample_products() -> Vec<ProductInput> {
    let inr = |units: i64| Price::new(Decimal::new(units, 0), CurrencyCode::INR);
    let variants = |stocks: &[(i32, &str, u32)]| {
        stocks
            .iter()
            .map(|&(id, size, stock)| ProductVariant {
                id: VariantId::new(id),
                size: size.to_string(),
                stock,
            })
            .collect()
    };

    vec![
        ProductInput {
            title: "Classic Cotton Tee".to_string(),
            description: "Everyday crew-neck tee in combed cotton.".to_string(),
            price: inr(499),
            category: "tops".to_string(),
            images: vec!["https://i.ibb.co/sample/tee.png".to_string()],
            variants: variants(&[(1, "S", 10), (2, "M", 15), (3, "L", 8)]),
        },
        ProductInput {
            title: "Relaxed Linen Shirt".to_string(),
            description: "Breathable linen shirt for warm days.".to_string(),
            price: inr(1299),
            category: "tops".to_string(),
            images: vec!["https://i.ibb.co/sample/linen.png".to_string()],
            variants: variants(&[(1, "M", 6), (2, "L", 4)]),
        },
        ProductInput {
            title: "Slim Denim Jeans".to_string(),
            description: "Mid-rise slim jeans with a touch of stretch.".to_string(),
            price: inr(1799),
            category: "bottoms".to_string(),
            images: vec!["https://i.ibb.co/sample/jeans.png".to_string()],
            variants: variants(&[(1, "30", 5), (2, "32", 9), (3, "34", 3)]),
        },
    ]
}

/// Insert sample products and a banner.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let products = ProductRepository::new(&pool);
    for input in sample_products() {
        let product = products.create(&input).await?;
        tracing::info!(product_id = %product.id, title = %product.title, "Seeded product");
    }

    let banner = BannerRepository::new(&pool)
        .create("https://i.ibb.co/sample/summer-sale.png", Some("/products"))
        .await?;
    tracing::info!(banner_id = %banner.id, "Seeded banner");

    tracing::info!("Seeding complete");
    Ok(())
}
