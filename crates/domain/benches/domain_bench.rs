use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, Money, Product, pricing};

fn sample_product(i: usize) -> Product {
    Product::new(
        format!("SKU-{i:03}"),
        format!("Product {i}"),
        Money::from_cents(450 + i as i64 * 10),
        "Acme Goods",
        "misc",
    )
}

fn bench_cart_fill(c: &mut Criterion) {
    let products: Vec<Product> = (0..15).map(sample_product).collect();

    c.bench_function("domain/cart_fill_15_lines", |b| {
        b.iter(|| {
            let mut cart = Cart::new();
            for product in &products {
                cart.add_item(product, 3).unwrap();
            }
            cart.snapshot()
        });
    });
}

fn bench_cart_snapshot(c: &mut Criterion) {
    let mut cart = Cart::new();
    for i in 0..15 {
        cart.add_item(&sample_product(i), 3).unwrap();
    }

    c.bench_function("domain/cart_snapshot", |b| {
        b.iter(|| cart.snapshot());
    });
}

fn bench_pricing(c: &mut Criterion) {
    let mut cart = Cart::new();
    for i in 0..15 {
        cart.add_item(&sample_product(i), 3).unwrap();
    }
    let lines = cart.snapshot().lines;

    c.bench_function("domain/price_full_cart", |b| {
        b.iter(|| pricing::price(&lines, Some("WELCOME10"), 200, 500).unwrap());
    });
}

criterion_group!(benches, bench_cart_fill, bench_cart_snapshot, bench_pricing);
criterion_main!(benches);
