//! Listing parse throughput for full 40-card search pages

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use scraper::Html;

use shopmania_lib::infrastructure::{ListingParser, ShopCluesParser, SnapdealParser};

fn snapdeal_page(cards: usize) -> String {
    let card = r#"<div class="product-tuple-listing js-tuple">
        <a class="dp-widget-link" href="/product/item/6341"><img src="" data-src="https://n1.sdlcdn.com/item.jpg"></a>
        <p class="product-title">Sample Product Title For Benchmark</p>
        <span class="lfloat product-price">Rs. 1,049</span>
        <div class="rating-stars"><div class="filled-stars" style="width:86%"></div></div>
    </div>"#;
    format!("<html><body>{}</body></html>", card.repeat(cards))
}

fn shopclues_page(blocks: usize) -> String {
    let block = r#"<div class="column col3 search_blocks"><a href="/item-123.html">
        <img data-img="https://cdn.shopclues.com/item.jpg">
        <h2>Sample Product Title For Benchmark</h2>
        <span class="p_price">₹299</span>
    </a></div>"#;
    format!("<html><body>{}</body></html>", block.repeat(blocks))
}

fn bench_parse_listing(c: &mut Criterion) {
    let snapdeal = SnapdealParser::new().expect("default Snapdeal selectors compile");
    let shopclues = ShopCluesParser::new().expect("default ShopClues selectors compile");
    let snapdeal_body = snapdeal_page(40);
    let shopclues_body = shopclues_page(40);

    let mut group = c.benchmark_group("parse_listing");
    group.throughput(Throughput::Elements(40));

    group.bench_function("snapdeal_document", |b| {
        b.iter(|| snapdeal.parse_document(black_box(&snapdeal_body)))
    });
    group.bench_function("shopclues_document", |b| {
        b.iter(|| shopclues.parse_document(black_box(&shopclues_body)))
    });

    // Extraction alone, with the DOM already built
    let snapdeal_html = Html::parse_document(&snapdeal_body);
    group.bench_function("snapdeal_extract_only", |b| {
        b.iter(|| snapdeal.parse_listing(black_box(&snapdeal_html)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_listing);
criterion_main!(benches);
